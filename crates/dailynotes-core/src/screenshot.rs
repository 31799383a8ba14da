use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::VaultConfig;

fn embed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)!\[\[([^\]]*\.(?:png|jpg|jpeg|gif|bmp|tiff|webp))\]\]").expect("regex")
    })
}

#[derive(Debug, Clone, Default)]
pub struct ScreenshotScan {
    /// Resolved image files, deduplicated, in first-seen order.
    pub screenshots: Vec<PathBuf>,
    /// Notes that could not be read, with the reason.
    pub unreadable: Vec<(PathBuf, String)>,
}

/// Image names embedded as `![[name.ext]]`, in order of appearance.
pub fn embedded_images(content: &str) -> Vec<&str> {
    embed_re()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Embed names stay inside the vault: plain relative paths only, no `..`,
/// no root or drive prefix.
fn is_vault_relative(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// First existing file named `name` across the vault's search directories.
pub fn resolve_image(config: &VaultConfig, name: &str) -> Option<PathBuf> {
    if !is_vault_relative(name) {
        tracing::warn!(image = name, "ignoring embed that points outside the vault");
        return None;
    }
    config
        .screenshot_search_dirs()
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
}

pub fn find_screenshots(config: &VaultConfig, notes: &[PathBuf]) -> ScreenshotScan {
    let mut scan = ScreenshotScan::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for note in notes.iter().filter(|path| path.is_file()) {
        let content = match fs::read_to_string(note) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(note = %note.display(), error = %err, "could not read note");
                scan.unreadable.push((note.clone(), err.to_string()));
                continue;
            }
        };
        for name in embedded_images(&content) {
            match resolve_image(config, name) {
                Some(path) => {
                    if seen.insert(path.clone()) {
                        scan.screenshots.push(path);
                    }
                }
                None => {
                    tracing::debug!(image = name, note = %display_name(note), "unresolved embed")
                }
            }
        }
    }
    scan
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
