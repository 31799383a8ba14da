//! Daily note files: locating them by date and creating missing ones.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::VaultConfig;
use crate::week::WeekRange;

/// Whether mutating steps touch the filesystem. Every flow computes the same
/// plan in both modes; only the final write or move is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Apply,
    DryRun,
}

impl WriteMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            WriteMode::DryRun
        } else {
            WriteMode::Apply
        }
    }

    pub fn is_dry_run(self) -> bool {
        self == WriteMode::DryRun
    }
}

pub fn date_stem(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Existing note for `date`, trying the bare name before `.md`.
pub fn existing_note_path(config: &VaultConfig, date: NaiveDate) -> Option<PathBuf> {
    let stem = date_stem(date);
    let bare = config.daily_notes_path.join(&stem);
    if bare.exists() {
        return Some(bare);
    }
    let md = config.daily_notes_path.join(format!("{stem}.md"));
    if md.exists() {
        return Some(md);
    }
    None
}

/// Note path for `date`: the existing file if any, otherwise the `.md` path
/// a new note would be created at.
pub fn note_path(config: &VaultConfig, date: NaiveDate) -> PathBuf {
    existing_note_path(config, date).unwrap_or_else(|| {
        config
            .daily_notes_path
            .join(format!("{}.md", date_stem(date)))
    })
}

/// Every note that exists between Monday and Sunday, in date order.
pub fn notes_for_week(config: &VaultConfig, range: &WeekRange) -> Vec<PathBuf> {
    range
        .days()
        .filter_map(|day| existing_note_path(config, day))
        .filter(|path| path.is_file())
        .collect()
}

pub fn note_template(date: NaiveDate) -> String {
    format!("# {}\n\n## To do\n\n\n## Notes\n\n", date_stem(date))
}

/// Write a note file, creating parent directories as needed.
pub fn write_note(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Creates `path` from the template when missing. Returns the note's current
/// (or would-be) content and whether it had to be created.
pub fn ensure_note(path: &Path, date: NaiveDate, mode: WriteMode) -> io::Result<(String, bool)> {
    if path.exists() {
        return Ok((fs::read_to_string(path)?, false));
    }
    let content = note_template(date);
    if !mode.is_dry_run() {
        write_note(path, &content)?;
        tracing::debug!(path = %path.display(), "created daily note");
    }
    Ok((content, true))
}
