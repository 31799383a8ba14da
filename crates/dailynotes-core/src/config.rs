use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_VAULT_PATH: &str = "Desktop/obsidian_vault";
pub const DEFAULT_DAILY_NOTES_DIR: &str = "Daily notes";
pub const DEFAULT_ARCHIVE_DIR: &str = "4 ARCHIVE/Weekly Notes";
pub const DEFAULT_ATTACHMENT_DIRS: [&str; 2] = ["attachments", "assets"];

pub const VAULT_ENV: &str = "DAILYNOTES_VAULT";
pub const HOME_ENV: &str = "DAILYNOTES_HOME";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Cannot resolve relative vault path {0}: no home directory")]
    MissingHome(String),
}

/// On-disk configuration. Every field is optional; unset fields fall back to
/// the built-in vault layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Vault root. Relative values are taken from the home directory.
    pub vault_path: Option<String>,
    /// Daily notes directory, relative to the vault root.
    pub daily_notes_dir: Option<String>,
    /// Weekly archive root, relative to the vault root.
    pub archive_dir: Option<String>,
    /// Extra directories searched for embedded images, relative to the vault root.
    pub attachment_dirs: Option<Vec<String>>,
}

/// Resolved vault layout handed to every component that touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub vault_path: PathBuf,
    pub daily_notes_path: PathBuf,
    pub archive_path: PathBuf,
    pub attachment_dirs: Vec<PathBuf>,
}

impl VaultConfig {
    pub fn new(vault_path: impl Into<PathBuf>) -> Self {
        Self::with_layout(vault_path, &ConfigFile::default())
    }

    pub fn with_layout(vault_path: impl Into<PathBuf>, file: &ConfigFile) -> Self {
        let vault_path = vault_path.into();
        let daily_notes_dir = file
            .daily_notes_dir
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_DAILY_NOTES_DIR);
        let archive_dir = file
            .archive_dir
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ARCHIVE_DIR);
        let attachment_dirs = match file.attachment_dirs.as_ref() {
            Some(dirs) => dirs
                .iter()
                .map(|dir| dir.trim())
                .filter(|dir| !dir.is_empty())
                .map(|dir| vault_path.join(dir))
                .collect(),
            None => DEFAULT_ATTACHMENT_DIRS
                .iter()
                .map(|dir| vault_path.join(dir))
                .collect(),
        };
        Self {
            daily_notes_path: vault_path.join(daily_notes_dir),
            archive_path: vault_path.join(archive_dir),
            attachment_dirs,
            vault_path,
        }
    }

    /// Directories searched, in order, when resolving an embedded image name.
    pub fn screenshot_search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(self.attachment_dirs.len() + 2);
        dirs.push(self.vault_path.clone());
        dirs.extend(self.attachment_dirs.iter().cloned());
        dirs.push(self.daily_notes_path.clone());
        dirs
    }
}

pub fn resolve_user_home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    if let Ok(profile) = std::env::var("USERPROFILE") {
        let trimmed = profile.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    None
}

pub fn resolve_dailynotes_home_dir() -> Option<PathBuf> {
    if let Ok(value) = std::env::var(HOME_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    resolve_user_home_dir().map(|home| home.join(".dailynotes"))
}

pub fn global_config_path() -> Option<PathBuf> {
    resolve_dailynotes_home_dir().map(|home| home.join("config.toml"))
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<ConfigFile>(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_global_config() -> Option<ConfigFile> {
    let path = global_config_path()?;
    if !path.is_file() {
        return None;
    }
    match load_config_file(&path) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable global config");
            None
        }
    }
}

/// Joins a relative vault path onto the home directory; absolute paths pass through.
pub fn expand_vault_path(value: &str, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(value.trim());
    if path.is_absolute() {
        return Ok(path);
    }
    home.map(|home| home.join(&path))
        .ok_or_else(|| ConfigError::MissingHome(value.to_string()))
}

/// Builds the vault layout from the CLI flag, environment, config file and
/// built-in default, in that order. Returns the layout and where the vault
/// path came from.
pub fn resolve_vault_config(
    cli_vault: Option<&str>,
    config_path: Option<&Path>,
) -> Result<(VaultConfig, &'static str), ConfigError> {
    let file = match config_path {
        Some(path) => Some(load_config_file(path)?),
        None => load_global_config(),
    };
    let file = file.unwrap_or_default();
    let env_vault = std::env::var(VAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());

    let (raw, source) = if let Some(value) = cli_vault.filter(|v| !v.trim().is_empty()) {
        (value.to_string(), "cli")
    } else if let Some(value) = env_vault {
        (value, "env")
    } else if let Some(value) = file
        .vault_path
        .clone()
        .filter(|value| !value.trim().is_empty())
    {
        (value, "config")
    } else {
        (DEFAULT_VAULT_PATH.to_string(), "default")
    };

    let home = resolve_user_home_dir();
    let vault_path = expand_vault_path(&raw, home.as_deref())?;
    tracing::debug!(vault = %vault_path.display(), source, "resolved vault path");
    Ok((VaultConfig::with_layout(vault_path, &file), source))
}
