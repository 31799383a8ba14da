use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::VaultConfig;
use crate::note::{notes_for_week, WriteMode};
use crate::screenshot::find_screenshots;
use crate::week::{WeekError, WeekRange, WeekSpec};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Vault not found at {0}")]
    MissingVault(PathBuf),
    #[error("Daily notes folder not found at {0}")]
    MissingDailyNotes(PathBuf),
    #[error(transparent)]
    Week(#[from] WeekError),
    #[error("Failed to create archive folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub week: WeekSpec,
    pub today: NaiveDate,
    pub mode: WriteMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct MoveOutcome {
    pub moved: Vec<MovedFile>,
    pub failed: Vec<MoveFailure>,
}

#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub week: WeekSpec,
    pub range: WeekRange,
    pub notes: Vec<PathBuf>,
    pub screenshots: Vec<PathBuf>,
    pub unreadable: Vec<(PathBuf, String)>,
    pub archive_dir: PathBuf,
    pub moved: Vec<MovedFile>,
    pub failed: Vec<MoveFailure>,
    pub mode: WriteMode,
}

impl ArchiveReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn week_folder(config: &VaultConfig, range: &WeekRange) -> PathBuf {
    config.archive_path.join(range.folder_name())
}

/// Creates the week folder (and archive root) if missing. Idempotent.
pub fn create_week_folder(
    config: &VaultConfig,
    range: &WeekRange,
    mode: WriteMode,
) -> Result<PathBuf, ArchiveError> {
    let path = week_folder(config, range);
    if !mode.is_dry_run() {
        fs::create_dir_all(&path).map_err(|source| ArchiveError::CreateFolder {
            path: path.clone(),
            source,
        })?;
    }
    Ok(path)
}

/// `stem + ext` if free, otherwise the first free `stem_N + ext` for N = 1, 2, ...
/// `ext` includes its leading dot, or is empty.
pub fn next_available_name(existing: &HashSet<String>, stem: &str, ext: &str) -> String {
    let candidate = format!("{stem}{ext}");
    if !existing.contains(&candidate) {
        return candidate;
    }
    let mut counter = 1usize;
    loop {
        let candidate = format!("{stem}_{counter}{ext}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

fn dir_entries(dir: &Path) -> HashSet<String> {
    match fs::read_dir(dir) {
        Ok(read_dir) => read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect(),
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(dir = %dir.display(), error = %err, "could not list destination");
            }
            HashSet::new()
        }
    }
}

/// Like `next_available_name`, but also skips names already present on disk
/// that the directory listing missed.
fn free_name(destination: &Path, taken: &mut HashSet<String>, stem: &str, ext: &str) -> String {
    loop {
        let name = next_available_name(taken, stem, ext);
        if !destination.join(&name).exists() {
            return name;
        }
        taken.insert(name);
    }
}

/// Renames `from` to `to`, falling back to copy and remove when a rename is
/// not possible (for example across devices).
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!(error = %rename_err, "rename failed, copying instead");
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

/// Moves every existing file into `destination`, renaming on collision.
/// Failures are collected per file; the remaining files still move.
pub fn move_files(files: &[PathBuf], destination: &Path, mode: WriteMode) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();
    let mut taken = dir_entries(destination);

    for file in files {
        if !file.exists() {
            tracing::debug!(path = %file.display(), "skipping missing file");
            continue;
        }
        let (stem, ext) = split_name(file);
        let name = free_name(destination, &mut taken, &stem, &ext);
        let target = destination.join(&name);

        if !mode.is_dry_run() {
            if let Err(err) = move_file(file, &target) {
                tracing::warn!(path = %file.display(), error = %err, "failed to move file");
                outcome.failed.push(MoveFailure {
                    path: file.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        }
        taken.insert(name);
        outcome.moved.push(MovedFile {
            from: file.clone(),
            to: target,
        });
    }
    outcome
}

/// Moves one week of daily notes, plus the images they embed, into
/// `Week of <monday>` under the archive root.
pub fn archive_week(
    config: &VaultConfig,
    options: &ArchiveOptions,
) -> Result<ArchiveReport, ArchiveError> {
    if !config.vault_path.exists() {
        return Err(ArchiveError::MissingVault(config.vault_path.clone()));
    }
    if !config.daily_notes_path.exists() {
        return Err(ArchiveError::MissingDailyNotes(
            config.daily_notes_path.clone(),
        ));
    }

    let range = options.week.resolve(options.today)?;
    let archive_dir = week_folder(config, &range);
    let mut report = ArchiveReport {
        week: options.week,
        range,
        notes: notes_for_week(config, &range),
        screenshots: Vec::new(),
        unreadable: Vec::new(),
        archive_dir,
        moved: Vec::new(),
        failed: Vec::new(),
        mode: options.mode,
    };
    tracing::debug!(range = %range, notes = report.notes.len(), "resolved archive week");
    if report.notes.is_empty() {
        return Ok(report);
    }

    let scan = find_screenshots(config, &report.notes);
    report.screenshots = scan.screenshots;
    report.unreadable = scan.unreadable;

    let folder = create_week_folder(config, &range, options.mode)?;
    let files: Vec<PathBuf> = report
        .notes
        .iter()
        .chain(report.screenshots.iter())
        .cloned()
        .collect();
    let outcome = move_files(&files, &folder, options.mode);
    report.moved = outcome.moved;
    report.failed = outcome.failed;
    Ok(report)
}
