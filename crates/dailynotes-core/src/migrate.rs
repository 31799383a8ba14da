use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::config::VaultConfig;
use crate::insert::insert_groups;
use crate::note::{ensure_note, note_path, write_note, WriteMode};
use crate::todo::{incomplete_groups, TodoGroup};

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No 'To do' section found in {0}")]
    MissingTodoSection(PathBuf),
}

#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Defaults to the day before `today`.
    pub source: Option<NaiveDate>,
    /// Defaults to `today`.
    pub target: Option<NaiveDate>,
    pub today: NaiveDate,
    pub mode: WriteMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStatus {
    SourceMissing,
    NothingToMigrate,
    Migrated,
    Previewed,
}

#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub source_date: NaiveDate,
    pub target_date: NaiveDate,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub groups: Vec<TodoGroup>,
    pub target_created: bool,
    pub status: MigrationStatus,
}

impl MigrationReport {
    pub fn total_todos(&self) -> usize {
        self.groups.iter().map(TodoGroup::len).sum()
    }
}

/// Carries every open todo group from the source day's note into the target
/// day's `## To do` section.
pub fn migrate_todos(
    config: &VaultConfig,
    options: &MigrateOptions,
) -> Result<MigrationReport, MigrateError> {
    let source_date = options
        .source
        .unwrap_or_else(|| options.today - Duration::days(1));
    let target_date = options.target.unwrap_or(options.today);
    let source_path = note_path(config, source_date);
    let target_path = note_path(config, target_date);

    let mut report = MigrationReport {
        source_date,
        target_date,
        source_path: source_path.clone(),
        target_path: target_path.clone(),
        groups: Vec::new(),
        target_created: false,
        status: MigrationStatus::SourceMissing,
    };

    if !source_path.exists() {
        tracing::debug!(path = %source_path.display(), "source note missing");
        return Ok(report);
    }

    let source_text = fs::read_to_string(&source_path).map_err(|source| MigrateError::Read {
        path: source_path.clone(),
        source,
    })?;
    report.groups = incomplete_groups(&source_text);
    if report.groups.is_empty() {
        report.status = MigrationStatus::NothingToMigrate;
        return Ok(report);
    }

    let existed = target_path.exists();
    let (target_text, created) =
        ensure_note(&target_path, target_date, options.mode).map_err(|source| {
            if existed {
                MigrateError::Read {
                    path: target_path.clone(),
                    source,
                }
            } else {
                MigrateError::Write {
                    path: target_path.clone(),
                    source,
                }
            }
        })?;
    report.target_created = created;

    let updated = insert_groups(&target_text, &report.groups, source_date)
        .ok_or_else(|| MigrateError::MissingTodoSection(target_path.clone()))?;

    if options.mode.is_dry_run() {
        report.status = MigrationStatus::Previewed;
        return Ok(report);
    }
    write_note(&target_path, &updated).map_err(|source| MigrateError::Write {
        path: target_path.clone(),
        source,
    })?;
    tracing::debug!(
        target = %target_path.display(),
        groups = report.groups.len(),
        "migrated todos"
    );
    report.status = MigrationStatus::Migrated;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::note_template;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (TempDir, VaultConfig) {
        let temp = TempDir::new().expect("tempdir");
        let config = VaultConfig::new(temp.path());
        fs::create_dir_all(&config.daily_notes_path).expect("daily");
        (temp, config)
    }

    fn options(mode: WriteMode) -> MigrateOptions {
        MigrateOptions {
            source: None,
            target: None,
            today: date(2024, 3, 6),
            mode,
        }
    }

    #[test]
    fn missing_source_is_not_an_error() {
        let (_temp, config) = setup();
        let report = migrate_todos(&config, &options(WriteMode::Apply)).expect("migrate");
        assert_eq!(report.status, MigrationStatus::SourceMissing);
        assert_eq!(report.source_date, date(2024, 3, 5));
        assert!(!report.target_path.exists());
    }

    #[test]
    fn completed_source_migrates_nothing() {
        let (_temp, config) = setup();
        fs::write(
            config.daily_notes_path.join("2024-03-05.md"),
            "## To do\n- [x] done\n",
        )
        .expect("source");
        let report = migrate_todos(&config, &options(WriteMode::Apply)).expect("migrate");
        assert_eq!(report.status, MigrationStatus::NothingToMigrate);
        assert!(!config.daily_notes_path.join("2024-03-06.md").exists());
    }

    #[test]
    fn creates_target_and_inserts_groups() {
        let (_temp, config) = setup();
        fs::write(
            config.daily_notes_path.join("2024-03-05.md"),
            "## To do\n- [ ] Buy milk\n- [x] Call bank\n  - [x] sub\n",
        )
        .expect("source");

        let report = migrate_todos(&config, &options(WriteMode::Apply)).expect("migrate");
        assert_eq!(report.status, MigrationStatus::Migrated);
        assert!(report.target_created);
        assert_eq!(report.total_todos(), 1);

        let target =
            fs::read_to_string(config.daily_notes_path.join("2024-03-06.md")).expect("read");
        assert_eq!(
            target,
            "# 2024-03-06\n\n## To do\n\n\n- [ ] Buy milk (from 2024-03-05)\n## Notes\n\n"
        );
    }

    #[test]
    fn dry_run_leaves_files_untouched() {
        let (_temp, config) = setup();
        fs::write(
            config.daily_notes_path.join("2024-03-05.md"),
            "## To do\n- [ ] open\n",
        )
        .expect("source");
        let target = config.daily_notes_path.join("2024-03-06.md");
        fs::write(&target, note_template(date(2024, 3, 6))).expect("target");

        let report = migrate_todos(&config, &options(WriteMode::DryRun)).expect("migrate");
        assert_eq!(report.status, MigrationStatus::Previewed);
        assert_eq!(
            fs::read_to_string(&target).expect("read"),
            note_template(date(2024, 3, 6))
        );
    }

    #[test]
    fn unreadable_source_is_a_read_error() {
        let (_temp, config) = setup();
        // A directory named like the note cannot be read as text.
        let source = config.daily_notes_path.join("2024-03-05");
        fs::create_dir_all(&source).expect("dir");

        let err = migrate_todos(&config, &options(WriteMode::Apply)).expect_err("read");
        match err {
            MigrateError::Read { path, .. } => assert_eq!(path, source),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!config.daily_notes_path.join("2024-03-06.md").exists());
    }

    #[test]
    fn target_without_todo_section_fails() {
        let (_temp, config) = setup();
        fs::write(
            config.daily_notes_path.join("2024-03-01"),
            "## To do\n- [ ] open\n",
        )
        .expect("source");
        let target = config.daily_notes_path.join("2024-03-02.md");
        fs::write(&target, "# no section\n").expect("target");

        let err = migrate_todos(
            &config,
            &MigrateOptions {
                source: Some(date(2024, 3, 1)),
                target: Some(date(2024, 3, 2)),
                today: date(2024, 3, 6),
                mode: WriteMode::Apply,
            },
        )
        .expect_err("missing section");
        assert!(matches!(err, MigrateError::MissingTodoSection(_)));
        assert_eq!(fs::read_to_string(&target).expect("read"), "# no section\n");
    }
}
