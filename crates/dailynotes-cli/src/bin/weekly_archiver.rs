use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use dailynotes::{file_name, init_logging, install_interrupt_handler, run_to_exit_code, today};
use dailynotes_core::archive::{archive_week, ArchiveOptions};
use dailynotes_core::config::resolve_vault_config;
use dailynotes_core::note::WriteMode;
use dailynotes_core::week::WeekSpec;

const EXAMPLES: &str = "Week specification examples:
  (no option)           Archive previous week (default)
  --week current        Archive current week
  --week this           Archive current week
  --week previous       Archive previous week
  --week last           Archive previous week
  --week 2025-05-23     Archive week containing May 23, 2025
  --week 0              Archive current week (0 weeks ago)
  --week 1              Archive previous week (1 week ago)
  --week 2              Archive 2 weeks ago";

#[derive(Parser)]
#[command(
    name = "weekly-archiver",
    version = dailynotes::version::FULL,
    about = "Archive daily notes by week",
    after_help = EXAMPLES
)]
struct Cli {
    /// Vault root (relative paths are taken from the home directory)
    #[arg(long)]
    vault_path: Option<String>,
    /// Config file (default: $DAILYNOTES_HOME/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Week to archive (default: previous week)
    #[arg(long)]
    week: Option<String>,
    /// Show what would be archived without moving files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    init_logging();
    install_interrupt_handler();
    let cli = Cli::parse();
    run_to_exit_code(move || run(cli))
}

fn run(cli: Cli) -> Result<bool> {
    println!("Weekly Notes Archiver");
    println!("{}", "=".repeat(40));

    let week = WeekSpec::parse_optional(cli.week.as_deref())?;
    let (config, _) = resolve_vault_config(cli.vault_path.as_deref(), cli.config.as_deref())?;
    let mode = WriteMode::from_dry_run(cli.dry_run);
    let report = archive_week(
        &config,
        &ArchiveOptions {
            week,
            today: today(),
            mode,
        },
    )?;

    println!("Archiving {}: {}", week.describe(), report.range);
    if report.notes.is_empty() {
        println!("No daily notes found for the specified week.");
        return Ok(true);
    }

    println!("Found {} daily notes:", report.notes.len());
    for note in &report.notes {
        println!("   - {}", file_name(note));
    }
    for (note, reason) in &report.unreadable {
        println!("Warning: Could not read {}: {reason}", note.display());
    }
    if report.screenshots.is_empty() {
        println!("No screenshots found in the notes.");
    } else {
        println!("Found {} screenshots:", report.screenshots.len());
        for shot in &report.screenshots {
            println!("   - {}", file_name(shot));
        }
    }

    if mode.is_dry_run() {
        println!("\nDRY RUN - No files will be moved");
        println!("Would create folder: {}", report.archive_dir.display());
        for moved in &report.moved {
            println!("Would move: {} -> {}", file_name(&moved.from), moved.to.display());
        }
        return Ok(true);
    }

    println!("Created archive folder: {}", report.archive_dir.display());
    for moved in &report.moved {
        println!("Moved: {} -> {}", file_name(&moved.from), moved.to.display());
    }
    for failure in &report.failed {
        println!("Error moving {}: {}", failure.path.display(), failure.reason);
    }

    println!(
        "\nArchived {} files to {}",
        report.moved.len(),
        file_name(&report.archive_dir)
    );
    Ok(report.is_success())
}
