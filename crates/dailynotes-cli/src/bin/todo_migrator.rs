use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use dailynotes::{
    file_name, init_logging, install_interrupt_handler, parse_optional_date, run_to_exit_code,
    today,
};
use dailynotes_core::config::resolve_vault_config;
use dailynotes_core::migrate::{migrate_todos, MigrateOptions, MigrationStatus};
use dailynotes_core::note::{date_stem, WriteMode};

const EXAMPLES: &str = "Examples:
  todo-migrator                                  Migrate yesterday's todos to today
  todo-migrator --dry-run                        Preview migration
  todo-migrator --from 2025-08-01                Migrate from a specific date to today
  todo-migrator --from 2025-08-01 --to 2025-08-02";

#[derive(Parser)]
#[command(
    name = "todo-migrator",
    version = dailynotes::version::FULL,
    about = "Migrate incomplete todos between daily notes",
    after_help = EXAMPLES
)]
struct Cli {
    /// Vault root (relative paths are taken from the home directory)
    #[arg(long)]
    vault_path: Option<String>,
    /// Config file (default: $DAILYNOTES_HOME/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Source date, YYYY-MM-DD (default: yesterday)
    #[arg(long = "from")]
    source: Option<String>,
    /// Target date, YYYY-MM-DD (default: today)
    #[arg(long = "to")]
    target: Option<String>,
    /// Show what would be migrated without changing files
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
    println!("Todo Migrator");
    println!("{}", "=".repeat(30));

    let options = MigrateOptions {
        source: parse_optional_date(cli.source.as_deref())?,
        target: parse_optional_date(cli.target.as_deref())?,
        today: today(),
        mode: WriteMode::from_dry_run(cli.dry_run),
    };
    let (config, _) = resolve_vault_config(cli.vault_path.as_deref(), cli.config.as_deref())?;
    let report = migrate_todos(&config, &options)?;

    println!(
        "Source: {} ({})",
        date_stem(report.source_date),
        file_name(&report.source_path)
    );
    println!(
        "Target: {} ({})",
        date_stem(report.target_date),
        file_name(&report.target_path)
    );

    match report.status {
        MigrationStatus::SourceMissing => {
            println!("Source note not found: {}", report.source_path.display());
            return Ok(true);
        }
        MigrationStatus::NothingToMigrate => {
            println!("No incomplete todos found to migrate");
            return Ok(true);
        }
        MigrationStatus::Migrated | MigrationStatus::Previewed => {}
    }

    println!(
        "Found {} todos to migrate ({} groups)",
        report.total_todos(),
        report.groups.len()
    );
    for (idx, group) in report.groups.iter().enumerate() {
        println!("\nGroup {}:", idx + 1);
        for item in group.items() {
            let mark = if item.completed { "x" } else { " " };
            println!("  [{mark}] {}", item.text);
        }
    }

    if report.status == MigrationStatus::Previewed {
        println!("\nDRY RUN - No files will be modified");
        if report.target_created {
            println!("Would create daily note: {}", file_name(&report.target_path));
        }
        return Ok(true);
    }

    if report.target_created {
        println!("Created new daily note: {}", file_name(&report.target_path));
    }
    println!(
        "\nSuccessfully migrated {} todos to {}",
        report.total_todos(),
        file_name(&report.target_path)
    );
    Ok(true)
}
