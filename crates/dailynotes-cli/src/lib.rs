//! Shared plumbing for the `todo-migrator` and `weekly-archiver` binaries.

use std::panic::{self, UnwindSafe};
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use dailynotes_core::week::parse_iso_date;
use tracing_subscriber::EnvFilter;

pub mod version;

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Ctrl-C prints a cancellation notice and exits with status 1. Files already
/// written or moved stay as they are.
pub fn install_interrupt_handler() {
    if let Err(err) = ctrlc::set_handler(|| {
        eprintln!("\nOperation cancelled by user");
        std::process::exit(1);
    }) {
        tracing::warn!(error = %err, "could not install Ctrl-C handler");
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    parse_iso_date(value).ok_or_else(|| anyhow!("Invalid date format: {value}. Use YYYY-MM-DD"))
}

pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value.map(parse_date).transpose()
}

/// Runs a command body and maps its result to the process exit code:
/// `Ok(true)` is success, `Ok(false)`, errors and panics are failures.
pub fn run_to_exit_code(body: impl FnOnce() -> Result<bool> + UnwindSafe) -> ExitCode {
    ExitCode::from(exit_status(panic::catch_unwind(body)))
}

fn exit_status(outcome: std::thread::Result<Result<bool>>) -> u8 {
    match outcome {
        Ok(Ok(true)) => 0,
        Ok(Ok(false)) => 1,
        Ok(Err(err)) => {
            eprintln!("Error: {err:#}");
            1
        }
        Err(_) => {
            eprintln!("Error: unexpected failure");
            1
        }
    }
}

pub fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_date("2025-08-01").expect("date"),
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
        );
        assert!(parse_date("08/01/2025").is_err());
        assert!(parse_date("+262142-12-31").is_err());
        assert!(parse_date("2025-8-1").is_err());
        assert_eq!(parse_optional_date(None).expect("none"), None);
    }

    #[test]
    fn exit_codes_follow_outcome() {
        assert_eq!(exit_status(Ok(Ok(true))), 0);
        assert_eq!(exit_status(Ok(Ok(false))), 1);
        assert_eq!(exit_status(Ok(Err(anyhow!("boom")))), 1);
        assert_eq!(exit_status(Err(Box::new("panic"))), 1);
    }
}
