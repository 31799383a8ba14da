use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_todo-migrator"))
}

fn run(vault: &Path, args: &[&str]) -> Output {
    bin()
        .env("DAILYNOTES_HOME", vault.join(".dailynotes"))
        .env_remove("DAILYNOTES_VAULT")
        .arg("--vault-path")
        .arg(vault)
        .args(args)
        .output()
        .expect("run todo-migrator")
}

fn daily(vault: &Path) -> std::path::PathBuf {
    let dir = vault.join("Daily notes");
    std::fs::create_dir_all(&dir).expect("daily notes dir");
    dir
}

#[test]
fn migrates_open_groups_into_new_note() {
    let vault = TempDir::new().expect("vault");
    let dir = daily(vault.path());
    std::fs::write(
        dir.join("2025-08-01.md"),
        concat!(
            "# 2025-08-01\n\n## To do\n- [ ] Buy milk\n- [x] Call bank\n  - [x] sub\n",
            "- [x] Report\n  - [ ] appendix\n\n## Notes\n",
        ),
    )
    .expect("source");

    let output = run(vault.path(), &["--from", "2025-08-01", "--to", "2025-08-02"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 3 todos to migrate (2 groups)"), "{stdout}");

    let target = std::fs::read_to_string(dir.join("2025-08-02.md")).expect("target");
    assert_eq!(
        target,
        concat!(
            "# 2025-08-02\n\n## To do\n\n\n- [ ] Buy milk (from 2025-08-01)\n",
            "- [x] Report (from 2025-08-01)\n  - [ ] appendix (from 2025-08-01)\n## Notes\n\n",
        )
    );
}

#[test]
fn dry_run_does_not_create_target() {
    let vault = TempDir::new().expect("vault");
    let dir = daily(vault.path());
    std::fs::write(dir.join("2025-08-01"), "## To do\n- [ ] open\n").expect("source");

    let output = run(
        vault.path(),
        &["--from", "2025-08-01", "--to", "2025-08-02", "--dry-run"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DRY RUN"), "{stdout}");
    assert!(!dir.join("2025-08-02.md").exists());
}

#[test]
fn missing_source_succeeds_without_changes() {
    let vault = TempDir::new().expect("vault");
    let dir = daily(vault.path());

    let output = run(vault.path(), &["--from", "2025-08-01", "--to", "2025-08-02"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Source note not found"));
    assert!(!dir.join("2025-08-02.md").exists());
}

#[test]
fn target_without_todo_section_fails() {
    let vault = TempDir::new().expect("vault");
    let dir = daily(vault.path());
    std::fs::write(dir.join("2025-08-01.md"), "## To do\n- [ ] open\n").expect("source");
    std::fs::write(dir.join("2025-08-02.md"), "# Just notes\n").expect("target");

    let output = run(vault.path(), &["--from", "2025-08-01", "--to", "2025-08-02"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No 'To do' section"));
    assert_eq!(
        std::fs::read_to_string(dir.join("2025-08-02.md")).expect("target"),
        "# Just notes\n"
    );
}

#[test]
fn invalid_date_exits_with_failure() {
    let vault = TempDir::new().expect("vault");
    daily(vault.path());

    let output = run(vault.path(), &["--from", "08/01/2025"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid date format"));
}

#[test]
fn out_of_calendar_date_exits_with_failure() {
    let vault = TempDir::new().expect("vault");
    daily(vault.path());

    for value in ["+262142-12-31", "-262143-01-01"] {
        let arg = format!("--from={value}");
        let output = run(vault.path(), &[arg.as_str()]);
        assert_eq!(output.status.code(), Some(1), "{value}");
        assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid date format"));
    }
}

#[cfg(unix)]
#[test]
fn interrupt_exits_with_failure() {
    use std::process::Stdio;
    use std::time::{Duration, Instant};

    let vault = TempDir::new().expect("vault");
    let dir = daily(vault.path());
    // Reading a FIFO with no writer blocks until the process is interrupted.
    let fifo = dir.join("2025-08-01.md");
    let status = Command::new("mkfifo").arg(&fifo).status().expect("mkfifo");
    assert!(status.success());

    let mut child = bin()
        .env("DAILYNOTES_HOME", vault.path().join(".dailynotes"))
        .env_remove("DAILYNOTES_VAULT")
        .arg("--vault-path")
        .arg(vault.path())
        .args(["--from", "2025-08-01", "--to", "2025-08-02"])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn todo-migrator");
    std::thread::sleep(Duration::from_millis(500));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("kill");
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(10);
    while child.try_wait().expect("try_wait").is_none() {
        if Instant::now() > deadline {
            child.kill().expect("kill child");
            panic!("todo-migrator did not exit after SIGINT");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    let output = child.wait_with_output().expect("output");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Operation cancelled by user"));
    assert!(!dir.join("2025-08-02.md").exists());
}
