#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::path::Path;
use tempfile::{TempDir, tempdir};

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempdir().expect("create temp dir"),
        }
    }

    fn data_path(&self) -> std::path::PathBuf {
        self.dir.path().join("calendar-data.json")
    }

    #[allow(deprecated)]
    fn run(&self, script: &str) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("cli").expect("cli binary");
        cmd.arg("--config")
            .arg(self.dir.path().join("config.toml"))
            .arg("--data")
            .arg(self.data_path())
            .write_stdin(script.to_string())
            .assert()
    }
}

fn escaped(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}

#[test]
fn cli_prints_help_and_exits() {
    Workspace::new()
        .run("help\nquit\n")
        .success()
        .stdout(str_contains("class add <CODE> <weight> <name...>"));
}

#[test]
fn cli_reports_usage_for_incomplete_commands() {
    Workspace::new()
        .run("class add MATH\nmark 2025-03-10\nfrobnicate\nquit\n")
        .success()
        .stdout(str_contains("Usage: class add <CODE> <weight> <name...>"))
        .stdout(str_contains("Usage: mark <YYYY-MM-DD> <CODE=status,...>"))
        .stdout(str_contains("Unknown command. Type 'help'."));
}

#[test]
fn cli_computes_class_stats_after_marking_absence() {
    let script = "semester 2025-03-10 2025-03-10\n\
                  class add algebra 10 Linear Algebra\n\
                  schedule monday ALGEBRA\n\
                  mark 2025-03-10 ALGEBRA=absence\n\
                  stats\n\
                  quit\n";
    Workspace::new()
        .run(script)
        .success()
        .stdout(str_contains("Class ALGEBRA added."))
        .stdout(str_contains("Linear Algebra"))
        .stdout(str_contains("90.0"))
        .stdout(str_contains("absences=1"));
}

#[test]
fn cli_state_survives_restart() {
    let ws = Workspace::new();
    ws.run("class add BIO 4 Biology\nquit\n").success();
    assert!(ws.data_path().exists());
    ws.run("classes\nquit\n")
        .success()
        .stdout(str_contains("Biology"));
}

#[test]
fn cli_clamps_thresholds() {
    Workspace::new()
        .run("colors 120 10\nquit\n")
        .success()
        .stdout(str_contains("Thresholds set: minimum=100 caution=100"));
}

#[test]
fn cli_export_and_import_round_trip() {
    let ws = Workspace::new();
    let export_path = ws.dir.path().join("backup.json");
    let script = format!(
        "class add CHEM 3 Chemistry\nexport {}\nclass remove CHEM\nimport {}\nclasses\nquit\n",
        escaped(&export_path),
        escaped(&export_path)
    );
    let assert = ws.run(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(output.contains("Exported to"));
    assert!(output.contains("Class CHEM removed."));
    assert!(output.contains("Imported 1 classes"));
    let after_import = output.split("Imported").last().unwrap_or_default();
    assert!(after_import.contains("Chemistry"));
}

#[test]
fn cli_import_rejects_invalid_files() {
    let ws = Workspace::new();
    let bad = ws.dir.path().join("bad.json");
    std::fs::write(&bad, "{ nope").unwrap();
    ws.run(&format!("import {}\nquit\n", escaped(&bad)))
        .success()
        .stdout(str_contains("Import failed: invalid JSON"));
}

#[test]
fn cli_day_modes_show_per_class_status() {
    let script = "semester 2025-03-10 2025-03-16\n\
                  class add MATH 2.5 Calculus\n\
                  class add PHY 5 Physics\n\
                  schedule mon MATH,PHY\n\
                  mode 2025-03-10 all-free\n\
                  day 2025-03-10\n\
                  quit\n";
    Workspace::new()
        .run(script)
        .success()
        .stdout(str_contains("mode=all-free"))
        .stdout(str_contains("| PHY  | free   |"));
}

#[test]
fn cli_refuses_to_start_on_unreadable_data_file() {
    let ws = Workspace::new();
    let broken = r#"{"semester": {"startDate": "someday"}, "classes": []}"#;
    std::fs::write(ws.data_path(), broken).unwrap();
    ws.run("quit\n")
        .failure()
        .stderr(str_contains("loading calendar from"));
    assert_eq!(std::fs::read_to_string(ws.data_path()).unwrap(), broken);
}
