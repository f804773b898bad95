#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kvp(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kvp").unwrap();
    cmd.current_dir(dir.path())
        .env("KVP_ROOT", dir.path())
        .env_remove("KVP_ROLE")
        .env_remove("KVP_CONFIG")
        .env("KVP_TODAY", "2024-07-25");
    cmd
}

fn write_script(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("session.yaml");
    std::fs::write(&path, body).unwrap();
    path
}

fn json_of(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

// ---------------------------------------------------------------------------
// kvp sample
// ---------------------------------------------------------------------------

#[test]
fn sample_prints_dashboard() {
    let dir = TempDir::new().unwrap();
    kvp(&dir)
        .arg("sample")
        .assert()
        .success()
        .stdout(predicate::str::contains("Example: Reducing waiting times"))
        .stdout(predicate::str::contains("Progress: 100%"))
        .stdout(predicate::str::contains("Improvement: 28.9%"));
}

#[test]
fn sample_json_dashboard() {
    let dir = TempDir::new().unwrap();
    let v = json_of(kvp(&dir).args(["sample", "--json"]));
    let d = &v["dashboard"];
    assert_eq!(d["completion_percent"], 100);
    assert_eq!(d["tasks"]["total"], 3);
    assert_eq!(d["tasks"]["completed"], 1);
    assert_eq!(d["tasks"]["in_progress"], 1);
    assert_eq!(d["tasks"]["overdue"], 1);
    assert_eq!(d["status_histogram"]["open"], 1);
    assert_eq!(v["role"], "admin");
    assert_eq!(v["can_delete"], true);
}

#[test]
fn sample_export_writes_named_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("exports");
    kvp(&dir)
        .args(["sample", "--export"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let file = out.join("kvp_project_Example__Reducing_waiting_times.json");
    let data = std::fs::read_to_string(&file).unwrap();
    let v: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(v["check"]["metrics"]["before"], 45.0);
    assert_eq!(v["do"]["implementationSteps"].as_array().unwrap().len(), 3);
}

#[test]
fn bare_export_uses_configured_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".kvp")).unwrap();
    std::fs::write(dir.path().join(".kvp/config.yaml"), "export_dir: out\n").unwrap();

    kvp(&dir).args(["sample", "--export"]).assert().success();

    assert!(dir
        .path()
        .join("out/kvp_project_Example__Reducing_waiting_times.json")
        .exists());
}

#[test]
fn bare_export_defaults_to_root() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "steps:\n  - new_project: { name: \"Scrap rate\" }\n");
    kvp(&dir)
        .arg("run")
        .arg(&script)
        .arg("--export")
        .assert()
        .success();

    assert!(dir.path().join("kvp_project_Scrap_rate.json").exists());
}

#[test]
fn no_export_flag_writes_nothing() {
    let dir = TempDir::new().unwrap();
    kvp(&dir).arg("sample").assert().success();
    assert!(!dir
        .path()
        .join("kvp_project_Example__Reducing_waiting_times.json")
        .exists());
}

#[test]
fn reader_role_is_reported_read_only() {
    let dir = TempDir::new().unwrap();
    kvp(&dir)
        .args(["--role", "leser", "sample"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Role: reader (read-only)"));
}

#[test]
fn invalid_role_fails() {
    let dir = TempDir::new().unwrap();
    kvp(&dir)
        .args(["--role", "guest", "sample"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --role"));
}

// ---------------------------------------------------------------------------
// kvp run
// ---------------------------------------------------------------------------

#[test]
fn run_script_builds_project() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        r#"
steps:
  - new_project: { name: "Scrap rate" }
  - plan: { problem: "Too much scrap" }
  - add_task: { task: "Measure scrap", responsible: "Anna", due_date: "2024-07-24" }
  - add_task: { task: "Train operators", due_date: "2024-07-25" }
"#,
    );
    let v = json_of(kvp(&dir).arg("--json").arg("run").arg(&script));
    let d = &v["dashboard"];
    assert_eq!(d["name"], "Scrap rate");
    assert_eq!(d["completion_percent"], 50);
    assert_eq!(d["tasks"]["total"], 2);
    // Due yesterday counts, due today does not.
    assert_eq!(d["tasks"]["overdue"], 1);
}

#[test]
fn run_reports_failing_step() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        r#"
steps:
  - new_project: {}
  - delete_project
"#,
    );
    kvp(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("step 2 (delete_project) failed"))
        .stderr(predicate::str::contains("cannot delete the last project"));
}

#[test]
fn run_rejects_reader_edits() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        r#"
steps:
  - sample
  - role: reader
  - set_task_status: { index: 2, status: completed }
"#,
    );
    kvp(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
}

#[test]
fn run_rejects_bad_metric() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        r#"
steps:
  - new_project: {}
  - check: { before: "forty-five", after: 32 }
"#,
    );
    kvp(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a number"));
}

#[test]
fn run_export_cannot_leave_target_dir() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        r#"
steps:
  - new_project: {}
  - rename: "x/../../escaped"
"#,
    );
    let out = dir.path().join("a/b");
    kvp(&dir)
        .arg("run")
        .arg(&script)
        .arg("--export")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("kvp_project_x_.._.._escaped.json").exists());
    assert!(!dir.path().join("escaped.json").exists());
}

#[test]
fn run_missing_script_fails() {
    let dir = TempDir::new().unwrap();
    kvp(&dir)
        .args(["run", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read script"));
}

// ---------------------------------------------------------------------------
// kvp show
// ---------------------------------------------------------------------------

#[test]
fn show_reads_an_export() {
    let dir = TempDir::new().unwrap();
    kvp(&dir)
        .args(["sample", "--export", "."])
        .assert()
        .success();

    let v = json_of(kvp(&dir).args([
        "show",
        "kvp_project_Example__Reducing_waiting_times.json",
        "--json",
    ]));
    assert_eq!(v["dashboard"]["completion_percent"], 100);
}

// ---------------------------------------------------------------------------
// kvp config
// ---------------------------------------------------------------------------

#[test]
fn config_defaults_are_valid() {
    let dir = TempDir::new().unwrap();
    kvp(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_file_sets_default_role_and_name() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".kvp")).unwrap();
    std::fs::write(
        dir.path().join(".kvp/config.yaml"),
        "default_role: editor\nnew_project_name: Neues KVP-Projekt\n",
    )
    .unwrap();

    let script = write_script(&dir, "steps:\n  - new_project: {}\n");
    let v = json_of(kvp(&dir).arg("--json").arg("run").arg(&script));
    assert_eq!(v["role"], "editor");
    assert_eq!(v["can_delete"], false);
    assert_eq!(v["dashboard"]["name"], "Neues KVP-Projekt");
}

#[test]
fn config_validate_fails_on_blank_name() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".kvp")).unwrap();
    std::fs::write(dir.path().join(".kvp/config.yaml"), "new_project_name: \"\"\n").unwrap();

    kvp(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"));
}
