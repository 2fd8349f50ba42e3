use assert_cmd::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
  "version": 2,
  "generated_at": "2026-02-01T00:00:00Z",
  "org": "acme",
  "total_repos": 3,
  "public_repos": 2,
  "unavailable": [],
  "contributors": [
    {"name": "alice", "value": 900},
    {"name": "bob", "value": 100}
  ],
  "utc_offset": 9,
  "hours": [0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
  "languages": [
    {"name": "Rust", "value": 4000},
    {"name": "Shell", "value": 200}
  ],
  "loc": [
    {"name": "Rust", "value": {"files": 10, "code": 1200, "comments": 30, "blanks": 90}}
  ],
  "members": ["alice", "bob"]
}"#;

fn write_snapshot(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("snapshot.json");
    fs::write(&path, contents).unwrap();
    path
}

fn render_cmd(snapshot: &Path, output: &Path) -> Command {
    let mut cmd = Command::cargo_bin("orgfolio").unwrap();
    cmd.env_remove("ORGFOLIO_ORG")
        .env_remove("GITHUB_TOKEN")
        .arg("render")
        .arg("--from")
        .arg(snapshot)
        .arg("--output")
        .arg(output);
    cmd
}

#[test]
fn help_lists_subcommands() {
    let out = Command::cargo_bin("orgfolio")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    for sub in ["generate", "snapshot", "render"] {
        assert!(text.contains(sub), "missing {sub} in help");
    }
}

#[test]
fn render_from_snapshot_is_byte_identical() {
    let dir = tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    let first = dir.path().join("first/README.md");
    let second = dir.path().join("second/README.md");

    render_cmd(&snapshot, &first).assert().success();
    render_cmd(&snapshot, &second).assert().success();

    let a = fs::read(&first).unwrap();
    let b = fs::read(&second).unwrap();
    assert_eq!(a, b);

    let text = String::from_utf8(a).unwrap();
    assert!(text.contains("alice"));
    assert!(text.contains("### ⏰ When we code"));
    assert!(text.ends_with('\n'));
}

#[test]
fn check_succeeds_only_when_up_to_date() {
    let dir = tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    let output = dir.path().join("README.md");

    // Nothing written yet.
    render_cmd(&snapshot, &output).arg("--check").assert().failure();
    assert!(!output.exists());

    render_cmd(&snapshot, &output).assert().success();
    render_cmd(&snapshot, &output).arg("--check").assert().success();

    fs::write(&output, "stale\n").unwrap();
    render_cmd(&snapshot, &output).arg("--check").assert().failure();
    assert_eq!(fs::read_to_string(&output).unwrap(), "stale\n");
}

#[test]
fn rejects_snapshot_from_another_schema() {
    let dir = tempdir().unwrap();
    let stale = SNAPSHOT.replacen("\"version\": 2", "\"version\": 99", 1);
    let snapshot = write_snapshot(dir.path(), &stale);
    let output = dir.path().join("README.md");

    render_cmd(&snapshot, &output).assert().failure();
    assert!(!output.exists());
}

#[test]
fn config_file_drives_output_location_and_title() {
    let dir = tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    let config = dir.path().join("profile.toml");
    fs::write(&config, "title = \"Acme Labs\"\nutc_offset = 0\n").unwrap();

    Command::cargo_bin("orgfolio")
        .unwrap()
        .env_remove("ORGFOLIO_ORG")
        .arg("--config")
        .arg(&config)
        .arg("render")
        .arg("--from")
        .arg(&snapshot)
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("profile/README.md")).unwrap();
    assert!(text.contains("Acme Labs"));
    // the config's offset cannot relabel data bucketed at +9
    assert!(text.contains("Commit activity across all repositories (UTC+9):"));
}

#[test]
fn render_keeps_the_snapshot_offset() {
    let dir = tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    let output = dir.path().join("README.md");

    let assert = render_cmd(&snapshot, &output)
        .env_remove("RUST_LOG")
        .args(["--utc-offset", "0"])
        .assert()
        .success();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("different UTC offset"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Commit activity across all repositories (UTC+9):"));
    assert!(!text.contains("(UTC+0)"));
}
