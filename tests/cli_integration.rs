use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn alternatives(root: &Path) -> Command {
    let binary = assert_cmd::cargo::cargo_bin!("update-alternatives");
    let mut cmd = Command::new(binary);
    cmd.env("OPKG_OFFLINE_ROOT", root);
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn install_links_and_reports_progress() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    alternatives(root)
        .args(["--install", "/usr/bin/editor", "editor", "/usr/bin/nano", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Linking"))
        .stdout(predicate::str::contains("/usr/bin/nano"));

    assert_eq!(
        fs::read_link(root.join("usr/bin/editor")).unwrap(),
        Path::new("/usr/bin/nano")
    );
}

#[test]
fn negative_priority_is_accepted() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    alternatives(root)
        .args(["--install", "/usr/bin/editor", "editor", "/usr/bin/ed", "-10"])
        .assert()
        .success();

    let text = fs::read_to_string(root.join("usr/lib/opkg/alternatives/editor")).unwrap();
    assert_eq!(text, "/usr/bin/editor\n/usr/bin/ed -10\n");
}

#[test]
fn duplicate_priority_warns_on_stderr() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    alternatives(root)
        .args(["--install", "/usr/bin/awk", "awk", "/usr/bin/gawk", "50"])
        .assert()
        .success();
    alternatives(root)
        .args(["--install", "/usr/bin/awk", "awk", "/usr/bin/mawk", "50"])
        .assert()
        .success()
        .stderr(predicate::str::contains("multiple providers with the same priority"));
}

#[test]
fn remove_last_alternative_cleans_up() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    alternatives(root)
        .args(["--install", "/usr/bin/editor", "editor", "/usr/bin/nano", "40"])
        .assert()
        .success();
    alternatives(root)
        .args(["--remove", "editor", "/usr/bin/nano"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no more alternatives"));

    assert!(!root.join("usr/lib/opkg/alternatives/editor").exists());
    assert!(fs::symlink_metadata(root.join("usr/bin/editor")).is_err());
}

#[test]
fn foreign_file_exits_with_refusal_status() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("usr/bin")).unwrap();
    fs::write(root.join("usr/bin/editor"), "real binary").unwrap();

    alternatives(root)
        .args(["--install", "/usr/bin/editor", "editor", "/usr/bin/vim", "60"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a link"));

    assert_eq!(
        fs::read_to_string(root.join("usr/bin/editor")).unwrap(),
        "real binary"
    );
}

#[test]
fn missing_arguments_are_usage_errors() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    alternatives(root).assert().code(2);
    alternatives(root)
        .args(["--install", "/usr/bin/editor", "editor"])
        .assert()
        .code(2);
    alternatives(root)
        .args(["--remove", "editor"])
        .assert()
        .code(2);
    alternatives(root)
        .args([
            "--install", "/usr/bin/editor", "editor", "/usr/bin/nano", "40",
            "--install", "/usr/bin/editor", "editor", "/usr/bin/vim", "60",
        ])
        .assert()
        .code(2);
    alternatives(root)
        .args(["--remove", "editor", "/usr/bin/nano", "--remove", "editor", "/usr/bin/vim"])
        .assert()
        .code(2);
    alternatives(root)
        .args(["--frobnicate"])
        .assert()
        .code(2);

    assert!(!root.join("usr").exists());
}

#[test]
fn symlink_failure_is_reported_but_succeeds() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("usr")).unwrap();
    fs::write(root.join("usr/bin"), "not a directory").unwrap();

    alternatives(root)
        .args(["--install", "/usr/bin/editor", "editor", "/usr/bin/vim", "60"])
        .assert()
        .success()
        .stderr(predicate::str::contains("failed"));

    let text = fs::read_to_string(root.join("usr/lib/opkg/alternatives/editor")).unwrap();
    assert_eq!(text, "/usr/bin/editor\n/usr/bin/vim 60\n");
}

#[test]
fn invalid_name_is_a_usage_error() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    alternatives(root)
        .args(["--install", "/usr/bin/editor", "../editor", "/usr/bin/vim", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid alternative name"));
}

#[test]
fn help_exits_successfully() {
    let dir = tempdir().unwrap();
    alternatives(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--install"))
        .stdout(predicate::str::contains("<priority> is an integer"));
}

#[test]
fn display_reports_winner_as_json() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    for (path, prio) in [("/usr/bin/nano", "40"), ("/usr/bin/vim", "60")] {
        alternatives(root)
            .args(["--install", "/usr/bin/editor", "editor", path, prio])
            .assert()
            .success();
    }

    let output = alternatives(root)
        .args(["--display", "editor", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["link"], "/usr/bin/editor");
    assert_eq!(json["best"]["target"], "/usr/bin/vim");
    assert_eq!(json["link_state"]["state"], "symlink");
    assert_eq!(json["alternatives"].as_array().unwrap().len(), 2);
}

#[test]
fn display_unknown_name_fails_with_json_error() {
    let dir = tempdir().unwrap();
    let output = alternatives(dir.path())
        .args(["--display", "editor", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let json: Value = serde_json::from_str(stderr.trim()).unwrap();
    assert_eq!(json["error"], "not_registered");
}

#[test]
fn offline_root_flag_overrides_environment() {
    let env_root = tempdir().unwrap();
    let flag_root = tempdir().unwrap();

    alternatives(env_root.path())
        .arg("--offline-root")
        .arg(flag_root.path())
        .args(["--install", "/usr/bin/editor", "editor", "/usr/bin/vim", "60"])
        .assert()
        .success();

    assert!(flag_root.path().join("usr/lib/opkg/alternatives/editor").exists());
    assert!(!env_root.path().join("usr").exists());
}
