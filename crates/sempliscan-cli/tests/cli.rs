use assert_cmd::Command;
use predicates::prelude::*;

fn sempliscan() -> Command {
    Command::cargo_bin("sempliscan").unwrap()
}

#[test]
fn help_lists_commands() {
    sempliscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("identity"))
        .stdout(predicate::str::contains("bill"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn config_show_prints_resolved_config() {
    sempliscan()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recognition"))
        .stdout(predicate::str::contains("timeout_secs"));
}

#[test]
fn config_init_writes_default_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sempliscan.json");

    sempliscan()
        .args(["config", "init", path.to_str().unwrap()])
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("binarize"));

    // A second init without --force must refuse to overwrite.
    sempliscan()
        .args(["config", "init", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn identity_rejects_missing_input() {
    sempliscan()
        .args(["identity", "does-not-exist.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn models_list_shows_files() {
    sempliscan()
        .args(["models", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("det.onnx"))
        .stdout(predicate::str::contains("latin_rec.onnx"));
}
