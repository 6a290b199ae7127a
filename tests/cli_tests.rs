use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn renamr(state_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("renamr").unwrap();
    cmd.env_remove("RENAMR_STATE_DIR")
        .env("NO_COLOR", "1")
        .arg("--state-dir")
        .arg(state_dir);
    cmd
}

fn create_files(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), name).unwrap();
    }
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("renamr")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch rename files"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("renamr")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_command() {
    Command::cargo_bin("renamr")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_list_files_only_by_default() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["a.txt", "b.jpg", ".hidden"]);
    fs::create_dir(dir.path().join("sub")).unwrap();

    renamr(state.path())
        .args(["list", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("JPG"))
        .stdout(predicate::str::contains("sub").not())
        .stdout(predicate::str::contains(".hidden").not());

    renamr(state.path())
        .args(["list", dir.path().to_str().unwrap(), "--dirs", "--hidden"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory"))
        .stdout(predicate::str::contains(".hidden"));
}

#[test]
fn test_list_type_filter() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["a.txt", "b.jpg"]);

    renamr(state.path())
        .args(["list", dir.path().to_str().unwrap(), "--type", "jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("b.jpg"))
        .stdout(predicate::str::contains("a.txt").not());
}

#[test]
fn test_nonexistent_directory() {
    let state = tempdir().unwrap();

    renamr(state.path())
        .args(["list", "/nonexistent/path/that/does/not/exist"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_preview_does_not_rename() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["a.txt"]);

    renamr(state.path())
        .args(["preview", dir.path().to_str().unwrap(), "--prefix", "new_"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PREVIEW"))
        .stdout(predicate::str::contains("new_a.txt"));

    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("new_a.txt").exists());
}

#[test]
fn test_rename_dry_run() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["photo_2023-05-01.jpg"]);

    renamr(state.path())
        .args([
            "rename",
            dir.path().to_str().unwrap(),
            "--date-format",
            "%Y%m%d",
            "--dry",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("photo_20230501.jpg"));

    assert!(dir.path().join("photo_2023-05-01.jpg").exists());
    assert!(!state.path().join("session.json").exists());
}

#[test]
fn test_rename_then_undo() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["a.txt", "b.txt"]);

    renamr(state.path())
        .args([
            "rename",
            dir.path().to_str().unwrap(),
            "--regex-find",
            "^(a|b)$",
            "--regex-replace",
            "file_$1",
            "--select",
            "a.txt",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully renamed 1 of 1 entries"));

    // Replacement text is literal
    assert!(dir.path().join("file_$1.txt").exists());
    assert!(dir.path().join("b.txt").exists());
    assert!(state.path().join("session.json").exists());

    renamr(state.path())
        .arg("undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Undone rename"));

    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("file_$1.txt").exists());

    renamr(state.path())
        .arg("undo")
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("Nothing to undo"));
}

#[test]
fn test_rename_unknown_selection() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["a.txt"]);

    renamr(state.path())
        .args([
            "rename",
            dir.path().to_str().unwrap(),
            "--prefix",
            "x",
            "--select",
            "missing.txt",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("missing.txt"));

    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_invalid_regex() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["a.txt"]);

    renamr(state.path())
        .args(["preview", dir.path().to_str().unwrap(), "--regex-find", "("])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("regular expression"));
}

#[cfg(unix)]
#[test]
fn test_rename_stops_at_first_failure() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["0.txt", "a.txt", "b.txt"]);
    // Renaming a.txt onto a non-empty directory fails
    fs::create_dir(dir.path().join("xa.txt")).unwrap();
    fs::write(dir.path().join("xa.txt").join("keep"), "").unwrap();

    renamr(state.path())
        .args(["rename", dir.path().to_str().unwrap(), "--prefix", "x"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("1 remaining item(s) were not attempted"));

    assert!(dir.path().join("x0.txt").exists());
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());

    // The rename that went through is still undoable
    renamr(state.path()).arg("undo").assert().success();
    assert!(dir.path().join("0.txt").exists());
}

#[test]
fn test_config_save_show_and_use() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["IMG_photo.jpg"]);
    let config = state.path().join("rules.json");

    renamr(state.path())
        .args(["config", "save", config.to_str().unwrap()])
        .args(["--prefix", "trip_", "--remove-start", "4"])
        .assert()
        .success();

    renamr(state.path())
        .args(["config", "show", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("prefix:        trip_"))
        .stdout(predicate::str::contains("remove_start:  4"));

    renamr(state.path())
        .args(["rename", dir.path().to_str().unwrap()])
        .args(["--config", config.to_str().unwrap(), "--suffix", "_v1"])
        .assert()
        .success();

    assert!(dir.path().join("trip_photo_v1.jpg").exists());
}

#[test]
fn test_config_show_missing_file() {
    let state = tempdir().unwrap();

    renamr(state.path())
        .args(["config", "show", "/nonexistent/rules.json"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_copy_paste_then_undo() {
    let state = tempdir().unwrap();
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    create_files(src.path(), &["a.txt"]);

    renamr(state.path())
        .args(["copy", src.path().join("a.txt").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("paste will copy"));

    renamr(state.path())
        .args(["paste", dest.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully copied 1 of 1 entries"));

    assert!(src.path().join("a.txt").exists());
    assert_eq!(fs::read_to_string(dest.path().join("a.txt")).unwrap(), "a.txt");

    renamr(state.path()).arg("undo").assert().success();

    assert!(!dest.path().join("a.txt").exists());
    assert!(src.path().join("a.txt").exists());
}

#[test]
fn test_cut_paste_moves() {
    let state = tempdir().unwrap();
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    create_files(src.path(), &["a.txt"]);

    renamr(state.path())
        .args(["cut", src.path().join("a.txt").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("paste will move"));

    renamr(state.path())
        .args(["paste", dest.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully moved 1 of 1 entries"));

    assert!(!src.path().join("a.txt").exists());
    assert!(dest.path().join("a.txt").exists());

    // The moved source is gone, so nothing is left to paste
    renamr(state.path())
        .args(["paste", dest.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(9);
}

#[test]
fn test_paste_empty_clipboard() {
    let state = tempdir().unwrap();
    let dest = tempdir().unwrap();

    renamr(state.path())
        .args(["paste", dest.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(9)
        .stderr(predicate::str::contains("clipboard"));
}

#[test]
fn test_delete_permanent_then_undo_unsupported() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["a.txt"]);

    renamr(state.path())
        .args(["delete", "--permanent", dir.path().join("a.txt").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully deleted 1 of 1 entries"));

    assert!(!dir.path().join("a.txt").exists());

    renamr(state.path())
        .arg("undo")
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("Cannot undo a delete"));

    // The unsupported entry was consumed
    renamr(state.path()).arg("undo").assert().failure().code(6);
}

#[test]
fn test_state_dir_from_env() {
    let state = tempdir().unwrap();
    let dir = tempdir().unwrap();
    create_files(dir.path(), &["a.txt"]);

    Command::cargo_bin("renamr")
        .unwrap()
        .env("RENAMR_STATE_DIR", state.path())
        .args(["rename", dir.path().to_str().unwrap(), "--suffix", "_1"])
        .assert()
        .success();

    assert!(dir.path().join("a_1.txt").exists());
    assert!(state.path().join("session.json").exists());
}
