use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn dirtree_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("dirtree"))
}

// ============== usage and validation ==============

#[test]
fn help_prints_usage_and_exits_1() {
    dirtree_cmd()
        .arg("--help")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));

    dirtree_cmd()
        .arg("-h")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_argument_prints_usage_and_exits_1() {
    dirtree_cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn extra_argument_prints_usage_and_exits_1() {
    let temp = tempdir().unwrap();
    dirtree_cmd()
        .arg(temp.path())
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn nonexistent_path_exits_1() {
    let temp = tempdir().unwrap();
    dirtree_cmd()
        .arg(temp.path().join("missing"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Path does not exist"));
}

#[test]
fn file_path_exits_1() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("plain.txt");
    write_file(&file, "x");

    dirtree_cmd()
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Path is not a directory"));
}

// ============== tree output ==============

#[test]
fn renders_directories_before_files() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("B")).unwrap();
    write_file(&temp.path().join("A/x.txt"), "x");
    write_file(&temp.path().join("a.txt"), "a");

    let assert = dirtree_cmd()
        .arg("--no-color")
        .arg(temp.path())
        .assert()
        .success();

    let expected = format!(
        "Directory structure of: {}\n\n\
         ├── 📁 A/\n\
         │   └── 📄 x.txt\n\
         ├── 📁 B/\n\
         └── 📄 a.txt\n",
        temp.path().display()
    );
    assert_eq!(String::from_utf8_lossy(&assert.get_output().stdout), expected);
}

#[test]
fn piped_output_has_no_color_codes() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("sub/file.rs"), "");

    dirtree_cmd()
        .env_remove("NO_COLOR")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn no_color_env_values_are_accepted() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("sub/file.rs"), "");

    for value in ["1", "yes", "true", ""] {
        dirtree_cmd()
            .env("NO_COLOR", value)
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("file.rs"))
            .stdout(predicate::str::contains("\u{1b}[").not());
    }
}

#[test]
fn jsonl_with_pretty_stays_line_oriented() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a/b.txt"), "b");

    let assert = dirtree_cmd()
        .arg("--format")
        .arg("jsonl")
        .arg("--pretty")
        .arg(temp.path())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        serde_json::from_str::<Value>(line).expect("valid jsonl line");
    }
}

#[cfg(unix)]
#[test]
fn broken_symlink_sorts_before_files() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.txt"), "a");
    std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("zz")).unwrap();

    let assert = dirtree_cmd()
        .arg("--no-color")
        .arg(temp.path())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let lines: Vec<_> = stdout.lines().skip(2).collect();
    assert_eq!(lines, vec!["├── 📄 zz", "└── 📄 a.txt"]);
}

#[test]
fn empty_directory_prints_only_header() {
    let temp = tempdir().unwrap();

    let assert = dirtree_cmd()
        .arg("--no-color")
        .arg(temp.path())
        .assert()
        .success();

    let expected = format!("Directory structure of: {}\n\n", temp.path().display());
    assert_eq!(String::from_utf8_lossy(&assert.get_output().stdout), expected);
}

#[test]
fn json_format_emits_line_objects() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("docs/readme.md"), "r");
    write_file(&temp.path().join("Cargo.toml"), "c");

    let assert = dirtree_cmd()
        .arg("--format")
        .arg("json")
        .arg(temp.path())
        .assert()
        .success();

    let value: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let items = value.as_array().unwrap();
    let labels: Vec<_> = items.iter().map(|v| v["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["docs", "readme.md", "Cargo.toml"]);
    assert_eq!(items[1]["depth"], 1);
    assert_eq!(items[1]["indent"], serde_json::json!(["pass_through"]));
    assert_eq!(items[2]["style"], "file");
}

#[test]
fn jsonl_format_emits_one_object_per_line() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("one/two/three.txt"), "3");

    let assert = dirtree_cmd()
        .arg("--format")
        .arg("jsonl")
        .arg(temp.path())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let items: Vec<Value> = stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("valid jsonl line"))
        .collect();
    assert_eq!(items.len(), 3);
    assert_eq!(items[2]["label"], "three.txt");
    assert_eq!(items[2]["depth"], 2);
    assert_eq!(items[2]["indent"], serde_json::json!(["blank", "blank"]));
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_is_reported_and_run_succeeds() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    let locked = temp.path().join("locked");
    write_file(&locked.join("secret.txt"), "s");
    write_file(&temp.path().join("open/visible.txt"), "v");
    write_file(&temp.path().join("z.txt"), "z");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still list the directory
    let denied = fs::read_dir(&locked).is_err();
    let output = dirtree_cmd()
        .arg("--no-color")
        .arg(temp.path())
        .output()
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(output.status.code(), Some(0));
    if !denied {
        return;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().skip(2).collect();
    assert_eq!(lines[0], "├── 📁 locked/");
    assert_eq!(
        lines[1],
        format!("│   [Permission denied]: {}", locked.display())
    );
    assert_eq!(lines[2], "├── 📁 open/");
    assert_eq!(lines[3], "│   └── 📄 visible.txt");
    assert_eq!(lines[4], "└── 📄 z.txt");
    assert!(!stdout.contains("secret.txt"));
}
