//! Integration tests for top-level CLI behavior.

use std::fs;
use std::path::Path;
use std::process::Command;

fn run_autoreadme(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_autoreadme");
    Command::new(bin)
        .args(args)
        .env_remove("AUTOREADME_RECORD")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run autoreadme binary")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn help_lists_subcommands_and_project_options() {
    let output = run_autoreadme(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for needle in ["deps", "readme", "tree", "--project-dir", "--language"] {
        assert!(stdout.contains(needle), "missing {needle} in:\n{stdout}");
    }
}

#[test]
fn tree_prints_structure_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/__pycache__")).unwrap();
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join("src/main.py"), "print('hi')\n").unwrap();
    fs::write(dir.path().join("src/__pycache__/main.cpython-311.pyc"), "").unwrap();
    fs::write(dir.path().join("setup.sh"), "").unwrap();

    let output = run_autoreadme(&["tree", "--project-dir", path_arg(dir.path())]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout, "- setup.sh\n- **src/**\n  - main.py\n");
}

#[test]
fn tree_of_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");

    let output = run_autoreadme(&["tree", "--project-dir", path_arg(&missing)]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("does not exist"), "{stderr}");
}

#[test]
fn readme_without_artifacts_exits_cleanly_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let output = run_autoreadme(&[
        "readme",
        "--project-dir",
        path_arg(dir.path()),
        "--output-dir",
        path_arg(&out),
        "--config-dir",
        path_arg(dir.path()),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "{stderr}");
    assert!(stderr.contains("No dependency files found"), "{stderr}");
    assert!(!out.join("README.md").exists());
}

#[test]
fn unsupported_language_is_rejected() {
    let output = run_autoreadme(&["tree", "--language", "fr"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("fr"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    let output = run_autoreadme(&["publish"]);
    assert!(!output.status.success());
}
