//! Integration tests for the termux-create-package CLI

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(args: &[&str], out_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_termux-create-package"))
        .args(args)
        .env("TCPKG_OUTPUT_DIR", out_dir)
        .env("TCPKG_COMBINER", "builtin")
        .env_remove("TCPKG_PREFIX")
        .env_remove("TCPKG_COMPRESSION_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute termux-create-package")
}

fn write_manifest(dir: &Path, json: &str) -> String {
    let path = dir.join("manifest.json");
    std::fs::write(&path, json).unwrap();
    path.display().to_string()
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_termux-create-package"))
        .arg("--version")
        .output()
        .expect("Failed to execute termux-create-package");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("termux-create-package"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_termux-create-package"))
        .arg("--help")
        .output()
        .expect("Failed to execute termux-create-package");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--prefix"));
    assert!(stdout.contains("MANIFEST"));
}

#[test]
fn test_builds_package_and_prints_path() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("hi.sh");
    std::fs::write(&source, "#!/bin/sh\necho hi\n").unwrap();
    let manifest = write_manifest(
        work.path(),
        &format!(
            r#"{{"name": "hi", "version": "1.0", "arch": "arm", "files": {{"{}": "bin/hi"}}}}"#,
            source.display()
        ),
    );

    let output = run_cli(&[&manifest], work.path());

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let expected = work.path().join("hi_1.0_arm.deb");
    assert!(expected.exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), expected.display().to_string());
    assert!(std::fs::read(&expected).unwrap().starts_with(b"!<arch>\n"));
}

#[test]
fn test_missing_version_exits_with_error() {
    let work = TempDir::new().unwrap();
    let manifest = write_manifest(work.path(), r#"{"name": "hi", "files": {}}"#);

    let output = run_cli(&[&manifest], work.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("version"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_arch_exits_with_error() {
    let work = TempDir::new().unwrap();
    let manifest = write_manifest(
        work.path(),
        r#"{"name": "hi", "version": "1.0", "arch": "mips", "files": {}}"#,
    );

    let output = run_cli(&[&manifest], work.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mips"));
}

#[test]
fn test_unreadable_manifest_exits_with_error() {
    let work = TempDir::new().unwrap();
    let missing = work.path().join("absent.json");

    let output = run_cli(&[&missing.display().to_string()], work.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent.json"));
}
