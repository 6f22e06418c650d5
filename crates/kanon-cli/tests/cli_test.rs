use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_kanon") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target"));
    let fallback = target_dir
        .join("debug")
        .join(format!("kanon{}", env::consts::EXE_SUFFIX));

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_kanon is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn run(args: &[&Path], flags: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .args(flags)
        .env_remove("RUST_LOG")
        .output()
        .expect("kanon should run")
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("fixture should be written");
    path
}

const SCHEMA: &str = "
schema:
  type: object
  fields:
    name: { type: string, min_length: 2 }
    role: { type: enum, values: [admin, user], default: user }
";

#[test]
fn check_prints_coerced_document() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user.yaml", SCHEMA);
    let input = write(&dir, "input.json", r#"{"name": "Ann"}"#);

    let output = run(&[Path::new("check"), input.as_path()], &["--schema", schema.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, serde_json::json!({"name": "Ann", "role": "user"}));
}

#[test]
fn check_reports_failure_with_exit_code() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user.yaml", SCHEMA);
    let input = write(&dir, "input.yaml", "name: A\n");

    let output = run(&[Path::new("check"), input.as_path()], &["--schema", schema.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("Property 'name': String must contain at least 2 character(s)")
    );
}

#[test]
fn check_rejects_missing_schema_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "input.json", "{}");
    let missing = dir.path().join("missing.yaml");

    let output = run(&[Path::new("check"), input.as_path()], &["--schema", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load schema"));
}

#[test]
fn merge_prefers_left_by_default() {
    let dir = TempDir::new().unwrap();
    let left = write(&dir, "left.json", r#"{"user": {"name": "John", "age": 30}}"#);
    let right = write(
        &dir,
        "right.json",
        r#"{"user": {"name": "Jane", "email": "jane@x.com"}}"#,
    );

    let output = run(&[Path::new("merge"), left.as_path(), right.as_path()], &[]);
    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        printed,
        serde_json::json!({"user": {"name": "John", "age": 30, "email": "jane@x.com"}})
    );

    let output = run(&[Path::new("merge"), left.as_path(), right.as_path()], &["--prefer", "right"]);
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed["user"]["name"], "Jane");
    assert_eq!(printed["user"]["age"], 30);
}

#[test]
fn merge_rejects_non_objects() {
    let dir = TempDir::new().unwrap();
    let left = write(&dir, "left.json", "[1, 2]");
    let right = write(&dir, "right.json", "{}");

    let output = run(&[Path::new("merge"), left.as_path(), right.as_path()], &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("both documents must be objects"));
}
