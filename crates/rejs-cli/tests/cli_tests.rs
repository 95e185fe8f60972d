//! End-to-end runs of the `deobfuscate` and `detect` commands against
//! files in a temporary directory.

use rejs_cli::args::{Command, DeobfuscateArgs, DetectArgs};
use rejs_cli::driver::{discover_sources, execute, output_path};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PACKED: &str = r#"var a = ["x", "log"]; console[a[1]](a[0]);"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, contents).expect("write source");
    path
}

fn deobfuscate_args(paths: Vec<PathBuf>) -> DeobfuscateArgs {
    DeobfuscateArgs {
        paths,
        rounds: 1,
        indent: 2,
        ..DeobfuscateArgs::default()
    }
}

fn run(command: Command) -> (bool, String) {
    let mut out = Vec::new();
    let success = execute(&command, &mut out, false).expect("command runs");
    (success, String::from_utf8(out).expect("utf-8 output"))
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_discover_sources_walks_directories() {
    let dir = TempDir::new().expect("temp dir");
    let a = write(dir.path(), "a.js", "f();");
    let b = write(dir.path(), "sub/b.js", "g();");
    write(dir.path(), "a.deobfuscated.js", "f();");
    write(dir.path(), "notes.txt", "not code");

    let files = discover_sources(&[dir.path().to_path_buf()]).expect("discover");
    assert_eq!(files, vec![a, b]);
}

#[test]
fn test_discover_sources_missing_path() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.js");
    assert!(discover_sources(&[missing]).is_err());
}

#[test]
fn test_output_path() {
    assert_eq!(
        output_path(Path::new("dir/app.js")),
        PathBuf::from("dir/app.deobfuscated.js")
    );
}

// =============================================================================
// deobfuscate
// =============================================================================

#[test]
fn test_writes_output_beside_input() {
    let dir = TempDir::new().expect("temp dir");
    let input = write(dir.path(), "packed.js", PACKED);

    let (success, report) = run(Command::Deobfuscate(DeobfuscateArgs {
        unpack_arrays: true,
        ..deobfuscate_args(vec![input.clone()])
    }));

    assert!(success);
    assert!(report.contains("packed.deobfuscated.js"), "{report}");
    let written = fs::read_to_string(output_path(&input)).expect("output written");
    assert_eq!(written, "console.log(\"x\");\n");
}

#[test]
fn test_stdout_prints_code() {
    let dir = TempDir::new().expect("temp dir");
    let input = write(dir.path(), "packed.js", PACKED);

    let (success, printed) = run(Command::Deobfuscate(DeobfuscateArgs {
        stdout: true,
        unpack_arrays: true,
        ..deobfuscate_args(vec![input.clone()])
    }));

    assert!(success);
    assert_eq!(printed, "console.log(\"x\");\n");
    assert!(!output_path(&input).exists());
}

#[test]
fn test_auto_detection_when_no_pass_selected() {
    let dir = TempDir::new().expect("temp dir");
    let input = write(dir.path(), "packed.js", PACKED);

    let (success, printed) = run(Command::Deobfuscate(DeobfuscateArgs {
        stdout: true,
        ..deobfuscate_args(vec![input])
    }));

    assert!(success);
    assert_eq!(printed, "console.log(\"x\");\n");
}

#[test]
fn test_explicit_output_file() {
    let dir = TempDir::new().expect("temp dir");
    let input = write(dir.path(), "packed.js", PACKED);
    let target = dir.path().join("out.js");

    let (success, _) = run(Command::Deobfuscate(DeobfuscateArgs {
        output: Some(target.clone()),
        unpack_arrays: true,
        ..deobfuscate_args(vec![input])
    }));

    assert!(success);
    assert_eq!(
        fs::read_to_string(target).expect("output written"),
        "console.log(\"x\");\n"
    );
}

#[test]
fn test_output_file_needs_single_input() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "a.js", "f();");
    write(dir.path(), "b.js", "g();");

    let command = Command::Deobfuscate(DeobfuscateArgs {
        output: Some(dir.path().join("out.js")),
        all: true,
        ..deobfuscate_args(vec![dir.path().to_path_buf()])
    });
    let mut out = Vec::new();
    assert!(execute(&command, &mut out, false).is_err());
}

#[test]
fn test_parse_failure_is_reported_and_fails_run() {
    let dir = TempDir::new().expect("temp dir");
    let broken = write(dir.path(), "broken.js", "var = ;");
    let fine = write(dir.path(), "fine.js", "f();");

    let (success, report) = run(Command::Deobfuscate(DeobfuscateArgs {
        all: true,
        ..deobfuscate_args(vec![broken.clone(), fine.clone()])
    }));

    assert!(!success);
    assert!(report.contains("broken.js: error: syntax error at"), "{report}");
    assert!(!output_path(&broken).exists());
    assert_eq!(
        fs::read_to_string(output_path(&fine)).expect("other file still processed"),
        "f();\n"
    );
}

// =============================================================================
// detect
// =============================================================================

#[test]
fn test_detect_lines() {
    let dir = TempDir::new().expect("temp dir");
    let packed = write(dir.path(), "packed.js", PACKED);
    let clean = write(dir.path(), "clean.js", "console.log(1);");

    let (success, printed) = run(Command::Detect(DetectArgs {
        paths: vec![packed, clean],
        json: false,
    }));

    assert!(success);
    let lines: Vec<&str> = printed.lines().collect();
    assert!(lines[0].contains("packed string array"), "{printed}");
    assert!(printed.contains("--unpack-arrays"), "{printed}");
    assert!(
        printed.contains("no classical obfuscation technique detected"),
        "{printed}"
    );
}

#[test]
fn test_detect_json() {
    let dir = TempDir::new().expect("temp dir");
    let packed = write(dir.path(), "packed.js", PACKED);
    let broken = write(dir.path(), "broken.js", "if (");

    let (success, printed) = run(Command::Detect(DetectArgs {
        paths: vec![packed, broken],
        json: true,
    }));

    assert!(!success);
    let value: serde_json::Value = serde_json::from_str(&printed).expect("valid json");
    assert_eq!(value[0]["result"]["packedStringArray"], true);
    assert_eq!(value[0]["result"]["recommended"]["unpackArrays"], true);
    assert!(value[1]["error"].as_str().is_some());
}
