use super::driver::{Deobfuscated, FileError, FileResult};
use super::reporter::Reporter;
use rejs_deobfuscator::{
    CLEAN_MESSAGE, Configuration, DetectionResult, PassOutcome, PassStatus, RunReport,
    UnreversibleEncoding,
};
use std::path::{Path, PathBuf};

fn reporter() -> Reporter {
    Reporter::new(false)
}

#[test]
fn test_clean_detection() {
    let line = reporter().format_detection(Path::new("a.js"), &DetectionResult::default());
    assert_eq!(line, format!("a.js: {CLEAN_MESSAGE}"));
}

#[test]
fn test_detection_lists_labels_and_switches() {
    let detection = DetectionResult {
        packed_string_array: true,
        constant_expressions: true,
        labels: vec![
            "packed string array".to_string(),
            "constant expressions".to_string(),
        ],
        recommended: Configuration {
            unpack_arrays: true,
            simplify_expressions: true,
            ..Configuration::none()
        },
        ..DetectionResult::default()
    };
    let text = reporter().format_detection(Path::new("a.js"), &detection);
    assert_eq!(
        text,
        format!(
            "a.js: packed string array, constant expressions\n  recommended: {}",
            order_of_flags(&detection.recommended)
        )
    );
    assert!(text.contains("--unpack-arrays"));
    assert!(text.contains("--simplify-expressions"));
}

fn order_of_flags(config: &Configuration) -> String {
    config
        .enabled_passes()
        .into_iter()
        .map(super::config::pass_flag)
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_terminal_detection() {
    let detection = DetectionResult {
        labels: vec!["identifier mangling".to_string()],
        unreversible: Some(UnreversibleEncoding::IdentifierMangling),
        ..DetectionResult::default()
    };
    let text = reporter().format_detection(Path::new("m.js"), &detection);
    assert!(text.starts_with("m.js: identifier mangling ("));
    assert!(!text.contains("recommended"));
}

#[test]
fn test_run_lines() {
    let done = Deobfuscated {
        report: RunReport {
            output: "f();".to_string(),
            outcomes: vec![
                PassOutcome {
                    pass: "unpackArrays",
                    status: PassStatus::Edited,
                },
                PassOutcome {
                    pass: "removeDeadCode",
                    status: PassStatus::Failed("bad shape".to_string()),
                },
            ],
            rounds: 1,
        },
        written: Some(PathBuf::from("a.deobfuscated.js")),
    };
    assert_eq!(
        reporter().format_run(Path::new("a.js"), &done),
        "a.js -> a.deobfuscated.js\n  warning: pass removeDeadCode failed: bad shape"
    );

    let unchanged = Deobfuscated {
        report: RunReport::default(),
        written: Some(PathBuf::from("b.deobfuscated.js")),
    };
    assert_eq!(
        reporter().format_run(Path::new("b.js"), &unchanged),
        "b.js -> b.deobfuscated.js (unchanged)"
    );
}

#[test]
fn test_error_line() {
    let error = FileError::Io("failed to read c.js: gone".to_string());
    assert_eq!(
        reporter().format_error(Path::new("c.js"), &error),
        "c.js: error: failed to read c.js: gone"
    );
}

#[test]
fn test_detections_json() {
    let results = vec![
        FileResult {
            path: PathBuf::from("a.js"),
            outcome: Ok(DetectionResult::default()),
        },
        FileResult {
            path: PathBuf::from("b.js"),
            outcome: Err(FileError::Io("unreadable".to_string())),
        },
    ];
    let json = reporter().detections_json(&results).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value[0]["path"], "a.js");
    assert_eq!(value[0]["result"]["packedStringArray"], false);
    assert!(value[0].get("error").is_none());
    assert_eq!(value[1]["error"], "unreadable");
    assert!(value[1].get("result").is_none());
}
