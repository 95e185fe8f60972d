use anyhow::Result;
use colored::{ColoredString, Colorize};
use rejs_deobfuscator::{CLEAN_MESSAGE, DetectionResult, PassStatus};
use serde::Serialize;
use std::path::Path;

use crate::config::pass_flag;
use crate::driver::{Deobfuscated, FileError, FileResult};

pub struct Reporter {
    color: bool,
}

#[derive(Serialize)]
struct JsonDetection<'a> {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a DetectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// `path: label, label` plus the switches that would undo them.
    pub fn format_detection(&self, path: &Path, detection: &DetectionResult) -> String {
        let location = self.paint(&path.display().to_string(), |s| s.bold());
        if let Some(encoding) = detection.unreversible {
            return format!(
                "{location}: {} ({encoding})",
                self.paint(encoding.label(), |s| s.red())
            );
        }
        if detection.is_clean() {
            return format!("{location}: {}", self.paint(CLEAN_MESSAGE, |s| s.dimmed()));
        }

        let labels: Vec<String> = detection
            .labels
            .iter()
            .map(|label| self.paint(label, |s| s.yellow()))
            .collect();
        let mut output = format!("{location}: {}", labels.join(", "));
        let flags: Vec<&str> = detection
            .recommended
            .enabled_passes()
            .into_iter()
            .map(pass_flag)
            .collect();
        if !flags.is_empty() {
            output.push_str("\n  recommended: ");
            output.push_str(&self.paint(&flags.join(" "), |s| s.cyan()));
        }
        output
    }

    /// `path -> output` and a warning per failed pass.
    pub fn format_run(&self, path: &Path, done: &Deobfuscated) -> String {
        let mut output = path.display().to_string();
        if let Some(written) = &done.written {
            output.push_str(" -> ");
            output.push_str(&self.paint(&written.display().to_string(), |s| s.green()));
        }
        if !done.report.edited() {
            output.push_str(&self.paint(" (unchanged)", |s| s.dimmed()));
        }
        for failure in done.report.failures() {
            let PassStatus::Failed(reason) = &failure.status else {
                continue;
            };
            output.push_str("\n  ");
            output.push_str(&self.paint("warning", |s| s.yellow()));
            output.push_str(&format!(": pass {} failed: {reason}", failure.pass));
        }
        output
    }

    pub fn format_error(&self, path: &Path, error: &FileError) -> String {
        format!(
            "{}: {}: {error}",
            path.display(),
            self.paint("error", |s| s.red().bold())
        )
    }

    pub fn detections_json(&self, results: &[FileResult<DetectionResult>]) -> Result<String> {
        let entries: Vec<JsonDetection<'_>> = results
            .iter()
            .map(|result| JsonDetection {
                path: result.path.display().to_string(),
                result: result.outcome.as_ref().ok(),
                error: result.outcome.as_ref().err().map(ToString::to_string),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}

