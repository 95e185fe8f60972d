//! File discovery and per-file processing.
//!
//! Files are independent: each is read, parsed and rewritten on its own
//! arena, so batches run on the `rayon` pool. Results come back in input
//! order.

use anyhow::{Result, bail};
use rayon::prelude::*;
use rejs_deobfuscator::{DetectionResult, Deobfuscator, ParseError, RunReport, detect};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::args::{Command, DeobfuscateArgs, DetectArgs};
use crate::config::{ResolvedOptions, resolve_options};
use crate::reporter::Reporter;

const OUTPUT_SUFFIX: &str = "deobfuscated.js";

// =============================================================================
// Results
// =============================================================================

#[derive(Debug)]
pub enum FileError {
    Io(String),
    Parse(ParseError),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Io(message) => f.write_str(message),
            FileError::Parse(error) => write!(f, "syntax error at {error}"),
        }
    }
}

impl std::error::Error for FileError {}

#[derive(Debug)]
pub struct FileResult<T> {
    pub path: PathBuf,
    pub outcome: Result<T, FileError>,
}

impl<T> FileResult<T> {
    pub fn is_parse_failure(&self) -> bool {
        matches!(self.outcome, Err(FileError::Parse(_)))
    }
}

/// A deobfuscated file and where it went (`None` for stdout).
#[derive(Debug)]
pub struct Deobfuscated {
    pub report: RunReport,
    pub written: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// `<file>.deobfuscated.js` next to each input.
    Beside,
    File(PathBuf),
    Stdout,
}

// =============================================================================
// Discovery
// =============================================================================

/// Expand directories into the `.js` files below them. Earlier outputs
/// (`*.deobfuscated.js`) are skipped.
pub fn discover_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("no such file or directory: {}", path.display());
        }
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|entry| entry.is_file() && is_source_file(entry))
            .collect();
        found.sort();
        files.extend(found);
    }
    debug!(files = files.len(), "discovered sources");
    Ok(files)
}

fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    name.ends_with(".js") && !name.ends_with(OUTPUT_SUFFIX)
}

/// `dir/app.js` -> `dir/app.deobfuscated.js`.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_SUFFIX)
}

// =============================================================================
// Processing
// =============================================================================

pub fn deobfuscate_files(
    files: &[PathBuf],
    options: &ResolvedOptions,
    destination: &Destination,
) -> Vec<FileResult<Deobfuscated>> {
    files
        .par_iter()
        .map(|path| FileResult {
            path: path.clone(),
            outcome: deobfuscate_file(path, options, destination),
        })
        .collect()
}

fn deobfuscate_file(
    path: &Path,
    options: &ResolvedOptions,
    destination: &Destination,
) -> Result<Deobfuscated, FileError> {
    let source = read_source(path)?;

    let mut config = options.config;
    if options.auto {
        let detection = detect(&source).map_err(FileError::Parse)?;
        if let Some(encoding) = detection.unreversible {
            warn!(path = %path.display(), %encoding, "leaving encoding in place");
        }
        config = config.union(detection.recommended);
        debug!(path = %path.display(), labels = ?detection.labels, "auto-selected passes");
    }

    let report = Deobfuscator::new(config)
        .with_printer_options(options.printer.clone())
        .run_until_stable(&source, options.rounds)
        .map_err(FileError::Parse)?;

    let written = match destination {
        Destination::Stdout => None,
        Destination::File(target) => Some(target.clone()),
        Destination::Beside => Some(output_path(path)),
    };
    if let Some(target) = &written {
        let mut text = report.output.clone();
        text.push('\n');
        std::fs::write(target, text).map_err(|error| {
            FileError::Io(format!("failed to write {}: {error}", target.display()))
        })?;
        info!(from = %path.display(), to = %target.display(), "wrote output");
    }
    Ok(Deobfuscated { report, written })
}

pub fn detect_files(files: &[PathBuf]) -> Vec<FileResult<DetectionResult>> {
    files
        .par_iter()
        .map(|path| FileResult {
            path: path.clone(),
            outcome: read_source(path).and_then(|source| detect(&source).map_err(FileError::Parse)),
        })
        .collect()
}

fn read_source(path: &Path) -> Result<String, FileError> {
    std::fs::read_to_string(path)
        .map_err(|error| FileError::Io(format!("failed to read {}: {error}", path.display())))
}

// =============================================================================
// Commands
// =============================================================================

/// Run a command, writing results to `out`. Returns false when any file
/// failed to parse.
pub fn execute(command: &Command, out: &mut dyn Write, color: bool) -> Result<bool> {
    match command {
        Command::Deobfuscate(args) => run_deobfuscate(args, out, color),
        Command::Detect(args) => run_detect(args, out, color),
    }
}

pub fn run_deobfuscate(args: &DeobfuscateArgs, out: &mut dyn Write, color: bool) -> Result<bool> {
    let options = resolve_options(args)?;
    let files = discover_sources(&args.paths)?;
    let destination = match (&args.output, args.stdout) {
        (Some(path), _) => {
            if files.len() != 1 {
                bail!("--output needs exactly one input file, found {}", files.len());
            }
            Destination::File(path.clone())
        }
        (None, true) => Destination::Stdout,
        (None, false) => Destination::Beside,
    };

    let results = deobfuscate_files(&files, &options, &destination);
    let reporter = Reporter::new(color);
    for result in &results {
        match &result.outcome {
            Ok(done) if done.written.is_none() => writeln!(out, "{}", done.report.output)?,
            Ok(done) => writeln!(out, "{}", reporter.format_run(&result.path, done))?,
            Err(error) => writeln!(out, "{}", reporter.format_error(&result.path, error))?,
        }
    }
    Ok(!results.iter().any(FileResult::is_parse_failure))
}

pub fn run_detect(args: &DetectArgs, out: &mut dyn Write, color: bool) -> Result<bool> {
    let files = discover_sources(&args.paths)?;
    let results = detect_files(&files);
    let reporter = Reporter::new(color);
    if args.json {
        writeln!(out, "{}", reporter.detections_json(&results)?)?;
    } else {
        for result in &results {
            let line = match &result.outcome {
                Ok(detection) => reporter.format_detection(&result.path, detection),
                Err(error) => reporter.format_error(&result.path, error),
            };
            writeln!(out, "{line}")?;
        }
    }
    Ok(!results.iter().any(FileResult::is_parse_failure))
}
