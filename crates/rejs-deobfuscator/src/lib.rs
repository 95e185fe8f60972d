//! JavaScript deobfuscation engine.
//!
//! This crate provides:
//! - `deobfuscate` - Source to source with a `Configuration` of passes
//! - `detect` - Classify the obfuscation techniques in a source file
//! - `Deobfuscator` - Full runs with per-pass outcomes and re-run rounds
//! - `transforms` - The individual rewrite passes
//! - `evaluate` - Constant folding over expression subtrees

mod config;
mod detector;
pub mod evaluate;
mod pipeline;
pub mod transforms;

pub use config::Configuration;
pub use detector::{
    CLEAN_MESSAGE, DetectionResult, UnreversibleEncoding, detect, detect_character_set_obfuscation,
    detect_constant_expression, detect_control_flow_flattening, detect_dead_branch,
    detect_encoded_string_literal, detect_identifier_mangling_scheme, detect_packed_string_array,
    detect_proxy_function, detect_string_proxy_function, detect_tree, detect_unreversible,
};
pub use pipeline::{PassOutcome, PassStatus, Pipeline, RunReport};
pub use transforms::{PassError, PassKind, Transformation};

pub use rejs_emitter::{PrinterOptions, QuoteStyle};
pub use rejs_parser::ParseError;

use rejs_common::limits::MAX_PIPELINE_ROUNDS;
use rejs_emitter::Printer;
use rejs_parser::parse;
use tracing::{debug, info_span};

/// Run the passes enabled in `config` once and print the result.
pub fn deobfuscate(source: &str, config: &Configuration) -> Result<String, ParseError> {
    Deobfuscator::new(*config)
        .run(source)
        .map(|report| report.output)
}

pub struct Deobfuscator {
    pipeline: Pipeline,
    printer: PrinterOptions,
}

impl Deobfuscator {
    pub fn new(config: Configuration) -> Deobfuscator {
        Deobfuscator {
            pipeline: Pipeline::from_config(&config),
            printer: PrinterOptions::default(),
        }
    }

    pub fn with_printer_options(mut self, options: PrinterOptions) -> Deobfuscator {
        self.printer = options;
        self
    }

    /// Replace the configured passes with an explicit list.
    pub fn with_passes(mut self, passes: Vec<Box<dyn Transformation>>) -> Deobfuscator {
        self.pipeline = Pipeline::from_passes(passes);
        self
    }

    /// Parse, run every pass once, print.
    pub fn run(&self, source: &str) -> Result<RunReport, ParseError> {
        self.run_until_stable(source, 1)
    }

    /// Like `run`, but repeat the pass sequence until a round changes
    /// nothing or `max_rounds` rounds have run. `max_rounds` is clamped to
    /// `1..=MAX_PIPELINE_ROUNDS`.
    pub fn run_until_stable(&self, source: &str, max_rounds: u32) -> Result<RunReport, ParseError> {
        let _span = info_span!("deobfuscate", bytes = source.len()).entered();
        let mut parsed = parse(source)?;
        let max_rounds = max_rounds.clamp(1, MAX_PIPELINE_ROUNDS);

        let mut report = RunReport::default();
        while report.rounds < max_rounds {
            report.rounds += 1;
            let outcomes = self.pipeline.run(&mut parsed.arena, parsed.root);
            let edited = outcomes
                .iter()
                .any(|outcome| outcome.status == PassStatus::Edited);
            report.outcomes.extend(outcomes);
            if !edited {
                break;
            }
        }

        report.output = Printer::new(&parsed.arena, self.printer.clone()).print(parsed.root);
        debug!(
            rounds = report.rounds,
            failures = report.failures().count(),
            "deobfuscation finished"
        );
        Ok(report)
    }
}
