//! Pass selection from a config file and command-line switches.

use anyhow::{Context, Result};
use rejs_deobfuscator::{Configuration, PassKind, PrinterOptions, QuoteStyle};
use std::path::Path;

use crate::args::DeobfuscateArgs;

/// Everything the driver needs to process one file.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOptions {
    pub config: Configuration,
    /// Merge the detector's recommendation into `config` per file.
    pub auto: bool,
    pub rounds: u32,
    pub printer: PrinterOptions,
}

pub fn load_config(path: &Path) -> Result<Configuration> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

pub fn parse_config(source: &str) -> Result<Configuration> {
    Ok(serde_json::from_str(source)?)
}

/// Config file first, then switches on top. With nothing selected at all
/// the detector decides.
pub fn resolve_options(args: &DeobfuscateArgs) -> Result<ResolvedOptions> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Configuration::none(),
    };
    if args.all {
        config = Configuration::all();
    }
    for (enabled, pass) in [
        (args.unpack_arrays, PassKind::UnpackArrays),
        (args.decode_strings, PassKind::DecodeStrings),
        (args.remove_proxy_functions, PassKind::ProxyFunctions),
        (args.string_proxy_functions, PassKind::StringProxyFunctions),
        (args.simplify_expressions, PassKind::SimplifyExpressions),
        (args.remove_dead_code, PassKind::RemoveDeadCode),
    ] {
        if enabled {
            config.set(pass, true);
        }
    }

    Ok(ResolvedOptions {
        auto: args.auto || config.is_empty(),
        config,
        rounds: args.rounds,
        printer: PrinterOptions {
            indent_width: args.indent,
            quote_style: if args.single_quotes {
                QuoteStyle::Single
            } else {
                QuoteStyle::Double
            },
        },
    })
}

/// Command-line switch for a pass.
pub fn pass_flag(pass: PassKind) -> &'static str {
    match pass {
        PassKind::ProxyFunctions => "--remove-proxy-functions",
        PassKind::StringProxyFunctions => "--string-proxy-functions",
        PassKind::DecodeStrings => "--decode-strings",
        PassKind::SimplifyExpressions => "--simplify-expressions",
        PassKind::UnpackArrays => "--unpack-arrays",
        PassKind::RemoveDeadCode => "--remove-dead-code",
    }
}
