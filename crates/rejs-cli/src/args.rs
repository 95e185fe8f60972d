use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the rejs binary.
#[derive(Parser, Debug)]
#[command(
    name = "rejs",
    version,
    about = "Detect and reverse common JavaScript obfuscation techniques"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite files with the selected passes.
    Deobfuscate(DeobfuscateArgs),
    /// Report which obfuscation techniques files use.
    Detect(DetectArgs),
}

#[derive(Args, Debug, Default)]
pub struct DeobfuscateArgs {
    /// Files or directories (searched for `.js` files).
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Write the result here instead of `<file>.deobfuscated.js`. Needs a
    /// single input file.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Print results to stdout instead of writing files.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// JSON file with pass switches (`{"unpackArrays": true, ...}`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    // ==================== Pass Selection ====================
    /// Enable every pass.
    #[arg(long)]
    pub all: bool,

    /// Also enable whatever the detector recommends for each file. This is
    /// the default when no pass is selected.
    #[arg(long)]
    pub auto: bool,

    /// Inline reads from packed string arrays.
    #[arg(long)]
    pub unpack_arrays: bool,

    /// Rewrite string literals in canonical form.
    #[arg(long)]
    pub decode_strings: bool,

    /// Replace proxy-function calls with the array element they return.
    #[arg(long)]
    pub remove_proxy_functions: bool,

    /// Inline single-statement wrapper functions.
    #[arg(long)]
    pub string_proxy_functions: bool,

    /// Fold constant expressions.
    #[arg(long)]
    pub simplify_expressions: bool,

    /// Remove unreferenced declarations and constant branches.
    #[arg(long)]
    pub remove_dead_code: bool,

    // ==================== Run Options ====================
    /// Repeat the pass sequence until nothing changes, at most this many
    /// times.
    #[arg(long, default_value_t = 1)]
    pub rounds: u32,

    /// Spaces per indentation level in the output.
    #[arg(long, default_value_t = 2)]
    pub indent: usize,

    /// Quote synthesized strings with `'` instead of `"`.
    #[arg(long)]
    pub single_quotes: bool,
}

#[derive(Args, Debug, Default)]
pub struct DetectArgs {
    /// Files or directories (searched for `.js` files).
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print a JSON report instead of labels.
    #[arg(long)]
    pub json: bool,
}
