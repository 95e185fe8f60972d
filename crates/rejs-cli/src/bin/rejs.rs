use anyhow::Result;
use clap::Parser;
use std::io::{IsTerminal, Write};

use rejs_cli::args::CliArgs;
use rejs_cli::driver;

/// Some file failed to parse.
const EXIT_PARSE_FAILURE: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if REJS_LOG or RUST_LOG is set (zero cost otherwise).
    rejs_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();

    let success = driver::execute(&args.command, &mut out, color)?;
    out.flush()?;
    drop(out);
    if !success {
        std::process::exit(EXIT_PARSE_FAILURE);
    }
    Ok(())
}
