//! JavaScript printer for the rejs deobfuscator.
//!
//! This crate provides:
//! - `Printer`, `PrinterOptions`, `QuoteStyle` - AST to source text
//! - `render` - Print a program with default options
//! - `escape_string` - Canonical string literal escaping

mod emitter;
mod source_writer;

pub use emitter::{Printer, PrinterOptions, QuoteStyle};
pub use emitter::literals::{escape_string, quote_string};

use rejs_parser::{NodeArena, NodeIndex};

/// Print the tree rooted at `root` with default options.
pub fn render(arena: &NodeArena, root: NodeIndex) -> String {
    Printer::new(arena, PrinterOptions::default()).print(root)
}
