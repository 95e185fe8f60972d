//! JavaScript parser and arena AST for the rejs deobfuscator.
//!
//! This crate provides:
//! - `NodeIndex`, `NodeList` - Node handles
//! - `Node`, `NodeData` - The closed node enum and its payloads
//! - `NodeArena` - Node storage plus structural edits (`replace`, `detach`,
//!   `splice_statement`, `deep_clone`)
//! - `ParserState` - Recursive-descent parser
//! - `parse` - Source text to `ParsedSource`

mod base;
pub mod node;
mod node_arena;
pub mod precedence;
mod state;
mod state_classes;
mod state_expressions;
mod state_patterns;

pub use base::{NodeIndex, NodeList};
pub use node::{MethodKind, Node, NodeData, PropertyKind, VariableKind};
pub use node_arena::NodeArena;
pub use state::{ParseError, ParserState};

use tracing::debug;

/// A parsed program together with the text it came from.
#[derive(Clone, Debug)]
pub struct ParsedSource {
    pub arena: NodeArena,
    /// The `Program` node.
    pub root: NodeIndex,
    pub source: String,
}

/// Parse a complete program.
pub fn parse(source: &str) -> Result<ParsedSource, ParseError> {
    let (arena, root, source) = ParserState::new(source.to_string()).parse_program()?;
    debug!(nodes = arena.len(), bytes = source.len(), "parsed program");
    Ok(ParsedSource {
        arena,
        root,
        source,
    })
}
