//! AST rewrite passes.
//!
//! Each pass takes the tree by `&mut NodeArena`, binds it itself, and
//! reports whether it changed anything. Rewrite sites that fail a
//! precondition are skipped; only a malformed tree is an error.

mod array_unpacker;
mod dead_code;
mod expression_simplifier;
mod helpers;
mod proxy_functions;
mod string_decoder;
mod string_proxy_functions;

pub use array_unpacker::ArrayUnpacker;
pub use dead_code::DeadCodeRemover;
pub use expression_simplifier::ExpressionSimplifier;
pub use proxy_functions::ProxyFunctionRemover;
pub use string_decoder::StringDecoder;
pub use string_proxy_functions::StringProxyInliner;

pub(crate) use expression_simplifier::is_non_decimal;
pub(crate) use helpers::{
    literal_for_value, remove_declarator, single_expression_statement, single_return_expression,
};

use rejs_binder::BinderState;
use rejs_parser::{NodeArena, NodeIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// PassKind
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassKind {
    ProxyFunctions,
    StringProxyFunctions,
    DecodeStrings,
    SimplifyExpressions,
    UnpackArrays,
    RemoveDeadCode,
}

impl PassKind {
    /// The order passes run in, whatever order they were enabled in.
    pub const PIPELINE_ORDER: [PassKind; 6] = [
        PassKind::ProxyFunctions,
        PassKind::StringProxyFunctions,
        PassKind::DecodeStrings,
        PassKind::SimplifyExpressions,
        PassKind::UnpackArrays,
        PassKind::RemoveDeadCode,
    ];

    /// Configuration key of the pass.
    pub fn name(self) -> &'static str {
        match self {
            PassKind::ProxyFunctions => "removeProxyFunctions",
            PassKind::StringProxyFunctions => "stringProxyFunctions",
            PassKind::DecodeStrings => "decodeStrings",
            PassKind::SimplifyExpressions => "simplifyExpressions",
            PassKind::UnpackArrays => "unpackArrays",
            PassKind::RemoveDeadCode => "removeDeadCode",
        }
    }

    pub fn transformation(self) -> Box<dyn Transformation> {
        match self {
            PassKind::ProxyFunctions => Box::new(ProxyFunctionRemover),
            PassKind::StringProxyFunctions => Box::new(StringProxyInliner),
            PassKind::DecodeStrings => Box::new(StringDecoder),
            PassKind::SimplifyExpressions => Box::new(ExpressionSimplifier),
            PassKind::UnpackArrays => Box::new(ArrayUnpacker),
            PassKind::RemoveDeadCode => Box::new(DeadCodeRemover),
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// PassError
// =============================================================================

/// A pass met a tree shape it cannot work on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassError {
    /// The tree is deeper than the binder walks, so bindings are partial.
    DepthLimitExceeded,
    MissingNode(NodeIndex),
    UnexpectedNode {
        node: NodeIndex,
        expected: &'static str,
        found: &'static str,
    },
    Malformed(String),
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassError::DepthLimitExceeded => {
                write!(f, "tree exceeds the maximum traversal depth")
            }
            PassError::MissingNode(node) => write!(f, "node {} is missing", node.0),
            PassError::UnexpectedNode {
                node,
                expected,
                found,
            } => write!(f, "node {} is a {found}, expected {expected}", node.0),
            PassError::Malformed(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for PassError {}

// =============================================================================
// Transformation
// =============================================================================

pub trait Transformation: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rewrite the tree in place. `Ok(true)` when anything changed.
    fn execute(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<bool, PassError>;
}

/// Bind `root`, refusing trees the binder could not walk completely.
pub(crate) fn bind_checked(arena: &NodeArena, root: NodeIndex) -> Result<BinderState, PassError> {
    if arena.get(root).is_none() {
        return Err(PassError::MissingNode(root));
    }
    let binder = BinderState::bind(arena, root);
    if binder.is_truncated() {
        return Err(PassError::DepthLimitExceeded);
    }
    Ok(binder)
}
