//! Centralized limits and thresholds.
//!
//! Obfuscated input is frequently machine-generated and can nest far deeper
//! than hand-written code. Every recursive algorithm in the workspace checks
//! one of these limits and bails out with an error instead of overflowing
//! the stack.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth accepted by the parser.
///
/// Exceeding it produces a `ParseError` ("expression nested too deeply").
///
/// ```javascript
/// // Deeply nested array wrappers, as emitted by character-set encoders:
/// [[[[[[[[[[[[[[[[[[[[[[[[[[[[ /* ... */ ]]]]]]]]]]]]]]]]]]]]]]]]]]]];
/// ```
pub const MAX_PARSE_DEPTH: u32 = 500;

/// Maximum depth for recursive AST walks in the binder, printer and passes.
///
/// Kept above `MAX_PARSE_DEPTH` because one source nesting level can
/// produce more than one AST level (statement + expression wrappers).
pub const MAX_AST_DEPTH: u32 = 2_500;

/// Maximum depth for constant evaluation of a single expression.
pub const MAX_EVAL_DEPTH: u32 = 500;

// =============================================================================
// Operation Counts
// =============================================================================

/// Upper bound for the opt-in "run until stable" pipeline loop.
///
/// Each round can only remove or shrink nodes, so a real program settles
/// in a handful of rounds; this guards against a pass that keeps reporting
/// edits without making progress.
pub const MAX_PIPELINE_ROUNDS: u32 = 16;

/// Maximum number of scope-chain hops when resolving a name.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;
