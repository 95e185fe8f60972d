//! Constant folding.
//!
//! Binary and logical expressions whose operands are all known are
//! replaced by the literal they produce (`1 + 2` becomes `3`,
//! `"a" + "b"` becomes `"ab"`). Hex, octal and binary number literals are
//! rewritten in decimal. Folding is outermost-first: once an expression
//! folds, its operands are not visited.

use super::{PassError, Transformation, bind_checked, literal_for_value};
use crate::evaluate::evaluate;
use rejs_parser::{NodeArena, NodeData, NodeIndex};
use tracing::{debug, trace};

pub struct ExpressionSimplifier;

impl Transformation for ExpressionSimplifier {
    fn name(&self) -> &'static str {
        "simplifyExpressions"
    }

    fn execute(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<bool, PassError> {
        let binder = bind_checked(arena, root)?;
        let normalized = normalize_number_literals(arena, root);

        let mut folded = 0usize;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let Some(data) = arena.data(node) else {
                continue;
            };
            if matches!(data, NodeData::Binary(_) | NodeData::Logical(_)) {
                let result = evaluate(arena, &binder, node).into_value();
                if let Some(value) = result {
                    if let Some(literal) = literal_for_value(arena, &value) {
                        if arena.replace(node, literal) {
                            trace!(?node, "folded constant expression");
                            folded += 1;
                            continue;
                        }
                    }
                }
            }
            let mut children = arena.children(node);
            children.reverse();
            stack.extend(children);
        }

        debug!(folded, normalized, "simplified expressions");
        Ok(folded + normalized > 0)
    }
}

/// Drop the raw text of non-decimal number literals so they print in
/// decimal.
fn normalize_number_literals(arena: &mut NodeArena, root: NodeIndex) -> usize {
    let mut count = 0;
    for node in arena.preorder(root) {
        let Some(NodeData::NumericLiteral(literal)) = arena.data_mut(node) else {
            continue;
        };
        if literal.raw.as_deref().is_some_and(is_non_decimal) {
            literal.raw = None;
            count += 1;
        }
    }
    count
}

pub(crate) fn is_non_decimal(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() > 2
        && bytes[0] == b'0'
        && matches!(bytes[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_non_decimal() {
        assert!(is_non_decimal("0xff"));
        assert!(is_non_decimal("0B101"));
        assert!(is_non_decimal("0o17"));
        assert!(!is_non_decimal("0"));
        assert!(!is_non_decimal("10"));
        assert!(!is_non_decimal("0.5"));
    }
}
