//! Rewrite string literals in canonical form.
//!
//! `'\x48ello'` becomes `"Hello"`. The cooked value is already on the
//! node; dropping the raw text makes the printer requote it in double
//! quotes with only the escapes it needs. Strings holding a lone
//! surrogate keep their raw text because the unescaped form is not
//! representable. Literals already in canonical form do not count as a
//! change.

use super::{PassError, Transformation};
use rejs_emitter::{QuoteStyle, quote_string};
use rejs_parser::{NodeArena, NodeData, NodeIndex};
use tracing::debug;

pub struct StringDecoder;

impl Transformation for StringDecoder {
    fn name(&self) -> &'static str {
        "decodeStrings"
    }

    fn execute(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<bool, PassError> {
        if arena.get(root).is_none() {
            return Err(PassError::MissingNode(root));
        }
        let mut decoded = 0usize;
        for node in arena.preorder(root) {
            let Some(NodeData::StringLiteral(literal)) = arena.data_mut(node) else {
                continue;
            };
            if literal.has_lone_surrogate {
                continue;
            }
            let Some(raw) = literal.raw.take() else {
                continue;
            };
            if raw != quote_string(&literal.value, QuoteStyle::Double) {
                decoded += 1;
            }
        }
        debug!(decoded, "normalized string literals");
        Ok(decoded > 0)
    }
}
