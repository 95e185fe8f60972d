//! Inline reads from packed string arrays.
//!
//! ```text
//! var a = ["x", "log"];
//! console[a[1]](a[0]);               // -> console.log("x");
//! ```
//!
//! An array literal of strings and numbers that is only ever read through
//! constant in-bounds indices is inlined at every read and its declaration
//! dropped. Afterwards a callee `obj["name"]` with an identifier-like key
//! is rewritten as `obj.name`.

use super::helpers::{array_index, is_string_or_number, packed_array_elements};
use super::{PassError, Transformation, bind_checked, remove_declarator};
use rejs_binder::BinderState;
use rejs_parser::node::AccessData;
use rejs_parser::{NodeArena, NodeData, NodeIndex};
use rejs_scanner::char_codes::is_identifier_name;
use tracing::{debug, trace};

pub struct ArrayUnpacker;

impl Transformation for ArrayUnpacker {
    fn name(&self) -> &'static str {
        "unpackArrays"
    }

    fn execute(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<bool, PassError> {
        let binder = bind_checked(arena, root)?;
        let (inlined, rewritten) = inline_array_reads(arena, &binder);

        let mut removed = 0usize;
        if !rewritten.is_empty() {
            let binder = bind_checked(arena, root)?;
            for declarator in rewritten {
                let unreferenced = binder
                    .binding_for_declaration(declarator)
                    .is_some_and(|id| binder.references(id).is_empty());
                if unreferenced && remove_declarator(arena, declarator) {
                    removed += 1;
                }
            }
        }

        let dotted = dot_string_members(arena, root);
        debug!(inlined, removed, dotted, "unpacked arrays");
        Ok(inlined + removed + dotted > 0)
    }
}

/// Replace constant-index reads of every packed array. Returns the number
/// of reads inlined and the declarators of arrays that lost reads.
///
/// Reads whose index is not yet a literal wait for a later round, so
/// `a[a[0]]` resolves once the inner read has been inlined.
fn inline_array_reads(arena: &mut NodeArena, binder: &BinderState) -> (usize, Vec<NodeIndex>) {
    let mut arrays = Vec::new();
    let mut pending = Vec::new();
    for (id, binding) in binder.bindings() {
        let Some(elements) = packed_array_elements(arena, binder, id, is_string_or_number) else {
            continue;
        };
        let slot = arrays.len();
        pending.extend(binding.references.iter().map(|reference| (reference.node, slot)));
        arrays.push((binding.declaration, elements, 0usize));
    }

    loop {
        let before = pending.len();
        pending.retain(|&(reference, slot)| {
            let (_, elements, count) = &mut arrays[slot];
            match inline_read(arena, reference, elements) {
                ReadOutcome::Inlined => {
                    *count += 1;
                    false
                }
                ReadOutcome::Waiting => true,
                ReadOutcome::Skipped => false,
            }
        });
        if pending.len() == before || pending.is_empty() {
            break;
        }
    }

    let mut inlined = 0usize;
    let mut rewritten = Vec::new();
    for (declaration, _, count) in arrays {
        if count > 0 {
            trace!(?declaration, count, "inlined array reads");
            inlined += count;
            rewritten.push(declaration);
        }
    }
    (inlined, rewritten)
}

enum ReadOutcome {
    Inlined,
    /// The index is not a literal yet.
    Waiting,
    Skipped,
}

fn inline_read(arena: &mut NodeArena, reference: NodeIndex, elements: &[NodeIndex]) -> ReadOutcome {
    let access = arena.parent(reference);
    let index = match arena.data(access) {
        Some(NodeData::ElementAccess(data)) => data.name_or_argument,
        _ => return ReadOutcome::Skipped,
    };
    let Some(NodeData::NumericLiteral(literal)) = arena.data(index) else {
        trace!(?reference, "non-constant index");
        return ReadOutcome::Waiting;
    };
    let Some(position) = array_index(literal.value, elements.len()) else {
        trace!(index = literal.value, "index out of bounds");
        return ReadOutcome::Skipped;
    };
    let value = arena.deep_clone(elements[position]);
    if arena.replace(access, value) {
        ReadOutcome::Inlined
    } else {
        ReadOutcome::Skipped
    }
}

/// `obj["name"](...)` to `obj.name(...)` for identifier-like string keys.
fn dot_string_members(arena: &mut NodeArena, root: NodeIndex) -> usize {
    let mut count = 0usize;
    for node in arena.preorder(root) {
        let Some(NodeData::ElementAccess(access)) = arena.data(node) else {
            continue;
        };
        let is_callee = matches!(
            arena.data(arena.parent(node)),
            Some(NodeData::CallExpression(call)) if call.expression == node
        );
        if !is_callee {
            continue;
        }
        let object = access.expression;
        let (optional, in_chain) = (access.optional, access.in_chain);
        let name = match arena.data(access.name_or_argument) {
            Some(NodeData::StringLiteral(key)) if is_identifier_name(&key.value) => {
                key.value.clone()
            }
            _ => continue,
        };
        if !arena.detach(object) {
            continue;
        }
        let name_node = arena.add_identifier(&name);
        let dotted = arena.add_synthesized(NodeData::PropertyAccess(AccessData {
            optional,
            in_chain,
            ..AccessData::new(object, name_node)
        }));
        if arena.replace(node, dotted) {
            count += 1;
        }
    }
    count
}
