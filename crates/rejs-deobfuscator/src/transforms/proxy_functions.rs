//! Proxy-function remover.
//!
//! ```text
//! var arr = ["Hello", "World"];
//! function p(a, b) { return arr[a + b]; }
//! p(0, 1);                                  // -> "World"
//! ```
//!
//! Candidates are function declarations and function expressions bound by
//! a `var`/`let`/`const` declarator whose body is a single `return` of
//! `array[index]`. A call with numeric-literal arguments is replaced by
//! the array element the index selects. Proxy declarations are kept.

use super::helpers::{
    array_index, is_scalar_literal, packed_array_elements, single_return_expression,
};
use super::{PassError, Transformation, bind_checked};
use rejs_binder::{BinderState, BindingId, BindingKind};
use rejs_common::limits::MAX_EVAL_DEPTH;
use rejs_parser::node::FunctionData;
use rejs_parser::{NodeArena, NodeData, NodeIndex};
use rejs_scanner::SyntaxKind;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

pub struct ProxyFunctionRemover;

/// A function whose body is `return object[index];`.
struct ProxyCandidate {
    parameters: Vec<String>,
    /// The `object` identifier inside the proxy body.
    object: NodeIndex,
    index: NodeIndex,
}

impl Transformation for ProxyFunctionRemover {
    fn name(&self) -> &'static str {
        "removeProxyFunctions"
    }

    fn execute(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<bool, PassError> {
        let binder = bind_checked(arena, root)?;
        let candidates = collect_candidates(arena, &binder);
        if candidates.is_empty() {
            return Ok(false);
        }

        let calls: Vec<NodeIndex> = arena
            .preorder(root)
            .into_iter()
            .filter(|&node| matches!(arena.data(node), Some(NodeData::CallExpression(_))))
            .collect();

        // Innermost calls first: `p(p(0))` sees its argument already inlined.
        let mut replaced = 0usize;
        for node in calls.into_iter().rev() {
            if !arena.is_attached(node, root) {
                continue;
            }
            let Some(NodeData::CallExpression(call)) = arena.data(node) else {
                continue;
            };
            let Some(candidate) = binder
                .resolve(call.expression)
                .and_then(|binding| candidates.get(&binding))
            else {
                continue;
            };
            let Some(element) = inline_value(arena, &binder, candidate, &call.arguments.nodes)
            else {
                trace!(?node, "proxy call not inlinable");
                continue;
            };
            let copy = arena.deep_clone(element);
            if arena.replace(node, copy) {
                replaced += 1;
            }
        }
        debug!(candidates = candidates.len(), replaced, "proxy functions");
        Ok(replaced > 0)
    }
}

fn collect_candidates(arena: &NodeArena, binder: &BinderState) -> FxHashMap<BindingId, ProxyCandidate> {
    let mut candidates = FxHashMap::default();
    for (id, binding) in binder.bindings() {
        if !binding.is_stable() || binding.has_writes() {
            continue;
        }
        let function = match (binding.kind, arena.data(binding.declaration)) {
            (BindingKind::Function, Some(NodeData::FunctionDeclaration(function))) => function,
            (
                BindingKind::Var | BindingKind::Let | BindingKind::Const,
                Some(NodeData::VariableDeclarator(declarator)),
            ) => match arena.data(declarator.initializer) {
                Some(NodeData::FunctionExpression(function)) => function,
                _ => continue,
            },
            _ => continue,
        };
        if let Some(candidate) = candidate_from_function(arena, function) {
            trace!(name = %binding.name, "proxy function candidate");
            candidates.insert(id, candidate);
        }
    }
    candidates
}

fn candidate_from_function(arena: &NodeArena, function: &FunctionData) -> Option<ProxyCandidate> {
    let returned = single_return_expression(arena, function)?;
    let NodeData::ElementAccess(access) = arena.data(returned)? else {
        return None;
    };
    arena.identifier_text(access.expression)?;
    let parameters = function
        .parameters
        .nodes
        .iter()
        .map(|&parameter| arena.identifier_text(parameter).map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    Some(ProxyCandidate {
        parameters,
        object: access.expression,
        index: access.name_or_argument,
    })
}

/// The array element a call selects, if every precondition holds.
fn inline_value(
    arena: &NodeArena,
    binder: &BinderState,
    candidate: &ProxyCandidate,
    arguments: &[NodeIndex],
) -> Option<NodeIndex> {
    if arguments.len() != candidate.parameters.len() {
        return None;
    }
    let mut values = FxHashMap::default();
    for (name, &argument) in candidate.parameters.iter().zip(arguments) {
        let NodeData::NumericLiteral(literal) = arena.data(argument)? else {
            return None;
        };
        values.insert(name.as_str(), literal.value);
    }

    let array = binder.resolve(candidate.object)?;
    let elements = packed_array_elements(arena, binder, array, is_scalar_literal)?;
    let index = evaluate_index(arena, candidate.index, &values, 0)?;
    let position = array_index(index, elements.len())?;
    elements.get(position).copied()
}

/// Arithmetic over numeric literals and parameters: `+ - * / %` only.
/// Division or modulus by zero abstains.
fn evaluate_index(
    arena: &NodeArena,
    expr: NodeIndex,
    parameters: &FxHashMap<&str, f64>,
    depth: u32,
) -> Option<f64> {
    if depth > MAX_EVAL_DEPTH {
        return None;
    }
    match arena.data(expr)? {
        NodeData::NumericLiteral(literal) => Some(literal.value),
        NodeData::Identifier(identifier) => parameters.get(identifier.escaped_text.as_str()).copied(),
        NodeData::Binary(binary) => {
            let left = evaluate_index(arena, binary.left, parameters, depth + 1)?;
            let right = evaluate_index(arena, binary.right, parameters, depth + 1)?;
            match binary.operator {
                SyntaxKind::PlusToken => Some(left + right),
                SyntaxKind::MinusToken => Some(left - right),
                SyntaxKind::AsteriskToken => Some(left * right),
                SyntaxKind::SlashToken if right != 0.0 => Some(left / right),
                SyntaxKind::PercentToken if right != 0.0 => Some(left % right),
                _ => None,
            }
        }
        _ => None,
    }
}
