//! String-proxy inliner.
//!
//! ```text
//! function greet(name) { console.log("hi " + name); }
//! greet("bob");                      // -> console.log("hi " + "bob");
//! ```
//!
//! A call statement whose callee is a function declaration with a
//! single-expression body is replaced by that expression, parameters
//! substituted by copies of the arguments. A declaration whose every
//! reference was inlined is removed.
//!
//! Inlining must not change what the expression sees, so a site is
//! skipped unless:
//! - argument and parameter counts match
//! - every argument is a literal or an identifier (copying it is free)
//! - the expression uses neither `this` nor `arguments` and defines no
//!   nested functions
//! - every other identifier in it resolves to the same binding at the call
//!   site as inside the function
//! - the call's value is discarded (the function itself returns nothing)
//!
//! Proxies whose expression calls another proxy wait until that proxy has
//! been inlined into them; the pass repeats until nothing changes, so
//! chains collapse in one run and cycles are never touched.

use super::helpers::{is_reference_identifier, single_expression_statement};
use super::{PassError, Transformation, bind_checked};
use rejs_binder::{BinderState, BindingId, BindingKind, ReferenceKind};
use rejs_common::limits::MAX_PIPELINE_ROUNDS;
use rejs_parser::{NodeArena, NodeData, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

pub struct StringProxyInliner;

struct StringProxy {
    declaration: NodeIndex,
    expression: NodeIndex,
    parameters: Vec<BindingId>,
    /// Non-parameter identifiers in the expression and what they resolve
    /// to inside the function.
    free_names: Vec<(String, Option<BindingId>)>,
    /// Calls another proxy; not inlinable until that call is gone.
    calls_proxy: bool,
}

impl Transformation for StringProxyInliner {
    fn name(&self) -> &'static str {
        "stringProxyFunctions"
    }

    fn execute(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<bool, PassError> {
        let mut inlined_declarations = FxHashSet::default();
        let mut changed = false;

        for round in 0..MAX_PIPELINE_ROUNDS {
            let binder = bind_checked(arena, root)?;
            let proxies = collect_proxies(arena, &binder);
            let inlined = inline_round(arena, root, &binder, &proxies);
            debug!(round, proxies = proxies.len(), inlined = inlined.len(), "string proxies");
            if inlined.is_empty() {
                break;
            }
            changed = true;
            inlined_declarations.extend(inlined);
        }

        if !inlined_declarations.is_empty() {
            let binder = bind_checked(arena, root)?;
            let mut ordered: Vec<NodeIndex> = inlined_declarations.into_iter().collect();
            ordered.sort_unstable();
            for declaration in ordered {
                if !arena.is_attached(declaration, root) {
                    continue;
                }
                let unreferenced = binder
                    .binding_for_declaration(declaration)
                    .is_some_and(|id| binder.references(id).is_empty());
                if unreferenced && arena.remove_statement(declaration) {
                    trace!(?declaration, "removed fully inlined proxy");
                }
            }
        }
        Ok(changed)
    }
}

fn collect_proxies(arena: &NodeArena, binder: &BinderState) -> FxHashMap<BindingId, StringProxy> {
    let mut proxies = FxHashMap::default();
    for (id, binding) in binder.bindings() {
        if binding.kind != BindingKind::Function || !binding.is_stable() || binding.has_writes() {
            continue;
        }
        let Some(NodeData::FunctionDeclaration(function)) = arena.data(binding.declaration) else {
            continue;
        };
        let Some(expression) = single_expression_statement(arena, function) else {
            continue;
        };
        let mut parameters = Vec::with_capacity(function.parameters.len());
        for &parameter in &function.parameters.nodes {
            let Some(parameter_binding) = binder.binding_for_declaration(parameter) else {
                break;
            };
            let clean = binder.binding(parameter_binding).is_some_and(|data| {
                data.is_stable()
                    && data
                        .references
                        .iter()
                        .all(|reference| reference.kind != ReferenceKind::Write)
            });
            if !clean {
                break;
            }
            parameters.push(parameter_binding);
        }
        if parameters.len() != function.parameters.len() {
            continue;
        }
        if let Some(free_names) = free_names(arena, binder, expression, id, &parameters) {
            proxies.insert(
                id,
                StringProxy {
                    declaration: binding.declaration,
                    expression,
                    parameters,
                    free_names,
                    calls_proxy: false,
                },
            );
        }
    }

    let ids: FxHashSet<BindingId> = proxies.keys().copied().collect();
    for proxy in proxies.values_mut() {
        proxy.calls_proxy = arena.preorder(proxy.expression).into_iter().any(|node| {
            matches!(
                arena.data(node),
                Some(NodeData::CallExpression(call))
                    if binder.resolve(call.expression).is_some_and(|id| ids.contains(&id))
            )
        });
    }
    proxies
}

/// Free identifiers of a proxy expression, or `None` when the expression
/// cannot be moved at all.
fn free_names(
    arena: &NodeArena,
    binder: &BinderState,
    expression: NodeIndex,
    own: BindingId,
    parameters: &[BindingId],
) -> Option<Vec<(String, Option<BindingId>)>> {
    let mut names = Vec::new();
    for node in arena.preorder(expression) {
        match arena.data(node)? {
            NodeData::ThisKeyword
            | NodeData::Super
            | NodeData::NewTarget
            | NodeData::YieldExpression(_)
            | NodeData::AwaitExpression(_)
            | NodeData::FunctionExpression(_)
            | NodeData::ArrowFunction(_)
            | NodeData::ClassExpression(_) => return None,
            NodeData::Identifier(identifier) if is_reference_identifier(arena, node) => {
                let resolved = binder.resolve(node);
                if resolved == Some(own) {
                    return None;
                }
                if resolved.is_some_and(|id| parameters.contains(&id)) {
                    continue;
                }
                if resolved.is_none() && identifier.escaped_text == "arguments" {
                    return None;
                }
                names.push((identifier.escaped_text.clone(), resolved));
            }
            _ => {}
        }
    }
    Some(names)
}

/// Inline every eligible call once. Returns the declarations inlined.
fn inline_round(
    arena: &mut NodeArena,
    root: NodeIndex,
    binder: &BinderState,
    proxies: &FxHashMap<BindingId, StringProxy>,
) -> Vec<NodeIndex> {
    let mut inlined = Vec::new();
    for node in arena.preorder(root) {
        if !arena.is_attached(node, root) {
            continue;
        }
        let Some(NodeData::CallExpression(call)) = arena.data(node) else {
            continue;
        };
        let Some(proxy) = binder
            .resolve(call.expression)
            .and_then(|id| proxies.get(&id))
        else {
            continue;
        };
        let arguments = call.arguments.nodes.clone();
        if !can_inline(arena, binder, node, proxy, &arguments) {
            trace!(?node, "string proxy call skipped");
            continue;
        }
        let replacement = instantiate(arena, binder, proxy, &arguments);
        if arena.replace(node, replacement) {
            inlined.push(proxy.declaration);
        }
    }
    inlined
}

fn can_inline(
    arena: &NodeArena,
    binder: &BinderState,
    call: NodeIndex,
    proxy: &StringProxy,
    arguments: &[NodeIndex],
) -> bool {
    if proxy.calls_proxy || arguments.len() != proxy.parameters.len() {
        return false;
    }
    if !matches!(
        arena.data(arena.parent(call)),
        Some(NodeData::ExpressionStatement(_))
    ) {
        return false;
    }
    let duplicable = arguments.iter().all(|&argument| {
        arena
            .data(argument)
            .is_some_and(|data| data.is_literal() || matches!(data, NodeData::Identifier(_)))
    });
    if !duplicable {
        return false;
    }
    let scope = binder.scope_of(arena, call);
    proxy
        .free_names
        .iter()
        .all(|(name, inner)| binder.lookup(scope, name) == *inner)
}

/// A copy of the proxy expression with parameters replaced by argument
/// copies.
fn instantiate(
    arena: &mut NodeArena,
    binder: &BinderState,
    proxy: &StringProxy,
    arguments: &[NodeIndex],
) -> NodeIndex {
    let original = arena.preorder(proxy.expression);
    let copy = arena.deep_clone(proxy.expression);
    let copied = arena.preorder(copy);

    let mut result = copy;
    for (&source, &target) in original.iter().zip(&copied) {
        let Some(position) = binder
            .resolve(source)
            .and_then(|id| proxy.parameters.iter().position(|&p| p == id))
        else {
            continue;
        };
        if !is_reference_identifier(arena, source) {
            continue;
        }
        let Some(&argument) = arguments.get(position) else {
            continue;
        };
        let value = arena.deep_clone(argument);
        if target == copy {
            result = value;
        } else {
            arena.replace(target, value);
        }
    }
    result
}
