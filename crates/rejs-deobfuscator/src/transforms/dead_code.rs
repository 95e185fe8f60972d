//! Dead-code removal.
//!
//! Two rules, both applied against one binding snapshot taken on entry:
//! - unreferenced variable and function declarations are removed
//! - `if` statements with a statically known test are replaced by the
//!   branch that runs
//!
//! Removing code can leave more dead code behind (a function whose only
//! caller was just dropped). That is picked up by the next run, not this
//! one.

use super::{PassError, Transformation, bind_checked, remove_declarator};
use crate::evaluate::{is_pure, truthiness};
use rejs_binder::{BinderState, BindingKind};
use rejs_parser::{NodeArena, NodeData, NodeIndex, VariableKind};
use tracing::{debug, trace};

pub struct DeadCodeRemover;

impl Transformation for DeadCodeRemover {
    fn name(&self) -> &'static str {
        "removeDeadCode"
    }

    fn execute(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<bool, PassError> {
        let binder = bind_checked(arena, root)?;
        let declarations = remove_unreferenced(arena, root, &binder);
        let branches = prune_branches(arena, root, &binder);
        debug!(declarations, branches, "removed dead code");
        Ok(declarations + branches > 0)
    }
}

// =============================================================================
// Unreferenced declarations
// =============================================================================

fn remove_unreferenced(arena: &mut NodeArena, root: NodeIndex, binder: &BinderState) -> usize {
    let mut removed = 0usize;
    for (_, binding) in binder.bindings() {
        if binding.is_referenced() || !binding.is_stable() {
            continue;
        }
        let declaration = binding.declaration;
        if !arena.is_attached(declaration, root) {
            continue;
        }
        let done = match binding.kind {
            BindingKind::Var | BindingKind::Let | BindingKind::Const => {
                let initializer = match arena.data(declaration) {
                    Some(NodeData::VariableDeclarator(declarator)) => declarator.initializer,
                    _ => continue,
                };
                if initializer.is_some() && !is_pure(arena, binder, initializer) {
                    trace!(name = %binding.name, "initializer has side effects");
                    continue;
                }
                remove_declarator(arena, declaration)
            }
            BindingKind::Function => {
                matches!(
                    arena.data(declaration),
                    Some(NodeData::FunctionDeclaration(_))
                ) && arena.remove_statement(declaration)
            }
            _ => false,
        };
        if done {
            trace!(name = %binding.name, "removed unreferenced declaration");
            removed += 1;
        }
    }
    removed
}

// =============================================================================
// Constant branches
// =============================================================================

fn prune_branches(arena: &mut NodeArena, root: NodeIndex, binder: &BinderState) -> usize {
    let mut pruned = 0usize;
    for node in arena.preorder(root) {
        if !arena.is_attached(node, root) {
            continue;
        }
        let Some(NodeData::IfStatement(statement)) = arena.data(node) else {
            continue;
        };
        let (condition, then_branch, else_branch) = (
            statement.condition,
            statement.then_statement,
            statement.else_statement,
        );
        let Some(truthy) = truthiness(arena, binder, condition) else {
            continue;
        };
        let (taken, dropped) = if truthy {
            (then_branch, else_branch)
        } else {
            (else_branch, then_branch)
        };
        if declares_var(arena, dropped) {
            trace!(?node, "dropped branch declares hoisted names");
            continue;
        }
        if replace_with_branch(arena, node, taken) {
            pruned += 1;
        }
    }
    pruned
}

/// Replace `statement` by the statements of `branch` (none when `branch`
/// is absent). A block is unwrapped unless it declares block-scoped names.
fn replace_with_branch(arena: &mut NodeArena, statement: NodeIndex, branch: NodeIndex) -> bool {
    if branch.is_none() {
        return arena.remove_statement(statement);
    }
    let inner = match arena.data(branch) {
        Some(NodeData::Block(block)) if !declares_block_scoped(arena, &block.statements.nodes) => {
            Some(block.statements.nodes.clone())
        }
        _ => None,
    };
    let replacements = match inner {
        Some(statements) => {
            for &inner_statement in &statements {
                arena.detach(inner_statement);
            }
            statements
        }
        None => {
            arena.detach(branch);
            vec![branch]
        }
    };
    arena.splice_statement(statement, replacements)
}

fn declares_block_scoped(arena: &NodeArena, statements: &[NodeIndex]) -> bool {
    statements.iter().any(|&statement| match arena.data(statement) {
        Some(NodeData::FunctionDeclaration(_)) => true,
        Some(NodeData::VariableStatement(variables)) => variables.kind != VariableKind::Var,
        _ => false,
    })
}

/// True when `branch` holds a `var` or function declaration outside any
/// nested function. Such names are hoisted, so the branch cannot simply
/// be dropped.
fn declares_var(arena: &NodeArena, branch: NodeIndex) -> bool {
    let mut stack = vec![branch];
    while let Some(node) = stack.pop() {
        match arena.data(node) {
            Some(NodeData::VariableStatement(variables)) if variables.kind == VariableKind::Var => {
                return true;
            }
            Some(NodeData::FunctionDeclaration(_)) => return true,
            Some(data) if data.is_function_like() => {}
            Some(data) => data.for_each_child(|child| stack.push(child)),
            None => {}
        }
    }
    false
}
