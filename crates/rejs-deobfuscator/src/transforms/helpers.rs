//! Tree queries and edits shared by several passes.

use crate::evaluate::JsValue;
use rejs_binder::{BinderState, BindingId, BindingKind, ReferenceKind};
use rejs_parser::node::FunctionData;
use rejs_parser::{NodeArena, NodeData, NodeIndex};
use rejs_scanner::SyntaxKind;
use tracing::trace;

// =============================================================================
// Literals
// =============================================================================

/// A literal node for a folded value, or `None` for values that have no
/// literal form (`NaN`, `Infinity`, `-0`, `undefined`).
pub(crate) fn literal_for_value(arena: &mut NodeArena, value: &JsValue) -> Option<NodeIndex> {
    match value {
        JsValue::String(text) => Some(arena.add_string_literal(text)),
        JsValue::Number(number) => {
            if !number.is_finite() || (*number == 0.0 && number.is_sign_negative()) {
                return None;
            }
            Some(arena.add_numeric_literal(*number))
        }
        JsValue::Boolean(flag) => Some(arena.add_synthesized(NodeData::BooleanLiteral(*flag))),
        JsValue::Null => Some(arena.add_synthesized(NodeData::NullLiteral)),
        JsValue::Undefined => None,
    }
}

/// Array index held by a literal: a non-negative integer below `len`.
pub(crate) fn array_index(value: f64, len: usize) -> Option<usize> {
    if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
        return None;
    }
    let index = value as usize;
    (index < len).then_some(index)
}

// =============================================================================
// Function shapes
// =============================================================================

/// Statements of a block-bodied function.
fn body_statements<'a>(arena: &'a NodeArena, function: &FunctionData) -> Option<&'a [NodeIndex]> {
    match arena.data(function.body)? {
        NodeData::Block(block) => Some(&block.statements.nodes),
        _ => None,
    }
}

/// Expression of a body that is exactly `{ return expr; }`.
pub(crate) fn single_return_expression(
    arena: &NodeArena,
    function: &FunctionData,
) -> Option<NodeIndex> {
    match body_statements(arena, function)? {
        [statement] => match arena.data(*statement)? {
            NodeData::ReturnStatement(ret) if ret.expression.is_some() => Some(ret.expression),
            _ => None,
        },
        _ => None,
    }
}

/// Expression of a body that is exactly `{ expr; }`.
pub(crate) fn single_expression_statement(
    arena: &NodeArena,
    function: &FunctionData,
) -> Option<NodeIndex> {
    match body_statements(arena, function)? {
        [statement] => match arena.data(*statement)? {
            NodeData::ExpressionStatement(statement) => Some(statement.expression),
            _ => None,
        },
        _ => None,
    }
}

// =============================================================================
// Packed arrays
// =============================================================================

/// The element access a packed-array reference reads through: `arr[i]`
/// used as a plain value (not assigned, updated, deleted or iterated
/// into).
pub(crate) fn element_read_of(arena: &NodeArena, reference: NodeIndex) -> Option<NodeIndex> {
    let access = arena.parent(reference);
    let NodeData::ElementAccess(data) = arena.data(access)? else {
        return None;
    };
    if data.expression != reference {
        return None;
    }
    let user = arena.parent(access);
    let is_target = match arena.data(user) {
        Some(NodeData::Assignment(assignment)) => assignment.left == access,
        Some(NodeData::PrefixUnary(unary)) | Some(NodeData::PostfixUnary(unary)) => matches!(
            unary.operator,
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken | SyntaxKind::DeleteKeyword
        ),
        Some(NodeData::ForInStatement(loop_data)) | Some(NodeData::ForOfStatement(loop_data)) => {
            loop_data.initializer == access
        }
        _ => false,
    };
    (!is_target).then_some(access)
}

/// Elements of the array literal bound to `binding`, when the array is
/// declared once and never escapes: every reference is a computed read.
/// `accept` filters the element kinds the caller can inline.
pub(crate) fn packed_array_elements(
    arena: &NodeArena,
    binder: &BinderState,
    binding: BindingId,
    accept: fn(&NodeData) -> bool,
) -> Option<Vec<NodeIndex>> {
    let data = binder.binding(binding)?;
    if !data.is_stable()
        || !matches!(
            data.kind,
            BindingKind::Var | BindingKind::Let | BindingKind::Const
        )
    {
        return None;
    }
    let NodeData::VariableDeclarator(declarator) = arena.data(data.declaration)? else {
        return None;
    };
    let NodeData::ArrayLiteral(array) = arena.data(declarator.initializer)? else {
        return None;
    };
    if !array
        .elements
        .nodes
        .iter()
        .all(|&element| arena.data(element).is_some_and(accept))
    {
        return None;
    }
    let escapes = data.references.iter().any(|reference| {
        reference.kind != ReferenceKind::Read || element_read_of(arena, reference.node).is_none()
    });
    if escapes {
        trace!(name = %data.name, "array escapes, not inlining");
        return None;
    }
    Some(array.elements.nodes.clone())
}

pub(crate) fn is_string_or_number(data: &NodeData) -> bool {
    matches!(data, NodeData::StringLiteral(_) | NodeData::NumericLiteral(_))
}

pub(crate) fn is_scalar_literal(data: &NodeData) -> bool {
    data.is_literal()
}

// =============================================================================
// Removal
// =============================================================================

/// Remove a variable declarator, dropping its statement once the list is
/// empty. Declarators heading a for-in/of loop are left alone.
pub(crate) fn remove_declarator(arena: &mut NodeArena, declarator: NodeIndex) -> bool {
    let statement = arena.parent(declarator);
    let holder = arena.parent(statement);
    let holder_kind = match arena.data(holder) {
        Some(NodeData::ForInStatement(_)) | Some(NodeData::ForOfStatement(_)) => return false,
        Some(NodeData::ForStatement(_)) => HolderKind::ForInitializer,
        Some(_) => HolderKind::Statement,
        None => return false,
    };
    if !arena.detach(declarator) {
        return false;
    }
    let now_empty = matches!(
        arena.data(statement),
        Some(NodeData::VariableStatement(variables)) if variables.declarations.is_empty()
    );
    if now_empty {
        match holder_kind {
            HolderKind::ForInitializer => {
                arena.detach(statement);
            }
            HolderKind::Statement => {
                arena.remove_statement(statement);
            }
        }
    }
    true
}

enum HolderKind {
    ForInitializer,
    Statement,
}

/// Identifier nodes in `root` that are variable references, as opposed to
/// property names, object keys, labels or declaration names.
pub(crate) fn is_reference_identifier(arena: &NodeArena, identifier: NodeIndex) -> bool {
    let parent = arena.parent(identifier);
    match arena.data(parent) {
        Some(NodeData::PropertyAccess(access)) => access.name_or_argument != identifier,
        Some(NodeData::PropertyAssignment(property)) => {
            property.computed || property.name != identifier
        }
        Some(NodeData::LabeledStatement(_))
        | Some(NodeData::BreakStatement(_))
        | Some(NodeData::ContinueStatement(_)) => false,
        Some(NodeData::VariableDeclarator(declarator)) => declarator.name != identifier,
        Some(NodeData::FunctionDeclaration(function))
        | Some(NodeData::FunctionExpression(function))
        | Some(NodeData::ArrowFunction(function)) => {
            function.name != identifier && !function.parameters.nodes.contains(&identifier)
        }
        Some(NodeData::CatchClause(clause)) => clause.variable != identifier,
        Some(NodeData::ClassDeclaration(class)) | Some(NodeData::ClassExpression(class)) => {
            class.name != identifier
        }
        Some(NodeData::MethodDefinition(method)) => method.computed || method.name != identifier,
        Some(NodeData::PropertyDefinition(field)) => field.computed || field.name != identifier,
        _ => true,
    }
}
