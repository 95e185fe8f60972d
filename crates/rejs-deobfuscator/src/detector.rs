//! Obfuscation technique detection.
//!
//! Two text checks run first and short-circuit: character-set encodings
//! (source written only in `[]()!+`) and `_0x`-mangled identifiers. Both
//! are reported as terminal, with nothing recommended. Otherwise the tree
//! detectors each map onto one pass flag of the recommended
//! `Configuration`.
//!
//! Detectors never mutate the tree.

use crate::config::Configuration;
use crate::evaluate::{JsValue, evaluate, truthiness};
use crate::transforms::{is_non_decimal, single_expression_statement, single_return_expression};
use memchr::memmem;
use rejs_binder::{BinderState, BindingKind, ReferenceKind};
use rejs_emitter::escape_string;
use rejs_parser::{NodeArena, NodeData, NodeIndex, ParseError, parse};
use rejs_scanner::char_codes::is_identifier_part;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Reported by `DetectionResult::is_clean`.
pub const CLEAN_MESSAGE: &str = "no classical obfuscation technique detected";

// =============================================================================
// Result types
// =============================================================================

/// An encoding the deobfuscator recognises but cannot reverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnreversibleEncoding {
    /// Source written only in `[]()!+`.
    CharacterSet,
    /// Identifiers renamed to `_0x` hex names.
    IdentifierMangling,
}

impl UnreversibleEncoding {
    pub fn label(self) -> &'static str {
        match self {
            UnreversibleEncoding::CharacterSet => "character set encoding",
            UnreversibleEncoding::IdentifierMangling => "identifier mangling",
        }
    }
}

impl fmt::Display for UnreversibleEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnreversibleEncoding::CharacterSet => {
                f.write_str("source is written in a reduced character set and cannot be reversed")
            }
            UnreversibleEncoding::IdentifierMangling => {
                f.write_str("identifiers are mangled into _0x names and cannot be reversed")
            }
        }
    }
}

impl std::error::Error for UnreversibleEncoding {}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub packed_string_array: bool,
    pub proxy_function: bool,
    pub encoded_strings: bool,
    pub string_proxy_function: bool,
    pub constant_expressions: bool,
    pub dead_branches: bool,
    /// Label only; no pass reverses it.
    pub control_flow_flattening: bool,
    /// Human-readable names of everything detected, in detector order.
    pub labels: Vec<String>,
    pub recommended: Configuration,
    pub unreversible: Option<UnreversibleEncoding>,
}

impl DetectionResult {
    fn terminal(encoding: UnreversibleEncoding) -> DetectionResult {
        DetectionResult {
            labels: vec![encoding.label().to_string()],
            unreversible: Some(encoding),
            ..DetectionResult::default()
        }
    }

    /// Nothing detected at all.
    pub fn is_clean(&self) -> bool {
        self.labels.is_empty() && self.unreversible.is_none()
    }

    /// Detection stopped at an encoding that cannot be reversed.
    pub fn is_terminal(&self) -> bool {
        self.unreversible.is_some()
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Classify the techniques used in `source`.
///
/// The text checks run before parsing, so a terminal result is returned
/// even for text that does not parse.
pub fn detect(source: &str) -> Result<DetectionResult, ParseError> {
    if let Some(encoding) = detect_unreversible(source) {
        debug!(%encoding, "terminal detection");
        return Ok(DetectionResult::terminal(encoding));
    }
    let parsed = parse(source)?;
    let binder = BinderState::bind(&parsed.arena, parsed.root);
    Ok(detect_tree(&parsed.arena, &binder, parsed.root))
}

pub fn detect_unreversible(text: &str) -> Option<UnreversibleEncoding> {
    if detect_character_set_obfuscation(text) {
        Some(UnreversibleEncoding::CharacterSet)
    } else if detect_identifier_mangling_scheme(text) {
        Some(UnreversibleEncoding::IdentifierMangling)
    } else {
        None
    }
}

/// Run every tree detector.
pub fn detect_tree(arena: &NodeArena, binder: &BinderState, root: NodeIndex) -> DetectionResult {
    let mut result = DetectionResult {
        packed_string_array: detect_packed_string_array(arena, binder, root),
        proxy_function: detect_proxy_function(arena, root),
        encoded_strings: detect_encoded_string_literal(arena, root),
        string_proxy_function: detect_string_proxy_function(arena, binder),
        constant_expressions: detect_constant_expression(arena, binder, root),
        dead_branches: detect_dead_branch(arena, binder, root),
        control_flow_flattening: detect_control_flow_flattening(arena, binder, root),
        ..DetectionResult::default()
    };

    let found = [
        (result.packed_string_array, "packed string array"),
        (result.proxy_function, "proxy functions"),
        (result.encoded_strings, "encoded string literals"),
        (result.string_proxy_function, "string proxy functions"),
        (result.constant_expressions, "constant expressions"),
        (result.dead_branches, "dead branches"),
        (result.control_flow_flattening, "control flow flattening"),
    ];
    result.labels = found
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, label)| label.to_string())
        .collect();

    result.recommended = Configuration {
        unpack_arrays: result.packed_string_array,
        decode_strings: result.encoded_strings,
        remove_proxy_functions: result.proxy_function,
        string_proxy_functions: result.string_proxy_function,
        simplify_expressions: result.constant_expressions,
        remove_dead_code: result.dead_branches,
    };
    debug!(labels = ?result.labels, "detected techniques");
    result
}

// =============================================================================
// Text detectors
// =============================================================================

/// Whole text written in `[]()!+`, with nothing else, not even whitespace.
pub fn detect_character_set_obfuscation(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|byte| matches!(byte, b'[' | b']' | b'(' | b')' | b'!' | b'+'))
}

/// An identifier of the form `_0x` followed by hex digits.
pub fn detect_identifier_mangling_scheme(text: &str) -> bool {
    let bytes = text.as_bytes();
    memmem::find_iter(bytes, b"_0x").any(|start| {
        let starts_identifier = text[..start]
            .chars()
            .next_back()
            .is_none_or(|ch| !is_identifier_part(ch));
        if !starts_identifier {
            return false;
        }
        let rest = &text[start + 3..];
        let digits = rest.bytes().take_while(u8::is_ascii_hexdigit).count();
        digits > 0
            && rest[digits..]
                .chars()
                .next()
                .is_none_or(|ch| !is_identifier_part(ch))
    })
}

// =============================================================================
// Tree detectors
// =============================================================================

/// An element access on a variable initialised with a non-empty array of
/// string literals.
pub fn detect_packed_string_array(arena: &NodeArena, binder: &BinderState, root: NodeIndex) -> bool {
    arena.preorder(root).into_iter().any(|node| {
        let Some(NodeData::ElementAccess(access)) = arena.data(node) else {
            return false;
        };
        let Some(binding) = binder.resolve_binding(access.expression) else {
            return false;
        };
        let Some(NodeData::VariableDeclarator(declarator)) = arena.data(binding.declaration) else {
            return false;
        };
        matches!(
            arena.data(declarator.initializer),
            Some(NodeData::ArrayLiteral(array))
                if !array.elements.is_empty()
                    && array.elements.nodes.iter().all(|&element| {
                        matches!(arena.data(element), Some(NodeData::StringLiteral(_)))
                    })
        )
    })
}

/// A function whose body is a single `return obj[...]` or `return obj.x`.
pub fn detect_proxy_function(arena: &NodeArena, root: NodeIndex) -> bool {
    arena.preorder(root).into_iter().any(|node| {
        let Some(function) = arena.data(node).and_then(NodeData::function_data) else {
            return false;
        };
        single_return_expression(arena, function).is_some_and(|expression| {
            matches!(
                arena.data(expression),
                Some(NodeData::ElementAccess(_)) | Some(NodeData::PropertyAccess(_))
            )
        })
    })
}

/// A string literal whose source text differs from its canonical escaped
/// form in the same quotes.
pub fn detect_encoded_string_literal(arena: &NodeArena, root: NodeIndex) -> bool {
    arena.preorder(root).into_iter().any(|node| {
        let Some(NodeData::StringLiteral(literal)) = arena.data(node) else {
            return false;
        };
        if literal.has_lone_surrogate {
            return false;
        }
        let Some(raw) = literal.raw.as_deref() else {
            return false;
        };
        let Some(quote) = raw.chars().next() else {
            return false;
        };
        let inner = raw
            .get(1..raw.len().saturating_sub(1))
            .unwrap_or_default();
        inner != escape_string(&literal.value, quote)
    })
}

/// A function declaration with a single expression statement body that
/// is called by name.
pub fn detect_string_proxy_function(arena: &NodeArena, binder: &BinderState) -> bool {
    binder.bindings().any(|(_, binding)| {
        binding.kind == BindingKind::Function
            && binding
                .references
                .iter()
                .any(|reference| reference.kind == ReferenceKind::Call)
            && matches!(
                arena.data(binding.declaration),
                Some(NodeData::FunctionDeclaration(function))
                    if single_expression_statement(arena, function).is_some()
            )
    })
}

/// A non-decimal number literal, or a binary expression that folds to a
/// printable literal.
pub fn detect_constant_expression(arena: &NodeArena, binder: &BinderState, root: NodeIndex) -> bool {
    arena
        .preorder(root)
        .into_iter()
        .any(|node| match arena.data(node) {
            Some(NodeData::NumericLiteral(literal)) => {
                literal.raw.as_deref().is_some_and(is_non_decimal)
            }
            Some(NodeData::Binary(_)) => evaluate(arena, binder, node)
                .into_value()
                .is_some_and(|value| has_literal_form(&value)),
            _ => false,
        })
}

fn has_literal_form(value: &JsValue) -> bool {
    match value {
        JsValue::Number(number) => {
            number.is_finite() && !(*number == 0.0 && number.is_sign_negative())
        }
        JsValue::Undefined => false,
        JsValue::Null | JsValue::Boolean(_) | JsValue::String(_) => true,
    }
}

/// An `if` whose test has a known truthiness.
pub fn detect_dead_branch(arena: &NodeArena, binder: &BinderState, root: NodeIndex) -> bool {
    arena.preorder(root).into_iter().any(|node| {
        matches!(
            arena.data(node),
            Some(NodeData::IfStatement(statement))
                if truthiness(arena, binder, statement.condition).is_some()
        )
    })
}

/// A loop dispatching through `switch (order[i++])` where `order` comes
/// from `"1|0|2".split("|")`.
pub fn detect_control_flow_flattening(
    arena: &NodeArena,
    binder: &BinderState,
    root: NodeIndex,
) -> bool {
    arena.preorder(root).into_iter().any(|node| {
        let body = match arena.data(node) {
            Some(NodeData::WhileStatement(loop_data)) => loop_data.statement,
            Some(NodeData::ForStatement(loop_data)) => loop_data.statement,
            _ => return false,
        };
        let switch = match arena.data(body) {
            Some(NodeData::SwitchStatement(switch)) => Some(switch),
            Some(NodeData::Block(block)) => block.statements.nodes.iter().find_map(|&statement| {
                match arena.data(statement) {
                    Some(NodeData::SwitchStatement(switch)) => Some(switch),
                    _ => None,
                }
            }),
            _ => None,
        };
        let Some(switch) = switch else {
            return false;
        };
        let Some(NodeData::ElementAccess(access)) = arena.data(switch.expression) else {
            return false;
        };
        binder
            .resolve_binding(access.expression)
            .is_some_and(|binding| is_split_order(arena, binding.declaration))
    })
}

/// `var order = "…|…".split("|")`.
fn is_split_order(arena: &NodeArena, declaration: NodeIndex) -> bool {
    let Some(NodeData::VariableDeclarator(declarator)) = arena.data(declaration) else {
        return false;
    };
    let Some(NodeData::CallExpression(call)) = arena.data(declarator.initializer) else {
        return false;
    };
    let Some(NodeData::PropertyAccess(callee)) = arena.data(call.expression) else {
        return false;
    };
    arena.is_identifier_named(callee.name_or_argument, "split")
        && matches!(
            arena.data(callee.expression),
            Some(NodeData::StringLiteral(order)) if order.value.contains('|')
        )
}
