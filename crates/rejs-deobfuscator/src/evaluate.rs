//! Constant folding over expression subtrees.
//!
//! `evaluate` never guesses: any operand it cannot pin down (a bound or
//! unknown identifier, a call, an assignment, an update, `delete`, `new`)
//! makes the whole result non-confident. Primitive semantics follow the
//! abstract operations of the language (ToNumber, ToString, ToInt32,
//! abstract and strict equality, relational comparison).

use rejs_binder::BinderState;
use rejs_common::format_js_number;
use rejs_common::limits::MAX_EVAL_DEPTH;
use rejs_parser::{NodeArena, NodeData, NodeIndex};
use rejs_scanner::SyntaxKind;
use serde::Serialize;
use std::cmp::Ordering;

// =============================================================================
// Values
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum JsValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl JsValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Boolean(value) => *value,
            JsValue::Number(value) => *value != 0.0 && !value.is_nan(),
            JsValue::String(value) => !value.is_empty(),
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            JsValue::Undefined => f64::NAN,
            JsValue::Null => 0.0,
            JsValue::Boolean(value) => f64::from(u8::from(*value)),
            JsValue::Number(value) => *value,
            JsValue::String(value) => string_to_number(value),
        }
    }

    pub fn to_js_string(&self) -> String {
        match self {
            JsValue::Undefined => "undefined".to_string(),
            JsValue::Null => "null".to_string(),
            JsValue::Boolean(value) => value.to_string(),
            JsValue::Number(value) => format_js_number(*value),
            JsValue::String(value) => value.clone(),
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null => "object",
            JsValue::Boolean(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
        }
    }

    fn strict_equals(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Number(a), JsValue::Number(b)) => a == b,
            (a, b) => a == b,
        }
    }

    fn loose_equals(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Undefined | JsValue::Null, JsValue::Undefined | JsValue::Null) => true,
            (JsValue::Undefined | JsValue::Null, _) | (_, JsValue::Undefined | JsValue::Null) => {
                false
            }
            (JsValue::Number(_), JsValue::String(_))
            | (JsValue::String(_), JsValue::Number(_))
            | (JsValue::Boolean(_), _)
            | (_, JsValue::Boolean(_)) => {
                if std::mem::discriminant(self) == std::mem::discriminant(other) {
                    return self.strict_equals(other);
                }
                self.to_number() == other.to_number()
            }
            _ => self.strict_equals(other),
        }
    }
}

/// `ToNumber` applied to a string.
pub fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }
    let radix_literal = |prefix: [&str; 2], radix: u32| {
        prefix
            .iter()
            .find_map(|p| trimmed.strip_prefix(p))
            .map(|digits| parse_radix(digits, radix))
    };
    if let Some(value) = radix_literal(["0x", "0X"], 16)
        .or_else(|| radix_literal(["0o", "0O"], 8))
        .or_else(|| radix_literal(["0b", "0B"], 2))
    {
        return value;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust also accepts `inf`, `nan` and friends; the language does not.
    let is_decimal_literal = trimmed
        .bytes()
        .all(|byte| byte.is_ascii_digit() || matches!(byte, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !is_decimal_literal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0f64;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            return f64::NAN;
        };
        value = value * f64::from(radix) + f64::from(digit);
    }
    value
}

fn is_js_whitespace(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{feff}'
}

/// `ToInt32`.
pub fn to_int32(value: f64) -> i32 {
    to_uint32(value) as i32
}

/// `ToUint32`.
pub fn to_uint32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let truncated = value.trunc();
    let modulo = truncated.rem_euclid(4_294_967_296.0);
    modulo as u32
}

// =============================================================================
// Evaluation
// =============================================================================

/// Result of folding an expression.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    /// Meaningful only when `confident`.
    pub value: JsValue,
    pub confident: bool,
}

impl Evaluation {
    fn known(value: JsValue) -> Self {
        Evaluation {
            value,
            confident: true,
        }
    }

    fn unknown() -> Self {
        Evaluation {
            value: JsValue::Undefined,
            confident: false,
        }
    }

    pub fn into_value(self) -> Option<JsValue> {
        self.confident.then_some(self.value)
    }
}

/// Fold `expr` to a primitive value when every operand is statically known.
pub fn evaluate(arena: &NodeArena, binder: &BinderState, expr: NodeIndex) -> Evaluation {
    Evaluator { arena, binder }
        .eval(expr, 0)
        .map_or_else(Evaluation::unknown, Evaluation::known)
}

/// Truthiness of `expr` when it is known without running anything.
///
/// On top of `evaluate`, function literals and side-effect-free array and
/// object literals are known to be truthy.
pub fn truthiness(arena: &NodeArena, binder: &BinderState, expr: NodeIndex) -> Option<bool> {
    match arena.data(expr)? {
        NodeData::FunctionExpression(_) | NodeData::ArrowFunction(_) => Some(true),
        NodeData::ArrayLiteral(_) | NodeData::ObjectLiteral(_) => {
            is_pure(arena, binder, expr).then_some(true)
        }
        _ => evaluate(arena, binder, expr)
            .into_value()
            .map(|value| value.is_truthy()),
    }
}

/// True when evaluating `expr` cannot run user code, throw, or write
/// anything.
pub fn is_pure(arena: &NodeArena, binder: &BinderState, expr: NodeIndex) -> bool {
    is_pure_at(arena, binder, expr, 0)
}

fn is_pure_at(arena: &NodeArena, binder: &BinderState, expr: NodeIndex, depth: u32) -> bool {
    if depth > MAX_EVAL_DEPTH {
        return false;
    }
    let Some(data) = arena.data(expr) else {
        return true;
    };
    let pure = |child: NodeIndex| is_pure_at(arena, binder, child, depth + 1);
    match data {
        NodeData::StringLiteral(_)
        | NodeData::NumericLiteral(_)
        | NodeData::BooleanLiteral(_)
        | NodeData::NullLiteral
        | NodeData::RegularExpressionLiteral(_)
        | NodeData::ThisKeyword
        | NodeData::OmittedExpression
        | NodeData::FunctionExpression(_)
        | NodeData::ArrowFunction(_) => true,
        // Reading an undeclared global throws.
        NodeData::Identifier(identifier) => {
            if binder.is_dynamic(expr) {
                return false;
            }
            binder.resolve(expr).is_some()
                || matches!(
                    identifier.escaped_text.as_str(),
                    "undefined" | "NaN" | "Infinity"
                )
        }
        NodeData::ArrayLiteral(list) | NodeData::Sequence(list) => {
            list.elements.nodes.iter().all(|&element| pure(element))
        }
        NodeData::ObjectLiteral(list) => list.elements.nodes.iter().all(|&property| {
            match arena.data(property) {
                Some(NodeData::PropertyAssignment(assignment)) => {
                    let key_pure = !assignment.computed
                        || arena.data(assignment.name).is_some_and(NodeData::is_literal);
                    key_pure && pure(assignment.initializer)
                }
                _ => false,
            }
        }),
        NodeData::PrefixUnary(unary) => match unary.operator {
            SyntaxKind::DeleteKeyword | SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                false
            }
            _ => pure(unary.operand),
        },
        NodeData::Binary(binary) => {
            !matches!(
                binary.operator,
                SyntaxKind::InKeyword | SyntaxKind::InstanceOfKeyword
            ) && pure(binary.left)
                && pure(binary.right)
        }
        NodeData::Logical(binary) => pure(binary.left) && pure(binary.right),
        // Interpolation calls `toString` on objects.
        NodeData::TemplateLiteral(template) => template.expressions.nodes.iter().all(|&e| {
            pure(e) && arena.data(e).is_some_and(NodeData::is_literal)
        }),
        NodeData::Conditional(conditional) => {
            pure(conditional.condition)
                && pure(conditional.when_true)
                && pure(conditional.when_false)
        }
        _ => false,
    }
}

struct Evaluator<'a> {
    arena: &'a NodeArena,
    binder: &'a BinderState,
}

impl Evaluator<'_> {
    fn eval(&self, expr: NodeIndex, depth: u32) -> Option<JsValue> {
        if depth > MAX_EVAL_DEPTH {
            return None;
        }
        let depth = depth + 1;
        match self.arena.data(expr)? {
            NodeData::NumericLiteral(literal) => Some(JsValue::Number(literal.value)),
            NodeData::StringLiteral(literal) => {
                (!literal.has_lone_surrogate).then(|| JsValue::String(literal.value.clone()))
            }
            NodeData::BooleanLiteral(value) => Some(JsValue::Boolean(*value)),
            NodeData::NullLiteral => Some(JsValue::Null),
            NodeData::Identifier(identifier) => {
                if self.binder.resolve(expr).is_some() || self.binder.is_dynamic(expr) {
                    return None;
                }
                match identifier.escaped_text.as_str() {
                    "undefined" => Some(JsValue::Undefined),
                    "NaN" => Some(JsValue::Number(f64::NAN)),
                    "Infinity" => Some(JsValue::Number(f64::INFINITY)),
                    _ => None,
                }
            }
            NodeData::PrefixUnary(unary) => {
                let operand = self.eval(unary.operand, depth)?;
                match unary.operator {
                    SyntaxKind::ExclamationToken => Some(JsValue::Boolean(!operand.is_truthy())),
                    SyntaxKind::MinusToken => Some(JsValue::Number(-operand.to_number())),
                    SyntaxKind::PlusToken => Some(JsValue::Number(operand.to_number())),
                    SyntaxKind::TildeToken => {
                        Some(JsValue::Number(f64::from(!to_int32(operand.to_number()))))
                    }
                    SyntaxKind::TypeOfKeyword => {
                        Some(JsValue::String(operand.type_of().to_string()))
                    }
                    SyntaxKind::VoidKeyword => Some(JsValue::Undefined),
                    _ => None,
                }
            }
            NodeData::Binary(binary) => {
                let left = self.eval(binary.left, depth)?;
                let right = self.eval(binary.right, depth)?;
                apply_binary(binary.operator, &left, &right)
            }
            NodeData::Logical(logical) => {
                let left = self.eval(logical.left, depth)?;
                let short_circuits = match logical.operator {
                    SyntaxKind::AmpersandAmpersandToken => !left.is_truthy(),
                    SyntaxKind::BarBarToken => left.is_truthy(),
                    SyntaxKind::QuestionQuestionToken => {
                        !matches!(left, JsValue::Undefined | JsValue::Null)
                    }
                    _ => return None,
                };
                if short_circuits {
                    Some(left)
                } else {
                    self.eval(logical.right, depth)
                }
            }
            NodeData::TemplateLiteral(template) => {
                let mut text = String::new();
                let mut expressions = template.expressions.nodes.iter();
                for quasi in &template.quasis {
                    // U+FFFD may stand in for an unpaired surrogate escape.
                    let cooked = quasi.cooked.as_deref().filter(|c| !c.contains('\u{FFFD}'))?;
                    text.push_str(cooked);
                    if let Some(&expression) = expressions.next() {
                        text.push_str(&self.eval(expression, depth)?.to_js_string());
                    }
                }
                Some(JsValue::String(text))
            }
            NodeData::Conditional(conditional) => {
                let condition = self.eval(conditional.condition, depth)?;
                if condition.is_truthy() {
                    self.eval(conditional.when_true, depth)
                } else {
                    self.eval(conditional.when_false, depth)
                }
            }
            _ => None,
        }
    }
}

/// Apply a binary operator to two primitives. `None` for `in`,
/// `instanceof` and anything that is not a binary operator.
pub fn apply_binary(operator: SyntaxKind, left: &JsValue, right: &JsValue) -> Option<JsValue> {
    use JsValue::{Boolean, Number};

    let numeric = |f: fn(f64, f64) -> f64| Some(Number(f(left.to_number(), right.to_number())));
    let int32 = |f: fn(i32, i32) -> i32| {
        Some(Number(f64::from(f(
            to_int32(left.to_number()),
            to_int32(right.to_number()),
        ))))
    };
    let shift_count = || to_uint32(right.to_number()) & 31;

    match operator {
        SyntaxKind::PlusToken => match (left, right) {
            (JsValue::String(_), _) | (_, JsValue::String(_)) => Some(JsValue::String(format!(
                "{}{}",
                left.to_js_string(),
                right.to_js_string()
            ))),
            _ => numeric(|a, b| a + b),
        },
        SyntaxKind::MinusToken => numeric(|a, b| a - b),
        SyntaxKind::AsteriskToken => numeric(|a, b| a * b),
        SyntaxKind::SlashToken => numeric(|a, b| a / b),
        SyntaxKind::PercentToken => numeric(|a, b| a % b),
        SyntaxKind::AsteriskAsteriskToken => numeric(js_pow),
        SyntaxKind::AmpersandToken => int32(|a, b| a & b),
        SyntaxKind::BarToken => int32(|a, b| a | b),
        SyntaxKind::CaretToken => int32(|a, b| a ^ b),
        SyntaxKind::LessThanLessThanToken => Some(Number(f64::from(
            to_int32(left.to_number()).wrapping_shl(shift_count()),
        ))),
        SyntaxKind::GreaterThanGreaterThanToken => Some(Number(f64::from(
            to_int32(left.to_number()).wrapping_shr(shift_count()),
        ))),
        SyntaxKind::GreaterThanGreaterThanGreaterThanToken => Some(Number(f64::from(
            to_uint32(left.to_number()).wrapping_shr(shift_count()),
        ))),
        SyntaxKind::EqualsEqualsEqualsToken => Some(Boolean(left.strict_equals(right))),
        SyntaxKind::ExclamationEqualsEqualsToken => Some(Boolean(!left.strict_equals(right))),
        SyntaxKind::EqualsEqualsToken => Some(Boolean(left.loose_equals(right))),
        SyntaxKind::ExclamationEqualsToken => Some(Boolean(!left.loose_equals(right))),
        SyntaxKind::LessThanToken => Some(Boolean(compare(left, right) == Some(Ordering::Less))),
        SyntaxKind::GreaterThanToken => {
            Some(Boolean(compare(left, right) == Some(Ordering::Greater)))
        }
        SyntaxKind::LessThanEqualsToken => Some(Boolean(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        ))),
        SyntaxKind::GreaterThanEqualsToken => Some(Boolean(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ))),
        _ => None,
    }
}

/// Relational comparison; `None` when either side is `NaN`.
fn compare(left: &JsValue, right: &JsValue) -> Option<Ordering> {
    if let (JsValue::String(a), JsValue::String(b)) = (left, right) {
        // Code-unit order, not scalar-value order.
        return Some(a.encode_utf16().cmp(b.encode_utf16()));
    }
    left.to_number().partial_cmp(&right.to_number())
}

fn js_pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}
