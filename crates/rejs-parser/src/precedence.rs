//! Operator precedence, shared by the parser and the printer.

use crate::node::NodeData;
use rejs_scanner::SyntaxKind;

/// Expression precedence levels, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Comma,
    Assignment,
    Conditional,
    Coalesce,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Exponentiation,
    Unary,
    Update,
    LeftHandSide,
    Member,
    Primary,
}

impl Precedence {
    /// The next tighter level (`Primary` stays `Primary`).
    pub fn tighter(self) -> Precedence {
        match self {
            Precedence::Comma => Precedence::Assignment,
            Precedence::Assignment => Precedence::Conditional,
            Precedence::Conditional => Precedence::Coalesce,
            Precedence::Coalesce => Precedence::LogicalOr,
            Precedence::LogicalOr => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::BitwiseOr,
            Precedence::BitwiseOr => Precedence::BitwiseXor,
            Precedence::BitwiseXor => Precedence::BitwiseAnd,
            Precedence::BitwiseAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Shift,
            Precedence::Shift => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Exponentiation,
            Precedence::Exponentiation => Precedence::Unary,
            Precedence::Unary => Precedence::Update,
            Precedence::Update => Precedence::LeftHandSide,
            Precedence::LeftHandSide => Precedence::Member,
            Precedence::Member | Precedence::Primary => Precedence::Primary,
        }
    }
}

/// Precedence of a binary or logical operator token.
pub fn binary_operator_precedence(kind: SyntaxKind) -> Option<Precedence> {
    Some(match kind {
        SyntaxKind::QuestionQuestionToken => Precedence::Coalesce,
        SyntaxKind::BarBarToken => Precedence::LogicalOr,
        SyntaxKind::AmpersandAmpersandToken => Precedence::LogicalAnd,
        SyntaxKind::BarToken => Precedence::BitwiseOr,
        SyntaxKind::CaretToken => Precedence::BitwiseXor,
        SyntaxKind::AmpersandToken => Precedence::BitwiseAnd,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => Precedence::Equality,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InstanceOfKeyword
        | SyntaxKind::InKeyword => Precedence::Relational,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => Precedence::Shift,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => Precedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            Precedence::Multiplicative
        }
        SyntaxKind::AsteriskAsteriskToken => Precedence::Exponentiation,
        _ => return None,
    })
}

/// `&&`, `||` and `??` build `Logical` nodes rather than `Binary` ones.
pub fn is_logical_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::AmpersandAmpersandToken
            | SyntaxKind::BarBarToken
            | SyntaxKind::QuestionQuestionToken
    )
}

/// `**` is the only right-associative binary operator.
pub fn is_right_associative(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::AsteriskAsteriskToken
}

/// Precedence of an expression node, used to decide where parentheses go.
pub fn expression_precedence(data: &NodeData) -> Precedence {
    match data {
        NodeData::Sequence(_) => Precedence::Comma,
        NodeData::Assignment(_)
        | NodeData::AssignmentPattern(_)
        | NodeData::ArrowFunction(_)
        | NodeData::YieldExpression(_) => Precedence::Assignment,
        NodeData::Conditional(_) => Precedence::Conditional,
        NodeData::Binary(binary) | NodeData::Logical(binary) => {
            binary_operator_precedence(binary.operator).unwrap_or(Precedence::Comma)
        }
        NodeData::PrefixUnary(unary) => match unary.operator {
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => Precedence::Update,
            _ => Precedence::Unary,
        },
        NodeData::AwaitExpression(_) => Precedence::Unary,
        NodeData::PostfixUnary(_) => Precedence::Update,
        NodeData::CallExpression(_) => Precedence::LeftHandSide,
        NodeData::NewExpression(_)
        | NodeData::PropertyAccess(_)
        | NodeData::ElementAccess(_)
        | NodeData::TaggedTemplate(_) => Precedence::Member,
        _ => Precedence::Primary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_ordering() {
        let prec = |kind| binary_operator_precedence(kind).expect("binary operator");
        assert!(prec(SyntaxKind::AsteriskToken) > prec(SyntaxKind::PlusToken));
        assert!(prec(SyntaxKind::PlusToken) > prec(SyntaxKind::LessThanLessThanToken));
        assert!(prec(SyntaxKind::AmpersandAmpersandToken) > prec(SyntaxKind::BarBarToken));
        assert_eq!(
            prec(SyntaxKind::InKeyword),
            prec(SyntaxKind::InstanceOfKeyword)
        );
        assert_eq!(binary_operator_precedence(SyntaxKind::EqualsToken), None);
    }
}
