use super::Printer;
use rejs_parser::{NodeData, NodeIndex};
use rejs_scanner::SyntaxKind;

impl<'a> Printer<'a> {
    // =========================================================================
    // Output Helpers (delegate to SourceWriter)
    // =========================================================================

    pub(super) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    pub(super) fn write_space(&mut self) {
        self.writer.write_char(' ');
    }

    pub(super) fn write_line(&mut self) {
        self.writer.write_line();
    }

    pub(super) fn increase_indent(&mut self) {
        self.writer.increase_indent();
    }

    pub(super) fn decrease_indent(&mut self) {
        self.writer.decrease_indent();
    }

    pub(super) fn write_identifier_text(&mut self, idx: NodeIndex) {
        if let Some(text) = self.arena.identifier_text(idx) {
            self.writer.write(text);
        }
    }

    // =========================================================================
    // Parenthesization Queries
    // =========================================================================

    /// Leftmost sub-expression of `idx`: the node whose first token is
    /// the first token of `idx` when printed without extra parentheses.
    fn leftmost_expression(&self, idx: NodeIndex) -> NodeIndex {
        let mut current = idx;
        loop {
            current = match self.arena.data(current) {
                Some(NodeData::CallExpression(call)) => call.expression,
                Some(NodeData::PropertyAccess(access))
                | Some(NodeData::ElementAccess(access)) => access.expression,
                Some(NodeData::Binary(binary))
                | Some(NodeData::Logical(binary))
                | Some(NodeData::Assignment(binary)) => binary.left,
                Some(NodeData::TaggedTemplate(tagged)) => tagged.tag,
                Some(NodeData::Conditional(conditional)) => conditional.condition,
                Some(NodeData::PostfixUnary(unary)) => unary.operand,
                Some(NodeData::Sequence(sequence)) => match sequence.elements.nodes.first() {
                    Some(&first) => first,
                    None => return current,
                },
                _ => return current,
            };
        }
    }

    /// Expression statements may not start with `function`, `class`, `{`
    /// or `let [`. Returns the sub-expression that starts with one.
    pub(super) fn ambiguous_statement_start(&self, idx: NodeIndex) -> Option<NodeIndex> {
        let leftmost = self.leftmost_expression(idx);
        let ambiguous = match self.arena.data(leftmost) {
            Some(NodeData::FunctionExpression(_))
            | Some(NodeData::ClassExpression(_))
            | Some(NodeData::ObjectLiteral(_))
            | Some(NodeData::ObjectPattern(_)) => true,
            Some(NodeData::Identifier(identifier)) => {
                identifier.escaped_text == "let"
                    && matches!(
                        self.arena.data(self.arena.parent(leftmost)),
                        Some(NodeData::ElementAccess(_))
                    )
            }
            _ => false,
        };
        ambiguous.then_some(leftmost)
    }

    /// Concise arrow bodies may not start with `{`.
    pub(super) fn starts_with_object_literal(&self, idx: NodeIndex) -> bool {
        matches!(
            self.arena.data(self.leftmost_expression(idx)),
            Some(NodeData::ObjectLiteral(_)) | Some(NodeData::ObjectPattern(_))
        )
    }

    /// A call or member access inside an optional chain.
    pub(super) fn is_chain_link(&self, idx: NodeIndex) -> bool {
        match self.arena.data(idx) {
            Some(NodeData::CallExpression(call)) => call.in_chain,
            Some(NodeData::PropertyAccess(access)) | Some(NodeData::ElementAccess(access)) => {
                access.in_chain
            }
            _ => false,
        }
    }

    /// A call anywhere along the member chain of a `new` callee.
    pub(super) fn member_chain_contains_call(&self, idx: NodeIndex) -> bool {
        let mut current = idx;
        loop {
            current = match self.arena.data(current) {
                Some(NodeData::CallExpression(_)) => return true,
                Some(NodeData::PropertyAccess(access))
                | Some(NodeData::ElementAccess(access)) => access.expression,
                _ => return false,
            };
        }
    }

    /// `1.toString()` does not parse; `(1).toString()` does.
    pub(super) fn is_integer_literal(&self, idx: NodeIndex) -> bool {
        match self.arena.data(idx) {
            Some(NodeData::NumericLiteral(literal)) => {
                let text = self.numeric_literal_text(literal);
                text.bytes().all(|byte| byte.is_ascii_digit())
            }
            _ => false,
        }
    }

    /// `- -a` and `+ ++a` need a space to avoid `--a` and `+++a`.
    pub(super) fn operand_repeats_sign(&self, operator: SyntaxKind, operand: NodeIndex) -> bool {
        let Some(NodeData::PrefixUnary(inner)) = self.arena.data(operand) else {
            return false;
        };
        match operator {
            SyntaxKind::PlusToken => matches!(
                inner.operator,
                SyntaxKind::PlusToken | SyntaxKind::PlusPlusToken
            ),
            SyntaxKind::MinusToken => matches!(
                inner.operator,
                SyntaxKind::MinusToken | SyntaxKind::MinusMinusToken
            ),
            _ => false,
        }
    }
}
