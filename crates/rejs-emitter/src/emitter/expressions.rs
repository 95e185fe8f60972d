use super::Printer;
use rejs_parser::node::{BinaryData, PropertyKind};
use rejs_parser::precedence::{Precedence, binary_operator_precedence, expression_precedence};
use rejs_parser::{NodeData, NodeIndex};
use rejs_scanner::{SyntaxKind, token_to_string};

impl<'a> Printer<'a> {
    // =========================================================================
    // Expressions
    // =========================================================================

    /// Print `idx` in a slot that accepts expressions of precedence `min`
    /// or tighter, parenthesizing otherwise.
    pub(super) fn emit_expression(&mut self, idx: NodeIndex, min: Precedence) {
        let Some(data) = self.arena.data(idx) else {
            return;
        };
        let is_top_level_in = self.disallow_in
            && matches!(data, NodeData::Binary(binary) if binary.operator == SyntaxKind::InKeyword);
        if idx == self.parenthesized_start {
            self.parenthesized_start = NodeIndex::NONE;
            self.emit_parenthesized(idx);
        } else if expression_precedence(data) < min || is_top_level_in {
            self.emit_parenthesized(idx);
        } else {
            self.emit_expression_unwrapped(idx, data);
        }
    }

    pub(super) fn emit_parenthesized(&mut self, idx: NodeIndex) {
        let Some(data) = self.arena.data(idx) else {
            return;
        };
        let saved = std::mem::replace(&mut self.disallow_in, false);
        self.write("(");
        self.emit_expression_unwrapped(idx, data);
        self.write(")");
        self.disallow_in = saved;
    }

    fn emit_expression_unwrapped(&mut self, idx: NodeIndex, data: &NodeData) {
        match data {
            NodeData::Identifier(identifier) => self.write(&identifier.escaped_text),
            NodeData::StringLiteral(_) => self.emit_string_literal(idx),
            NodeData::NumericLiteral(_) => self.emit_numeric_literal(idx),
            NodeData::RegularExpressionLiteral(regex) => self.write(&regex.text),
            NodeData::BooleanLiteral(value) => self.write(if *value { "true" } else { "false" }),
            NodeData::NullLiteral => self.write("null"),
            NodeData::ThisKeyword => self.write("this"),
            NodeData::OmittedExpression => {}
            NodeData::ArrayLiteral(array) | NodeData::ArrayPattern(array) => {
                let saved = std::mem::replace(&mut self.disallow_in, false);
                self.write("[");
                let elements = &array.elements.nodes;
                for (i, &element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expression(element, Precedence::Assignment);
                }
                // `[a, ,]` needs the extra comma to keep the trailing hole.
                if elements
                    .last()
                    .is_some_and(|&last| matches!(self.arena.data(last), Some(NodeData::OmittedExpression)))
                {
                    self.write(",");
                }
                self.write("]");
                self.disallow_in = saved;
            }
            NodeData::ObjectLiteral(object) | NodeData::ObjectPattern(object) => {
                if object.elements.is_empty() {
                    self.write("{}");
                    return;
                }
                let saved = std::mem::replace(&mut self.disallow_in, false);
                self.write("{ ");
                for (i, &property) in object.elements.nodes.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if matches!(self.arena.data(property), Some(NodeData::PropertyAssignment(_))) {
                        self.emit_property_assignment(property);
                    } else {
                        self.emit_expression(property, Precedence::Assignment);
                    }
                }
                self.write(" }");
                self.disallow_in = saved;
            }
            NodeData::PropertyAssignment(_) => self.emit_property_assignment(idx),
            NodeData::FunctionExpression(function) => self.emit_function(function, true),
            NodeData::ArrowFunction(function) => {
                if function.is_async {
                    self.write("async ");
                }
                self.emit_parameters(&function.parameters.nodes);
                self.write(" => ");
                if matches!(self.arena.data(function.body), Some(NodeData::Block(_))) {
                    self.emit_block(function.body);
                } else if self.starts_with_object_literal(function.body) {
                    self.emit_parenthesized(function.body);
                } else {
                    self.emit_expression(function.body, Precedence::Assignment);
                }
            }
            NodeData::CallExpression(call) => {
                self.emit_chain_object(call.expression, call.in_chain);
                if call.optional {
                    self.write("?.");
                }
                self.emit_arguments(&call.arguments.nodes);
            }
            NodeData::NewExpression(call) => {
                self.write("new ");
                // `new (f())()` and `new (a().b)()` differ from `new f()()`.
                if self.member_chain_contains_call(call.expression)
                    || self.is_chain_link(call.expression)
                {
                    self.emit_parenthesized(call.expression);
                } else {
                    self.emit_expression(call.expression, Precedence::Member);
                }
                self.emit_arguments(&call.arguments.nodes);
            }
            NodeData::PropertyAccess(access) => {
                if self.is_integer_literal(access.expression) && !access.optional {
                    self.emit_parenthesized(access.expression);
                } else {
                    self.emit_chain_object(access.expression, access.in_chain);
                }
                self.write(if access.optional { "?." } else { "." });
                self.emit_property_name(access.name_or_argument, false);
            }
            NodeData::ElementAccess(access) => {
                self.emit_chain_object(access.expression, access.in_chain);
                let saved = std::mem::replace(&mut self.disallow_in, false);
                self.write(if access.optional { "?.[" } else { "[" });
                self.emit_expression(access.name_or_argument, Precedence::Comma);
                self.write("]");
                self.disallow_in = saved;
            }
            NodeData::PrefixUnary(unary) => {
                let operator = token_to_string(unary.operator).unwrap_or_default();
                self.write(operator);
                if matches!(
                    unary.operator,
                    SyntaxKind::TypeOfKeyword | SyntaxKind::VoidKeyword | SyntaxKind::DeleteKeyword
                ) || self.operand_repeats_sign(unary.operator, unary.operand)
                {
                    self.write_space();
                }
                self.emit_expression(unary.operand, Precedence::Unary);
            }
            NodeData::PostfixUnary(unary) => {
                self.emit_expression(unary.operand, Precedence::LeftHandSide);
                self.write(token_to_string(unary.operator).unwrap_or_default());
            }
            NodeData::Binary(binary) | NodeData::Logical(binary) => {
                self.emit_binary_expression(binary);
            }
            NodeData::Assignment(assignment) | NodeData::AssignmentPattern(assignment) => {
                self.emit_expression(assignment.left, Precedence::LeftHandSide);
                self.write_space();
                self.write(token_to_string(assignment.operator).unwrap_or("="));
                self.write_space();
                self.emit_expression(assignment.right, Precedence::Assignment);
            }
            NodeData::Conditional(conditional) => {
                self.emit_expression(conditional.condition, Precedence::Coalesce);
                self.write(" ? ");
                let saved = std::mem::replace(&mut self.disallow_in, false);
                self.emit_expression(conditional.when_true, Precedence::Assignment);
                self.disallow_in = saved;
                self.write(" : ");
                self.emit_expression(conditional.when_false, Precedence::Assignment);
            }
            NodeData::Sequence(sequence) => {
                for (i, &element) in sequence.elements.nodes.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expression(element, Precedence::Assignment);
                }
            }
            NodeData::BigIntLiteral(literal) => self.write(&literal.raw),
            NodeData::PrivateName(identifier) => {
                self.write("#");
                self.write(&identifier.escaped_text);
            }
            NodeData::TemplateLiteral(template) => {
                let saved = std::mem::replace(&mut self.disallow_in, false);
                self.write("`");
                for (i, quasi) in template.quasis.iter().enumerate() {
                    if i > 0 {
                        self.write("}");
                    }
                    self.write(&quasi.raw);
                    if let Some(&expression) = template.expressions.nodes.get(i) {
                        self.write("${");
                        self.emit_expression(expression, Precedence::Comma);
                    }
                }
                self.write("`");
                self.disallow_in = saved;
            }
            NodeData::TaggedTemplate(tagged) => {
                if self.is_chain_link(tagged.tag) {
                    self.emit_parenthesized(tagged.tag);
                } else {
                    self.emit_expression(tagged.tag, Precedence::Member);
                }
                self.emit(tagged.template);
            }
            NodeData::ClassExpression(class) => self.emit_class(class),
            NodeData::SpreadElement(operand) | NodeData::RestElement(operand) => {
                self.write("...");
                self.emit_expression(operand.expression, Precedence::Assignment);
            }
            NodeData::YieldExpression(yield_expression) => {
                self.write(if yield_expression.delegate { "yield*" } else { "yield" });
                if yield_expression.argument.is_some() {
                    self.write_space();
                    self.emit_expression(yield_expression.argument, Precedence::Assignment);
                }
            }
            NodeData::AwaitExpression(operand) => {
                self.write("await ");
                self.emit_expression(operand.expression, Precedence::Unary);
            }
            NodeData::Super => self.write("super"),
            NodeData::NewTarget => self.write("new.target"),
            NodeData::Import => self.write("import"),
            // Statements never sit in expression slots.
            _ => self.emit(idx),
        }
    }

    fn emit_binary_expression(&mut self, binary: &BinaryData) {
        let Some(precedence) = binary_operator_precedence(binary.operator) else {
            return;
        };
        let (left_min, right_min) = if binary.operator == SyntaxKind::AsteriskAsteriskToken {
            // `-a ** b` is a syntax error; `++a ** b` is fine.
            (Precedence::Update, precedence)
        } else {
            (precedence, precedence.tighter())
        };
        self.emit_binary_operand(binary.left, binary.operator, left_min);
        self.write_space();
        self.write(token_to_string(binary.operator).unwrap_or_default());
        self.write_space();
        self.emit_binary_operand(binary.right, binary.operator, right_min);
    }

    /// `??` cannot mix with `&&` or `||` without parentheses.
    fn emit_binary_operand(&mut self, idx: NodeIndex, parent: SyntaxKind, min: Precedence) {
        let mixes_coalesce = match self.arena.data(idx) {
            Some(NodeData::Logical(child)) => {
                (parent == SyntaxKind::QuestionQuestionToken)
                    != (child.operator == SyntaxKind::QuestionQuestionToken)
                    && matches!(
                        parent,
                        SyntaxKind::QuestionQuestionToken
                            | SyntaxKind::AmpersandAmpersandToken
                            | SyntaxKind::BarBarToken
                    )
            }
            _ => false,
        };
        if mixes_coalesce {
            self.emit_parenthesized(idx);
        } else {
            self.emit_expression(idx, min);
        }
    }

    pub(super) fn emit_arguments(&mut self, arguments: &[NodeIndex]) {
        let saved = std::mem::replace(&mut self.disallow_in, false);
        self.write("(");
        for (i, &argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression(argument, Precedence::Assignment);
        }
        self.write(")");
        self.disallow_in = saved;
    }

    pub(super) fn emit_property_assignment(&mut self, idx: NodeIndex) {
        let Some(NodeData::PropertyAssignment(property)) = self.arena.data(idx) else {
            return;
        };
        match property.kind {
            PropertyKind::Shorthand if !property.computed => {
                let name = self.arena.identifier_text(property.name);
                match self.arena.data(property.initializer) {
                    Some(NodeData::Identifier(value)) if name == Some(value.escaped_text.as_str()) => {
                        self.write_identifier_text(property.name);
                    }
                    // `{ a = 1 }` in a pattern.
                    Some(NodeData::AssignmentPattern(default))
                        if name.is_some() && name == self.arena.identifier_text(default.left) =>
                    {
                        self.write_identifier_text(property.name);
                        self.write(" = ");
                        self.emit_expression(default.right, Precedence::Assignment);
                    }
                    _ => self.emit_key_value(property.name, property.initializer, false),
                }
            }
            PropertyKind::Method | PropertyKind::Get | PropertyKind::Set => {
                let function = match self.arena.data(property.initializer) {
                    Some(NodeData::FunctionExpression(function)) => function,
                    _ => {
                        self.emit_key_value(property.name, property.initializer, property.computed);
                        return;
                    }
                };
                let accessor = match property.kind {
                    PropertyKind::Get => Some("get"),
                    PropertyKind::Set => Some("set"),
                    _ => None,
                };
                self.emit_method_modifiers(property.initializer, accessor);
                self.emit_property_name(property.name, property.computed);
                self.emit_function(function, false);
            }
            _ => self.emit_key_value(property.name, property.initializer, property.computed),
        }
    }

    fn emit_key_value(&mut self, name: NodeIndex, value: NodeIndex, computed: bool) {
        self.emit_property_name(name, computed);
        self.write(": ");
        self.emit_expression(value, Precedence::Assignment);
    }

    /// The object of a call or member access. A link that ends an optional
    /// chain keeps the chain inside parentheses: `(a?.b).c` is not `a?.b.c`.
    fn emit_chain_object(&mut self, object: NodeIndex, in_chain: bool) {
        if !in_chain && self.is_chain_link(object) {
            self.emit_parenthesized(object);
        } else {
            self.emit_expression(object, Precedence::LeftHandSide);
        }
    }

    pub(super) fn emit_property_name(&mut self, name: NodeIndex, computed: bool) {
        if computed {
            self.write("[");
            self.emit_expression(name, Precedence::Assignment);
            self.write("]");
            return;
        }
        match self.arena.data(name) {
            Some(NodeData::Identifier(identifier)) => self.write(&identifier.escaped_text),
            Some(NodeData::PrivateName(identifier)) => {
                self.write("#");
                self.write(&identifier.escaped_text);
            }
            Some(NodeData::StringLiteral(_)) => self.emit_string_literal(name),
            Some(NodeData::NumericLiteral(_)) => self.emit_numeric_literal(name),
            _ => self.emit_expression(name, Precedence::Assignment),
        }
    }
}
