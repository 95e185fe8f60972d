//! Parser state - expression parsing methods.
//!
//! Binary operators use precedence climbing over `precedence.rs`; the rest
//! is plain recursive descent. Parentheses only group: they produce no
//! node of their own.

use crate::base::{NodeIndex, NodeList};
use crate::node::{
    AccessData, BigIntData, BinaryData, CallData, ConditionalData, FunctionData, IdentifierData,
    ListData, NodeData, NumericLiteralData, OperandData, PropertyData, PropertyKind, RegExpData,
    StringLiteralData, TaggedTemplateData, TemplateData, TemplateElement, UnaryData, YieldData,
};
use crate::precedence::{
    Precedence, binary_operator_precedence, is_logical_operator, is_right_associative,
};
use crate::state::{ParseResult, ParserState, RawError, is_assignment_target};
use rejs_common::limits::MAX_AST_DEPTH;
use rejs_scanner::{ScannerState, SyntaxKind};

impl ParserState {
    // =========================================================================
    // Comma, assignment and conditional
    // =========================================================================

    pub(crate) fn parse_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let first = self.parse_assignment_expression()?;
        if !self.is_token(SyntaxKind::CommaToken) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(SyntaxKind::CommaToken)? {
            expressions.push(self.parse_assignment_expression()?);
        }
        let end = expressions.last().map_or(pos, |&last| self.node_end(last));
        Ok(self.arena.add(
            NodeData::Sequence(ListData {
                elements: NodeList::from_vec(expressions),
            }),
            pos,
            end,
        ))
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<NodeIndex> {
        self.enter()?;
        let result = self.parse_assignment_expression_worker();
        self.leave();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> ParseResult<NodeIndex> {
        if self.in_generator && self.is_token(SyntaxKind::YieldKeyword) {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.try_parse_arrow_function()? {
            return Ok(arrow);
        }

        let pos = self.token_pos();
        let left = self.parse_conditional_expression()?;
        let operator = self.token();
        if !operator.is_assignment_operator() {
            return Ok(left);
        }

        match self.arena.data(left) {
            Some(data) if is_assignment_target(data) => {}
            Some(NodeData::ArrayLiteral(_) | NodeData::ObjectLiteral(_))
                if operator == SyntaxKind::EqualsToken =>
            {
                self.to_assignment_target(left)?;
            }
            _ => return Err(self.error_here("Invalid left-hand side in assignment")),
        }

        self.next_token()?;
        let right = self.parse_assignment_expression()?;
        let end = self.node_end(right);
        Ok(self.arena.add(
            NodeData::Assignment(BinaryData {
                left,
                operator,
                right,
            }),
            pos,
            end,
        ))
    }

    fn parse_conditional_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let condition = self.parse_binary_expression(None)?;
        if !self.eat(SyntaxKind::QuestionToken)? {
            return Ok(condition);
        }
        let when_true = self.with_in_allowed(ParserState::parse_assignment_expression)?;
        self.expect(SyntaxKind::ColonToken)?;
        let when_false = self.parse_assignment_expression()?;
        let end = self.node_end(when_false);
        Ok(self.arena.add(
            NodeData::Conditional(ConditionalData {
                condition,
                when_true,
                when_false,
            }),
            pos,
            end,
        ))
    }

    /// `yield`, `yield value` and `yield* iterable`.
    fn parse_yield_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut end = self.token_end();
        self.next_token()?;
        let mut delegate = false;
        let mut argument = NodeIndex::NONE;
        if !self.scanner.has_preceding_line_break() {
            if self.is_token(SyntaxKind::AsteriskToken) {
                delegate = true;
                self.next_token()?;
            }
            if delegate || !ends_yield_operand(self.token()) {
                argument = self.parse_assignment_expression()?;
                end = self.node_end(argument);
            }
        }
        Ok(self.arena.add(
            NodeData::YieldExpression(YieldData { argument, delegate }),
            pos,
            end,
        ))
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    fn try_parse_arrow_function(&mut self) -> ParseResult<Option<NodeIndex>> {
        let pos = self.token_pos();
        let is_async = self.is_contextual("async") && self.look_ahead(look_ahead_is_async_arrow);
        if !is_async && !self.look_ahead_is_arrow() {
            return Ok(None);
        }
        if is_async {
            self.next_token()?;
        }

        let (parameters, body) = self.with_function_context(is_async, false, |parser| {
            let parameters = if parser.is_token(SyntaxKind::OpenParenToken) {
                parser.parse_formal_parameters()?
            } else {
                NodeList::from_vec(vec![parser.parse_identifier()?])
            };
            if parser.scanner.has_preceding_line_break() {
                return Err(parser.error_here("Line terminator not permitted before arrow"));
            }
            parser.expect(SyntaxKind::EqualsGreaterThanToken)?;
            let body = if parser.is_token(SyntaxKind::OpenBraceToken) {
                parser.parse_function_body()?
            } else {
                parser.parse_assignment_expression()?
            };
            Ok((parameters, body))
        })?;
        let end = self.node_end(body);
        Ok(Some(self.arena.add(
            NodeData::ArrowFunction(FunctionData {
                name: NodeIndex::NONE,
                parameters,
                body,
                is_async,
                is_generator: false,
            }),
            pos,
            end,
        )))
    }

    /// `x =>` or `(...) =>` at the current token.
    fn look_ahead_is_arrow(&mut self) -> bool {
        if self.is_identifier_token() {
            return self.look_ahead(|scanner| {
                scanner.scan() == SyntaxKind::EqualsGreaterThanToken
                    && !scanner.has_preceding_line_break()
            });
        }
        self.is_token(SyntaxKind::OpenParenToken)
            && self.look_ahead(look_ahead_is_parenthesized_arrow)
    }

    // =========================================================================
    // Binary and unary
    // =========================================================================

    /// Precedence climbing. Only operators binding tighter than `min` are
    /// consumed.
    fn parse_binary_expression(&mut self, min: Option<Precedence>) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let starts_with_unary = matches!(
            self.token(),
            SyntaxKind::ExclamationToken
                | SyntaxKind::TildeToken
                | SyntaxKind::PlusToken
                | SyntaxKind::MinusToken
                | SyntaxKind::TypeOfKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::DeleteKeyword
        ) || (self.in_async && self.is_contextual("await"));
        let mut left = if self.is_token(SyntaxKind::PrivateIdentifier) {
            self.parse_private_name_in()?
        } else {
            self.parse_unary_expression()?
        };
        let mut chain = 0u32;

        loop {
            let operator = self.token();
            if operator == SyntaxKind::InKeyword && self.disallow_in {
                break;
            }
            let Some(precedence) = binary_operator_precedence(operator) else {
                break;
            };
            if min.is_some_and(|min| precedence <= min) {
                break;
            }
            if operator == SyntaxKind::AsteriskAsteriskToken && starts_with_unary && chain == 0 {
                return Err(self.error_here(
                    "Unary operator used immediately before '**' must be parenthesized",
                ));
            }
            chain += 1;
            if chain > MAX_AST_DEPTH {
                return Err(self.error_here("Expression nested too deeply"));
            }

            self.next_token()?;
            let right_min = if is_right_associative(operator) {
                Precedence::Multiplicative
            } else {
                precedence
            };
            self.enter()?;
            let right = self.parse_binary_expression(Some(right_min));
            self.leave();
            let right = right?;
            let end = self.node_end(right);
            let data = BinaryData {
                left,
                operator,
                right,
            };
            let data = if is_logical_operator(operator) {
                NodeData::Logical(data)
            } else {
                NodeData::Binary(data)
            };
            left = self.arena.add(data, pos, end);
        }
        Ok(left)
    }

    /// `#field in object`: the only place a private name stands alone.
    fn parse_private_name_in(&mut self) -> ParseResult<NodeIndex> {
        let followed_by_in = self.look_ahead(|scanner| scanner.scan() == SyntaxKind::InKeyword);
        if !followed_by_in || self.disallow_in {
            return Err(self.error_here("Unexpected private name"));
        }
        self.parse_private_name()
    }

    fn parse_unary_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let operator = self.token();
        if self.in_async && self.is_contextual("await") {
            self.next_token()?;
            self.enter()?;
            let operand = self.parse_unary_expression();
            self.leave();
            let expression = operand?;
            let end = self.node_end(expression);
            return Ok(self.arena.add(
                NodeData::AwaitExpression(OperandData { expression }),
                pos,
                end,
            ));
        }
        match operator {
            SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                self.next_token()?;
                self.enter()?;
                let operand = self.parse_unary_expression();
                self.leave();
                let operand = operand?;
                if matches!(
                    operator,
                    SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
                ) && !self.arena.data(operand).is_some_and(is_assignment_target)
                {
                    return Err(RawError {
                        message: "Invalid left-hand side expression in prefix operation".into(),
                        pos,
                    });
                }
                let end = self.node_end(operand);
                Ok(self.arena.add(
                    NodeData::PrefixUnary(UnaryData { operator, operand }),
                    pos,
                    end,
                ))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let operand = self.parse_left_hand_side_expression()?;
        let operator = self.token();
        if !matches!(
            operator,
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) || self.scanner.has_preceding_line_break()
        {
            return Ok(operand);
        }
        if !self.arena.data(operand).is_some_and(is_assignment_target) {
            return Err(self.error_here("Invalid left-hand side expression in postfix operation"));
        }
        let end = self.token_end();
        self.next_token()?;
        Ok(self.arena.add(
            NodeData::PostfixUnary(UnaryData { operator, operand }),
            pos,
            end,
        ))
    }

    // =========================================================================
    // Member access, calls and `new`
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        self.parse_member_expression_rest(pos, expression, true)
    }

    /// `.name`, `[expr]`, template and (when `allow_calls`) `(args)`
    /// suffixes, with optional chaining.
    fn parse_member_expression_rest(
        &mut self,
        pos: u32,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> ParseResult<NodeIndex> {
        let mut in_chain = false;
        loop {
            let optional = self.is_token(SyntaxKind::QuestionDotToken);
            if optional {
                if !allow_calls {
                    return Err(self.error_here("Invalid optional chain from new expression"));
                }
                in_chain = true;
                self.next_token()?;
            }
            match self.token() {
                SyntaxKind::DotToken if !optional => {
                    self.next_token()?;
                    let name = self.parse_member_name()?;
                    let end = self.node_end(name);
                    expression = self.add_access(pos, end, expression, name, false, in_chain);
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token()?;
                    let argument = self.with_in_allowed(ParserState::parse_expression)?;
                    let end = self.expect(SyntaxKind::CloseBracketToken)?;
                    expression = self.arena.add(
                        NodeData::ElementAccess(AccessData {
                            expression,
                            name_or_argument: argument,
                            optional,
                            in_chain,
                        }),
                        pos,
                        end,
                    );
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let (arguments, end) = self.parse_arguments()?;
                    expression = self.arena.add(
                        NodeData::CallExpression(CallData {
                            expression,
                            arguments,
                            optional,
                            in_chain,
                        }),
                        pos,
                        end,
                    );
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    if in_chain {
                        return Err(self.error_here("Invalid tagged template on optional chain"));
                    }
                    let template = self.parse_template_literal(true)?;
                    let end = self.node_end(template);
                    expression = self.arena.add(
                        NodeData::TaggedTemplate(TaggedTemplateData {
                            tag: expression,
                            template,
                        }),
                        pos,
                        end,
                    );
                }
                _ if optional => {
                    let name = self.parse_member_name()?;
                    let end = self.node_end(name);
                    expression = self.add_access(pos, end, expression, name, true, in_chain);
                }
                _ => return Ok(expression),
            }
        }
    }

    /// The name after `.` or `?.`: any identifier, keyword or `#private`.
    fn parse_member_name(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::PrivateIdentifier) {
            return self.parse_private_name();
        }
        if !self.is_identifier_or_keyword() {
            return Err(self.error_here("Identifier expected"));
        }
        self.parse_identifier_name()
    }

    fn add_access(
        &mut self,
        pos: u32,
        end: u32,
        expression: NodeIndex,
        name: NodeIndex,
        optional: bool,
        in_chain: bool,
    ) -> NodeIndex {
        self.arena.add(
            NodeData::PropertyAccess(AccessData {
                expression,
                name_or_argument: name,
                optional,
                in_chain,
            }),
            pos,
            end,
        )
    }

    fn parse_new_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::NewKeyword)?;
        if self.is_token(SyntaxKind::DotToken) {
            self.next_token()?;
            if !self.is_contextual("target") {
                return Err(self.error_here("'target' expected"));
            }
            let end = self.token_end();
            self.next_token()?;
            return Ok(self.arena.add(NodeData::NewTarget, pos, end));
        }

        self.enter()?;
        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let callee = callee.and_then(|callee| {
            self.parse_member_expression_rest(callee_pos, callee, false)
        });
        self.leave();
        let callee = callee?;
        if matches!(self.arena.data(callee), Some(NodeData::Import)) {
            return Err(self.error_here("Cannot use new with import"));
        }

        let (arguments, end) = if self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_arguments()?
        } else {
            (NodeList::new(), self.node_end(callee))
        };
        Ok(self.arena.add(
            NodeData::NewExpression(CallData::new(callee, arguments)),
            pos,
            end,
        ))
    }

    /// `(a, ...b)` argument list; returns the list and the end of `)`.
    fn parse_arguments(&mut self) -> ParseResult<(NodeList, u32)> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut arguments = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            let argument = if self.is_token(SyntaxKind::DotDotDotToken) {
                self.parse_spread_element()?
            } else {
                self.with_in_allowed(ParserState::parse_assignment_expression)?
            };
            arguments.push(argument);
            if !self.eat(SyntaxKind::CommaToken)? {
                break;
            }
        }
        let end = self.expect(SyntaxKind::CloseParenToken)?;
        Ok((NodeList::from_vec(arguments), end))
    }

    fn parse_spread_element(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::DotDotDotToken)?;
        let expression = self.with_in_allowed(ParserState::parse_assignment_expression)?;
        let end = self.node_end(expression);
        Ok(self.arena.add(
            NodeData::SpreadElement(OperandData { expression }),
            pos,
            end,
        ))
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let end = self.token_end();
        let data = match self.token() {
            SyntaxKind::Identifier if self.look_ahead_is_async_function() => {
                return self.parse_function_expression(true);
            }
            _ if self.is_identifier_token() => return self.parse_identifier(),
            SyntaxKind::NumericLiteral => NodeData::NumericLiteral(NumericLiteralData {
                value: self.scanner.number_value(),
                raw: Some(self.scanner.token_text().to_string()),
            }),
            SyntaxKind::BigIntLiteral => NodeData::BigIntLiteral(BigIntData {
                raw: self.scanner.token_value().to_string(),
            }),
            SyntaxKind::StringLiteral => NodeData::StringLiteral(StringLiteralData {
                value: self.scanner.token_value().to_string(),
                raw: Some(self.scanner.token_text().to_string()),
                has_lone_surrogate: self.scanner.has_lone_surrogate(),
            }),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                return self.parse_template_literal(false);
            }
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                if self.scanner.re_scan_slash_token() == SyntaxKind::Unknown {
                    let message = self.scanner.take_error().map_or_else(
                        || "Unterminated regular expression literal".to_string(),
                        |error| error.message,
                    );
                    return Err(self.error_here(message));
                }
                let end = self.token_end();
                let text = self.scanner.token_value().to_string();
                self.next_token()?;
                return Ok(self
                    .arena
                    .add(NodeData::RegularExpressionLiteral(RegExpData { text }), pos, end));
            }
            SyntaxKind::TrueKeyword => NodeData::BooleanLiteral(true),
            SyntaxKind::FalseKeyword => NodeData::BooleanLiteral(false),
            SyntaxKind::NullKeyword => NodeData::NullLiteral,
            SyntaxKind::ThisKeyword => NodeData::ThisKeyword,
            SyntaxKind::OpenParenToken => {
                self.next_token()?;
                let expression = self.with_in_allowed(ParserState::parse_expression)?;
                self.expect(SyntaxKind::CloseParenToken)?;
                return Ok(expression);
            }
            SyntaxKind::OpenBracketToken => return self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => return self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => return self.parse_function_expression(false),
            SyntaxKind::ClassKeyword => return self.parse_class_expression(),
            SyntaxKind::SuperKeyword => {
                self.next_token()?;
                if !matches!(
                    self.token(),
                    SyntaxKind::DotToken | SyntaxKind::OpenBracketToken | SyntaxKind::OpenParenToken
                ) {
                    return Err(self.error_here(
                        "'super' must be followed by an argument list or member access",
                    ));
                }
                return Ok(self.arena.add(NodeData::Super, pos, end));
            }
            SyntaxKind::ImportKeyword => {
                self.next_token()?;
                if !self.is_token(SyntaxKind::OpenParenToken) {
                    return Err(self.error_here("'import' and 'export' may appear only in modules"));
                }
                return Ok(self.arena.add(NodeData::Import, pos, end));
            }
            _ => return Err(self.error_here("Expression expected")),
        };
        self.next_token()?;
        Ok(self.arena.add(data, pos, end))
    }

    pub(crate) fn parse_private_name(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let end = self.token_end();
        let text = self.scanner.token_value().to_string();
        self.expect(SyntaxKind::PrivateIdentifier)?;
        Ok(self.arena.add(
            NodeData::PrivateName(IdentifierData { escaped_text: text }),
            pos,
            end,
        ))
    }

    /// `` `a${b}c` ``. Untagged templates reject malformed escapes; tagged
    /// ones keep the raw text and leave the cooked value undefined.
    pub(crate) fn parse_template_literal(&mut self, tagged: bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut quasis = vec![self.template_element(tagged)?];
        let mut expressions = Vec::new();
        if self.is_token(SyntaxKind::NoSubstitutionTemplateLiteral) {
            let end = self.token_end();
            self.next_token()?;
            return Ok(self.add_template(quasis, expressions, pos, end));
        }
        let end = loop {
            self.next_token()?;
            expressions.push(self.with_in_allowed(ParserState::parse_expression)?);
            match self.token() {
                SyntaxKind::TemplateMiddle => quasis.push(self.template_element(tagged)?),
                SyntaxKind::TemplateTail => {
                    quasis.push(self.template_element(tagged)?);
                    let end = self.token_end();
                    self.next_token()?;
                    break end;
                }
                _ => return Err(self.error_here("'}' expected")),
            }
        };
        Ok(self.add_template(quasis, expressions, pos, end))
    }

    fn template_element(&self, tagged: bool) -> ParseResult<TemplateElement> {
        let raw = self.scanner.template_raw().to_string();
        if self.scanner.has_invalid_template_escape() {
            if !tagged {
                return Err(self.error_here("Invalid escape sequence in template"));
            }
            return Ok(TemplateElement { cooked: None, raw });
        }
        Ok(TemplateElement {
            cooked: Some(self.scanner.token_value().to_string()),
            raw,
        })
    }

    fn add_template(
        &mut self,
        quasis: Vec<TemplateElement>,
        expressions: Vec<NodeIndex>,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        self.arena.add(
            NodeData::TemplateLiteral(TemplateData {
                quasis,
                expressions: NodeList::from_vec(expressions),
            }),
            pos,
            end,
        )
    }

    fn parse_array_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::CloseBracketToken => break,
                SyntaxKind::CommaToken => {
                    let hole_pos = self.token_pos();
                    elements.push(self.arena.add(NodeData::OmittedExpression, hole_pos, hole_pos));
                    self.next_token()?;
                }
                _ => {
                    let element = if self.is_token(SyntaxKind::DotDotDotToken) {
                        self.parse_spread_element()?
                    } else {
                        self.with_in_allowed(ParserState::parse_assignment_expression)?
                    };
                    elements.push(element);
                    if !self.eat(SyntaxKind::CommaToken)? {
                        break;
                    }
                }
            }
        }
        let end = self.expect(SyntaxKind::CloseBracketToken)?;
        Ok(self.arena.add(
            NodeData::ArrayLiteral(ListData {
                elements: NodeList::from_vec(elements),
            }),
            pos,
            end,
        ))
    }

    fn parse_object_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            properties.push(self.parse_object_property()?);
            if !self.eat(SyntaxKind::CommaToken)? {
                break;
            }
        }
        let end = self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(self.arena.add(
            NodeData::ObjectLiteral(ListData {
                elements: NodeList::from_vec(properties),
            }),
            pos,
            end,
        ))
    }

    fn parse_object_property(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_spread_element();
        }

        let is_async = self.is_contextual("async") && self.look_ahead(look_ahead_is_async_modifier);
        if is_async {
            self.next_token()?;
        }
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;
        let mut kind = PropertyKind::Init;
        if !is_async
            && !is_generator
            && (self.is_contextual("get") || self.is_contextual("set"))
            && self.look_ahead(look_ahead_is_property_name)
        {
            kind = if self.scanner.token_value() == "get" {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            self.next_token()?;
        }

        let is_plain_identifier = self.is_identifier_token();
        let (name, computed) = self.parse_property_name(false)?;
        let is_method = is_async || is_generator || kind != PropertyKind::Init;

        let (initializer, kind) = match self.token() {
            SyntaxKind::OpenParenToken => {
                let method = self.parse_method_function(is_async, is_generator)?;
                match kind {
                    PropertyKind::Get => self.check_accessor_parameters(method, true)?,
                    PropertyKind::Set => self.check_accessor_parameters(method, false)?,
                    _ => {}
                }
                let kind = if kind == PropertyKind::Init {
                    PropertyKind::Method
                } else {
                    kind
                };
                (method, kind)
            }
            _ if is_method => return Err(self.error_here("'(' expected")),
            SyntaxKind::ColonToken => {
                self.next_token()?;
                let value = self.with_in_allowed(ParserState::parse_assignment_expression)?;
                (value, PropertyKind::Init)
            }
            SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken | SyntaxKind::EqualsToken
                if is_plain_identifier =>
            {
                let mut value = self.copy_identifier(name);
                if self.eat(SyntaxKind::EqualsToken)? {
                    value = self.parse_default_value(value)?;
                }
                (value, PropertyKind::Shorthand)
            }
            _ => return Err(self.error_here("':' expected")),
        };

        let end = self.node_end(initializer);
        let property = self.arena.add(
            NodeData::PropertyAssignment(PropertyData {
                name,
                initializer,
                kind,
                computed,
            }),
            pos,
            end,
        );
        if matches!(
            self.arena.data(initializer),
            Some(NodeData::AssignmentPattern(_))
        ) {
            self.cover_initializers.push(property);
        }
        Ok(property)
    }

    /// An object or class key; returns the node and whether it is computed.
    pub(crate) fn parse_property_name(
        &mut self,
        allow_private: bool,
    ) -> ParseResult<(NodeIndex, bool)> {
        match self.token() {
            SyntaxKind::OpenBracketToken => {
                self.next_token()?;
                let name = self.with_in_allowed(ParserState::parse_assignment_expression)?;
                self.expect(SyntaxKind::CloseBracketToken)?;
                Ok((name, true))
            }
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                Ok((self.parse_primary_expression()?, false))
            }
            SyntaxKind::PrivateIdentifier if allow_private => Ok((self.parse_private_name()?, false)),
            _ if self.is_identifier_or_keyword() => Ok((self.parse_identifier_name()?, false)),
            _ => Err(self.error_here("Property assignment expected")),
        }
    }

    /// A fresh identifier with the same text and span as `name`, used as
    /// the value of a shorthand property.
    pub(crate) fn copy_identifier(&mut self, name: NodeIndex) -> NodeIndex {
        let (pos, end) = self
            .arena
            .get(name)
            .map_or((0, 0), |node| (node.pos, node.end));
        let escaped_text = self
            .arena
            .identifier_text(name)
            .unwrap_or_default()
            .to_string();
        self.arena.add(
            NodeData::Identifier(IdentifierData { escaped_text }),
            pos,
            end,
        )
    }

    /// `target = default`, after the `=` has been consumed.
    pub(crate) fn parse_default_value(&mut self, target: NodeIndex) -> ParseResult<NodeIndex> {
        let pos = self.arena.get(target).map_or(0, |node| node.pos);
        let default = self.with_in_allowed(ParserState::parse_assignment_expression)?;
        let end = self.node_end(default);
        Ok(self.arena.add(
            NodeData::AssignmentPattern(BinaryData {
                left: target,
                operator: SyntaxKind::EqualsToken,
                right: default,
            }),
            pos,
            end,
        ))
    }

    /// Parameters and body of an object or class method, as an anonymous
    /// `FunctionExpression`.
    pub(crate) fn parse_method_function(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let (parameters, body, end) =
            self.parse_function_signature_and_body(is_async, is_generator)?;
        Ok(self.arena.add(
            NodeData::FunctionExpression(FunctionData {
                name: NodeIndex::NONE,
                parameters,
                body,
                is_async,
                is_generator,
            }),
            pos,
            end,
        ))
    }

    pub(crate) fn check_accessor_parameters(
        &self,
        method: NodeIndex,
        is_getter: bool,
    ) -> ParseResult<()> {
        let pos = self.arena.get(method).map_or(0, |node| node.pos);
        let count = self
            .arena
            .data(method)
            .and_then(NodeData::function_data)
            .map_or(0, |function| function.parameters.len());
        if is_getter && count != 0 {
            return Err(self.error_at(pos, "A 'get' accessor cannot have parameters"));
        }
        if !is_getter && count != 1 {
            return Err(self.error_at(pos, "A 'set' accessor must have exactly one parameter"));
        }
        Ok(())
    }

    fn parse_function_expression(&mut self, is_async: bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if is_async {
            self.next_token()?;
        }
        self.expect(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;
        let name = self.with_function_context(is_async, is_generator, |parser| {
            if parser.is_identifier_token() {
                parser.parse_identifier()
            } else {
                Ok(NodeIndex::NONE)
            }
        })?;
        let (parameters, body, end) =
            self.parse_function_signature_and_body(is_async, is_generator)?;
        Ok(self.arena.add(
            NodeData::FunctionExpression(FunctionData {
                name,
                parameters,
                body,
                is_async,
                is_generator,
            }),
            pos,
            end,
        ))
    }
}

// =============================================================================
// Lookahead predicates
// =============================================================================

/// Tokens after `yield` that mean it has no operand.
fn ends_yield_operand(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::CommaToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::ColonToken
            | SyntaxKind::InKeyword
            | SyntaxKind::TemplateMiddle
            | SyntaxKind::TemplateTail
            | SyntaxKind::EndOfFileToken
    )
}

/// At `(`: true when the matching `)` is followed by `=>`.
fn look_ahead_is_parenthesized_arrow(scanner: &mut ScannerState) -> bool {
    let mut depth = 1u32;
    loop {
        match scanner.scan() {
            SyntaxKind::OpenParenToken => depth += 1,
            SyntaxKind::CloseParenToken => {
                depth -= 1;
                if depth == 0 {
                    return scanner.scan() == SyntaxKind::EqualsGreaterThanToken;
                }
            }
            SyntaxKind::EndOfFileToken | SyntaxKind::Unknown => return false,
            _ => {}
        }
    }
}

/// At `async`: true for `async x =>` and `async (...) =>` on one line.
fn look_ahead_is_async_arrow(scanner: &mut ScannerState) -> bool {
    let next = scanner.scan();
    if scanner.has_preceding_line_break() {
        return false;
    }
    match next {
        SyntaxKind::Identifier | SyntaxKind::LetKeyword | SyntaxKind::YieldKeyword => {
            scanner.scan() == SyntaxKind::EqualsGreaterThanToken
                && !scanner.has_preceding_line_break()
        }
        SyntaxKind::OpenParenToken => look_ahead_is_parenthesized_arrow(scanner),
        _ => false,
    }
}

pub(crate) fn is_property_name_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::PrivateIdentifier
    ) || kind.is_keyword()
}

/// After `get`/`set`: true when another property name follows, making the
/// word a modifier rather than a key.
pub(crate) fn look_ahead_is_property_name(scanner: &mut ScannerState) -> bool {
    is_property_name_start(scanner.scan())
}

/// After `async` in a property position: a modifier only when a name or
/// `*` follows on the same line.
pub(crate) fn look_ahead_is_async_modifier(scanner: &mut ScannerState) -> bool {
    let next = scanner.scan();
    !scanner.has_preceding_line_break()
        && (next == SyntaxKind::AsteriskToken || is_property_name_start(next))
}
