//! Parser state - class declarations and expressions.

use crate::base::{NodeIndex, NodeList};
use crate::node::{
    BlockData, ClassData, MethodDefinitionData, MethodKind, NodeData, PropertyDefinitionData,
};
use crate::state::{ParseResult, ParserState};
use crate::state_expressions::{
    is_property_name_start, look_ahead_is_async_modifier, look_ahead_is_property_name,
};
use rejs_scanner::SyntaxKind;

impl ParserState {
    pub(crate) fn parse_class_declaration(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::ClassKeyword)?;
        let name = self.parse_identifier()?;
        let (heritage, members, end) = self.parse_class_tail()?;
        Ok(self.arena.add(
            NodeData::ClassDeclaration(ClassData {
                name,
                heritage,
                members,
            }),
            pos,
            end,
        ))
    }

    pub(crate) fn parse_class_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::ClassKeyword)?;
        let name = if self.is_identifier_token() {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        let (heritage, members, end) = self.parse_class_tail()?;
        Ok(self.arena.add(
            NodeData::ClassExpression(ClassData {
                name,
                heritage,
                members,
            }),
            pos,
            end,
        ))
    }

    /// `extends X { members }`; returns the heritage, members and the end
    /// of `}`.
    fn parse_class_tail(&mut self) -> ParseResult<(NodeIndex, NodeList, u32)> {
        let heritage = if self.eat(SyntaxKind::ExtendsKeyword)? {
            self.parse_left_hand_side_expression()?
        } else {
            NodeIndex::NONE
        };
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        let mut seen_constructor = false;
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.eat(SyntaxKind::SemicolonToken)? {
                continue;
            }
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error_here("'}' expected"));
            }
            members.push(self.parse_class_member(&mut seen_constructor)?);
        }
        let end = self.expect(SyntaxKind::CloseBraceToken)?;
        Ok((heritage, NodeList::from_vec(members), end))
    }

    fn parse_class_member(&mut self, seen_constructor: &mut bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_static = self.is_contextual("static")
            && self.look_ahead(|scanner| {
                let next = scanner.scan();
                matches!(
                    next,
                    SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken
                ) || is_property_name_start(next)
            });
        if is_static {
            self.next_token()?;
            if self.is_token(SyntaxKind::OpenBraceToken) {
                return self.parse_static_block(pos);
            }
        }

        let is_async = self.is_contextual("async") && self.look_ahead(look_ahead_is_async_modifier);
        if is_async {
            self.next_token()?;
        }
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;
        let mut kind = MethodKind::Method;
        if !is_async
            && !is_generator
            && (self.is_contextual("get") || self.is_contextual("set"))
            && self.look_ahead(look_ahead_is_property_name)
        {
            kind = if self.scanner.token_value() == "get" {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.next_token()?;
        }

        let (name, computed) = self.parse_property_name(true)?;
        let is_constructor_name = !computed && self.is_constructor_name(name);

        if !self.is_token(SyntaxKind::OpenParenToken)
            && !is_async
            && !is_generator
            && kind == MethodKind::Method
        {
            if is_constructor_name {
                return Err(self.error_at(pos, "Classes may not have a field named 'constructor'"));
            }
            return self.parse_class_field(pos, name, computed, is_static);
        }

        if is_constructor_name && !is_static {
            if is_async || is_generator || kind != MethodKind::Method {
                return Err(self.error_at(pos, "Class constructor may not be a special method"));
            }
            if *seen_constructor {
                return Err(self.error_at(pos, "A class may only have one constructor"));
            }
            *seen_constructor = true;
            kind = MethodKind::Constructor;
        }

        let value = self.parse_method_function(is_async, is_generator)?;
        match kind {
            MethodKind::Get => self.check_accessor_parameters(value, true)?,
            MethodKind::Set => self.check_accessor_parameters(value, false)?,
            _ => {}
        }
        let end = self.node_end(value);
        Ok(self.arena.add(
            NodeData::MethodDefinition(MethodDefinitionData {
                name,
                value,
                kind,
                computed,
                is_static,
            }),
            pos,
            end,
        ))
    }

    fn is_constructor_name(&self, name: NodeIndex) -> bool {
        match self.arena.data(name) {
            Some(NodeData::Identifier(identifier)) => identifier.escaped_text == "constructor",
            Some(NodeData::StringLiteral(literal)) => literal.value == "constructor",
            _ => false,
        }
    }

    /// `name = value;` with the usual semicolon insertion.
    fn parse_class_field(
        &mut self,
        pos: u32,
        name: NodeIndex,
        computed: bool,
        is_static: bool,
    ) -> ParseResult<NodeIndex> {
        let mut end = self.node_end(name);
        let value = if self.eat(SyntaxKind::EqualsToken)? {
            let value = self.with_function_context(false, false, |parser| {
                parser.with_in_allowed(ParserState::parse_assignment_expression)
            })?;
            end = self.node_end(value);
            value
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon()?;
        Ok(self.arena.add(
            NodeData::PropertyDefinition(PropertyDefinitionData {
                name,
                value,
                computed,
                is_static,
            }),
            pos,
            end,
        ))
    }

    /// `static { ... }`, after `static`.
    fn parse_static_block(&mut self, pos: u32) -> ParseResult<NodeIndex> {
        self.expect(SyntaxKind::OpenBraceToken)?;
        let statements = self.with_function_context(false, false, |parser| {
            let mut statements = Vec::new();
            while !parser.is_token(SyntaxKind::CloseBraceToken) {
                if parser.is_token(SyntaxKind::EndOfFileToken) {
                    return Err(parser.error_here("'}' expected"));
                }
                statements.push(parser.parse_statement()?);
            }
            Ok(statements)
        })?;
        let end = self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(self.arena.add(
            NodeData::StaticBlock(BlockData {
                statements: NodeList::from_vec(statements),
            }),
            pos,
            end,
        ))
    }
}
