//! Parser state - binding and assignment patterns.
//!
//! Declarations and parameters parse patterns directly. Assignments and
//! for-in/of heads first parse an object or array literal, then rewrite it
//! into a pattern in place once the `=` (or `in`/`of`) shows what it was.

use crate::base::{NodeIndex, NodeList};
use crate::node::{BinaryData, ListData, NodeData, OperandData, PropertyData, PropertyKind};
use crate::state::{ParseResult, ParserState, RawError, is_assignment_target};
use rejs_scanner::SyntaxKind;

/// What one literal element turns into.
enum ElementTarget {
    Keep,
    Nested,
    Default(BinaryData),
    Rest(NodeIndex),
    Invalid,
}

impl ParserState {
    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// A declared name: identifier, `{...}` or `[...]`.
    pub(crate) fn parse_binding_target(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_identifier(),
        }
    }

    /// A binding target with an optional `= default`.
    pub(crate) fn parse_binding_element(&mut self) -> ParseResult<NodeIndex> {
        let target = self.parse_binding_target()?;
        if self.eat(SyntaxKind::EqualsToken)? {
            return self.parse_default_value(target);
        }
        Ok(target)
    }

    pub(crate) fn parse_rest_element(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::DotDotDotToken)?;
        let expression = self.parse_binding_target()?;
        if self.is_token(SyntaxKind::EqualsToken) {
            return Err(self.error_here("A rest element cannot have an initializer"));
        }
        let end = self.node_end(expression);
        Ok(self.arena.add(
            NodeData::RestElement(OperandData { expression }),
            pos,
            end,
        ))
    }

    fn parse_array_binding_pattern(&mut self) -> ParseResult<NodeIndex> {
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
                SyntaxKind::DotDotDotToken => {
                    elements.push(self.parse_rest_element()?);
                    if !self.is_token(SyntaxKind::CloseBracketToken) {
                        return Err(
                            self.error_here("A rest element must be last in a destructuring pattern")
                        );
                    }
                    break;
                }
                _ => {
                    elements.push(self.parse_binding_element()?);
                    if !self.eat(SyntaxKind::CommaToken)? {
                        break;
                    }
                }
            }
        }
        let end = self.expect(SyntaxKind::CloseBracketToken)?;
        Ok(self.arena.add(
            NodeData::ArrayPattern(ListData {
                elements: NodeList::from_vec(elements),
            }),
            pos,
            end,
        ))
    }

    fn parse_object_binding_pattern(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                let rest_pos = self.token_pos();
                self.next_token()?;
                let expression = self.parse_identifier()?;
                let end = self.node_end(expression);
                properties.push(self.arena.add(
                    NodeData::RestElement(OperandData { expression }),
                    rest_pos,
                    end,
                ));
                if !self.is_token(SyntaxKind::CloseBraceToken) {
                    return Err(
                        self.error_here("A rest element must be last in a destructuring pattern")
                    );
                }
                break;
            }
            properties.push(self.parse_binding_property()?);
            if !self.eat(SyntaxKind::CommaToken)? {
                break;
            }
        }
        let end = self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(self.arena.add(
            NodeData::ObjectPattern(ListData {
                elements: NodeList::from_vec(properties),
            }),
            pos,
            end,
        ))
    }

    /// `key: target`, `key: target = default`, `name` or `name = default`.
    fn parse_binding_property(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_plain_identifier = self.is_identifier_token();
        if is_plain_identifier && self.in_async && self.is_contextual("await") {
            return Err(self.error_here("'await' cannot be used as an identifier here"));
        }
        let (name, computed) = self.parse_property_name(false)?;
        let (initializer, kind) = if self.eat(SyntaxKind::ColonToken)? {
            (self.parse_binding_element()?, PropertyKind::Init)
        } else if is_plain_identifier && !computed {
            let mut value = self.copy_identifier(name);
            if self.eat(SyntaxKind::EqualsToken)? {
                value = self.parse_default_value(value)?;
            }
            (value, PropertyKind::Shorthand)
        } else {
            return Err(self.error_here("':' expected"));
        };
        let end = self.node_end(initializer);
        Ok(self.arena.add(
            NodeData::PropertyAssignment(PropertyData {
                name,
                initializer,
                kind,
                computed,
            }),
            pos,
            end,
        ))
    }

    // =========================================================================
    // Literal to pattern
    // =========================================================================

    /// Rewrite an object or array literal, and everything nested in it, as
    /// an assignment pattern.
    pub(crate) fn to_assignment_target(&mut self, node: NodeIndex) -> ParseResult<()> {
        self.enter()?;
        let result = self.to_assignment_target_worker(node);
        self.leave();
        result
    }

    fn to_assignment_target_worker(&mut self, node: NodeIndex) -> ParseResult<()> {
        let (elements, is_object) = match self.arena.data(node) {
            Some(NodeData::ObjectLiteral(list)) => (list.elements.clone(), true),
            Some(NodeData::ArrayLiteral(list)) => (list.elements.clone(), false),
            Some(data) if is_assignment_target(data) => return Ok(()),
            _ => return Err(self.invalid_target(node)),
        };

        let count = elements.len();
        for (i, &element) in elements.nodes.iter().enumerate() {
            let is_last = i + 1 == count;
            match self.classify_element(element, is_object) {
                ElementTarget::Keep => {}
                ElementTarget::Nested => self.to_assignment_element(element)?,
                ElementTarget::Default(data) => {
                    if let Some(slot) = self.arena.data_mut(element) {
                        *slot = NodeData::AssignmentPattern(data);
                    }
                }
                ElementTarget::Rest(expression) => {
                    if !is_last {
                        let pos = self.arena.get(element).map_or(0, |n| n.pos);
                        return Err(self.error_at(
                            pos,
                            "A rest element must be last in a destructuring pattern",
                        ));
                    }
                    // Object rest takes a simple target; array rest may nest.
                    if is_object {
                        if !self.arena.data(expression).is_some_and(is_assignment_target) {
                            return Err(self.invalid_target(expression));
                        }
                    } else {
                        self.to_assignment_target(expression)?;
                    }
                    if let Some(slot) = self.arena.data_mut(element) {
                        *slot = NodeData::RestElement(OperandData { expression });
                    }
                }
                ElementTarget::Invalid => return Err(self.invalid_target(element)),
            }
        }

        let list = ListData { elements };
        if let Some(slot) = self.arena.data_mut(node) {
            *slot = if is_object {
                NodeData::ObjectPattern(list)
            } else {
                NodeData::ArrayPattern(list)
            };
        }
        Ok(())
    }

    fn classify_element(&self, element: NodeIndex, is_object: bool) -> ElementTarget {
        match self.arena.data(element) {
            Some(NodeData::SpreadElement(spread)) => ElementTarget::Rest(spread.expression),
            Some(NodeData::PropertyAssignment(property)) if is_object => match property.kind {
                PropertyKind::Init => ElementTarget::Nested,
                PropertyKind::Shorthand => ElementTarget::Keep,
                _ => ElementTarget::Invalid,
            },
            Some(NodeData::OmittedExpression) if !is_object => ElementTarget::Keep,
            Some(NodeData::Assignment(assignment))
                if !is_object && assignment.operator == SyntaxKind::EqualsToken =>
            {
                ElementTarget::Default(assignment.clone())
            }
            Some(_) if !is_object => ElementTarget::Nested,
            _ => ElementTarget::Invalid,
        }
    }

    /// The value side of `key: value`, or an array element: a target with
    /// an optional default.
    fn to_assignment_element(&mut self, element: NodeIndex) -> ParseResult<()> {
        let value = match self.arena.data(element) {
            Some(NodeData::PropertyAssignment(property)) => property.initializer,
            _ => element,
        };
        let default = match self.arena.data(value) {
            Some(NodeData::Assignment(assignment))
                if assignment.operator == SyntaxKind::EqualsToken =>
            {
                assignment.clone()
            }
            _ => return self.to_assignment_target(value),
        };
        if let Some(slot) = self.arena.data_mut(value) {
            *slot = NodeData::AssignmentPattern(default);
        }
        Ok(())
    }

    fn invalid_target(&self, node: NodeIndex) -> RawError {
        let pos = self.arena.get(node).map_or(0, |n| n.pos);
        self.error_at(pos, "Invalid destructuring assignment target")
    }

    /// `{ a = 1 }` is only valid once it has become a pattern.
    pub(crate) fn check_cover_initializers(&self) -> ParseResult<()> {
        for &property in &self.cover_initializers {
            let parent = self.arena.parent(property);
            if matches!(self.arena.data(parent), Some(NodeData::ObjectLiteral(_))) {
                let pos = self.arena.get(property).map_or(0, |n| n.pos);
                return Err(self.error_at(pos, "Invalid shorthand property initializer"));
            }
        }
        Ok(())
    }
}
