//! Parser state: token handling, errors and statement parsing.
//!
//! `ParserState` is a recursive-descent parser over `ScannerState` that
//! builds nodes directly into a `NodeArena`. It reads scripts (not
//! modules): `import`/`export` declarations are syntax errors, `import()`
//! is an expression. Expression parsing lives in `state_expressions.rs`,
//! binding patterns in `state_patterns.rs` and classes in
//! `state_classes.rs`.
//!
//! The parser stops at the first error. Obfuscated input is either valid
//! JavaScript or not worth guessing about, so there is no recovery.

use crate::base::{NodeIndex, NodeList};
use crate::node::{
    BlockData, CaseClauseData, CatchClauseData, ExpressionStatementData, ForData, ForInOfData,
    FunctionData, IdentifierData, IfStatementData, JumpData, LabeledData, NodeData, ReturnData,
    SwitchData, TryData, VariableData, VariableDeclarationData, VariableKind, WhileData,
};
use crate::node_arena::NodeArena;
use rejs_common::LineMap;
use rejs_common::limits::MAX_PARSE_DEPTH;
use rejs_scanner::{ScannerState, SyntaxKind, text_to_keyword, token_to_string};
use std::fmt;

// =============================================================================
// Errors
// =============================================================================

/// A syntax error. Parsing stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the source.
    pub pos: u32,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Position-only error; line and column are filled in by `ParserState::parse_program`.
#[derive(Clone, Debug)]
pub(crate) struct RawError {
    pub message: String,
    pub pos: u32,
}

pub(crate) type ParseResult<T> = Result<T, RawError>;

// =============================================================================
// ParserState
// =============================================================================

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    /// Current recursion depth, checked against `MAX_PARSE_DEPTH`.
    depth: u32,
    /// Set while parsing a `for` initializer, where `in` ends the expression.
    pub(crate) disallow_in: bool,
    /// Inside a generator body: `yield` is an operator.
    pub(crate) in_generator: bool,
    /// Inside an async body: `await` is an operator.
    pub(crate) in_async: bool,
    /// Shorthand properties written `{ a = 1 }`. They are only valid once
    /// their object literal has become a pattern.
    pub(crate) cover_initializers: Vec<NodeIndex>,
}

impl ParserState {
    pub fn new(source: String) -> ParserState {
        let capacity = source.len() / 4;
        ParserState {
            scanner: ScannerState::new(source),
            arena: NodeArena::with_capacity(capacity),
            depth: 0,
            disallow_in: false,
            in_generator: false,
            in_async: false,
            cover_initializers: Vec::new(),
        }
    }

    /// Parse the whole source into a `Program` node.
    pub fn parse_program(mut self) -> Result<(NodeArena, NodeIndex, String), ParseError> {
        let result = self.parse_program_inner();
        match result {
            Ok(root) => Ok((self.arena, root, self.scanner.into_text())),
            Err(raw) => {
                let source = self.scanner.text();
                let position = LineMap::build(source).position(raw.pos, source);
                Err(ParseError {
                    message: raw.message,
                    pos: raw.pos,
                    line: position.line,
                    column: position.column,
                })
            }
        }
    }

    fn parse_program_inner(&mut self) -> ParseResult<NodeIndex> {
        self.next_token()?;
        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            statements.push(self.parse_statement()?);
        }
        self.check_cover_initializers()?;
        let end = self.scanner.token_end();
        Ok(self.arena.add(
            NodeData::Program(BlockData {
                statements: NodeList::from_vec(statements),
            }),
            0,
            end,
        ))
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.scanner.token() == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_start()
    }

    /// End offset of the current token.
    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    /// Advance, converting a scanner error into a parse error.
    pub(crate) fn next_token(&mut self) -> ParseResult<SyntaxKind> {
        let token = self.scanner.scan();
        if token == SyntaxKind::Unknown {
            if let Some(error) = self.scanner.take_error() {
                return Err(RawError {
                    message: error.message,
                    pos: error.pos,
                });
            }
        }
        Ok(token)
    }

    /// Consume `kind` if present.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> ParseResult<bool> {
        if self.is_token(kind) {
            self.next_token()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Consume `kind`, returning the end offset of the consumed token.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> ParseResult<u32> {
        if !self.is_token(kind) {
            let text = token_to_string(kind).unwrap_or("token");
            return Err(self.error_here(format!("'{text}' expected")));
        }
        let end = self.token_end();
        self.next_token()?;
        Ok(end)
    }

    pub(crate) fn error_here(&self, message: impl Into<String>) -> RawError {
        RawError {
            message: message.into(),
            pos: self.token_pos(),
        }
    }

    pub(crate) fn error_at(&self, pos: u32, message: impl Into<String>) -> RawError {
        RawError {
            message: message.into(),
            pos,
        }
    }

    /// True when the current token is the contextual word `word`, spelled
    /// without escapes.
    pub(crate) fn is_contextual(&self, word: &str) -> bool {
        self.is_token(SyntaxKind::Identifier)
            && !self.scanner.has_escaped_identifier()
            && self.scanner.token_value() == word
    }

    /// Automatic semicolon insertion: a `;`, or a line break, `}` or end of
    /// input in its place.
    pub(crate) fn parse_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(SyntaxKind::SemicolonToken)? {
            return Ok(());
        }
        if self.can_insert_semicolon() {
            return Ok(());
        }
        Err(self.error_here("';' expected"))
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break()
    }

    /// Identifiers, plus `let` outside declarations and `yield` outside
    /// generators.
    pub(crate) fn is_identifier_token(&self) -> bool {
        match self.token() {
            SyntaxKind::Identifier | SyntaxKind::LetKeyword => true,
            SyntaxKind::YieldKeyword => !self.in_generator,
            _ => false,
        }
    }

    /// Consume an identifier and build its node.
    pub(crate) fn parse_identifier(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_identifier_token() {
            if self.token().is_keyword() {
                let text = self.scanner.token_value().to_string();
                return Err(self.error_here(format!("'{text}' is a reserved word")));
            }
            return Err(self.error_here("Identifier expected"));
        }
        let text = self.scanner.token_value();
        if self.scanner.has_escaped_identifier()
            && text_to_keyword(text).is_some_and(|keyword| {
                !matches!(keyword, SyntaxKind::LetKeyword | SyntaxKind::YieldKeyword)
            })
        {
            return Err(self.error_here("Keyword must not contain escaped characters"));
        }
        if self.in_async && text == "await" {
            return Err(self.error_here("'await' cannot be used as an identifier here"));
        }
        self.parse_identifier_name()
    }

    /// Any identifier or keyword, as after `.` or as an object key.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let end = self.token_end();
        let text = self.scanner.token_value().to_string();
        self.next_token()?;
        Ok(self.arena.add(
            NodeData::Identifier(IdentifierData { escaped_text: text }),
            pos,
            end,
        ))
    }

    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.token() == SyntaxKind::Identifier || self.token().is_keyword()
    }

    /// Parse a function's parameters and body with `yield` and `await`
    /// meaning what the function's modifiers say.
    pub(crate) fn with_function_context<T>(
        &mut self,
        is_async: bool,
        is_generator: bool,
        f: impl FnOnce(&mut ParserState) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved_generator = std::mem::replace(&mut self.in_generator, is_generator);
        let saved_async = std::mem::replace(&mut self.in_async, is_async);
        let result = f(self);
        self.in_generator = saved_generator;
        self.in_async = saved_async;
        result
    }

    /// Run `f` on the scanner and rewind it afterwards. Lexical errors met
    /// while looking ahead are discarded; the real scan reports them again.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ScannerState) -> T) -> T {
        let snapshot = self.scanner.snapshot();
        let result = f(&mut self.scanner);
        self.scanner.restore(snapshot);
        self.scanner.take_error();
        result
    }

    /// Parse with `in` re-enabled, as inside brackets and parentheses.
    pub(crate) fn with_in_allowed<T>(
        &mut self,
        f: impl FnOnce(&mut ParserState) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.disallow_in, false);
        let result = f(self);
        self.disallow_in = saved;
        result
    }

    // =========================================================================
    // Depth guard
    // =========================================================================

    pub(crate) fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(self.error_here("Expression nested too deeply"));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn parse_statement(&mut self) -> ParseResult<NodeIndex> {
        self.enter()?;
        let result = self.parse_statement_worker();
        self.leave();
        result
    }

    fn parse_statement_worker(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                let pos = self.token_pos();
                let end = self.expect(SyntaxKind::SemicolonToken)?;
                Ok(self.arena.add(NodeData::EmptyStatement, pos, end))
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement()
            }
            SyntaxKind::LetKeyword if self.look_ahead_is_let_declaration() => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(false),
            SyntaxKind::Identifier if self.look_ahead_is_async_function() => {
                self.parse_function_declaration(true)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ReturnKeyword | SyntaxKind::ThrowKeyword => {
                self.parse_return_or_throw()
            }
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                self.parse_break_or_continue()
            }
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::DebuggerKeyword => {
                let pos = self.token_pos();
                let end = self.expect(SyntaxKind::DebuggerKeyword)?;
                self.parse_semicolon()?;
                Ok(self.arena.add(NodeData::DebuggerStatement, pos, end))
            }
            SyntaxKind::ImportKeyword if !self.look_ahead_is_import_call() => Err(self
                .error_here("'import' and 'export' may appear only in modules")),
            SyntaxKind::ExportKeyword => {
                Err(self.error_here("'import' and 'export' may appear only in modules"))
            }
            SyntaxKind::EnumKeyword => Err(self.error_here("'enum' is a reserved word")),
            _ if self.is_identifier_token() && self.look_ahead_is_label() => {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `async function` with no line break between the words.
    pub(crate) fn look_ahead_is_async_function(&mut self) -> bool {
        if !self.is_contextual("async") {
            return false;
        }
        self.look_ahead(|scanner| {
            scanner.scan() == SyntaxKind::FunctionKeyword && !scanner.has_preceding_line_break()
        })
    }

    fn look_ahead_is_import_call(&mut self) -> bool {
        self.look_ahead(ScannerState::scan) == SyntaxKind::OpenParenToken
    }

    /// `let` starts a declaration only when a binding name follows.
    fn look_ahead_is_let_declaration(&mut self) -> bool {
        let next = self.look_ahead(ScannerState::scan);
        matches!(
            next,
            SyntaxKind::Identifier
                | SyntaxKind::LetKeyword
                | SyntaxKind::YieldKeyword
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
        )
    }

    fn look_ahead_is_label(&mut self) -> bool {
        self.look_ahead(ScannerState::scan) == SyntaxKind::ColonToken
    }

    pub(crate) fn parse_block(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error_here("'}' expected"));
            }
            statements.push(self.parse_statement()?);
        }
        let end = self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(self.arena.add(
            NodeData::Block(BlockData {
                statements: NodeList::from_vec(statements),
            }),
            pos,
            end,
        ))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = self.parse_expression()?;
        let end = self.arena.get(expression).map_or(pos, |node| node.end);
        self.parse_semicolon()?;
        Ok(self.arena.add(
            NodeData::ExpressionStatement(ExpressionStatementData { expression }),
            pos,
            end,
        ))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn variable_kind(&self) -> VariableKind {
        match self.token() {
            SyntaxKind::LetKeyword => VariableKind::Let,
            SyntaxKind::ConstKeyword => VariableKind::Const,
            _ => VariableKind::Var,
        }
    }

    fn parse_variable_statement(&mut self) -> ParseResult<NodeIndex> {
        let statement = self.parse_variable_declaration_list()?;
        self.check_declarator_initializers(statement)?;
        self.parse_semicolon()?;
        Ok(statement)
    }

    /// `var a = 1, b` without the trailing semicolon. Honors `disallow_in`
    /// so that `for (var k in o)` stops before `in`.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let kind = self.variable_kind();
        self.next_token()?;

        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declarator()?);
            if !self.eat(SyntaxKind::CommaToken)? {
                break;
            }
        }
        let end = declarations
            .last()
            .and_then(|&last| self.arena.get(last))
            .map_or(pos, |node| node.end);
        Ok(self.arena.add(
            NodeData::VariableStatement(VariableData {
                kind,
                declarations: NodeList::from_vec(declarations),
            }),
            pos,
            end,
        ))
    }

    fn parse_variable_declarator(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let name = self.parse_binding_target()?;
        let mut end = self.node_end(name);
        let initializer = if self.eat(SyntaxKind::EqualsToken)? {
            let initializer = self.parse_assignment_expression()?;
            end = self.node_end(initializer);
            initializer
        } else {
            NodeIndex::NONE
        };
        Ok(self.arena.add(
            NodeData::VariableDeclarator(VariableDeclarationData { name, initializer }),
            pos,
            end,
        ))
    }

    /// Outside for-in/of heads, `const` and destructuring declarators need
    /// an initializer.
    fn check_declarator_initializers(&self, statement: NodeIndex) -> ParseResult<()> {
        let Some(NodeData::VariableStatement(list)) = self.arena.data(statement) else {
            return Ok(());
        };
        for &declarator in &list.declarations.nodes {
            let Some(NodeData::VariableDeclarator(data)) = self.arena.data(declarator) else {
                continue;
            };
            if data.initializer.is_some() {
                continue;
            }
            let pos = self.arena.get(declarator).map_or(0, |node| node.pos);
            if self.arena.identifier_text(data.name).is_none() {
                return Err(self.error_at(pos, "Missing initializer in destructuring declaration"));
            }
            if list.kind == VariableKind::Const {
                return Err(self.error_at(pos, "Missing initializer in const declaration"));
            }
        }
        Ok(())
    }

    fn parse_function_declaration(&mut self, is_async: bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if is_async {
            self.next_token()?;
        }
        self.expect(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;
        let name = self.parse_identifier()?;
        let (parameters, body, end) =
            self.parse_function_signature_and_body(is_async, is_generator)?;
        Ok(self.arena.add(
            NodeData::FunctionDeclaration(FunctionData {
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

    /// `(a, b) { ... }` shared by declarations, expressions and methods.
    pub(crate) fn parse_function_signature_and_body(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<(NodeList, NodeIndex, u32)> {
        self.with_function_context(is_async, is_generator, |parser| {
            let parameters = parser.parse_formal_parameters()?;
            let body = parser.parse_function_body()?;
            let end = parser.node_end(body);
            Ok((parameters, body, end))
        })
    }

    /// `(a, [b], {c} = {}, ...rest)`
    pub(crate) fn parse_formal_parameters(&mut self) -> ParseResult<NodeList> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut parameters = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                parameters.push(self.parse_rest_element()?);
                if self.is_token(SyntaxKind::CommaToken) {
                    return Err(self.error_here("A rest parameter must be last in a parameter list"));
                }
                break;
            }
            parameters.push(self.parse_binding_element()?);
            if !self.eat(SyntaxKind::CommaToken)? {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken)?;
        Ok(NodeList::from_vec(parameters))
    }

    /// Function bodies reset `disallow_in`: `for (var f = function () { a in b }; ;)`.
    pub(crate) fn parse_function_body(&mut self) -> ParseResult<NodeIndex> {
        self.with_in_allowed(ParserState::parse_block)
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_if_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::IfKeyword)?;
        self.expect(SyntaxKind::OpenParenToken)?;
        let condition = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken)?;
        let then_statement = self.parse_statement()?;
        let else_statement = if self.eat(SyntaxKind::ElseKeyword)? {
            self.parse_statement()?
        } else {
            NodeIndex::NONE
        };
        let end = self.node_end(else_statement.into_option().unwrap_or(then_statement));
        Ok(self.arena.add(
            NodeData::IfStatement(IfStatementData {
                condition,
                then_statement,
                else_statement,
            }),
            pos,
            end,
        ))
    }

    fn parse_for_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::ForKeyword)?;
        let is_await = self.in_async && self.is_contextual("await");
        if is_await {
            self.next_token()?;
        }
        self.expect(SyntaxKind::OpenParenToken)?;

        let saved = std::mem::replace(&mut self.disallow_in, true);
        let initializer = match self.token() {
            SyntaxKind::SemicolonToken => Ok(NodeIndex::NONE),
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_declaration_list()
            }
            SyntaxKind::LetKeyword if self.look_ahead_is_let_declaration() => {
                self.parse_variable_declaration_list()
            }
            _ => self.parse_expression(),
        };
        self.disallow_in = saved;
        let initializer = initializer?;

        let is_of = self.is_contextual("of");
        if is_await && !is_of {
            return Err(self.error_here("'of' expected"));
        }
        if self.is_token(SyntaxKind::InKeyword) || is_of {
            self.check_for_in_of_initializer(initializer)?;
            self.next_token()?;
            let expression = if is_of {
                self.with_in_allowed(ParserState::parse_assignment_expression)?
            } else {
                self.with_in_allowed(ParserState::parse_expression)?
            };
            self.expect(SyntaxKind::CloseParenToken)?;
            let statement = self.parse_statement()?;
            let data = ForInOfData {
                initializer,
                expression,
                statement,
                is_await,
            };
            let end = self.node_end(statement);
            let data = if is_of {
                NodeData::ForOfStatement(data)
            } else {
                NodeData::ForInStatement(data)
            };
            return Ok(self.arena.add(data, pos, end));
        }

        self.check_declarator_initializers(initializer)?;
        self.expect(SyntaxKind::SemicolonToken)?;
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.with_in_allowed(ParserState::parse_expression)?
        };
        self.expect(SyntaxKind::SemicolonToken)?;
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.with_in_allowed(ParserState::parse_expression)?
        };
        self.expect(SyntaxKind::CloseParenToken)?;
        let statement = self.parse_statement()?;
        let end = self.node_end(statement);
        Ok(self.arena.add(
            NodeData::ForStatement(ForData {
                initializer,
                condition,
                incrementor,
                statement,
            }),
            pos,
            end,
        ))
    }

    /// One declarator without initializer, or an assignment target. An
    /// object or array literal head becomes a pattern.
    fn check_for_in_of_initializer(&mut self, initializer: NodeIndex) -> ParseResult<()> {
        let valid = match self.arena.data(initializer) {
            Some(NodeData::VariableStatement(data)) => {
                data.declarations.len() == 1
                    && data.declarations.nodes.first().is_some_and(|&decl| {
                        matches!(
                            self.arena.data(decl),
                            Some(NodeData::VariableDeclarator(d)) if d.initializer.is_none()
                        )
                    })
            }
            Some(NodeData::ObjectLiteral(_) | NodeData::ArrayLiteral(_)) => {
                return self.to_assignment_target(initializer);
            }
            Some(data) => is_assignment_target(data),
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(self.error_here("Invalid left-hand side in for-in/for-of loop"))
        }
    }

    fn parse_while_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::WhileKeyword)?;
        self.expect(SyntaxKind::OpenParenToken)?;
        let condition = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken)?;
        let statement = self.parse_statement()?;
        let end = self.node_end(statement);
        Ok(self.arena.add(
            NodeData::WhileStatement(WhileData {
                condition,
                statement,
            }),
            pos,
            end,
        ))
    }

    fn parse_do_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::DoKeyword)?;
        let statement = self.parse_statement()?;
        self.expect(SyntaxKind::WhileKeyword)?;
        self.expect(SyntaxKind::OpenParenToken)?;
        let condition = self.parse_expression()?;
        let end = self.expect(SyntaxKind::CloseParenToken)?;
        // `do ; while (x) y` is legal: the semicolon after `)` is optional.
        self.eat(SyntaxKind::SemicolonToken)?;
        Ok(self.arena.add(
            NodeData::DoStatement(WhileData {
                condition,
                statement,
            }),
            pos,
            end,
        ))
    }

    fn parse_return_or_throw(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_throw = self.is_token(SyntaxKind::ThrowKeyword);
        let mut end = self.token_end();
        self.next_token()?;

        let expression = if is_throw {
            if self.scanner.has_preceding_line_break() {
                return Err(self.error_here("Line break not permitted here"));
            }
            self.parse_expression()?
        } else if self.can_insert_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()?
        };
        if expression.is_some() {
            end = self.node_end(expression);
        }
        self.parse_semicolon()?;

        let data = ReturnData { expression };
        let data = if is_throw {
            NodeData::ThrowStatement(data)
        } else {
            NodeData::ReturnStatement(data)
        };
        Ok(self.arena.add(data, pos, end))
    }

    fn parse_break_or_continue(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_break = self.is_token(SyntaxKind::BreakKeyword);
        let mut end = self.token_end();
        self.next_token()?;

        let label = if !self.can_insert_semicolon() && self.is_identifier_token() {
            let label = self.parse_identifier()?;
            end = self.node_end(label);
            label
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon()?;

        let data = JumpData { label };
        let data = if is_break {
            NodeData::BreakStatement(data)
        } else {
            NodeData::ContinueStatement(data)
        };
        Ok(self.arena.add(data, pos, end))
    }

    fn parse_try_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::TryKeyword)?;
        let try_block = self.parse_block()?;
        let mut end = self.node_end(try_block);

        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token()?;
            let variable = if self.eat(SyntaxKind::OpenParenToken)? {
                let variable = self.parse_binding_target()?;
                self.expect(SyntaxKind::CloseParenToken)?;
                variable
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block()?;
            end = self.node_end(block);
            self.arena.add(
                NodeData::CatchClause(CatchClauseData { variable, block }),
                catch_pos,
                end,
            )
        } else {
            NodeIndex::NONE
        };

        let finally_block = if self.eat(SyntaxKind::FinallyKeyword)? {
            let block = self.parse_block()?;
            end = self.node_end(block);
            block
        } else {
            NodeIndex::NONE
        };

        if catch_clause.is_none() && finally_block.is_none() {
            return Err(self.error_here("'catch' or 'finally' expected"));
        }

        Ok(self.arena.add(
            NodeData::TryStatement(TryData {
                try_block,
                catch_clause,
                finally_block,
            }),
            pos,
            end,
        ))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::SwitchKeyword)?;
        self.expect(SyntaxKind::OpenParenToken)?;
        let expression = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken)?;
        self.expect(SyntaxKind::OpenBraceToken)?;

        let mut clauses = Vec::new();
        let mut seen_default = false;
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let clause_pos = self.token_pos();
            let expression = match self.token() {
                SyntaxKind::CaseKeyword => {
                    self.next_token()?;
                    self.parse_expression()?
                }
                SyntaxKind::DefaultKeyword => {
                    if seen_default {
                        return Err(self.error_here(
                            "A 'default' clause cannot appear more than once in a 'switch' statement",
                        ));
                    }
                    seen_default = true;
                    self.next_token()?;
                    NodeIndex::NONE
                }
                _ => return Err(self.error_here("'case' or 'default' expected")),
            };
            let mut clause_end = self.expect(SyntaxKind::ColonToken)?;
            let mut statements = Vec::new();
            while !matches!(
                self.token(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
            ) {
                let statement = self.parse_statement()?;
                clause_end = self.node_end(statement);
                statements.push(statement);
            }
            clauses.push(self.arena.add(
                NodeData::CaseClause(CaseClauseData {
                    expression,
                    statements: NodeList::from_vec(statements),
                }),
                clause_pos,
                clause_end,
            ));
        }
        let end = self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(self.arena.add(
            NodeData::SwitchStatement(SwitchData {
                expression,
                clauses: NodeList::from_vec(clauses),
            }),
            pos,
            end,
        ))
    }

    fn parse_with_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::WithKeyword)?;
        self.expect(SyntaxKind::OpenParenToken)?;
        let object = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken)?;
        let statement = self.parse_statement()?;
        let end = self.node_end(statement);
        Ok(self.arena.add(
            NodeData::WithStatement(WhileData {
                condition: object,
                statement,
            }),
            pos,
            end,
        ))
    }

    fn parse_labeled_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let label = self.parse_identifier()?;
        self.expect(SyntaxKind::ColonToken)?;
        let statement = self.parse_statement()?;
        let end = self.node_end(statement);
        Ok(self.arena.add(
            NodeData::LabeledStatement(LabeledData { label, statement }),
            pos,
            end,
        ))
    }

    #[inline]
    pub(crate) fn node_end(&self, index: NodeIndex) -> u32 {
        self.arena.get(index).map_or(0, |node| node.end)
    }
}

/// Expressions that may appear on the left of `=`, after `++`/`--` or in
/// a for-in head. Optional chains never can.
pub(crate) fn is_assignment_target(data: &NodeData) -> bool {
    match data {
        NodeData::Identifier(_) => true,
        NodeData::PropertyAccess(access) | NodeData::ElementAccess(access) => !access.in_chain,
        _ => false,
    }
}
