use super::Printer;
use rejs_parser::node::{FunctionData, VariableData};
use rejs_parser::precedence::Precedence;
use rejs_parser::{NodeData, NodeIndex};

impl<'a> Printer<'a> {
    // =========================================================================
    // Statements
    // =========================================================================

    pub(super) fn emit_statement(&mut self, idx: NodeIndex, data: &NodeData) {
        match data {
            NodeData::Block(_) => self.emit_block(idx),
            NodeData::VariableStatement(statement) => {
                self.emit_variable_declaration_list(statement);
                self.write(";");
            }
            NodeData::FunctionDeclaration(function) => self.emit_function(function, true),
            NodeData::ExpressionStatement(statement) => {
                match self.ambiguous_statement_start(statement.expression) {
                    // `({ a } = o)`: a pattern cannot sit in parentheses alone.
                    Some(start)
                        if matches!(self.arena.data(start), Some(NodeData::ObjectPattern(_))) =>
                    {
                        self.write("(");
                        self.emit_expression(statement.expression, Precedence::Comma);
                        self.write(")");
                    }
                    Some(start) => {
                        self.parenthesized_start = start;
                        self.emit_expression(statement.expression, Precedence::Comma);
                        self.parenthesized_start = NodeIndex::NONE;
                    }
                    None => self.emit_expression(statement.expression, Precedence::Comma),
                }
                self.write(";");
            }
            NodeData::EmptyStatement => self.write(";"),
            NodeData::IfStatement(_) => self.emit_if_statement(idx),
            NodeData::ReturnStatement(statement) => {
                self.write("return");
                self.emit_optional_operand(statement.expression);
                self.write(";");
            }
            NodeData::ThrowStatement(statement) => {
                self.write("throw");
                self.emit_optional_operand(statement.expression);
                self.write(";");
            }
            NodeData::ForStatement(_) => self.emit_for_statement(idx),
            NodeData::ForInStatement(statement) | NodeData::ForOfStatement(statement) => {
                let is_of = matches!(data, NodeData::ForOfStatement(_));
                self.write(if statement.is_await { "for await (" } else { "for (" });
                self.emit_for_initializer(statement.initializer, Precedence::LeftHandSide);
                if is_of {
                    self.write(" of ");
                    self.emit_expression(statement.expression, Precedence::Assignment);
                } else {
                    self.write(" in ");
                    self.emit_expression(statement.expression, Precedence::Comma);
                }
                self.write(")");
                self.emit_embedded_statement(statement.statement);
            }
            NodeData::WhileStatement(statement) => {
                self.write("while (");
                self.emit_expression(statement.condition, Precedence::Comma);
                self.write(")");
                self.emit_embedded_statement(statement.statement);
            }
            NodeData::DoStatement(statement) => {
                self.write("do");
                self.emit_embedded_statement(statement.statement);
                self.write(" while (");
                self.emit_expression(statement.condition, Precedence::Comma);
                self.write(");");
            }
            NodeData::BreakStatement(jump) | NodeData::ContinueStatement(jump) => {
                if matches!(data, NodeData::BreakStatement(_)) {
                    self.write("break");
                } else {
                    self.write("continue");
                }
                if jump.label.is_some() {
                    self.write_space();
                    self.write_identifier_text(jump.label);
                }
                self.write(";");
            }
            NodeData::TryStatement(statement) => {
                self.write("try ");
                self.emit_block(statement.try_block);
                if statement.catch_clause.is_some() {
                    self.write_space();
                    self.emit_catch_clause(statement.catch_clause);
                }
                if statement.finally_block.is_some() {
                    self.write(" finally ");
                    self.emit_block(statement.finally_block);
                }
            }
            NodeData::SwitchStatement(statement) => {
                self.write("switch (");
                self.emit_expression(statement.expression, Precedence::Comma);
                self.write(") {");
                if statement.clauses.is_empty() {
                    self.write("}");
                    return;
                }
                self.write_line();
                self.increase_indent();
                for &clause in &statement.clauses.nodes {
                    self.emit_case_clause(clause);
                    self.write_line();
                }
                self.decrease_indent();
                self.write("}");
            }
            NodeData::LabeledStatement(statement) => {
                self.write_identifier_text(statement.label);
                self.write(":");
                self.emit_embedded_statement(statement.statement);
            }
            NodeData::DebuggerStatement => self.write("debugger;"),
            NodeData::WithStatement(statement) => {
                self.write("with (");
                self.emit_expression(statement.condition, Precedence::Comma);
                self.write(")");
                self.emit_embedded_statement(statement.statement);
            }
            NodeData::ClassDeclaration(class) => self.emit_class(class),
            _ => self.emit(idx),
        }
    }

    /// Statements one per line, with no newline after the last.
    pub(super) fn emit_statement_lines(&mut self, statements: &[NodeIndex]) {
        for (i, &statement) in statements.iter().enumerate() {
            if i > 0 {
                self.write_line();
            }
            self.emit(statement);
        }
    }

    /// A `Block`, or the braces of a `static { }` class block.
    pub(super) fn emit_block(&mut self, idx: NodeIndex) {
        let Some(NodeData::Block(block) | NodeData::StaticBlock(block)) = self.arena.data(idx)
        else {
            return;
        };
        if block.statements.is_empty() {
            self.write("{}");
            return;
        }
        let saved = std::mem::replace(&mut self.disallow_in, false);
        self.write("{");
        self.write_line();
        self.increase_indent();
        self.emit_statement_lines(&block.statements.nodes);
        self.write_line();
        self.decrease_indent();
        self.write("}");
        self.disallow_in = saved;
    }

    /// The body of an `if`, loop or label: `;` directly after the header,
    /// everything else after a space.
    pub(super) fn emit_embedded_statement(&mut self, idx: NodeIndex) {
        if matches!(self.arena.data(idx), Some(NodeData::EmptyStatement) | None) {
            self.write(";");
            return;
        }
        self.write_space();
        self.emit(idx);
    }

    /// Same as `emit_embedded_statement`, but always braced.
    fn emit_braced_statement(&mut self, idx: NodeIndex) {
        if matches!(self.arena.data(idx), Some(NodeData::Block(_))) {
            self.write_space();
            self.emit_block(idx);
            return;
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();
        self.emit(idx);
        self.write_line();
        self.decrease_indent();
        self.write("}");
    }

    fn emit_if_statement(&mut self, idx: NodeIndex) {
        let Some(NodeData::IfStatement(statement)) = self.arena.data(idx) else {
            return;
        };
        self.write("if (");
        self.emit_expression(statement.condition, Precedence::Comma);
        self.write(")");
        if statement.else_statement.is_none() {
            self.emit_embedded_statement(statement.then_statement);
            return;
        }

        // `if (a) if (b) x(); else y();` would hand the else to the inner if.
        if self.ends_with_open_if(statement.then_statement) {
            self.emit_braced_statement(statement.then_statement);
        } else {
            self.emit_embedded_statement(statement.then_statement);
        }
        self.write(" else");
        self.emit_embedded_statement(statement.else_statement);
    }

    /// True when an `else` printed after `idx` would attach to an `if`
    /// nested inside it.
    fn ends_with_open_if(&self, idx: NodeIndex) -> bool {
        let mut current = idx;
        loop {
            current = match self.arena.data(current) {
                Some(NodeData::IfStatement(statement)) => {
                    if statement.else_statement.is_none() {
                        return true;
                    }
                    statement.else_statement
                }
                Some(NodeData::ForStatement(statement)) => statement.statement,
                Some(NodeData::ForInStatement(statement))
                | Some(NodeData::ForOfStatement(statement)) => statement.statement,
                Some(NodeData::WhileStatement(statement))
                | Some(NodeData::WithStatement(statement)) => statement.statement,
                Some(NodeData::LabeledStatement(statement)) => statement.statement,
                _ => return false,
            };
        }
    }

    fn emit_for_statement(&mut self, idx: NodeIndex) {
        let Some(NodeData::ForStatement(statement)) = self.arena.data(idx) else {
            return;
        };
        self.write("for (");
        self.emit_for_initializer(statement.initializer, Precedence::Comma);
        self.write(";");
        if statement.condition.is_some() {
            self.write_space();
            self.emit_expression(statement.condition, Precedence::Comma);
        }
        self.write(";");
        if statement.incrementor.is_some() {
            self.write_space();
            self.emit_expression(statement.incrementor, Precedence::Comma);
        }
        self.write(")");
        self.emit_embedded_statement(statement.statement);
    }

    /// A declaration list without its semicolon, or an expression, with
    /// top-level `in` parenthesized.
    fn emit_for_initializer(&mut self, idx: NodeIndex, min: Precedence) {
        let saved = std::mem::replace(&mut self.disallow_in, true);
        match self.arena.data(idx) {
            Some(NodeData::VariableStatement(statement)) => {
                self.emit_variable_declaration_list(statement);
            }
            Some(_) => self.emit_expression(idx, min),
            None => {}
        }
        self.disallow_in = saved;
    }

    fn emit_variable_declaration_list(&mut self, statement: &VariableData) {
        self.write(statement.kind.keyword());
        self.write_space();
        for (i, &declarator) in statement.declarations.nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_variable_declarator(declarator);
        }
    }

    pub(super) fn emit_variable_declarator(&mut self, idx: NodeIndex) {
        let Some(NodeData::VariableDeclarator(declarator)) = self.arena.data(idx) else {
            return;
        };
        self.emit_expression(declarator.name, Precedence::Assignment);
        if declarator.initializer.is_some() {
            self.write(" = ");
            self.emit_expression(declarator.initializer, Precedence::Assignment);
        }
    }

    pub(super) fn emit_catch_clause(&mut self, idx: NodeIndex) {
        let Some(NodeData::CatchClause(clause)) = self.arena.data(idx) else {
            return;
        };
        self.write("catch ");
        if clause.variable.is_some() {
            self.write("(");
            self.emit_expression(clause.variable, Precedence::Assignment);
            self.write(") ");
        }
        self.emit_block(clause.block);
    }

    pub(super) fn emit_case_clause(&mut self, idx: NodeIndex) {
        let Some(NodeData::CaseClause(clause)) = self.arena.data(idx) else {
            return;
        };
        if clause.expression.is_some() {
            self.write("case ");
            self.emit_expression(clause.expression, Precedence::Comma);
            self.write(":");
        } else {
            self.write("default:");
        }
        if clause.statements.is_empty() {
            return;
        }
        self.write_line();
        self.increase_indent();
        self.emit_statement_lines(&clause.statements.nodes);
        self.decrease_indent();
    }

    fn emit_optional_operand(&mut self, idx: NodeIndex) {
        if idx.is_some() {
            self.write_space();
            self.emit_expression(idx, Precedence::Comma);
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// `function name(params) { body }` for declarations and expressions.
    /// With `keyword` false only `(params) { body }` is written: object and
    /// class methods print their own modifiers and name.
    pub(super) fn emit_function(&mut self, function: &FunctionData, keyword: bool) {
        if keyword {
            if function.is_async {
                self.write("async ");
            }
            self.write("function");
            if function.is_generator {
                self.write("*");
            }
            self.write_space();
            if function.name.is_some() {
                self.write_identifier_text(function.name);
            }
        }
        self.emit_parameters(&function.parameters.nodes);
        self.write_space();
        self.emit_block(function.body);
    }

    /// `async`, `*`, `get` and `set` ahead of a method name.
    pub(super) fn emit_method_modifiers(&mut self, function: NodeIndex, accessor: Option<&str>) {
        if let Some(accessor) = accessor {
            self.write(accessor);
            self.write_space();
        }
        let Some(function) = self.arena.data(function).and_then(NodeData::function_data) else {
            return;
        };
        if function.is_async {
            self.write("async ");
        }
        if function.is_generator {
            self.write("*");
        }
    }

    pub(super) fn emit_parameters(&mut self, parameters: &[NodeIndex]) {
        let saved = std::mem::replace(&mut self.disallow_in, false);
        self.write("(");
        for (i, &parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression(parameter, Precedence::Assignment);
        }
        self.write(")");
        self.disallow_in = saved;
    }
}
