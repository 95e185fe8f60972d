//! Printer: arena AST back to JavaScript source.
//!
//! The tree stores no parentheses. Every expression is printed against the
//! minimum precedence its slot accepts and gets wrapped when it binds more
//! loosely, so edited trees print with exactly the parentheses they need.

mod classes;
mod expressions;
mod helpers;
pub(crate) mod literals;
mod statements;

use crate::source_writer::SourceWriter;
use rejs_parser::precedence::Precedence;
use rejs_parser::{NodeArena, NodeData, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Options
// =============================================================================

/// Quote used for string literals that have no raw source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

impl QuoteStyle {
    pub fn quote_char(self) -> char {
        match self {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrinterOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    pub quote_style: QuoteStyle,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        PrinterOptions {
            indent_width: 2,
            quote_style: QuoteStyle::Double,
        }
    }
}

// =============================================================================
// Printer
// =============================================================================

pub struct Printer<'a> {
    pub(super) arena: &'a NodeArena,
    pub(super) options: PrinterOptions,
    pub(super) writer: SourceWriter,
    /// Printing a `for (...;...)` initializer, where a top-level `in`
    /// would be read as a for-in loop.
    pub(super) disallow_in: bool,
    /// Leftmost node of the expression statement being printed, when it
    /// starts with `function`, `class`, `{` or `let [`.
    pub(super) parenthesized_start: NodeIndex,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena, options: PrinterOptions) -> Self {
        let writer = SourceWriter::new(options.indent_width);
        Printer {
            arena,
            options,
            writer,
            disallow_in: false,
            parenthesized_start: NodeIndex::NONE,
        }
    }

    /// Print the subtree at `root`: a program, a statement or an
    /// expression. Programs print one top-level statement per line with
    /// no trailing newline.
    pub fn print(mut self, root: NodeIndex) -> String {
        self.emit(root);
        let output = self.writer.into_string();
        debug!(bytes = output.len(), "printed program");
        output
    }

    /// Dispatch on any node.
    pub(super) fn emit(&mut self, idx: NodeIndex) {
        let Some(data) = self.arena.data(idx) else {
            return;
        };
        match data {
            NodeData::Program(program) => self.emit_statement_lines(&program.statements.nodes),
            NodeData::Block(_)
            | NodeData::VariableStatement(_)
            | NodeData::FunctionDeclaration(_)
            | NodeData::ExpressionStatement(_)
            | NodeData::EmptyStatement
            | NodeData::IfStatement(_)
            | NodeData::ReturnStatement(_)
            | NodeData::ThrowStatement(_)
            | NodeData::ForStatement(_)
            | NodeData::ForInStatement(_)
            | NodeData::ForOfStatement(_)
            | NodeData::WhileStatement(_)
            | NodeData::DoStatement(_)
            | NodeData::BreakStatement(_)
            | NodeData::ContinueStatement(_)
            | NodeData::TryStatement(_)
            | NodeData::SwitchStatement(_)
            | NodeData::LabeledStatement(_)
            | NodeData::DebuggerStatement
            | NodeData::WithStatement(_)
            | NodeData::ClassDeclaration(_) => self.emit_statement(idx, data),
            NodeData::VariableDeclarator(_) => self.emit_variable_declarator(idx),
            NodeData::CatchClause(_) => self.emit_catch_clause(idx),
            NodeData::CaseClause(_) => self.emit_case_clause(idx),
            NodeData::PropertyAssignment(_) => self.emit_property_assignment(idx),
            NodeData::MethodDefinition(_)
            | NodeData::PropertyDefinition(_)
            | NodeData::StaticBlock(_) => self.emit_class_member(idx),
            _ => self.emit_expression(idx, Precedence::Comma),
        }
    }
}
