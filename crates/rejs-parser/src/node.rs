//! Node data for the arena AST.
//!
//! Every node stores one `NodeData` variant. The enum is closed: child
//! enumeration (`for_each_child`), child replacement
//! (`for_each_child_mut`), printing and binding all match on it
//! exhaustively, so adding a variant is a compile error everywhere it
//! matters.
//!
//! Each variant owns at most one `NodeList`. Parenthesized expressions are
//! not stored; the printer re-inserts parentheses from operator precedence.

use crate::base::{NodeIndex, NodeList};
use rejs_scanner::SyntaxKind;
use serde::Serialize;

// =============================================================================
// Node
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct Node {
    pub data: NodeData,
    /// Start byte offset in the source (0 for synthesized nodes).
    pub pos: u32,
    /// End byte offset in the source (0 for synthesized nodes).
    pub end: u32,
    /// Owning node, `NodeIndex::NONE` for the root and detached nodes.
    pub parent: NodeIndex,
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableData {
    pub kind: VariableKind,
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationData {
    /// An `Identifier`, `ObjectPattern` or `ArrayPattern`.
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Shared by function declarations, function expressions and arrows.
#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    /// `Identifier` or `NONE` for anonymous functions and arrows.
    pub name: NodeIndex,
    /// Binding targets: identifiers, patterns, `AssignmentPattern` for
    /// defaults, and a trailing `RestElement`.
    pub parameters: NodeList,
    /// A `Block`, or any expression for concise arrow bodies.
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
}

impl FunctionData {
    /// A plain `function (params) body` with no modifiers.
    pub fn plain(name: NodeIndex, parameters: NodeList, body: NodeIndex) -> FunctionData {
        FunctionData {
            name,
            parameters,
            body,
            is_async: false,
            is_generator: false,
        }
    }
}

/// Class declarations and expressions.
#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    /// `Identifier` or `NONE`.
    pub name: NodeIndex,
    /// The `extends` expression or `NONE`.
    pub heritage: NodeIndex,
    /// `MethodDefinition`, `PropertyDefinition` and `StaticBlock` nodes.
    pub members: NodeList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

#[derive(Clone, Debug, Serialize)]
pub struct MethodDefinitionData {
    /// `Identifier`, `PrivateName`, literal, or any expression when
    /// `computed`.
    pub name: NodeIndex,
    /// Always a `FunctionExpression`.
    pub value: NodeIndex,
    pub kind: MethodKind,
    pub computed: bool,
    pub is_static: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyDefinitionData {
    pub name: NodeIndex,
    /// Initializer or `NONE`.
    pub value: NodeIndex,
    pub computed: bool,
    pub is_static: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExpressionStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct IfStatementData {
    pub condition: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// `return` and `throw`.
#[derive(Clone, Debug, Serialize)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForData {
    /// `VariableStatement`, expression, or `NONE`.
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

/// `for-in` and `for-of`.
#[derive(Clone, Debug, Serialize)]
pub struct ForInOfData {
    /// `VariableStatement` with one declarator, or an assignment target.
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
    /// `for await (... of ...)`
    pub is_await: bool,
}

/// `while` and `do-while`.
#[derive(Clone, Debug, Serialize)]
pub struct WhileData {
    pub condition: NodeIndex,
    pub statement: NodeIndex,
}

/// `break` and `continue`.
#[derive(Clone, Debug, Serialize)]
pub struct JumpData {
    pub label: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct CatchClauseData {
    /// `Identifier`, pattern, or `NONE` for `catch {}`.
    pub variable: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub clauses: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct CaseClauseData {
    /// `NONE` for `default:`.
    pub expression: NodeIndex,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct LabeledData {
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct StringLiteralData {
    /// Decoded value.
    pub value: String,
    /// Source text including quotes. `None` makes the printer emit the
    /// canonical double-quoted form.
    pub raw: Option<String>,
    /// An escape produced an unpaired surrogate that `value` cannot hold;
    /// such literals must keep their raw text.
    pub has_lone_surrogate: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct NumericLiteralData {
    pub value: f64,
    /// Source text. `None` makes the printer emit the decimal form.
    pub raw: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegExpData {
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BigIntData {
    /// Source text including the `n` suffix.
    pub raw: String,
}

/// One literal piece of a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateElement {
    /// `None` when an escape is invalid (tagged templates only).
    pub cooked: Option<String>,
    /// Text between the delimiters, line endings normalized.
    pub raw: String,
}

/// `quasis` always holds one more piece than `expressions`.
#[derive(Clone, Debug, Serialize)]
pub struct TemplateData {
    pub quasis: Vec<TemplateElement>,
    pub expressions: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    /// A `TemplateLiteral`.
    pub template: NodeIndex,
}

/// Spread and rest elements, and `await`.
#[derive(Clone, Debug, Serialize)]
pub struct OperandData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct YieldData {
    /// `NONE` for a bare `yield`.
    pub argument: NodeIndex,
    /// `yield*`
    pub delegate: bool,
}

/// Array elements, object properties and sequence operands.
#[derive(Clone, Debug, Serialize)]
pub struct ListData {
    pub elements: NodeList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PropertyKind {
    /// `key: value`
    Init,
    /// `{ key }`, with the value stored as a separate identifier node.
    Shorthand,
    /// `key() { ... }`, with a `FunctionExpression` as the value.
    Method,
    /// `get key() { ... }`
    Get,
    /// `set key(v) { ... }`
    Set,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyData {
    /// `Identifier`, `StringLiteral`, `NumericLiteral`, or any expression
    /// when `computed`.
    pub name: NodeIndex,
    pub initializer: NodeIndex,
    pub kind: PropertyKind,
    pub computed: bool,
}

/// Calls and `new` expressions.
#[derive(Clone, Debug, Serialize)]
pub struct CallData {
    pub expression: NodeIndex,
    pub arguments: NodeList,
    /// Written `f?.()`.
    pub optional: bool,
    /// Part of an optional chain, whether or not this link has `?.`.
    pub in_chain: bool,
}

impl CallData {
    pub fn new(expression: NodeIndex, arguments: NodeList) -> CallData {
        CallData {
            expression,
            arguments,
            optional: false,
            in_chain: false,
        }
    }
}

/// `a.b` (name is an `Identifier` or `PrivateName`) and `a[b]` (name is
/// any expression).
#[derive(Clone, Debug, Serialize)]
pub struct AccessData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    /// Written `a?.b` or `a?.[b]`.
    pub optional: bool,
    /// Part of an optional chain, whether or not this link has `?.`.
    pub in_chain: bool,
}

impl AccessData {
    pub fn new(expression: NodeIndex, name_or_argument: NodeIndex) -> AccessData {
        AccessData {
            expression,
            name_or_argument,
            optional: false,
            in_chain: false,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct UnaryData {
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
}

/// Binary, logical and assignment expressions.
#[derive(Clone, Debug, Serialize)]
pub struct BinaryData {
    pub left: NodeIndex,
    pub operator: SyntaxKind,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

// =============================================================================
// NodeData
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub enum NodeData {
    // Statements
    Program(BlockData),
    Block(BlockData),
    VariableStatement(VariableData),
    VariableDeclarator(VariableDeclarationData),
    FunctionDeclaration(FunctionData),
    ExpressionStatement(ExpressionStatementData),
    EmptyStatement,
    IfStatement(IfStatementData),
    ReturnStatement(ReturnData),
    ThrowStatement(ReturnData),
    ForStatement(ForData),
    ForInStatement(ForInOfData),
    ForOfStatement(ForInOfData),
    WhileStatement(WhileData),
    DoStatement(WhileData),
    BreakStatement(JumpData),
    ContinueStatement(JumpData),
    TryStatement(TryData),
    CatchClause(CatchClauseData),
    SwitchStatement(SwitchData),
    CaseClause(CaseClauseData),
    LabeledStatement(LabeledData),
    DebuggerStatement,
    /// `with (object) statement`; `condition` holds the object.
    WithStatement(WhileData),
    ClassDeclaration(ClassData),

    // Class members
    MethodDefinition(MethodDefinitionData),
    PropertyDefinition(PropertyDefinitionData),
    StaticBlock(BlockData),

    // Expressions
    Identifier(IdentifierData),
    /// `#name`, stored without the `#`.
    PrivateName(IdentifierData),
    StringLiteral(StringLiteralData),
    NumericLiteral(NumericLiteralData),
    BigIntLiteral(BigIntData),
    RegularExpressionLiteral(RegExpData),
    TemplateLiteral(TemplateData),
    TaggedTemplate(TaggedTemplateData),
    BooleanLiteral(bool),
    NullLiteral,
    ThisKeyword,
    OmittedExpression,
    ArrayLiteral(ListData),
    ObjectLiteral(ListData),
    PropertyAssignment(PropertyData),
    FunctionExpression(FunctionData),
    ArrowFunction(FunctionData),
    CallExpression(CallData),
    NewExpression(CallData),
    PropertyAccess(AccessData),
    ElementAccess(AccessData),
    PrefixUnary(UnaryData),
    PostfixUnary(UnaryData),
    Binary(BinaryData),
    Logical(BinaryData),
    Assignment(BinaryData),
    Conditional(ConditionalData),
    Sequence(ListData),
    ClassExpression(ClassData),
    SpreadElement(OperandData),
    YieldExpression(YieldData),
    AwaitExpression(OperandData),
    Super,
    /// `new.target`
    NewTarget,
    /// The callee of `import(specifier)`.
    Import,

    // Patterns
    ObjectPattern(ListData),
    ArrayPattern(ListData),
    /// `target = default`; the operator is always `=`.
    AssignmentPattern(BinaryData),
    RestElement(OperandData),
}

impl NodeData {
    /// Visit every present child slot in source order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeIndex)) {
        let mut visit = |idx: NodeIndex| {
            if idx.is_some() {
                f(idx);
            }
        };
        match self {
            NodeData::Program(data) | NodeData::Block(data) | NodeData::StaticBlock(data) => {
                data.statements.nodes.iter().copied().for_each(visit);
            }
            NodeData::VariableStatement(data) => {
                data.declarations.nodes.iter().copied().for_each(visit);
            }
            NodeData::VariableDeclarator(data) => {
                visit(data.name);
                visit(data.initializer);
            }
            NodeData::FunctionDeclaration(data)
            | NodeData::FunctionExpression(data)
            | NodeData::ArrowFunction(data) => {
                visit(data.name);
                data.parameters.nodes.iter().copied().for_each(&mut visit);
                visit(data.body);
            }
            NodeData::ExpressionStatement(data) => visit(data.expression),
            NodeData::IfStatement(data) => {
                visit(data.condition);
                visit(data.then_statement);
                visit(data.else_statement);
            }
            NodeData::ReturnStatement(data) | NodeData::ThrowStatement(data) => {
                visit(data.expression);
            }
            NodeData::ForStatement(data) => {
                visit(data.initializer);
                visit(data.condition);
                visit(data.incrementor);
                visit(data.statement);
            }
            NodeData::ForInStatement(data) | NodeData::ForOfStatement(data) => {
                visit(data.initializer);
                visit(data.expression);
                visit(data.statement);
            }
            NodeData::WhileStatement(data) | NodeData::WithStatement(data) => {
                visit(data.condition);
                visit(data.statement);
            }
            NodeData::DoStatement(data) => {
                visit(data.statement);
                visit(data.condition);
            }
            NodeData::BreakStatement(data) | NodeData::ContinueStatement(data) => {
                visit(data.label);
            }
            NodeData::TryStatement(data) => {
                visit(data.try_block);
                visit(data.catch_clause);
                visit(data.finally_block);
            }
            NodeData::CatchClause(data) => {
                visit(data.variable);
                visit(data.block);
            }
            NodeData::SwitchStatement(data) => {
                visit(data.expression);
                data.clauses.nodes.iter().copied().for_each(visit);
            }
            NodeData::CaseClause(data) => {
                visit(data.expression);
                data.statements.nodes.iter().copied().for_each(visit);
            }
            NodeData::LabeledStatement(data) => {
                visit(data.label);
                visit(data.statement);
            }
            NodeData::ArrayLiteral(data)
            | NodeData::ObjectLiteral(data)
            | NodeData::Sequence(data)
            | NodeData::ObjectPattern(data)
            | NodeData::ArrayPattern(data) => {
                data.elements.nodes.iter().copied().for_each(visit);
            }
            NodeData::ClassDeclaration(data) | NodeData::ClassExpression(data) => {
                visit(data.name);
                visit(data.heritage);
                data.members.nodes.iter().copied().for_each(visit);
            }
            NodeData::MethodDefinition(data) => {
                visit(data.name);
                visit(data.value);
            }
            NodeData::PropertyDefinition(data) => {
                visit(data.name);
                visit(data.value);
            }
            NodeData::TemplateLiteral(data) => {
                data.expressions.nodes.iter().copied().for_each(visit);
            }
            NodeData::TaggedTemplate(data) => {
                visit(data.tag);
                visit(data.template);
            }
            NodeData::SpreadElement(data)
            | NodeData::RestElement(data)
            | NodeData::AwaitExpression(data) => visit(data.expression),
            NodeData::YieldExpression(data) => visit(data.argument),
            NodeData::PropertyAssignment(data) => {
                visit(data.name);
                visit(data.initializer);
            }
            NodeData::CallExpression(data) | NodeData::NewExpression(data) => {
                visit(data.expression);
                data.arguments.nodes.iter().copied().for_each(visit);
            }
            NodeData::PropertyAccess(data) | NodeData::ElementAccess(data) => {
                visit(data.expression);
                visit(data.name_or_argument);
            }
            NodeData::PrefixUnary(data) | NodeData::PostfixUnary(data) => visit(data.operand),
            NodeData::Binary(data)
            | NodeData::Logical(data)
            | NodeData::Assignment(data)
            | NodeData::AssignmentPattern(data) => {
                visit(data.left);
                visit(data.right);
            }
            NodeData::Conditional(data) => {
                visit(data.condition);
                visit(data.when_true);
                visit(data.when_false);
            }
            NodeData::EmptyStatement
            | NodeData::DebuggerStatement
            | NodeData::Identifier(_)
            | NodeData::PrivateName(_)
            | NodeData::StringLiteral(_)
            | NodeData::NumericLiteral(_)
            | NodeData::BigIntLiteral(_)
            | NodeData::RegularExpressionLiteral(_)
            | NodeData::BooleanLiteral(_)
            | NodeData::NullLiteral
            | NodeData::ThisKeyword
            | NodeData::OmittedExpression
            | NodeData::Super
            | NodeData::NewTarget
            | NodeData::Import => {}
        }
    }

    /// Visit every child slot mutably, including `NONE` slots of single
    /// children (list entries are never `NONE`).
    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut NodeIndex)) {
        match self {
            NodeData::Program(data) | NodeData::Block(data) | NodeData::StaticBlock(data) => {
                data.statements.nodes.iter_mut().for_each(f);
            }
            NodeData::VariableStatement(data) => {
                data.declarations.nodes.iter_mut().for_each(f);
            }
            NodeData::VariableDeclarator(data) => {
                f(&mut data.name);
                f(&mut data.initializer);
            }
            NodeData::FunctionDeclaration(data)
            | NodeData::FunctionExpression(data)
            | NodeData::ArrowFunction(data) => {
                f(&mut data.name);
                data.parameters.nodes.iter_mut().for_each(&mut f);
                f(&mut data.body);
            }
            NodeData::ExpressionStatement(data) => f(&mut data.expression),
            NodeData::IfStatement(data) => {
                f(&mut data.condition);
                f(&mut data.then_statement);
                f(&mut data.else_statement);
            }
            NodeData::ReturnStatement(data) | NodeData::ThrowStatement(data) => {
                f(&mut data.expression);
            }
            NodeData::ForStatement(data) => {
                f(&mut data.initializer);
                f(&mut data.condition);
                f(&mut data.incrementor);
                f(&mut data.statement);
            }
            NodeData::ForInStatement(data) | NodeData::ForOfStatement(data) => {
                f(&mut data.initializer);
                f(&mut data.expression);
                f(&mut data.statement);
            }
            NodeData::WhileStatement(data) | NodeData::WithStatement(data) => {
                f(&mut data.condition);
                f(&mut data.statement);
            }
            NodeData::DoStatement(data) => {
                f(&mut data.statement);
                f(&mut data.condition);
            }
            NodeData::BreakStatement(data) | NodeData::ContinueStatement(data) => {
                f(&mut data.label);
            }
            NodeData::TryStatement(data) => {
                f(&mut data.try_block);
                f(&mut data.catch_clause);
                f(&mut data.finally_block);
            }
            NodeData::CatchClause(data) => {
                f(&mut data.variable);
                f(&mut data.block);
            }
            NodeData::SwitchStatement(data) => {
                f(&mut data.expression);
                data.clauses.nodes.iter_mut().for_each(f);
            }
            NodeData::CaseClause(data) => {
                f(&mut data.expression);
                data.statements.nodes.iter_mut().for_each(f);
            }
            NodeData::LabeledStatement(data) => {
                f(&mut data.label);
                f(&mut data.statement);
            }
            NodeData::ArrayLiteral(data)
            | NodeData::ObjectLiteral(data)
            | NodeData::Sequence(data)
            | NodeData::ObjectPattern(data)
            | NodeData::ArrayPattern(data) => {
                data.elements.nodes.iter_mut().for_each(f);
            }
            NodeData::ClassDeclaration(data) | NodeData::ClassExpression(data) => {
                f(&mut data.name);
                f(&mut data.heritage);
                data.members.nodes.iter_mut().for_each(f);
            }
            NodeData::MethodDefinition(data) => {
                f(&mut data.name);
                f(&mut data.value);
            }
            NodeData::PropertyDefinition(data) => {
                f(&mut data.name);
                f(&mut data.value);
            }
            NodeData::TemplateLiteral(data) => {
                data.expressions.nodes.iter_mut().for_each(f);
            }
            NodeData::TaggedTemplate(data) => {
                f(&mut data.tag);
                f(&mut data.template);
            }
            NodeData::SpreadElement(data)
            | NodeData::RestElement(data)
            | NodeData::AwaitExpression(data) => f(&mut data.expression),
            NodeData::YieldExpression(data) => f(&mut data.argument),
            NodeData::PropertyAssignment(data) => {
                f(&mut data.name);
                f(&mut data.initializer);
            }
            NodeData::CallExpression(data) | NodeData::NewExpression(data) => {
                f(&mut data.expression);
                data.arguments.nodes.iter_mut().for_each(f);
            }
            NodeData::PropertyAccess(data) | NodeData::ElementAccess(data) => {
                f(&mut data.expression);
                f(&mut data.name_or_argument);
            }
            NodeData::PrefixUnary(data) | NodeData::PostfixUnary(data) => f(&mut data.operand),
            NodeData::Binary(data)
            | NodeData::Logical(data)
            | NodeData::Assignment(data)
            | NodeData::AssignmentPattern(data) => {
                f(&mut data.left);
                f(&mut data.right);
            }
            NodeData::Conditional(data) => {
                f(&mut data.condition);
                f(&mut data.when_true);
                f(&mut data.when_false);
            }
            NodeData::EmptyStatement
            | NodeData::DebuggerStatement
            | NodeData::Identifier(_)
            | NodeData::PrivateName(_)
            | NodeData::StringLiteral(_)
            | NodeData::NumericLiteral(_)
            | NodeData::BigIntLiteral(_)
            | NodeData::RegularExpressionLiteral(_)
            | NodeData::BooleanLiteral(_)
            | NodeData::NullLiteral
            | NodeData::ThisKeyword
            | NodeData::OmittedExpression
            | NodeData::Super
            | NodeData::NewTarget
            | NodeData::Import => {}
        }
    }

    /// The variant's child list, if it has one.
    pub fn list(&self) -> Option<&NodeList> {
        match self {
            NodeData::Program(data) | NodeData::Block(data) | NodeData::StaticBlock(data) => {
                Some(&data.statements)
            }
            NodeData::VariableStatement(data) => Some(&data.declarations),
            NodeData::FunctionDeclaration(data)
            | NodeData::FunctionExpression(data)
            | NodeData::ArrowFunction(data) => Some(&data.parameters),
            NodeData::SwitchStatement(data) => Some(&data.clauses),
            NodeData::CaseClause(data) => Some(&data.statements),
            NodeData::ArrayLiteral(data)
            | NodeData::ObjectLiteral(data)
            | NodeData::Sequence(data)
            | NodeData::ObjectPattern(data)
            | NodeData::ArrayPattern(data) => Some(&data.elements),
            NodeData::ClassDeclaration(data) | NodeData::ClassExpression(data) => {
                Some(&data.members)
            }
            NodeData::TemplateLiteral(data) => Some(&data.expressions),
            NodeData::CallExpression(data) | NodeData::NewExpression(data) => {
                Some(&data.arguments)
            }
            _ => None,
        }
    }

    pub fn list_mut(&mut self) -> Option<&mut NodeList> {
        match self {
            NodeData::Program(data) | NodeData::Block(data) | NodeData::StaticBlock(data) => {
                Some(&mut data.statements)
            }
            NodeData::VariableStatement(data) => Some(&mut data.declarations),
            NodeData::FunctionDeclaration(data)
            | NodeData::FunctionExpression(data)
            | NodeData::ArrowFunction(data) => Some(&mut data.parameters),
            NodeData::SwitchStatement(data) => Some(&mut data.clauses),
            NodeData::CaseClause(data) => Some(&mut data.statements),
            NodeData::ArrayLiteral(data)
            | NodeData::ObjectLiteral(data)
            | NodeData::Sequence(data)
            | NodeData::ObjectPattern(data)
            | NodeData::ArrayPattern(data) => Some(&mut data.elements),
            NodeData::ClassDeclaration(data) | NodeData::ClassExpression(data) => {
                Some(&mut data.members)
            }
            NodeData::TemplateLiteral(data) => Some(&mut data.expressions),
            NodeData::CallExpression(data) | NodeData::NewExpression(data) => {
                Some(&mut data.arguments)
            }
            _ => None,
        }
    }

    /// Statement lists that may hold any statement (unlike parameter or
    /// argument lists).
    pub fn statement_list_mut(&mut self) -> Option<&mut NodeList> {
        match self {
            NodeData::Program(data) | NodeData::Block(data) | NodeData::StaticBlock(data) => {
                Some(&mut data.statements)
            }
            NodeData::CaseClause(data) => Some(&mut data.statements),
            _ => None,
        }
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeData::FunctionDeclaration(_)
                | NodeData::FunctionExpression(_)
                | NodeData::ArrowFunction(_)
        )
    }

    pub fn function_data(&self) -> Option<&FunctionData> {
        match self {
            NodeData::FunctionDeclaration(data)
            | NodeData::FunctionExpression(data)
            | NodeData::ArrowFunction(data) => Some(data),
            _ => None,
        }
    }

    pub fn class_data(&self) -> Option<&ClassData> {
        match self {
            NodeData::ClassDeclaration(data) | NodeData::ClassExpression(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            NodeData::ObjectPattern(_)
                | NodeData::ArrayPattern(_)
                | NodeData::AssignmentPattern(_)
                | NodeData::RestElement(_)
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            NodeData::StringLiteral(_)
                | NodeData::NumericLiteral(_)
                | NodeData::BooleanLiteral(_)
                | NodeData::NullLiteral
        )
    }

    /// Short kind name used in logs and errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeData::Program(_) => "Program",
            NodeData::Block(_) => "Block",
            NodeData::VariableStatement(_) => "VariableStatement",
            NodeData::VariableDeclarator(_) => "VariableDeclarator",
            NodeData::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeData::ExpressionStatement(_) => "ExpressionStatement",
            NodeData::EmptyStatement => "EmptyStatement",
            NodeData::IfStatement(_) => "IfStatement",
            NodeData::ReturnStatement(_) => "ReturnStatement",
            NodeData::ThrowStatement(_) => "ThrowStatement",
            NodeData::ForStatement(_) => "ForStatement",
            NodeData::ForInStatement(_) => "ForInStatement",
            NodeData::ForOfStatement(_) => "ForOfStatement",
            NodeData::WhileStatement(_) => "WhileStatement",
            NodeData::DoStatement(_) => "DoStatement",
            NodeData::BreakStatement(_) => "BreakStatement",
            NodeData::ContinueStatement(_) => "ContinueStatement",
            NodeData::TryStatement(_) => "TryStatement",
            NodeData::CatchClause(_) => "CatchClause",
            NodeData::SwitchStatement(_) => "SwitchStatement",
            NodeData::CaseClause(_) => "CaseClause",
            NodeData::LabeledStatement(_) => "LabeledStatement",
            NodeData::DebuggerStatement => "DebuggerStatement",
            NodeData::WithStatement(_) => "WithStatement",
            NodeData::ClassDeclaration(_) => "ClassDeclaration",
            NodeData::MethodDefinition(_) => "MethodDefinition",
            NodeData::PropertyDefinition(_) => "PropertyDefinition",
            NodeData::StaticBlock(_) => "StaticBlock",
            NodeData::Identifier(_) => "Identifier",
            NodeData::PrivateName(_) => "PrivateName",
            NodeData::StringLiteral(_) => "StringLiteral",
            NodeData::NumericLiteral(_) => "NumericLiteral",
            NodeData::BigIntLiteral(_) => "BigIntLiteral",
            NodeData::RegularExpressionLiteral(_) => "RegularExpressionLiteral",
            NodeData::TemplateLiteral(_) => "TemplateLiteral",
            NodeData::TaggedTemplate(_) => "TaggedTemplate",
            NodeData::BooleanLiteral(_) => "BooleanLiteral",
            NodeData::NullLiteral => "NullLiteral",
            NodeData::ThisKeyword => "ThisKeyword",
            NodeData::OmittedExpression => "OmittedExpression",
            NodeData::ArrayLiteral(_) => "ArrayLiteral",
            NodeData::ObjectLiteral(_) => "ObjectLiteral",
            NodeData::PropertyAssignment(_) => "PropertyAssignment",
            NodeData::FunctionExpression(_) => "FunctionExpression",
            NodeData::ArrowFunction(_) => "ArrowFunction",
            NodeData::CallExpression(_) => "CallExpression",
            NodeData::NewExpression(_) => "NewExpression",
            NodeData::PropertyAccess(_) => "PropertyAccess",
            NodeData::ElementAccess(_) => "ElementAccess",
            NodeData::PrefixUnary(_) => "PrefixUnary",
            NodeData::PostfixUnary(_) => "PostfixUnary",
            NodeData::Binary(_) => "Binary",
            NodeData::Logical(_) => "Logical",
            NodeData::Assignment(_) => "Assignment",
            NodeData::Conditional(_) => "Conditional",
            NodeData::Sequence(_) => "Sequence",
            NodeData::ClassExpression(_) => "ClassExpression",
            NodeData::SpreadElement(_) => "SpreadElement",
            NodeData::YieldExpression(_) => "YieldExpression",
            NodeData::AwaitExpression(_) => "AwaitExpression",
            NodeData::Super => "Super",
            NodeData::NewTarget => "NewTarget",
            NodeData::Import => "Import",
            NodeData::ObjectPattern(_) => "ObjectPattern",
            NodeData::ArrayPattern(_) => "ArrayPattern",
            NodeData::AssignmentPattern(_) => "AssignmentPattern",
            NodeData::RestElement(_) => "RestElement",
        }
    }
}
