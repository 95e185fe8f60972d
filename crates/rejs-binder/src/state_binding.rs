//! The two binder walks: declaration (scopes + hoisting) and resolution.

use crate::state::BinderState;
use crate::{BindingKind, Reference, ReferenceKind, ScopeId, ScopeKind};
use rejs_common::limits::MAX_AST_DEPTH;
use rejs_parser::node::FunctionData;
use rejs_parser::{NodeArena, NodeData, NodeIndex, VariableKind};
use rejs_scanner::SyntaxKind;
use tracing::trace;

impl BinderState {
    // =========================================================================
    // Declaration walk
    // =========================================================================

    pub(crate) fn declare_node(
        &mut self,
        arena: &NodeArena,
        index: NodeIndex,
        scope: ScopeId,
        depth: u32,
    ) {
        if depth > MAX_AST_DEPTH {
            self.truncated = true;
            return;
        }
        let Some(data) = arena.data(index) else {
            return;
        };

        match data {
            NodeData::FunctionDeclaration(function) => {
                if let Some(name) = arena.identifier_text(function.name) {
                    self.declare(scope, name, function.name, index, BindingKind::Function);
                }
                self.declare_function(arena, index, function, scope, depth);
            }
            NodeData::FunctionExpression(function) => {
                let function_scope =
                    self.create_scope(ScopeKind::Function, index, Some(scope));
                if let Some(name) = arena.identifier_text(function.name) {
                    self.declare(
                        function_scope,
                        name,
                        function.name,
                        index,
                        BindingKind::FunctionName,
                    );
                }
                self.declare_function_body(arena, function, function_scope, depth);
            }
            NodeData::ArrowFunction(function) => {
                self.declare_function(arena, index, function, scope, depth);
            }
            NodeData::VariableStatement(statement) => {
                let (target, kind) = match statement.kind {
                    VariableKind::Var => (self.hoisting_scope(scope), BindingKind::Var),
                    VariableKind::Let => (scope, BindingKind::Let),
                    VariableKind::Const => (scope, BindingKind::Const),
                };
                let pattern = PatternScope {
                    binding_scope: target,
                    expression_scope: scope,
                    kind,
                };
                for &declarator in &statement.declarations.nodes {
                    let Some(NodeData::VariableDeclarator(decl)) = arena.data(declarator) else {
                        continue;
                    };
                    self.declare_pattern(arena, decl.name, declarator, &pattern, depth + 1);
                    self.declare_node(arena, decl.initializer, scope, depth + 1);
                }
            }
            NodeData::ClassDeclaration(class) => {
                if let Some(name) = arena.identifier_text(class.name) {
                    self.declare(scope, name, class.name, index, BindingKind::Class);
                }
                data.for_each_child(|child| {
                    self.declare_node(arena, child, scope, depth + 1);
                });
            }
            NodeData::ClassExpression(class) => {
                let class_scope = self.create_scope(ScopeKind::Block, index, Some(scope));
                if let Some(name) = arena.identifier_text(class.name) {
                    self.declare(class_scope, name, class.name, index, BindingKind::Class);
                }
                data.for_each_child(|child| {
                    self.declare_node(arena, child, class_scope, depth + 1);
                });
            }
            NodeData::StaticBlock(block) => {
                let block_scope = self.create_scope(ScopeKind::Function, index, Some(scope));
                for &statement in &block.statements.nodes {
                    self.declare_node(arena, statement, block_scope, depth + 1);
                }
            }
            NodeData::Block(block) => {
                let block_scope = self.create_scope(ScopeKind::Block, index, Some(scope));
                for &statement in &block.statements.nodes {
                    self.declare_node(arena, statement, block_scope, depth + 1);
                }
            }
            NodeData::ForStatement(_)
            | NodeData::ForInStatement(_)
            | NodeData::ForOfStatement(_) => {
                let loop_scope = self.create_scope(ScopeKind::Block, index, Some(scope));
                data.for_each_child(|child| {
                    self.declare_node(arena, child, loop_scope, depth + 1);
                });
            }
            NodeData::SwitchStatement(switch) => {
                self.declare_node(arena, switch.expression, scope, depth + 1);
                let case_scope = self.create_scope(ScopeKind::Block, index, Some(scope));
                for &clause in &switch.clauses.nodes {
                    self.declare_node(arena, clause, case_scope, depth + 1);
                }
            }
            NodeData::CatchClause(clause) => {
                let catch_scope = self.create_scope(ScopeKind::Catch, index, Some(scope));
                let pattern = PatternScope {
                    binding_scope: catch_scope,
                    expression_scope: catch_scope,
                    kind: BindingKind::CatchParameter,
                };
                self.declare_pattern(arena, clause.variable, clause.variable, &pattern, depth + 1);
                // The catch block shares the clause's scope.
                if let Some(NodeData::Block(block)) = arena.data(clause.block) {
                    for &statement in &block.statements.nodes {
                        self.declare_node(arena, statement, catch_scope, depth + 1);
                    }
                }
            }
            _ => {
                data.for_each_child(|child| {
                    self.declare_node(arena, child, scope, depth + 1);
                });
            }
        }
    }

    /// Open a function scope for a declaration or arrow.
    fn declare_function(
        &mut self,
        arena: &NodeArena,
        index: NodeIndex,
        function: &FunctionData,
        scope: ScopeId,
        depth: u32,
    ) {
        let function_scope = self.create_scope(ScopeKind::Function, index, Some(scope));
        self.declare_function_body(arena, function, function_scope, depth);
    }

    /// Parameters and body statements, all in `function_scope`.
    fn declare_function_body(
        &mut self,
        arena: &NodeArena,
        function: &FunctionData,
        function_scope: ScopeId,
        depth: u32,
    ) {
        let pattern = PatternScope {
            binding_scope: function_scope,
            expression_scope: function_scope,
            kind: BindingKind::Parameter,
        };
        for &parameter in &function.parameters.nodes {
            self.declare_pattern(arena, parameter, NodeIndex::NONE, &pattern, depth + 1);
        }
        match arena.data(function.body) {
            Some(NodeData::Block(body)) => {
                for &statement in &body.statements.nodes {
                    self.declare_node(arena, statement, function_scope, depth + 1);
                }
            }
            Some(_) => self.declare_node(arena, function.body, function_scope, depth + 1),
            None => {}
        }
    }

    /// Declare every name bound by `target`. A plain identifier is
    /// declared by `declaration`; names nested in a pattern (and parameters,
    /// passed `NONE`) are declared by their own identifier. Defaults and
    /// computed keys are walked for nested functions.
    fn declare_pattern(
        &mut self,
        arena: &NodeArena,
        target: NodeIndex,
        declaration: NodeIndex,
        pattern: &PatternScope,
        depth: u32,
    ) {
        if depth > MAX_AST_DEPTH {
            self.truncated = true;
            return;
        }
        let Some(data) = arena.data(target) else {
            return;
        };
        match data {
            NodeData::Identifier(identifier) => {
                let declaration = declaration.into_option().unwrap_or(target);
                self.declare(
                    pattern.binding_scope,
                    &identifier.escaped_text,
                    target,
                    declaration,
                    pattern.kind,
                );
            }
            NodeData::ObjectPattern(list) | NodeData::ArrayPattern(list) => {
                for &element in &list.elements.nodes {
                    self.declare_pattern(arena, element, NodeIndex::NONE, pattern, depth + 1);
                }
            }
            NodeData::PropertyAssignment(property) => {
                if property.computed {
                    self.declare_node(arena, property.name, pattern.expression_scope, depth + 1);
                }
                self.declare_pattern(arena, property.initializer, NodeIndex::NONE, pattern, depth + 1);
            }
            NodeData::AssignmentPattern(default) => {
                self.declare_pattern(arena, default.left, declaration, pattern, depth + 1);
                self.declare_node(arena, default.right, pattern.expression_scope, depth + 1);
            }
            NodeData::RestElement(rest) => {
                self.declare_pattern(arena, rest.expression, NodeIndex::NONE, pattern, depth + 1);
            }
            _ => {}
        }
    }

    // =========================================================================
    // Resolution walk
    // =========================================================================

    /// `kind` is how an identifier at `index` is used; it only matters when
    /// `index` itself is an identifier.
    pub(crate) fn resolve_node(
        &mut self,
        arena: &NodeArena,
        index: NodeIndex,
        scope: ScopeId,
        kind: ReferenceKind,
        depth: u32,
    ) {
        if depth > MAX_AST_DEPTH {
            self.truncated = true;
            return;
        }
        let Some(data) = arena.data(index) else {
            return;
        };
        let scope = self.node_scopes.get(&index).copied().unwrap_or(scope);
        let depth = depth + 1;
        let read = ReferenceKind::Read;

        match data {
            NodeData::Identifier(identifier) => {
                self.add_reference(index, &identifier.escaped_text, scope, kind);
            }
            NodeData::VariableDeclarator(decl) => {
                self.resolve_pattern(arena, decl.name, scope, None, depth);
                self.resolve_node(arena, decl.initializer, scope, read, depth);
            }
            NodeData::FunctionDeclaration(function)
            | NodeData::FunctionExpression(function)
            | NodeData::ArrowFunction(function) => {
                if matches!(data, NodeData::FunctionDeclaration(_)) {
                    self.mark_dynamic(function.name);
                }
                for &parameter in &function.parameters.nodes {
                    self.resolve_pattern(arena, parameter, scope, None, depth);
                }
                self.resolve_node(arena, function.body, scope, read, depth);
            }
            NodeData::CatchClause(clause) => {
                self.resolve_pattern(arena, clause.variable, scope, None, depth);
                self.resolve_node(arena, clause.block, scope, read, depth);
            }
            NodeData::ClassDeclaration(class) | NodeData::ClassExpression(class) => {
                self.resolve_node(arena, class.heritage, scope, read, depth);
                for &member in &class.members.nodes {
                    self.resolve_node(arena, member, scope, read, depth);
                }
            }
            NodeData::MethodDefinition(method) => {
                if method.computed {
                    self.resolve_node(arena, method.name, scope, read, depth);
                }
                self.resolve_node(arena, method.value, scope, read, depth);
            }
            NodeData::PropertyDefinition(field) => {
                if field.computed {
                    self.resolve_node(arena, field.name, scope, read, depth);
                }
                self.resolve_node(arena, field.value, scope, read, depth);
            }
            NodeData::ObjectPattern(_)
            | NodeData::ArrayPattern(_)
            | NodeData::AssignmentPattern(_)
            | NodeData::RestElement(_) => {
                self.resolve_pattern(arena, index, scope, Some(ReferenceKind::Write), depth);
            }
            NodeData::WithStatement(with) => {
                self.resolve_node(arena, with.condition, scope, read, depth);
                let saved = std::mem::replace(&mut self.in_with, true);
                self.resolve_node(arena, with.statement, scope, read, depth);
                self.in_with = saved;
            }
            NodeData::LabeledStatement(labeled) => {
                self.resolve_node(arena, labeled.statement, scope, read, depth);
            }
            NodeData::BreakStatement(_) | NodeData::ContinueStatement(_) => {}
            NodeData::PropertyAccess(access) => {
                self.resolve_node(arena, access.expression, scope, read, depth);
            }
            NodeData::PropertyAssignment(property) => {
                if property.computed {
                    self.resolve_node(arena, property.name, scope, read, depth);
                }
                self.resolve_node(arena, property.initializer, scope, read, depth);
            }
            NodeData::Assignment(assignment) => {
                self.resolve_node(arena, assignment.left, scope, ReferenceKind::Write, depth);
                self.resolve_node(arena, assignment.right, scope, read, depth);
            }
            NodeData::PrefixUnary(unary) | NodeData::PostfixUnary(unary) => {
                let operand_kind = match unary.operator {
                    SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                        ReferenceKind::Write
                    }
                    _ => read,
                };
                self.resolve_node(arena, unary.operand, scope, operand_kind, depth);
            }
            NodeData::CallExpression(call) => {
                self.resolve_node(arena, call.expression, scope, ReferenceKind::Call, depth);
                for &argument in &call.arguments.nodes {
                    self.resolve_node(arena, argument, scope, read, depth);
                }
            }
            NodeData::ForInStatement(loop_data) | NodeData::ForOfStatement(loop_data) => {
                self.resolve_node(
                    arena,
                    loop_data.initializer,
                    scope,
                    ReferenceKind::Write,
                    depth,
                );
                self.resolve_node(arena, loop_data.expression, scope, read, depth);
                self.resolve_node(arena, loop_data.statement, scope, read, depth);
            }
            _ => {
                data.for_each_child(|child| {
                    self.resolve_node(arena, child, scope, read, depth);
                });
            }
        }
    }

    /// Walk a binding or assignment target. `kind` is `None` in
    /// declarations, where the identifiers are the names being declared
    /// and only defaults and computed keys hold references.
    fn resolve_pattern(
        &mut self,
        arena: &NodeArena,
        target: NodeIndex,
        scope: ScopeId,
        kind: Option<ReferenceKind>,
        depth: u32,
    ) {
        if depth > MAX_AST_DEPTH {
            self.truncated = true;
            return;
        }
        let Some(data) = arena.data(target) else {
            return;
        };
        let depth = depth + 1;
        let read = ReferenceKind::Read;
        match data {
            NodeData::Identifier(identifier) => {
                match kind {
                    Some(kind) => self.add_reference(target, &identifier.escaped_text, scope, kind),
                    None => self.mark_dynamic(target),
                }
            }
            NodeData::ObjectPattern(list) | NodeData::ArrayPattern(list) => {
                for &element in &list.elements.nodes {
                    self.resolve_pattern(arena, element, scope, kind, depth);
                }
            }
            NodeData::PropertyAssignment(property) => {
                if property.computed {
                    self.resolve_node(arena, property.name, scope, read, depth);
                }
                self.resolve_pattern(arena, property.initializer, scope, kind, depth);
            }
            NodeData::AssignmentPattern(default) => {
                self.resolve_pattern(arena, default.left, scope, kind, depth);
                self.resolve_node(arena, default.right, scope, read, depth);
            }
            NodeData::RestElement(rest) => {
                self.resolve_pattern(arena, rest.expression, scope, kind, depth);
            }
            NodeData::OmittedExpression => {}
            // Member targets such as `[a.b] = c`.
            _ => self.resolve_node(arena, target, scope, kind.unwrap_or(read), depth),
        }
    }

    /// A name declared inside a `with` body; its initialization may write
    /// to the object instead.
    fn mark_dynamic(&mut self, name_node: NodeIndex) {
        if !self.in_with {
            return;
        }
        let Some(binding) = self.resolve(name_node) else {
            return;
        };
        if let Some(data) = self.bindings.get_mut(binding.0 as usize) {
            data.dynamic = true;
        }
    }

    fn add_reference(&mut self, node: NodeIndex, name: &str, scope: ScopeId, kind: ReferenceKind) {
        if self.in_with {
            self.dynamic_identifiers.insert(node);
        }
        let Some(binding) = self.lookup(scope, name) else {
            trace!(name, ?node, "unresolved identifier");
            return;
        };
        self.identifier_bindings.insert(node, binding);
        if let Some(data) = self.bindings.get_mut(binding.0 as usize) {
            data.references.push(Reference { node, kind });
            data.dynamic |= self.in_with;
        }
    }
}

/// Where the names of one pattern are declared, and as what.
struct PatternScope {
    binding_scope: ScopeId,
    /// Scope for defaults and computed keys.
    expression_scope: ScopeId,
    kind: BindingKind,
}
