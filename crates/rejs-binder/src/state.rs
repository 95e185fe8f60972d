//! Binder state and the queries passes run against it.

use crate::{Binding, BindingId, BindingKind, Reference, Scope, ScopeId, ScopeKind};
use rejs_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use rejs_parser::{NodeArena, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

#[derive(Debug, Default)]
pub struct BinderState {
    pub(crate) scopes: Vec<Scope>,
    /// Names declared directly in each scope, parallel to `scopes`.
    pub(crate) scope_names: Vec<FxHashMap<String, BindingId>>,
    pub(crate) bindings: Vec<Binding>,
    /// Scope opened by each scope-creating node.
    pub(crate) node_scopes: FxHashMap<NodeIndex, ScopeId>,
    /// Binding for every resolved identifier, declaration names included.
    pub(crate) identifier_bindings: FxHashMap<NodeIndex, BindingId>,
    pub(crate) declaration_bindings: FxHashMap<NodeIndex, BindingId>,
    /// Set when a walk hit `MAX_AST_DEPTH` and skipped a subtree.
    pub(crate) truncated: bool,
    /// Resolving inside a `with` body.
    pub(crate) in_with: bool,
    /// Identifiers read or written inside a `with` body, resolved or not.
    pub(crate) dynamic_identifiers: FxHashSet<NodeIndex>,
}

impl BinderState {
    /// Bind the program rooted at `root`.
    pub fn bind(arena: &NodeArena, root: NodeIndex) -> BinderState {
        let mut binder = BinderState::default();
        let program = binder.create_scope(ScopeKind::Program, root, None);
        binder.declare_node(arena, root, program, 0);
        binder.resolve_node(arena, root, program, crate::ReferenceKind::Read, 0);
        debug!(
            scopes = binder.scopes.len(),
            bindings = binder.bindings.len(),
            resolved = binder.identifier_bindings.len(),
            truncated = binder.truncated,
            "bound program"
        );
        binder
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Binding an identifier refers to or declares; `None` when unresolved.
    pub fn resolve(&self, identifier: NodeIndex) -> Option<BindingId> {
        self.identifier_bindings.get(&identifier).copied()
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.0 as usize)
    }

    /// Resolve an identifier straight to its binding.
    pub fn resolve_binding(&self, identifier: NodeIndex) -> Option<&Binding> {
        self.resolve(identifier).and_then(|id| self.binding(id))
    }

    /// Binding introduced by a declarator, function, or parameter node.
    pub fn binding_for_declaration(&self, declaration: NodeIndex) -> Option<BindingId> {
        self.declaration_bindings.get(&declaration).copied()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &Binding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| (BindingId(index as u32), binding))
    }

    pub fn references(&self, id: BindingId) -> &[Reference] {
        self.binding(id)
            .map(|binding| binding.references.as_slice())
            .unwrap_or_default()
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    /// Look `name` up from `scope` outwards.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        let mut current = Some(scope);
        let mut iterations = 0usize;
        while let Some(id) = current {
            if iterations >= MAX_SCOPE_WALK_ITERATIONS {
                return None;
            }
            iterations += 1;
            if let Some(&binding) = self
                .scope_names
                .get(id.0 as usize)
                .and_then(|names| names.get(name))
            {
                return Some(binding);
            }
            current = self.scope(id).and_then(|scope| scope.parent);
        }
        None
    }

    /// Innermost scope enclosing `node` (a scope-creating node maps to the
    /// scope it opens).
    pub fn scope_of(&self, arena: &NodeArena, node: NodeIndex) -> ScopeId {
        let mut current = node;
        let mut iterations = 0usize;
        while current.is_some() && iterations < MAX_SCOPE_WALK_ITERATIONS {
            if let Some(&scope) = self.node_scopes.get(&current) {
                return scope;
            }
            current = arena.parent(current);
            iterations += 1;
        }
        ScopeId::PROGRAM
    }

    /// The identifier sits in a `with` body, so it may name a property of
    /// the object rather than any binding or global.
    pub fn is_dynamic(&self, identifier: NodeIndex) -> bool {
        self.dynamic_identifiers.contains(&identifier)
    }

    /// A walk hit the depth limit, so some identifiers were never bound.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    // =========================================================================
    // Construction helpers
    // =========================================================================

    pub(crate) fn create_scope(
        &mut self,
        kind: ScopeKind,
        node: NodeIndex,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope { kind, node, parent });
        self.scope_names.push(FxHashMap::default());
        self.node_scopes.insert(node, id);
        id
    }

    /// Nearest function or program scope, where `var` lands.
    pub(crate) fn hoisting_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        let mut iterations = 0usize;
        while iterations < MAX_SCOPE_WALK_ITERATIONS {
            let Some(data) = self.scope(current) else {
                break;
            };
            if matches!(data.kind, ScopeKind::Function | ScopeKind::Program) {
                return current;
            }
            let Some(parent) = data.parent else {
                break;
            };
            current = parent;
            iterations += 1;
        }
        current
    }

    /// Declare `name` in `scope`. Redeclaring a name already declared in
    /// the same scope reuses the first binding (`var a; var a;`), except
    /// that parameters shadow a function expression's own name.
    pub(crate) fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        name_node: NodeIndex,
        declaration: NodeIndex,
        kind: BindingKind,
    ) -> BindingId {
        let existing = self
            .scope_names
            .get(scope.0 as usize)
            .and_then(|names| names.get(name))
            .copied();
        if let Some(existing) = existing {
            let shadows = kind == BindingKind::Parameter
                && self
                    .binding(existing)
                    .is_some_and(|binding| binding.kind == BindingKind::FunctionName);
            if !shadows {
                if let Some(binding) = self.bindings.get_mut(existing.0 as usize) {
                    binding.redeclared = true;
                }
                self.identifier_bindings.insert(name_node, existing);
                self.declaration_bindings.insert(declaration, existing);
                return existing;
            }
        }

        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding {
            name: name.to_string(),
            declaration,
            name_node,
            scope,
            kind,
            redeclared: false,
            dynamic: false,
            references: SmallVec::new(),
        });
        if let Some(names) = self.scope_names.get_mut(scope.0 as usize) {
            names.insert(name.to_string(), id);
        }
        self.identifier_bindings.insert(name_node, id);
        self.declaration_bindings.insert(declaration, id);
        id
    }
}
