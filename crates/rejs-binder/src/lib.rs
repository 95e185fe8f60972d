//! Name binder for the rejs deobfuscator.
//!
//! `BinderState::bind` walks a parsed program once to build scopes and
//! declare every binding (with `var` and function hoisting), then a second
//! time to resolve identifier uses to those bindings. The result answers
//! the questions every rewrite pass asks: which declaration does this
//! identifier refer to, and where else is that declaration used?
//!
//! Bindings are a snapshot. Any edit to the tree invalidates them; passes
//! rebind after editing.

use rejs_parser::NodeIndex;
use serde::Serialize;
use smallvec::SmallVec;

mod state;
mod state_binding;

pub use state::BinderState;

/// Index of a binding in its `BinderState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BindingId(pub u32);

/// Index of a scope in its `BinderState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// The program scope is always created first.
    pub const PROGRAM: ScopeId = ScopeId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ScopeKind {
    Program,
    /// Parameters and the body of a function or arrow, or a class
    /// `static` block.
    Function,
    /// Blocks, loop heads, `switch` bodies and the body of a named class
    /// expression.
    Block,
    Catch,
}

#[derive(Clone, Debug, Serialize)]
pub struct Scope {
    pub kind: ScopeKind,
    /// The node that opened the scope.
    pub node: NodeIndex,
    pub parent: Option<ScopeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    /// A function declaration.
    Function,
    /// The name of a named function expression, visible inside it.
    FunctionName,
    /// A class declaration, or a class expression's own name.
    Class,
    Parameter,
    CatchParameter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ReferenceKind {
    Read,
    /// Assignment target, update operand or for-in/for-of target.
    Write,
    /// Direct callee of a call expression.
    Call,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// The referencing `Identifier`.
    pub node: NodeIndex,
    pub kind: ReferenceKind,
}

#[derive(Clone, Debug)]
pub struct Binding {
    pub name: String,
    /// `VariableDeclarator`, `FunctionDeclaration`, `FunctionExpression`
    /// (for its own name), the class node, or the `Identifier` itself for
    /// parameters, catch variables and names inside destructuring patterns.
    pub declaration: NodeIndex,
    /// The `Identifier` that introduces the name.
    pub name_node: NodeIndex,
    pub scope: ScopeId,
    pub kind: BindingKind,
    /// Declared more than once in its scope (`var a = 1; var a = 2;`).
    /// Passes treat such bindings as mutable.
    pub redeclared: bool,
    /// Referenced inside a `with` body, where the name may resolve to a
    /// property of the object instead.
    pub dynamic: bool,
    pub references: SmallVec<[Reference; 4]>,
}

impl Binding {
    pub fn is_referenced(&self) -> bool {
        !self.references.is_empty()
    }

    /// Every reference is known to reach this declaration.
    pub fn is_stable(&self) -> bool {
        !self.redeclared && !self.dynamic
    }

    pub fn has_writes(&self) -> bool {
        self.references
            .iter()
            .any(|reference| reference.kind == ReferenceKind::Write)
    }
}
