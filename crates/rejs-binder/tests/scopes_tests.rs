//! Tests for scope construction and name lookup.

use rejs_binder::{BinderState, BindingKind, ScopeId, ScopeKind};
use rejs_parser::{NodeData, NodeIndex, ParsedSource, parse};

fn bind(source: &str) -> (ParsedSource, BinderState) {
    let parsed = parse(source).unwrap_or_else(|error| panic!("parse {source:?}: {error}"));
    let binder = BinderState::bind(&parsed.arena, parsed.root);
    (parsed, binder)
}

/// Every identifier node with the given text, in source order.
fn identifiers(parsed: &ParsedSource, name: &str) -> Vec<NodeIndex> {
    parsed
        .arena
        .preorder(parsed.root)
        .into_iter()
        .filter(|&index| parsed.arena.is_identifier_named(index, name))
        .collect()
}

#[test]
fn var_is_hoisted_to_function_scope() {
    let (parsed, binder) = bind("function f() { { var a = 1; } return a; }");
    let uses = identifiers(&parsed, "a");
    let declared = binder.resolve(uses[0]).expect("declaration binds");
    assert_eq!(binder.resolve(uses[1]), Some(declared));

    let binding = binder.binding(declared).expect("binding");
    assert_eq!(binding.kind, BindingKind::Var);
    let scope = binder.scope(binding.scope).expect("scope");
    assert_eq!(scope.kind, ScopeKind::Function);
}

#[test]
fn let_and_const_are_block_scoped() {
    let (parsed, binder) = bind("{ let a = 1; } a;");
    let uses = identifiers(&parsed, "a");
    assert!(binder.resolve(uses[0]).is_some());
    assert_eq!(binder.resolve(uses[1]), None);
}

#[test]
fn function_declarations_are_hoisted() {
    let (parsed, binder) = bind("f(); function f() {}");
    let uses = identifiers(&parsed, "f");
    let binding = binder.resolve(uses[0]).expect("call resolves");
    assert_eq!(binder.resolve(uses[1]), Some(binding));
    let declaration = binder.binding(binding).expect("binding").declaration;
    assert!(matches!(
        parsed.arena.data(declaration),
        Some(NodeData::FunctionDeclaration(_))
    ));
}

#[test]
fn inner_declarations_shadow_outer_ones() {
    let (parsed, binder) = bind("var x = 1; function f(x) { return x; } x;");
    let uses = identifiers(&parsed, "x");
    let outer = binder.resolve(uses[0]).expect("outer");
    let parameter = binder.resolve(uses[1]).expect("parameter");
    assert_ne!(outer, parameter);
    assert_eq!(binder.resolve(uses[2]), Some(parameter));
    assert_eq!(binder.resolve(uses[3]), Some(outer));
    assert_eq!(
        binder.binding(parameter).map(|binding| binding.kind),
        Some(BindingKind::Parameter)
    );
}

#[test]
fn named_function_expression_name_is_local() {
    let (parsed, binder) = bind("var g = function fact(n) { return fact(n - 1); }; fact;");
    let uses = identifiers(&parsed, "fact");
    let own = binder.resolve(uses[0]).expect("own name");
    assert_eq!(binder.resolve(uses[1]), Some(own));
    assert_eq!(binder.resolve(uses[2]), None);
}

#[test]
fn catch_parameter_scope() {
    let (parsed, binder) = bind("try {} catch (e) { e; } e;");
    let uses = identifiers(&parsed, "e");
    let binding = binder.resolve(uses[0]).expect("catch parameter");
    assert_eq!(binder.resolve(uses[1]), Some(binding));
    assert_eq!(binder.resolve(uses[2]), None);
}

#[test]
fn lookup_walks_outwards() {
    let (parsed, binder) = bind("var top = 1; function f() { var inner = 2; g(); }");
    let call = parsed
        .arena
        .preorder(parsed.root)
        .into_iter()
        .find(|&index| matches!(parsed.arena.data(index), Some(NodeData::CallExpression(_))))
        .expect("call");
    let scope = binder.scope_of(&parsed.arena, call);
    assert_ne!(scope, ScopeId::PROGRAM);
    assert!(binder.lookup(scope, "top").is_some());
    assert!(binder.lookup(scope, "inner").is_some());
    assert!(binder.lookup(ScopeId::PROGRAM, "inner").is_none());
}

#[test]
fn redeclared_var_shares_one_binding() {
    let (parsed, binder) = bind("var a = 1; var a = 2; a;");
    let uses = identifiers(&parsed, "a");
    let binding = binder.resolve(uses[0]).expect("binding");
    assert_eq!(binder.resolve(uses[1]), Some(binding));
    assert_eq!(binder.resolve(uses[2]), Some(binding));
    assert!(binder.binding(binding).is_some_and(|binding| binding.redeclared));
}

#[test]
fn binding_for_declaration_maps_declarators() {
    let (parsed, binder) = bind("var a = 1, b = 2;");
    let declarators: Vec<NodeIndex> = parsed
        .arena
        .preorder(parsed.root)
        .into_iter()
        .filter(|&index| {
            matches!(
                parsed.arena.data(index),
                Some(NodeData::VariableDeclarator(_))
            )
        })
        .collect();
    assert_eq!(declarators.len(), 2);
    let first = binder.binding_for_declaration(declarators[0]).expect("a");
    let second = binder.binding_for_declaration(declarators[1]).expect("b");
    assert_ne!(first, second);
    assert_eq!(binder.binding(first).map(|b| b.name.as_str()), Some("a"));
}

#[test]
fn destructuring_declares_every_name() {
    let (parsed, binder) = bind("var { a: x, b: [y, ...z] } = o; x; y; z;");
    for name in ["x", "y", "z"] {
        let uses = identifiers(&parsed, name);
        let declared = binder.resolve(uses[0]).expect("declared");
        assert_eq!(binder.resolve(uses[1]), Some(declared), "{name}");
        let binding = binder.binding(declared).expect("binding");
        assert_eq!(binding.kind, BindingKind::Var);
        // Names inside a pattern are declared by their own identifier.
        assert_eq!(binding.declaration, uses[0]);
    }
}

#[test]
fn parameter_patterns_and_defaults() {
    let (parsed, binder) =
        bind("function f({ a: x }, y = x, ...rest) { return x + y + rest; }");
    for name in ["x", "y", "rest"] {
        let uses = identifiers(&parsed, name);
        let declared = binder.resolve(uses[0]).expect("parameter");
        assert!(uses[1..].iter().all(|&use_| binder.resolve(use_) == Some(declared)));
        assert_eq!(
            binder.binding(declared).map(|binding| binding.kind),
            Some(BindingKind::Parameter)
        );
    }
}

#[test]
fn class_names() {
    let (parsed, binder) =
        bind("class A { m() { return A; } } var B = class C { m() { return C; } }; C;");
    let a = identifiers(&parsed, "A");
    let declared = binder.resolve(a[0]).expect("class declaration");
    assert_eq!(binder.resolve(a[1]), Some(declared));
    assert_eq!(
        binder.binding(declared).map(|binding| binding.kind),
        Some(BindingKind::Class)
    );

    let c = identifiers(&parsed, "C");
    let own = binder.resolve(c[0]).expect("class expression name");
    assert_eq!(binder.resolve(c[1]), Some(own));
    assert_eq!(binder.resolve(c[2]), None);
}

#[test]
fn static_block_has_its_own_var_scope() {
    let (parsed, binder) = bind("class A { static { var v = 1; v; } } v;");
    let uses = identifiers(&parsed, "v");
    let declared = binder.resolve(uses[0]).expect("block var");
    assert_eq!(binder.resolve(uses[1]), Some(declared));
    assert_eq!(binder.resolve(uses[2]), None);
}

#[test]
fn names_inside_with_are_not_stable() {
    let (parsed, binder) = bind("var a = 1, b = 2; with (o) { a; var c = 3; } b;");
    let a = identifiers(&parsed, "a");
    let binding = binder.resolve_binding(a[0]).expect("a");
    assert!(!binding.is_stable());
    assert!(binder.is_dynamic(a[1]));
    assert!(!binder.is_dynamic(a[0]));

    let c = binder.resolve_binding(identifiers(&parsed, "c")[0]).expect("c");
    assert!(!c.is_stable());
    let b = binder.resolve_binding(identifiers(&parsed, "b")[0]).expect("b");
    assert!(b.is_stable());
}
