//! Tests for structural edits on the node arena.

use rejs_parser::{NodeData, NodeIndex, ParsedSource, parse};

fn parse_ok(source: &str) -> ParsedSource {
    parse(source).unwrap_or_else(|error| panic!("failed to parse {source:?}: {error}"))
}

fn top_level(parsed: &ParsedSource) -> Vec<NodeIndex> {
    parsed.arena.children(parsed.root)
}

fn find_kind(parsed: &ParsedSource, kind: &str) -> NodeIndex {
    parsed
        .arena
        .preorder(parsed.root)
        .into_iter()
        .find(|&index| parsed.arena.data(index).map(NodeData::kind_name) == Some(kind))
        .unwrap_or_else(|| panic!("no {kind} node"))
}

#[test]
fn replace_moves_parent_link() {
    let mut parsed = parse_ok("f(a);");
    let call_index = find_kind(&parsed, "CallExpression");
    let Some(NodeData::CallExpression(call)) = parsed.arena.data(call_index) else {
        panic!("expected call");
    };
    let old = call.arguments.nodes[0];
    let new = parsed.arena.add_string_literal("x");

    assert!(parsed.arena.replace(old, new));
    assert_eq!(parsed.arena.parent(new), call_index);
    assert!(parsed.arena.parent(old).is_none());
    assert!(!parsed.arena.is_attached(old, parsed.root));
    assert!(parsed.arena.is_attached(new, parsed.root));
}

#[test]
fn replace_refuses_attached_replacement() {
    let mut parsed = parse_ok("a; b;");
    let statements = top_level(&parsed);
    assert!(!parsed.arena.replace(statements[0], statements[1]));
    assert_eq!(top_level(&parsed).len(), 2);
}

#[test]
fn detach_removes_list_entries() {
    let mut parsed = parse_ok("a; b; c;");
    let statements = top_level(&parsed);
    assert!(parsed.arena.detach(statements[1]));
    assert_eq!(top_level(&parsed), vec![statements[0], statements[2]]);
    assert!(!parsed.arena.detach(statements[1]));
}

#[test]
fn remove_statement_in_single_slot_leaves_empty_statement() {
    let mut parsed = parse_ok("if (x) f();");
    let statement = find_kind(&parsed, "ExpressionStatement");
    assert!(parsed.arena.remove_statement(statement));
    let if_statement = top_level(&parsed)[0];
    let Some(NodeData::IfStatement(data)) = parsed.arena.data(if_statement) else {
        panic!("expected if");
    };
    assert!(matches!(
        parsed.arena.data(data.then_statement),
        Some(NodeData::EmptyStatement)
    ));
}

#[test]
fn splice_statement_into_list() {
    let mut parsed = parse_ok("a; b; c;");
    let statements = top_level(&parsed);
    let first = parsed.arena.add_identifier("x");
    let first = parsed.arena.add_expression_statement(first);
    let second = parsed.arena.add_identifier("y");
    let second = parsed.arena.add_expression_statement(second);

    assert!(parsed.arena.splice_statement(statements[1], vec![first, second]));
    assert_eq!(
        top_level(&parsed),
        vec![statements[0], first, second, statements[2]]
    );
    assert_eq!(parsed.arena.parent(first), parsed.root);
}

#[test]
fn splice_several_statements_into_single_slot_wraps_block() {
    let mut parsed = parse_ok("while (x) f();");
    let body = find_kind(&parsed, "ExpressionStatement");
    let a = parsed.arena.add_identifier("a");
    let a = parsed.arena.add_expression_statement(a);
    let b = parsed.arena.add_identifier("b");
    let b = parsed.arena.add_expression_statement(b);

    assert!(parsed.arena.splice_statement(body, vec![a, b]));
    let Some(NodeData::WhileStatement(data)) = parsed.arena.data(top_level(&parsed)[0]) else {
        panic!("expected while");
    };
    assert!(matches!(
        parsed.arena.data(data.statement),
        Some(NodeData::Block(block)) if block.statements.len() == 2
    ));
    assert_eq!(parsed.arena.parent(a), data.statement);
}

#[test]
fn deep_clone_copies_subtree() {
    let mut parsed = parse_ok("x = [1, 'two', [3]];");
    let array = find_kind(&parsed, "ArrayLiteral");
    let copy = parsed.arena.deep_clone(array);

    assert_ne!(copy, array);
    assert!(parsed.arena.parent(copy).is_none());
    let original = parsed.arena.preorder(array);
    let copied = parsed.arena.preorder(copy);
    assert_eq!(original.len(), copied.len());
    for (a, b) in original.iter().zip(&copied) {
        assert_ne!(a, b);
        assert_eq!(
            parsed.arena.data(*a).map(NodeData::kind_name),
            parsed.arena.data(*b).map(NodeData::kind_name)
        );
    }
    for &index in &copied[1..] {
        assert!(parsed.arena.is_attached(index, copy));
    }
}

#[test]
fn negative_numeric_literal_is_unary_minus() {
    let mut parsed = parse_ok(";");
    let literal = parsed.arena.add_numeric_literal(-2.5);
    assert!(matches!(
        parsed.arena.data(literal),
        Some(NodeData::PrefixUnary(_))
    ));
}

#[test]
fn find_ancestor_stops_at_nearest_match() {
    let parsed = parse_ok("function f() { function g() { return 1; } }");
    let literal = find_kind(&parsed, "NumericLiteral");
    let function = parsed
        .arena
        .find_ancestor(literal, NodeData::is_function_like)
        .expect("enclosing function");
    let Some(data) = parsed.arena.data(function).and_then(NodeData::function_data) else {
        panic!("expected function");
    };
    assert!(parsed.arena.is_identifier_named(data.name, "g"));
}
