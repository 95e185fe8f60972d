//! Tests for statement and expression parsing.

use rejs_parser::node::{BinaryData, FunctionData};
use rejs_parser::{
    MethodKind, NodeData, NodeIndex, ParsedSource, PropertyKind, VariableKind, parse,
};
use rejs_scanner::SyntaxKind;

fn parse_ok(source: &str) -> ParsedSource {
    match parse(source) {
        Ok(parsed) => parsed,
        Err(error) => panic!("failed to parse {source:?}: {error}"),
    }
}

fn statements(parsed: &ParsedSource) -> Vec<NodeIndex> {
    match parsed.arena.data(parsed.root) {
        Some(NodeData::Program(block)) => block.statements.nodes.clone(),
        other => panic!("expected program, got {other:?}"),
    }
}

/// Expression of the `index`th top-level expression statement.
fn expression_at(parsed: &ParsedSource, index: usize) -> NodeIndex {
    let statement = statements(parsed)[index];
    match parsed.arena.data(statement) {
        Some(NodeData::ExpressionStatement(data)) => data.expression,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn binary(parsed: &ParsedSource, index: NodeIndex) -> &BinaryData {
    match parsed.arena.data(index) {
        Some(NodeData::Binary(data) | NodeData::Logical(data) | NodeData::Assignment(data)) => {
            data
        }
        other => panic!("expected binary, got {other:?}"),
    }
}

fn function(parsed: &ParsedSource, index: NodeIndex) -> &FunctionData {
    parsed
        .arena
        .data(index)
        .and_then(NodeData::function_data)
        .unwrap_or_else(|| panic!("expected function at {index:?}"))
}

#[test]
fn parses_variable_statements_of_every_kind() {
    let parsed = parse_ok("var a = 1, b; let c = 2; const d = 3;");
    let kinds: Vec<VariableKind> = statements(&parsed)
        .iter()
        .map(|&statement| match parsed.arena.data(statement) {
            Some(NodeData::VariableStatement(data)) => data.kind,
            other => panic!("expected variable statement, got {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![VariableKind::Var, VariableKind::Let, VariableKind::Const]
    );

    let first = statements(&parsed)[0];
    let Some(NodeData::VariableStatement(data)) = parsed.arena.data(first) else {
        panic!("expected variable statement");
    };
    assert_eq!(data.declarations.len(), 2);
    let Some(NodeData::VariableDeclarator(second)) = parsed.arena.data(data.declarations.nodes[1])
    else {
        panic!("expected declarator");
    };
    assert!(second.initializer.is_none());
}

#[test]
fn binary_precedence_and_associativity() {
    let parsed = parse_ok("a + b * c; a - b - c; 2 ** 3 ** 2;");

    let sum = binary(&parsed, expression_at(&parsed, 0));
    assert_eq!(sum.operator, SyntaxKind::PlusToken);
    assert_eq!(
        binary(&parsed, sum.right).operator,
        SyntaxKind::AsteriskToken
    );

    let difference = binary(&parsed, expression_at(&parsed, 1));
    assert_eq!(
        binary(&parsed, difference.left).operator,
        SyntaxKind::MinusToken
    );

    let power = binary(&parsed, expression_at(&parsed, 2));
    assert!(matches!(
        parsed.arena.data(power.right),
        Some(NodeData::Binary(_))
    ));
}

#[test]
fn logical_operators_build_logical_nodes() {
    let parsed = parse_ok("a && b || c;");
    let expression = expression_at(&parsed, 0);
    assert!(matches!(
        parsed.arena.data(expression),
        Some(NodeData::Logical(data)) if data.operator == SyntaxKind::BarBarToken
    ));
}

#[test]
fn parentheses_only_group() {
    let parsed = parse_ok("(a + b) * c;");
    let product = binary(&parsed, expression_at(&parsed, 0));
    assert_eq!(product.operator, SyntaxKind::AsteriskToken);
    assert_eq!(binary(&parsed, product.left).operator, SyntaxKind::PlusToken);
}

#[test]
fn automatic_semicolon_insertion() {
    let parsed = parse_ok("a = 1\nb = 2\nfunction f() { return }\nc()");
    assert_eq!(statements(&parsed).len(), 4);
}

#[test]
fn return_is_a_restricted_production() {
    let parsed = parse_ok("function f() { return\n1 }");
    let declaration = statements(&parsed)[0];
    let body = function(&parsed, declaration).body;
    let Some(NodeData::Block(block)) = parsed.arena.data(body) else {
        panic!("expected block body");
    };
    assert_eq!(block.statements.len(), 2);
    assert!(matches!(
        parsed.arena.data(block.statements.nodes[0]),
        Some(NodeData::ReturnStatement(data)) if data.expression.is_none()
    ));
}

#[test]
fn postfix_update_does_not_cross_line_break() {
    let parsed = parse_ok("a\n++b");
    assert_eq!(statements(&parsed).len(), 2);
    assert!(matches!(
        parsed.arena.data(expression_at(&parsed, 1)),
        Some(NodeData::PrefixUnary(data)) if data.operator == SyntaxKind::PlusPlusToken
    ));
}

#[test]
fn string_literals_keep_raw_text_and_decoded_value() {
    let parsed = parse_ok(r#"var s = '\x48i';"#);
    let literal = parsed
        .arena
        .preorder(parsed.root)
        .into_iter()
        .find_map(|index| match parsed.arena.data(index) {
            Some(NodeData::StringLiteral(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("string literal");
    assert_eq!(literal.value, "Hi");
    assert_eq!(literal.raw.as_deref(), Some(r#"'\x48i'"#));
}

#[test]
fn numeric_literals_keep_raw_text() {
    let parsed = parse_ok("x = 0x1f;");
    let assignment = binary(&parsed, expression_at(&parsed, 0));
    let Some(NodeData::NumericLiteral(number)) = parsed.arena.data(assignment.right) else {
        panic!("expected number");
    };
    assert_eq!(number.value, 31.0);
    assert_eq!(number.raw.as_deref(), Some("0x1f"));
}

#[test]
fn regular_expression_after_operator() {
    let parsed = parse_ok("var r = /ab+c/gi; x = a / b;");
    let kinds: Vec<&str> = parsed
        .arena
        .preorder(parsed.root)
        .into_iter()
        .filter_map(|index| parsed.arena.data(index))
        .map(NodeData::kind_name)
        .collect();
    assert!(kinds.contains(&"RegularExpressionLiteral"));
    assert!(kinds.contains(&"Binary"));
}

#[test]
fn arrow_functions() {
    let parsed = parse_ok("f = x => x + 1; g = (a, b) => { return a; }; h = () => 0;");
    for (index, params) in [(0, 1), (1, 2), (2, 0)] {
        let assignment = binary(&parsed, expression_at(&parsed, index));
        assert!(matches!(
            parsed.arena.data(assignment.right),
            Some(NodeData::ArrowFunction(_))
        ));
        assert_eq!(function(&parsed, assignment.right).parameters.len(), params);
    }
}

#[test]
fn parenthesized_expression_is_not_an_arrow() {
    let parsed = parse_ok("(a, b);");
    assert!(matches!(
        parsed.arena.data(expression_at(&parsed, 0)),
        Some(NodeData::Sequence(data)) if data.elements.len() == 2
    ));
}

#[test]
fn object_literal_property_kinds() {
    let parsed = parse_ok("o = { a: 1, b, ['c']: 2, d() { return 1; }, 'e': 3, 4: 5, get: 6 };");
    let assignment = binary(&parsed, expression_at(&parsed, 0));
    let Some(NodeData::ObjectLiteral(object)) = parsed.arena.data(assignment.right) else {
        panic!("expected object literal");
    };
    let kinds: Vec<(PropertyKind, bool)> = object
        .elements
        .nodes
        .iter()
        .map(|&property| match parsed.arena.data(property) {
            Some(NodeData::PropertyAssignment(data)) => (data.kind, data.computed),
            other => panic!("expected property, got {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            (PropertyKind::Init, false),
            (PropertyKind::Shorthand, false),
            (PropertyKind::Init, true),
            (PropertyKind::Method, false),
            (PropertyKind::Init, false),
            (PropertyKind::Init, false),
            (PropertyKind::Init, false),
        ]
    );
}

#[test]
fn array_literal_holes() {
    let parsed = parse_ok("a = [, 1, , 2,];");
    let assignment = binary(&parsed, expression_at(&parsed, 0));
    let Some(NodeData::ArrayLiteral(array)) = parsed.arena.data(assignment.right) else {
        panic!("expected array literal");
    };
    let kinds: Vec<&str> = array
        .elements
        .nodes
        .iter()
        .filter_map(|&element| parsed.arena.data(element))
        .map(NodeData::kind_name)
        .collect();
    assert_eq!(
        kinds,
        vec![
            "OmittedExpression",
            "NumericLiteral",
            "OmittedExpression",
            "NumericLiteral"
        ]
    );
}

#[test]
fn member_calls_and_new() {
    let parsed = parse_ok("new Foo.Bar(1).baz['q'](2); new Date;");
    let call = expression_at(&parsed, 0);
    assert!(matches!(
        parsed.arena.data(call),
        Some(NodeData::CallExpression(_))
    ));
    assert!(matches!(
        parsed.arena.data(expression_at(&parsed, 1)),
        Some(NodeData::NewExpression(data)) if data.arguments.is_empty()
    ));
}

#[test]
fn keywords_are_allowed_as_property_names() {
    parse_ok("a.default = b.if; c = { new: 1, class: 2 };");
}

#[test]
fn control_flow_statements() {
    let source = r#"
        outer: for (var i = 0; i < 10; i++) {
            for (var k in o) { if (k) continue outer; else break; }
            for (const v of list) {}
            while (x) { x--; }
            do { y++ } while (y < 3)
            switch (i) { case 1: f(); break; default: g(); }
            try { h(); } catch (e) { throw e; } finally { debugger; }
        }
    "#;
    let parsed = parse_ok(source);
    let kinds: Vec<&str> = parsed
        .arena
        .preorder(parsed.root)
        .into_iter()
        .filter_map(|index| parsed.arena.data(index))
        .map(NodeData::kind_name)
        .collect();
    for expected in [
        "LabeledStatement",
        "ForStatement",
        "ForInStatement",
        "ForOfStatement",
        "WhileStatement",
        "DoStatement",
        "SwitchStatement",
        "CaseClause",
        "TryStatement",
        "CatchClause",
        "ThrowStatement",
        "DebuggerStatement",
        "ContinueStatement",
        "BreakStatement",
    ] {
        assert!(kinds.contains(&expected), "missing {expected}");
    }
}

#[test]
fn for_in_initializer_stops_before_in() {
    let parsed = parse_ok("for (x in y) {}");
    let statement = statements(&parsed)[0];
    let Some(NodeData::ForInStatement(data)) = parsed.arena.data(statement) else {
        panic!("expected for-in");
    };
    assert!(matches!(
        parsed.arena.data(data.initializer),
        Some(NodeData::Identifier(_))
    ));
}

#[test]
fn in_operator_inside_parentheses_in_for_initializer() {
    let parsed = parse_ok("for (var a = (b in c); a; ) {}");
    assert!(matches!(
        parsed.arena.data(statements(&parsed)[0]),
        Some(NodeData::ForStatement(_))
    ));
}

#[test]
fn let_is_an_identifier_outside_declarations() {
    let parsed = parse_ok("let = 1; let x = let;");
    assert!(matches!(
        parsed.arena.data(statements(&parsed)[0]),
        Some(NodeData::ExpressionStatement(_))
    ));
    assert!(matches!(
        parsed.arena.data(statements(&parsed)[1]),
        Some(NodeData::VariableStatement(_))
    ));
}

#[test]
fn parent_links_point_at_owners() {
    let parsed = parse_ok("function f(a) { return a[0]; }");
    for index in parsed.arena.preorder(parsed.root) {
        for child in parsed.arena.children(index) {
            assert_eq!(parsed.arena.parent(child), index);
        }
    }
    assert!(parsed.arena.parent(parsed.root).is_none());
}

#[test]
fn modern_syntax_parses() {
    for source in [
        "x = `a${b}c`;",
        "class A { m() {} }",
        "x = { get g() { return 1; } };",
        "var [a, , ...rest] = c;",
        "var { a, b: { c = 1 }, ...others } = d;",
        "function f(a = 1, { b } = {}, ...more) {}",
        "f(...args, ...[1, 2]); x = [...a]; y = { ...o };",
        "async function f() { await g(); for await (const x of y) {} }",
        "function* g() { yield; yield 1; yield* h(); }",
        "a?.b; a?.[0]; a?.(); a?.b.c();",
        "x = async (a) => a; y = async a => a; z = async () => {};",
        "[a, b] = [b, a]; ({ a, b: c = 1 } = o);",
        "for (const [k, v] of entries) {}",
        "x = 10n; y = 0xFFn;",
        "tag`a${b}\\unicode`;",
        "class B extends A { constructor() { super(); super.m(); } }",
        "class C { #x = 1; static y; get #z() { return this.#x; } static { init(); } }",
        "function F() { return new.target; }",
        "import('mod');",
        "x = { async m() {}, *g() {}, async *ag() {}, [k]: 1, set s(v) {} };",
        "with (o) { a = b; }",
        "x = class {};",
        "try {} catch ({ message }) {}",
        "var yield = 1; var async = 2; var get = 3;",
    ] {
        parse_ok(source);
    }
}

#[test]
fn template_literal_pieces() {
    let parsed = parse_ok("x = `a${b}c`;");
    let assignment = binary(&parsed, expression_at(&parsed, 0));
    let Some(NodeData::TemplateLiteral(template)) = parsed.arena.data(assignment.right) else {
        panic!("expected template literal");
    };
    let cooked: Vec<Option<&str>> = template
        .quasis
        .iter()
        .map(|quasi| quasi.cooked.as_deref())
        .collect();
    assert_eq!(cooked, vec![Some("a"), Some("c")]);
    assert_eq!(template.expressions.len(), 1);
    assert_eq!(parsed.arena.identifier_text(template.expressions.nodes[0]), Some("b"));
}

#[test]
fn tagged_template_keeps_invalid_escapes_raw() {
    let parsed = parse_ok("tag`\\unicode`;");
    let Some(NodeData::TaggedTemplate(tagged)) = parsed.arena.data(expression_at(&parsed, 0))
    else {
        panic!("expected tagged template");
    };
    let Some(NodeData::TemplateLiteral(template)) = parsed.arena.data(tagged.template) else {
        panic!("expected template literal");
    };
    assert_eq!(template.quasis[0].cooked, None);
    assert_eq!(template.quasis[0].raw, "\\unicode");

    let error = parse("x = `\\unicode`;").expect_err("untagged invalid escape");
    assert!(error.message.contains("Invalid escape sequence in template"));
}

#[test]
fn class_members() {
    let parsed = parse_ok(
        "class A extends B { constructor() {} static s() {} get g() { return 1; } f = 1; static {} }",
    );
    let Some(NodeData::ClassDeclaration(class)) = parsed.arena.data(statements(&parsed)[0]) else {
        panic!("expected class declaration");
    };
    assert_eq!(parsed.arena.identifier_text(class.name), Some("A"));
    assert_eq!(parsed.arena.identifier_text(class.heritage), Some("B"));

    let members: Vec<&NodeData> = class
        .members
        .nodes
        .iter()
        .filter_map(|&member| parsed.arena.data(member))
        .collect();
    assert_eq!(members.len(), 5);
    assert!(matches!(
        members[0],
        NodeData::MethodDefinition(method) if method.kind == MethodKind::Constructor
    ));
    assert!(matches!(
        members[1],
        NodeData::MethodDefinition(method) if method.is_static && method.kind == MethodKind::Method
    ));
    assert!(matches!(
        members[2],
        NodeData::MethodDefinition(method) if method.kind == MethodKind::Get
    ));
    assert!(matches!(members[3], NodeData::PropertyDefinition(field) if field.value.is_some()));
    assert!(matches!(members[4], NodeData::StaticBlock(_)));
}

#[test]
fn object_accessors_and_methods() {
    let parsed = parse_ok("x = { get g() { return 1; }, set s(v) {}, m() {}, async *a() {} };");
    let assignment = binary(&parsed, expression_at(&parsed, 0));
    let Some(NodeData::ObjectLiteral(object)) = parsed.arena.data(assignment.right) else {
        panic!("expected object literal");
    };
    let kinds: Vec<PropertyKind> = object
        .elements
        .nodes
        .iter()
        .map(|&property| match parsed.arena.data(property) {
            Some(NodeData::PropertyAssignment(data)) => data.kind,
            other => panic!("expected property, got {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            PropertyKind::Get,
            PropertyKind::Set,
            PropertyKind::Method,
            PropertyKind::Method
        ]
    );
    let Some(NodeData::PropertyAssignment(last)) = parsed.arena.data(object.elements.nodes[3])
    else {
        panic!("expected property");
    };
    let generator = function(&parsed, last.initializer);
    assert!(generator.is_async && generator.is_generator);
}

#[test]
fn destructuring_declarations_and_assignments() {
    let parsed = parse_ok("var { a, b: [c = 1] } = o; [x, ...y] = z;");
    let Some(NodeData::VariableStatement(statement)) = parsed.arena.data(statements(&parsed)[0])
    else {
        panic!("expected variable statement");
    };
    let Some(NodeData::VariableDeclarator(declarator)) =
        parsed.arena.data(statement.declarations.nodes[0])
    else {
        panic!("expected declarator");
    };
    assert!(matches!(
        parsed.arena.data(declarator.name),
        Some(NodeData::ObjectPattern(_))
    ));

    let assignment = binary(&parsed, expression_at(&parsed, 1));
    let Some(NodeData::ArrayPattern(pattern)) = parsed.arena.data(assignment.left) else {
        panic!("expected array pattern");
    };
    assert!(matches!(
        parsed.arena.data(pattern.elements.nodes[1]),
        Some(NodeData::RestElement(_))
    ));
}

#[test]
fn default_and_rest_parameters() {
    let parsed = parse_ok("function f(a, b = 2, ...c) {}");
    let parameters = &function(&parsed, statements(&parsed)[0]).parameters.nodes;
    assert_eq!(parameters.len(), 3);
    assert!(matches!(
        parsed.arena.data(parameters[1]),
        Some(NodeData::AssignmentPattern(_))
    ));
    assert!(matches!(
        parsed.arena.data(parameters[2]),
        Some(NodeData::RestElement(_))
    ));
}

#[test]
fn async_and_generator_functions() {
    let parsed = parse_ok("async function a() { await b; } function* g() { yield* h(); }");
    let async_function = function(&parsed, statements(&parsed)[0]);
    assert!(async_function.is_async && !async_function.is_generator);
    let generator = function(&parsed, statements(&parsed)[1]);
    assert!(generator.is_generator && !generator.is_async);

    // `await` and `yield` are plain identifiers outside those functions.
    parse_ok("await(1); yield = 2;");
}

#[test]
fn optional_chains_mark_every_link() {
    let parsed = parse_ok("a?.b.c();");
    let Some(NodeData::CallExpression(call)) = parsed.arena.data(expression_at(&parsed, 0)) else {
        panic!("expected call");
    };
    assert!(call.in_chain && !call.optional);
    let Some(NodeData::PropertyAccess(outer)) = parsed.arena.data(call.expression) else {
        panic!("expected property access");
    };
    assert!(outer.in_chain && !outer.optional);
    let Some(NodeData::PropertyAccess(inner)) = parsed.arena.data(outer.expression) else {
        panic!("expected property access");
    };
    assert!(inner.in_chain && inner.optional);
}

#[test]
fn invalid_syntax_is_a_parse_error() {
    for (source, message) in [
        ("var a = ;", "Expression expected"),
        ("import x from 'y';", "may appear only in modules"),
        ("export var a;", "may appear only in modules"),
        ("var [a];", "Missing initializer in destructuring declaration"),
        ("const a;", "Missing initializer in const declaration"),
        ("function f(...a, b) {}", "A rest parameter must be last"),
        ("[...a, b] = c;", "A rest element must be last"),
        ("x = { a = 1 };", "Invalid shorthand property initializer"),
        ("[a + b] = c;", "Invalid destructuring assignment target"),
        ("x = { get g(a) {} };", "A 'get' accessor cannot have parameters"),
        ("x = { set s() {} };", "A 'set' accessor must have exactly one parameter"),
        ("class A { constructor() {} constructor() {} }", "only have one constructor"),
        ("class A { constructor = 1; }", "field named 'constructor'"),
        ("a?.b`t`;", "Invalid tagged template on optional chain"),
        ("new a?.b();", "Invalid optional chain from new expression"),
        ("async function f() { var await; }", "'await' cannot be used"),
        ("enum E {}", "'enum' is a reserved word"),
        ("a?.b = 1;", "Invalid left-hand side in assignment"),
    ] {
        match parse(source) {
            Ok(_) => panic!("expected error for {source:?}"),
            Err(error) => assert!(
                error.message.contains(message),
                "{source:?}: {:?} does not mention {message:?}",
                error.message
            ),
        }
    }
}

#[test]
fn syntax_errors_report_line_and_column() {
    let error = parse("var a = 1;\nvar b = ;").expect_err("syntax error");
    assert_eq!(error.line, 2);
    assert_eq!(error.column, 9);
    assert_eq!(error.pos, 19);
    assert_eq!(error.to_string(), "2:9: Expression expected");
}

#[test]
fn character_set_text_is_not_valid_javascript() {
    assert!(parse("[]()!+[]()!+").is_err());
    assert!(parse("(![]+[])[+[]]").is_ok());
}

#[test]
fn deep_nesting_is_rejected_not_overflowed() {
    let source = format!("x = {}1{};", "(".repeat(5_000), ")".repeat(5_000));
    let result = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(move || parse(&source).map(|_| ()))
        .expect("spawn parser thread")
        .join()
        .expect("parser thread");
    let error = result.expect_err("too deep");
    assert!(error.message.contains("nested too deeply"));
}

#[test]
fn nodes_serialize_to_json() {
    let parsed = parse_ok("a;");
    let statement = statements(&parsed)[0];
    let node = parsed.arena.get(statement).expect("node");
    let json = serde_json::to_value(node).expect("serialize");
    assert!(json["data"]["ExpressionStatement"].is_object());
}
