//! Round-trip printing of parsed programs.

use rejs_emitter::{Printer, PrinterOptions, QuoteStyle, render};
use rejs_parser::parse;

fn print(source: &str) -> String {
    let parsed = parse(source).unwrap_or_else(|error| panic!("parse {source:?}: {error}"));
    render(&parsed.arena, parsed.root)
}

#[test]
fn test_variable_statements() {
    assert_eq!(print("var a = 1, b;"), "var a = 1, b;");
    assert_eq!(print("let x = y\nconst z = 2"), "let x = y;\nconst z = 2;");
}

#[test]
fn test_function_declaration_is_indented() {
    assert_eq!(
        print("function f(a, b) { if (a) { return a + b; } }"),
        "function f(a, b) {\n  if (a) {\n    return a + b;\n  }\n}"
    );
    assert_eq!(print("function g() {}"), "function g() {}");
}

#[test]
fn test_function_name_touches_parameters() {
    assert_eq!(
        print("function p(a, b) { return arr[a + b]; }"),
        "function p(a, b) {\n  return arr[a + b];\n}"
    );
    assert_eq!(print("x = function named() {};"), "x = function named() {};");
    assert_eq!(print("x = function () {};"), "x = function () {};");
}

#[test]
fn test_if_else_chain() {
    assert_eq!(
        print("if (a) { b(); } else if (c) d(); else { e(); }"),
        "if (a) {\n  b();\n} else if (c) d(); else {\n  e();\n}"
    );
}

#[test]
fn test_loops() {
    assert_eq!(
        print("for (var i = 0; i < n; i++) {}"),
        "for (var i = 0; i < n; i++) {}"
    );
    assert_eq!(print("for (;;);"), "for (;;);");
    assert_eq!(print("for (var k in o) f(k);"), "for (var k in o) f(k);");
    assert_eq!(print("for (const v of list) {}"), "for (const v of list) {}");
    assert_eq!(print("while (x) x--;"), "while (x) x--;");
    assert_eq!(print("do x(); while (y)"), "do x(); while (y);");
}

#[test]
fn test_switch_statement() {
    assert_eq!(
        print("switch (x) { case 1: a(); break; default: b(); }"),
        "switch (x) {\n  case 1:\n    a();\n    break;\n  default:\n    b();\n}"
    );
}

#[test]
fn test_try_statement() {
    assert_eq!(
        print("try { a(); } catch (e) { b(); } finally { c(); }"),
        "try {\n  a();\n} catch (e) {\n  b();\n} finally {\n  c();\n}"
    );
}

#[test]
fn test_labels_and_jumps() {
    assert_eq!(
        print("outer: for (;;) { break outer; }"),
        "outer: for (;;) {\n  break outer;\n}"
    );
    assert_eq!(print("debugger;"), "debugger;");
}

#[test]
fn test_literals_keep_raw_text() {
    assert_eq!(print("var s = 'x\\x41';"), "var s = 'x\\x41';");
    assert_eq!(print("var n = 0x10;"), "var n = 0x10;");
    assert_eq!(print("x = /ab+c/gi.test(s);"), "x = /ab+c/gi.test(s);");
    assert_eq!(print("x = [true, false, null, this];"), "x = [true, false, null, this];");
}

#[test]
fn test_object_literal_forms() {
    assert_eq!(
        print("o = { a: 1, \"b\": 2, [c]: 3, d, e() { return 1; } };"),
        "o = { a: 1, \"b\": 2, [c]: 3, d, e() {\n  return 1;\n} };"
    );
    assert_eq!(print("o = {};"), "o = {};");
}

#[test]
fn test_arrow_functions() {
    assert_eq!(print("f = (x) => ({ a: x });"), "f = (x) => ({ a: x });");
    assert_eq!(print("g = x => x * 2"), "g = (x) => x * 2;");
    assert_eq!(print("h = () => { run(); }"), "h = () => {\n  run();\n};");
}

#[test]
fn test_array_holes() {
    assert_eq!(print("x = [1, , 2];"), "x = [1, , 2];");
}

#[test]
fn test_new_always_prints_arguments() {
    assert_eq!(print("new Foo"), "new Foo();");
    assert_eq!(print("new Foo(1, 2)"), "new Foo(1, 2);");
}

#[test]
fn test_unary_operators() {
    assert_eq!(print("typeof x === \"string\""), "typeof x === \"string\";");
    assert_eq!(print("void 0"), "void 0;");
    assert_eq!(print("- -a"), "- -a;");
    assert_eq!(print("+ ++a"), "+ ++a;");
    assert_eq!(print("!(a && b)"), "!(a && b);");
    assert_eq!(print("delete o.p"), "delete o.p;");
}

#[test]
fn test_statement_start_is_parenthesized() {
    assert_eq!(
        print("(function () { x(); })();"),
        "(function () {\n  x();\n})();"
    );
    assert_eq!(print("({}).toString();"), "({}).toString();");
    assert_eq!(print("(let)[0] = 1;"), "(let)[0] = 1;");
    assert_eq!(print("(1).toString();"), "(1).toString();");
}

#[test]
fn test_single_quote_option_applies_to_synthesized_strings() {
    let mut parsed = parse("x = y;").expect("parse");
    let y = parsed
        .arena
        .preorder(parsed.root)
        .into_iter()
        .find(|&index| parsed.arena.is_identifier_named(index, "y"))
        .expect("y");
    let literal = parsed.arena.add_string_literal("it's \"quoted\"");
    assert!(parsed.arena.replace(y, literal));

    assert_eq!(
        render(&parsed.arena, parsed.root),
        "x = \"it's \\\"quoted\\\"\";"
    );
    let options = PrinterOptions {
        quote_style: QuoteStyle::Single,
        ..PrinterOptions::default()
    };
    assert_eq!(
        Printer::new(&parsed.arena, options).print(parsed.root),
        "x = 'it\\'s \"quoted\"';"
    );
}

#[test]
fn test_indent_width_option() {
    let parsed = parse("if (a) { b(); }").expect("parse");
    let options = PrinterOptions {
        indent_width: 4,
        ..PrinterOptions::default()
    };
    assert_eq!(
        Printer::new(&parsed.arena, options).print(parsed.root),
        "if (a) {\n    b();\n}"
    );
}

#[test]
fn test_template_literals_keep_raw_text() {
    assert_eq!(print("x = `a${b}c`;"), "x = `a${b}c`;");
    assert_eq!(print("x = `\\n${a + b}${c}`;"), "x = `\\n${a + b}${c}`;");
    assert_eq!(print("tag`a${b}`;"), "tag`a${b}`;");
}

#[test]
fn test_classes() {
    assert_eq!(print("class A { m() {} }"), "class A {\n  m() {}\n}");
    assert_eq!(print("class A {}"), "class A {}");
    assert_eq!(
        print("class B extends A { constructor() { super(); } static get g() { return 1; } #f = 1; static {} }"),
        "class B extends A {\n  constructor() {\n    super();\n  }\n  static get g() {\n    return 1;\n  }\n  #f = 1;\n  static {}\n}"
    );
    assert_eq!(print("x = class {};"), "x = class {};");
    assert_eq!(print("(class {}).name;"), "(class {}).name;");
}

#[test]
fn test_accessors_and_methods_in_object_literals() {
    assert_eq!(
        print("x = { get g() { return 1; } };"),
        "x = { get g() {\n  return 1;\n} };"
    );
    assert_eq!(
        print("x = { set s(v) {}, async m() {}, *g() {}, [k]() {} };"),
        "x = { set s(v) {}, async m() {}, *g() {}, [k]() {} };"
    );
}

#[test]
fn test_destructuring_and_defaults() {
    assert_eq!(
        print("var { a, b: [c = 1], ...d } = o;"),
        "var { a, b: [c = 1], ...d } = o;"
    );
    assert_eq!(print("[a, b] = [b, a];"), "[a, b] = [b, a];");
    assert_eq!(print("({ a, b = 2 } = o);"), "({ a, b = 2 } = o);");
    assert_eq!(
        print("function f(a = 1, { b }, ...c) {}"),
        "function f(a = 1, { b }, ...c) {}"
    );
}

#[test]
fn test_spread_arguments_and_elements() {
    assert_eq!(
        print("f(...a, [...b], { ...c });"),
        "f(...a, [...b], { ...c });"
    );
}

#[test]
fn test_async_and_generator_functions() {
    assert_eq!(
        print("async function f() { await g(); }"),
        "async function f() {\n  await g();\n}"
    );
    assert_eq!(
        print("function* g() { yield 1; yield* h(); }"),
        "function* g() {\n  yield 1;\n  yield* h();\n}"
    );
    assert_eq!(print("x = async (a) => a;"), "x = async (a) => a;");
    assert_eq!(
        print("async function f() { for await (const x of y) {} }"),
        "async function f() {\n  for await (const x of y) {}\n}"
    );
}

#[test]
fn test_optional_chains() {
    assert_eq!(print("a?.b.c?.[d]?.();"), "a?.b.c?.[d]?.();");
    assert_eq!(print("(a?.b).c;"), "(a?.b).c;");
    assert_eq!(print("new (a?.b)();"), "new (a?.b)();");
}

#[test]
fn test_other_modern_expressions() {
    assert_eq!(print("x = 10n;"), "x = 10n;");
    assert_eq!(
        print("function F() { return new.target; }"),
        "function F() {\n  return new.target;\n}"
    );
    assert_eq!(print("import('m');"), "import('m');");
    assert_eq!(print("with (o) { a(); }"), "with (o) {\n  a();\n}");
}
