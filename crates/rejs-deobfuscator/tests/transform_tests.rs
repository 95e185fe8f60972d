//! Tests for the individual rewrite passes.

use rejs_deobfuscator::transforms::{
    ArrayUnpacker, DeadCodeRemover, ExpressionSimplifier, ProxyFunctionRemover, StringDecoder,
    StringProxyInliner,
};
use rejs_deobfuscator::Transformation;
use rejs_emitter::render;
use rejs_parser::parse;

/// Run `pass` once; returns the printed result and whether it reported a
/// change.
fn apply(pass: &dyn Transformation, source: &str) -> (String, bool) {
    let mut parsed = parse(source).unwrap_or_else(|error| panic!("parse {source:?}: {error}"));
    let changed = pass
        .execute(&mut parsed.arena, parsed.root)
        .unwrap_or_else(|error| panic!("{} failed: {error}", pass.name()));
    (render(&parsed.arena, parsed.root), changed)
}

fn output(pass: &dyn Transformation, source: &str) -> String {
    apply(pass, source).0
}

/// A second run over the pass's own output changes nothing.
fn assert_idempotent(pass: &dyn Transformation, source: &str) {
    let first = output(pass, source);
    let (second, changed) = apply(pass, &first);
    assert!(!changed, "{} changed its own output:\n{first}", pass.name());
    assert_eq!(second, first);
}

// =============================================================================
// Array unpacker
// =============================================================================

#[test]
fn test_unpack_arrays_inlines_and_dots_callee() {
    assert_eq!(
        output(&ArrayUnpacker, "var a = [\"x\", \"log\"]; console[a[1]](a[0]);"),
        "console.log(\"x\");"
    );
}

#[test]
fn test_unpack_arrays_keeps_array_with_remaining_reads() {
    assert_eq!(
        output(&ArrayUnpacker, "var a = [\"x\", \"y\"]; f(a[0], a[i]);"),
        "var a = [\"x\", \"y\"];\nf(\"x\", a[i]);"
    );
}

#[test]
fn test_unpack_arrays_skips_out_of_bounds() {
    let (text, changed) = apply(&ArrayUnpacker, "var a = [\"x\"]; f(a[1]);");
    assert!(!changed);
    assert_eq!(text, "var a = [\"x\"];\nf(a[1]);");
}

#[test]
fn test_unpack_arrays_skips_escaping_arrays() {
    let source = "var a = [\"x\"]; a[0] = \"y\"; f(a[0]);";
    assert_eq!(apply(&ArrayUnpacker, source).1, false);
    assert_eq!(apply(&ArrayUnpacker, "var a = [\"x\"]; g(a); f(a[0]);").1, false);
    assert_eq!(apply(&ArrayUnpacker, "var a = [\"x\"]; a.push(1); f(a[0]);").1, false);
}

#[test]
fn test_unpack_arrays_keeps_computed_non_identifier_keys() {
    assert_eq!(
        output(&ArrayUnpacker, "var a = [\"my-key\"]; o[a[0]]();"),
        "o[\"my-key\"]();"
    );
}

#[test]
fn test_unpack_arrays_in_function_scope() {
    assert_eq!(
        output(
            &ArrayUnpacker,
            "function g() { var a = [\"x\", 2]; return a[0] + a[1]; }"
        ),
        "function g() {\n  return \"x\" + 2;\n}"
    );
}

#[test]
fn test_unpack_arrays_nested_read_in_one_run() {
    let source = "var a = [1, \"x\"]; f(a[a[0]]);";
    assert_eq!(output(&ArrayUnpacker, source), "f(\"x\");");
    assert_idempotent(&ArrayUnpacker, source);
}

#[test]
fn test_unpack_arrays_index_from_another_array() {
    assert_eq!(
        output(&ArrayUnpacker, "var b = [\"y\", \"z\"]; var i = [1]; f(b[i[0]]);"),
        "f(\"z\");"
    );
}

#[test]
fn test_unpack_arrays_is_idempotent() {
    assert_idempotent(
        &ArrayUnpacker,
        "var a = [\"x\", \"log\"]; console[a[1]](a[0]); var b = [\"k\"]; f(b[0], b[j]);",
    );
}

// =============================================================================
// Proxy-function remover
// =============================================================================

const PROXY_PRELUDE: &str = "var arr = [\"Hello\", \"World\"];\nfunction p(a, b) { return arr[a + b]; }\n";
const PROXY_PRINTED: &str =
    "var arr = [\"Hello\", \"World\"];\nfunction p(a, b) {\n  return arr[a + b];\n}\n";

#[test]
fn test_proxy_function_call_becomes_element() {
    let source = format!("{PROXY_PRELUDE}p(0, 1);");
    assert_eq!(
        output(&ProxyFunctionRemover, &source),
        format!("{PROXY_PRINTED}\"World\";")
    );
}

#[test]
fn test_proxy_function_expression_variant() {
    assert_eq!(
        output(
            &ProxyFunctionRemover,
            "var arr = [1, 2, 3]; var get = function (i) { return arr[i - 1]; }; x = get(3);"
        ),
        "var arr = [1, 2, 3];\nvar get = function (i) {\n  return arr[i - 1];\n};\nx = 3;"
    );
}

#[test]
fn test_proxy_function_skips_unprovable_calls() {
    for call in ["p(i, 1);", "p(0);", "p(1, 1);", "p(-1, 1);"] {
        let source = format!("{PROXY_PRELUDE}{call}");
        let (text, changed) = apply(&ProxyFunctionRemover, &source);
        assert!(!changed, "{call}");
        assert_eq!(text, format!("{PROXY_PRINTED}{call}"));
    }
}

#[test]
fn test_proxy_function_division_by_zero_abstains() {
    let source = "var arr = [1]; function q(a) { return arr[a / 0]; } q(1);";
    assert!(!apply(&ProxyFunctionRemover, source).1);
}

#[test]
fn test_reassigned_proxy_is_not_inlined() {
    let source = format!("{PROXY_PRELUDE}p = null; p(0, 1);");
    assert!(!apply(&ProxyFunctionRemover, &source).1);
}

#[test]
fn test_proxy_function_is_idempotent() {
    assert_idempotent(
        &ProxyFunctionRemover,
        &format!("{PROXY_PRELUDE}x = p(0, 0) + p(1, 0); y = p(i, 0);"),
    );
}

#[test]
fn test_nested_proxy_calls_resolve_in_one_run() {
    let source = "var arr = [1, \"x\"]; function p(a) { return arr[a]; } f(p(p(0)));";
    assert_eq!(
        output(&ProxyFunctionRemover, source),
        "var arr = [1, \"x\"];\nfunction p(a) {\n  return arr[a];\n}\nf(\"x\");"
    );
    assert_idempotent(&ProxyFunctionRemover, source);
}

// =============================================================================
// String-proxy inliner
// =============================================================================

#[test]
fn test_string_proxy_inlined_and_removed() {
    assert_eq!(
        output(
            &StringProxyInliner,
            "function greet(name) { console.log(\"hi \" + name); } greet(\"bob\");"
        ),
        "console.log(\"hi \" + \"bob\");"
    );
}

#[test]
fn test_string_proxy_kept_while_referenced() {
    assert_eq!(
        output(
            &StringProxyInliner,
            "function greet(n) { console.log(n); } greet(\"a\"); x = greet;"
        ),
        "function greet(n) {\n  console.log(n);\n}\nconsole.log(\"a\");\nx = greet;"
    );
}

#[test]
fn test_string_proxy_chain_collapses() {
    assert_eq!(
        output(
            &StringProxyInliner,
            "function a(m) { b(m); } function b(m) { console.log(m); } a(\"z\");"
        ),
        "console.log(\"z\");"
    );
}

#[test]
fn test_string_proxy_respects_shadowing() {
    let source = "function show(m) { log(m); } function outer() { var log = 1; show(\"x\"); }";
    assert!(!apply(&StringProxyInliner, source).1);
}

#[test]
fn test_string_proxy_preconditions() {
    for source in [
        "function f() { this.x(); } f();",
        "function f() { g(arguments); } f();",
        "function f(m) { g(m); } f(h());",
        "function f(m) { g(m); } f(1, 2);",
        "function f(m) { g(m); } x = f(\"a\");",
        "function f(m) { m = 1; } f(2);",
        "function a() { b(); } function b() { a(); } a();",
    ] {
        assert!(!apply(&StringProxyInliner, source).1, "{source}");
    }
}

#[test]
fn test_string_proxy_is_idempotent() {
    assert_idempotent(
        &StringProxyInliner,
        "function f(m) { console.log(m); } f(\"a\"); f(b); x = f;",
    );
}

// =============================================================================
// String literal normalizer
// =============================================================================

#[test]
fn test_decode_strings() {
    assert_eq!(
        output(&StringDecoder, "var s = '\\x48ello';"),
        "var s = \"Hello\";"
    );
    assert_eq!(
        output(&StringDecoder, "var s = 'say \"hi\"';"),
        "var s = \"say \\\"hi\\\"\";"
    );
    assert_eq!(
        output(&StringDecoder, "var s = \"\\u0041\\n\";"),
        "var s = \"A\\n\";"
    );
}

#[test]
fn test_decode_strings_is_idempotent() {
    assert_idempotent(&StringDecoder, "var s = '\\x48ello'; t = \"\\u00e9\\t\";");
}

// =============================================================================
// Expression simplifier
// =============================================================================

#[test]
fn test_simplify_folds_constants() {
    assert_eq!(output(&ExpressionSimplifier, "x = 1 + 2;"), "x = 3;");
    assert_eq!(output(&ExpressionSimplifier, "x = 1 + 2 * 3;"), "x = 7;");
    assert_eq!(output(&ExpressionSimplifier, "x = 2 - 5;"), "x = -3;");
    assert_eq!(output(&ExpressionSimplifier, "x = 1 < 2;"), "x = true;");
    assert_eq!(
        output(&ExpressionSimplifier, "x = \"a\" + \"b\" + c;"),
        "x = \"ab\" + c;"
    );
    assert_eq!(
        output(&ExpressionSimplifier, "function f() { return 4 * 2; }"),
        "function f() {\n  return 8;\n}"
    );
}

#[test]
fn test_simplify_rewrites_non_decimal_numbers() {
    assert_eq!(output(&ExpressionSimplifier, "x = 0x10 + y;"), "x = 16 + y;");
    assert_eq!(output(&ExpressionSimplifier, "x = [0b11, 0o7];"), "x = [3, 7];");
}

#[test]
fn test_simplify_folds_template_operands() {
    assert_eq!(output(&ExpressionSimplifier, "x = `${1 + 2}`;"), "x = `${3}`;");
    assert_eq!(
        output(&ExpressionSimplifier, "x = \"a\" + `b${1}`;"),
        "x = \"ab1\";"
    );
    assert!(!apply(&ExpressionSimplifier, "x = \"a\" + `${o}`;").1);
}

#[test]
fn test_simplify_leaves_unknowns() {
    for source in ["x = a + 2;", "x = y / 0;", "x = 1 / 0;", "x = f() + 1;"] {
        let (text, changed) = apply(&ExpressionSimplifier, source);
        assert!(!changed, "{source}");
        assert_eq!(text, source);
    }
}

// =============================================================================
// Dead-code remover
// =============================================================================

#[test]
fn test_dead_code_constant_branches() {
    assert_eq!(
        output(&DeadCodeRemover, "if (true) { f(); } else { g(); }"),
        "f();"
    );
    assert_eq!(output(&DeadCodeRemover, "if (0) { f(); }"), "");
    assert_eq!(output(&DeadCodeRemover, "if (false) f(); else g();"), "g();");
    assert_eq!(
        output(&DeadCodeRemover, "if (a) f(); else if (true) g();"),
        "if (a) f(); else g();"
    );
    assert!(!apply(&DeadCodeRemover, "if (x) f();").1);
}

#[test]
fn test_dead_code_keeps_block_with_lexical_declarations() {
    assert_eq!(
        output(&DeadCodeRemover, "if (1) { let a = 1; f(a); }"),
        "{\n  let a = 1;\n  f(a);\n}"
    );
}

#[test]
fn test_dead_code_keeps_branch_declaring_hoisted_var() {
    assert!(!apply(&DeadCodeRemover, "if (false) { var v = 1; } f(v);").1);
}

#[test]
fn test_dead_code_removes_unreferenced_declarations() {
    assert_eq!(
        output(&DeadCodeRemover, "function unused(){} unused2 = 1;"),
        "unused2 = 1;"
    );
    assert_eq!(
        output(&DeadCodeRemover, "var a = 1, b = 2; f(b);"),
        "var b = 2;\nf(b);"
    );
    assert_eq!(
        output(&DeadCodeRemover, "for (var i = 0;;) {}"),
        "for (;;) {}"
    );
    assert_eq!(
        output(&DeadCodeRemover, "var c = f();"),
        "var c = f();"
    );
}

#[test]
fn test_dead_code_single_run_is_partial() {
    let source = "function used() {} if (false) { used(); }";
    let first = output(&DeadCodeRemover, source);
    assert_eq!(first, "function used() {}");
    assert_eq!(output(&DeadCodeRemover, &first), "");
}

#[test]
fn test_dead_code_keeps_pattern_and_class_declarations() {
    for source in [
        "var { a } = o;",
        "var [b, ...c] = d;",
        "function f({ p }, q = 1) {}\nf();",
        "class Unused {}",
    ] {
        let (text, changed) = apply(&DeadCodeRemover, source);
        assert!(!changed, "{source}");
        assert_eq!(text, render_source(source));
    }
}

#[test]
fn test_dead_code_keeps_declarations_inside_with() {
    let source = "with (o) {\n  var v = 1;\n}";
    let (text, changed) = apply(&DeadCodeRemover, source);
    assert!(!changed);
    assert_eq!(text, source);
}

fn render_source(source: &str) -> String {
    let parsed = parse(source).unwrap_or_else(|error| panic!("parse {source:?}: {error}"));
    render(&parsed.arena, parsed.root)
}
