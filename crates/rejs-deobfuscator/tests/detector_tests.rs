//! Tests for obfuscation technique detection.

use rejs_deobfuscator::{
    Configuration, DetectionResult, UnreversibleEncoding, detect, detect_character_set_obfuscation,
    detect_identifier_mangling_scheme,
};

fn detected(source: &str) -> DetectionResult {
    detect(source).unwrap_or_else(|error| panic!("detect {source:?}: {error}"))
}

// =============================================================================
// Text checks
// =============================================================================

#[test]
fn test_character_set_detection() {
    assert!(detect_character_set_obfuscation("[]()!+[]()!+"));
    assert!(detect_character_set_obfuscation("(![]+[])[+[]]"));
    assert!(!detect_character_set_obfuscation("  (![]+[])[+[]]\n"));
    assert!(!detect_character_set_obfuscation(" []() "));
    assert!(!detect_character_set_obfuscation(""));
    assert!(!detect_character_set_obfuscation("   "));
    assert!(!detect_character_set_obfuscation("[]+a"));
}

#[test]
fn test_identifier_mangling_detection() {
    assert!(detect_identifier_mangling_scheme("var _0x1a2b = 1;"));
    assert!(detect_identifier_mangling_scheme("f(_0xABC)"));
    assert!(!detect_identifier_mangling_scheme("var a_0x1 = 1;"));
    assert!(!detect_identifier_mangling_scheme("var _0x = 1;"));
    assert!(!detect_identifier_mangling_scheme("var _0x12g = 1;"));
    assert!(!detect_identifier_mangling_scheme("var plain = 0x1f;"));
}

#[test]
fn test_character_set_is_terminal_even_unparsable() {
    let result = detected("[]()!+[]()!+");
    assert!(result.is_terminal());
    assert!(!result.is_clean());
    assert_eq!(result.unreversible, Some(UnreversibleEncoding::CharacterSet));
    assert_eq!(result.recommended, Configuration::none());
    assert_eq!(result.labels, vec!["character set encoding".to_string()]);
}

#[test]
fn test_mangled_identifiers_are_terminal() {
    let result = detected("var _0x3f2a = [\"a\"]; f(_0x3f2a[0]);");
    assert_eq!(
        result.unreversible,
        Some(UnreversibleEncoding::IdentifierMangling)
    );
    assert!(!result.packed_string_array);
    assert!(result.recommended.is_empty());
}

// =============================================================================
// Tree detectors
// =============================================================================

#[test]
fn test_packed_string_array() {
    let result = detected("var a = [\"x\", \"y\"]; f(a[0]);");
    assert!(result.packed_string_array);
    assert!(result.recommended.unpack_arrays);

    assert!(!detected("var a = []; f(a[0]);").packed_string_array);
    assert!(!detected("var a = [\"x\", 1]; f(a[0]);").packed_string_array);
    assert!(!detected("var a = [\"x\"]; f(a);").packed_string_array);
}

#[test]
fn test_proxy_function_shapes() {
    assert!(detected("function p(i) { return arr[i]; }").proxy_function);
    assert!(detected("var p = function () { return o.x; };").proxy_function);
    assert!(detected("var p = () => { return o[1]; };").proxy_function);
    assert!(!detected("function f() { return 1; }").proxy_function);
    assert!(!detected("function f(i) { g(); return arr[i]; }").proxy_function);

    let result = detected("function p(i) { return arr[i]; }");
    assert!(result.recommended.remove_proxy_functions);
}

#[test]
fn test_encoded_string_literals() {
    assert!(detected("var s = \"\\x48i\";").encoded_strings);
    assert!(detected("var s = '\\u0041';").encoded_strings);
    assert!(!detected("var s = \"plain\";").encoded_strings);
    assert!(!detected("var s = 'single';").encoded_strings);
    assert!(!detected("var s = \"a\\nb\";").encoded_strings);
    assert!(detected("var s = \"\\x48i\";").recommended.decode_strings);
}

#[test]
fn test_string_proxy_function_must_be_called() {
    let called = detected("function log(m) { console.log(m); } log(\"x\");");
    assert!(called.string_proxy_function);
    assert!(called.recommended.string_proxy_functions);
    assert!(!detected("function log(m) { console.log(m); }").string_proxy_function);
}

#[test]
fn test_constant_expressions() {
    assert!(detected("x = 0x10;").constant_expressions);
    assert!(detected("x = 1 + 2;").constant_expressions);
    assert!(detected("x = \"a\" + \"b\";").recommended.simplify_expressions);
    assert!(!detected("x = a + 1;").constant_expressions);
    assert!(!detected("x = 1 / 0;").constant_expressions);
}

#[test]
fn test_dead_branches() {
    assert!(detected("if (true) a();").dead_branches);
    assert!(detected("if (!1) a(); else b();").recommended.remove_dead_code);
    assert!(!detected("if (a) b();").dead_branches);
}

#[test]
fn test_control_flow_flattening_is_label_only() {
    let result = detected(
        "var order = \"1|0\".split(\"|\"), i = 0;\n\
         while (true) {\n\
           switch (order[i++]) {\n\
             case \"0\": a(); continue;\n\
             case \"1\": b(); continue;\n\
           }\n\
           break;\n\
         }",
    );
    assert!(result.control_flow_flattening);
    assert_eq!(result.labels, vec!["control flow flattening".to_string()]);
    assert!(result.recommended.is_empty());
}

// =============================================================================
// Aggregate
// =============================================================================

#[test]
fn test_labels_follow_detector_order() {
    let result = detected("var a = [\"x\"]; if (true) f(a[0]);");
    assert_eq!(
        result.labels,
        vec!["packed string array".to_string(), "dead branches".to_string()]
    );
    assert_eq!(
        result.recommended,
        Configuration {
            unpack_arrays: true,
            remove_dead_code: true,
            ..Configuration::none()
        }
    );
}

#[test]
fn test_clean_source() {
    let result = detected("var x = f(1);\nconsole.log(x);");
    assert!(result.is_clean());
    assert!(!result.is_terminal());
    assert!(result.labels.is_empty());
}

#[test]
fn test_parse_error_is_reported() {
    assert!(detect("var = ;").is_err());
}

#[test]
fn test_result_serializes_in_camel_case() {
    let json = serde_json::to_value(detected("var a = [\"x\"]; f(a[0]);")).expect("serialize");
    assert_eq!(json["packedStringArray"], true);
    assert_eq!(json["recommended"]["unpackArrays"], true);
    assert_eq!(json["unreversible"], serde_json::Value::Null);

    let json = serde_json::to_value(detected("[]+[]")).expect("serialize");
    assert_eq!(json["unreversible"], "characterSet");
}
