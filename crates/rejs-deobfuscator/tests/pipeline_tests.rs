//! End-to-end runs through the pass pipeline.

use rejs_deobfuscator::transforms::{ExpressionSimplifier, StringDecoder};
use rejs_deobfuscator::{
    Configuration, Deobfuscator, PassError, PassKind, PassStatus, PrinterOptions, QuoteStyle,
    Transformation, deobfuscate,
};
use rejs_parser::{NodeArena, NodeIndex};

const PROXY_SOURCE: &str =
    "var arr = [\"Hello\", \"World\"]; function p(a, b) { return arr[a + b]; } p(0, 1);";

fn only(pass: PassKind) -> Configuration {
    let mut config = Configuration::none();
    config.set(pass, true);
    config
}

fn run(source: &str, config: Configuration) -> String {
    deobfuscate(source, &config).unwrap_or_else(|error| panic!("parse {source:?}: {error}"))
}

/// Always fails, optionally after running another pass.
struct FailingPass {
    edit_first: Option<Box<dyn Transformation>>,
}

impl Transformation for FailingPass {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn execute(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<bool, PassError> {
        if let Some(pass) = &self.edit_first {
            pass.execute(arena, root)?;
        }
        Err(PassError::Malformed("forced failure".to_string()))
    }
}

// =============================================================================
// Documented examples
// =============================================================================

#[test]
fn test_packed_array_example() {
    assert_eq!(
        run(
            "var a=[\"x\",\"log\"]; console[a[1]](a[0]);",
            only(PassKind::UnpackArrays)
        ),
        "console.log(\"x\");"
    );
}

#[test]
fn test_packed_array_inside_class_method() {
    assert_eq!(
        run(
            "const arr = [\"log\", \"hi\"]; class G { greet() { console[arr[0]](`${arr[1]}!`); } }",
            only(PassKind::UnpackArrays)
        ),
        "class G {\n  greet() {\n    console.log(`${\"hi\"}!`);\n  }\n}"
    );
}

#[test]
fn test_proxy_example() {
    let output = run(PROXY_SOURCE, only(PassKind::ProxyFunctions));
    assert!(output.ends_with("\n\"World\";"), "{output}");
    assert!(output.contains("function p(a, b)"));
}

#[test]
fn test_character_set_input_returns_parse_error() {
    assert!(deobfuscate("[]()!+[]()!+", &Configuration::all()).is_err());
}

#[test]
fn test_documented_rewrites() {
    let dead = only(PassKind::RemoveDeadCode);
    assert_eq!(run("if (true) { f(); } else { g(); }", dead), "f();");
    assert_eq!(run("if (0) { f(); }", dead), "");
    assert_eq!(run("function unused(){} unused2 = 1;", dead), "unused2 = 1;");

    let simplify = only(PassKind::SimplifyExpressions);
    assert_eq!(run("1+2", simplify), "3;");
    assert_eq!(run("a+2", simplify), "a + 2;");
    assert_eq!(run("x/0", simplify), "x / 0;");
}

#[test]
fn test_no_passes_only_reprints() {
    assert_eq!(
        run("if (true) { f(); }", Configuration::none()),
        "if (true) {\n  f();\n}"
    );
}

// =============================================================================
// Orchestration
// =============================================================================

#[test]
fn test_passes_run_in_fixed_order() {
    let config = Configuration {
        remove_dead_code: true,
        unpack_arrays: true,
        remove_proxy_functions: true,
        ..Configuration::none()
    };
    let report = Deobfuscator::new(config).run("x = 1;").expect("parse");
    let names: Vec<&str> = report.outcomes.iter().map(|outcome| outcome.pass).collect();
    assert_eq!(
        names,
        vec!["removeProxyFunctions", "unpackArrays", "removeDeadCode"]
    );
    assert_eq!(report.rounds, 1);
}

#[test]
fn test_failing_pass_does_not_stop_pipeline() {
    let report = Deobfuscator::new(Configuration::none())
        .with_passes(vec![
            Box::new(FailingPass { edit_first: None }),
            Box::new(ExpressionSimplifier),
        ])
        .run("x = 1 + 2;")
        .expect("parse");
    assert_eq!(report.output, "x = 3;");
    assert_eq!(report.failures().count(), 1);
    assert_eq!(
        report.outcomes[0].status,
        PassStatus::Failed("forced failure".to_string())
    );
    assert_eq!(report.outcomes[1].status, PassStatus::Edited);
}

#[test]
fn test_failed_pass_edits_are_kept() {
    let report = Deobfuscator::new(Configuration::none())
        .with_passes(vec![Box::new(FailingPass {
            edit_first: Some(Box::new(StringDecoder)),
        })])
        .run("s = '\\x41';")
        .expect("parse");
    assert_eq!(report.output, "s = \"A\";");
    assert!(!report.edited());
}

#[test]
fn test_run_until_stable_reaches_fixed_point() {
    let once = run(PROXY_SOURCE, Configuration::all());
    assert_eq!(once, "var arr = [\"Hello\", \"World\"];\n\"World\";");

    let report = Deobfuscator::new(Configuration::all())
        .run_until_stable(PROXY_SOURCE, 10)
        .expect("parse");
    assert_eq!(report.output, "\"World\";");
    assert_eq!(report.rounds, 3);

    let again = Deobfuscator::new(Configuration::all())
        .run_until_stable(&report.output, 10)
        .expect("parse");
    assert!(!again.edited());
    assert_eq!(again.output, report.output);
}

#[test]
fn test_run_until_stable_clamps_rounds() {
    let report = Deobfuscator::new(only(PassKind::SimplifyExpressions))
        .run_until_stable("x = 1 + 2;", 0)
        .expect("parse");
    assert_eq!(report.rounds, 1);
}

#[test]
fn test_printer_options_apply_to_output() {
    let report = Deobfuscator::new(only(PassKind::DecodeStrings))
        .with_printer_options(PrinterOptions {
            quote_style: QuoteStyle::Single,
            indent_width: 4,
        })
        .run("if (a) { s = \"\\x48i\"; }")
        .expect("parse");
    assert_eq!(report.output, "if (a) {\n    s = 'Hi';\n}");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_configuration_accepts_string_flags() {
    let config: Configuration = serde_json::from_str(
        r#"{ "unpackArrays": "yes", "removeDeadCode": true, "decodeStrings": "off" }"#,
    )
    .expect("valid configuration");
    assert!(config.unpack_arrays);
    assert!(config.remove_dead_code);
    assert!(!config.decode_strings);
    assert!(!config.simplify_expressions);
    assert_eq!(
        config.enabled_passes(),
        vec![PassKind::UnpackArrays, PassKind::RemoveDeadCode]
    );

    assert!(serde_json::from_str::<Configuration>(r#"{ "unpackArrays": "maybe" }"#).is_err());
}

#[test]
fn test_configuration_helpers() {
    assert!(Configuration::none().is_empty());
    assert_eq!(Configuration::all().enabled_passes(), PassKind::PIPELINE_ORDER.to_vec());
    let merged = only(PassKind::DecodeStrings).union(only(PassKind::UnpackArrays));
    assert!(merged.decode_strings && merged.unpack_arrays);
    assert!(!merged.remove_dead_code);
    assert_eq!(PassKind::ProxyFunctions.to_string(), "removeProxyFunctions");
}
