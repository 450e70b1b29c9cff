mod common;

use common::{PHP70, codes, init_tracing, lint_comments, stream};
use phpdoc_lint::{
    FindingCode, FunctionCommentCheck, LenientStrategy, Linter, PhpVersion, TokenSignatureReflector,
};

// ─── Locating the comment ───────────────────────────────────────────────────

#[test]
fn undocumented_function() {
    let report = lint_comments("<?php\nfunction compute($a)\n{\n}\n", PHP70);
    assert_eq!(codes(&report), vec!["Missing"]);
    assert_eq!(
        report.findings()[0].message(),
        "Missing doc comment for function compute()"
    );
}

#[test]
fn plain_comment_is_the_wrong_style() {
    let report = lint_comments("<?php\n// Computes.\nfunction compute()\n{\n}\n", PHP70);
    assert_eq!(codes(&report), vec!["WrongStyle"]);

    let report = lint_comments("<?php\n/* Computes. */\nfunction compute()\n{\n}\n", PHP70);
    assert_eq!(codes(&report), vec!["WrongStyle"]);
}

#[test]
fn blank_line_after_comment() {
    let src = "<?php\n/**\n * Computes.\n */\n\nfunction compute()\n{\n}\n";
    let report = lint_comments(src, PHP70);
    assert_eq!(codes(&report), vec!["SpacingAfter"]);
    assert_eq!(report.findings()[0].severity, phpdoc_lint::Severity::Error);
}

#[test]
fn blank_line_is_reported_even_for_inherited_docs() {
    let src = "<?php\n/**\n * {@inheritdoc}\n */\n\nfunction compute($a)\n{\n}\n";
    assert_eq!(codes(&lint_comments(src, PHP70)), vec!["SpacingAfter"]);
}

#[test]
fn closures_are_not_declarations() {
    let src = "<?php\n$f = function ($a) {\n    return $a;\n};\n";
    assert!(lint_comments(src, PHP70).is_empty());
}

// ─── @see and @throws ───────────────────────────────────────────────────────

#[test]
fn see_and_throws_need_content() {
    let src = "<?php\n/**\n * Computes.\n *\n * @see\n * @throws\n */\nfunction compute()\n{\n}\n";
    let report = lint_comments(src, PHP70);
    assert_eq!(codes(&report), vec!["EmptySees", "InvalidThrows"]);
    assert_eq!(
        report.findings()[1].message(),
        "Exception type missing for @throws tag in function comment"
    );
}

#[test]
fn see_and_throws_with_content() {
    let src = "<?php\n/**\n * Computes.\n *\n * @see Other::compute()\n * @throws \\LogicException When confused.\n */\nfunction compute()\n{\n}\n";
    assert!(lint_comments(src, PHP70).is_empty());
}

// ─── @return ────────────────────────────────────────────────────────────────

#[test]
fn value_return_needs_tag() {
    let src = "<?php\n/**\n * Computes.\n */\nfunction compute()\n{\n    return 42;\n}\n";
    let report = lint_comments(src, PHP70);
    assert_eq!(codes(&report), vec!["MissingReturn"]);

    let tokens = stream(src);
    let closer = tokens
        .indices()
        .find(|&i| tokens.kind(i) == phpdoc_lint::TokenKind::DocCommentCloseTag)
        .expect("comment closer");
    assert_eq!(report.findings()[0].anchor, closer);
}

#[test]
fn documented_return() {
    let src = "<?php\n/**\n * Computes.\n *\n * @return int\n */\nfunction compute()\n{\n    return 42;\n}\n";
    assert!(lint_comments(src, PHP70).is_empty());
}

#[test]
fn return_tag_without_type() {
    let src = "<?php\n/**\n * Computes.\n *\n * @return\n */\nfunction compute()\n{\n    return 42;\n}\n";
    assert_eq!(codes(&lint_comments(src, PHP70)), vec!["MissingReturnType"]);
}

#[test]
fn duplicate_return_stops_return_checks() {
    let src = "<?php\n/**\n * Computes.\n *\n * @return int\n * @return\n */\nfunction compute()\n{\n    return 42;\n}\n";
    assert_eq!(codes(&lint_comments(src, PHP70)), vec!["DuplicateReturn"]);
}

#[test]
fn constructors_are_exempt() {
    let src = r#"<?php
class Box
{
    /**
     * Builds.
     */
    public function __construct()
    {
        return $this;
    }
}
"#;
    assert!(lint_comments(src, PHP70).is_empty());
}

// ─── Strategies ─────────────────────────────────────────────────────────────

#[test]
fn lenient_strategy_requires_return_on_bodies_only() {
    init_tracing();
    let src = r#"<?php
abstract class Shape
{
    /**
     * Area.
     */
    abstract public function area();

    /**
     * Draws.
     *
     * @param int $wrong Ignored.
     */
    public function draw($canvas)
    {
    }
}
"#;
    let tokens = stream(src);
    let linter = Linter::new(PhpVersion::from_id(PHP70))
        .with_sniff(FunctionCommentCheck::new(LenientStrategy));
    let report = linter.process(&tokens, &TokenSignatureReflector);
    assert_eq!(report.codes(), vec![FindingCode::MissingReturn]);
}

// ─── Report rendering ───────────────────────────────────────────────────────

#[test]
fn report_json() {
    let src = "<?php\n/**\n * Computes.\n *\n * @param int  $a The value.\n */\nfunction compute(int $a)\n{\n}\n";
    let tokens = stream(src);
    let report = lint_comments(src, PHP70);
    let json = report.to_json(&tokens);

    assert_eq!(json["errors"], 1);
    assert_eq!(json["warnings"], 0);
    assert_eq!(json["fixable"], 1);
    let finding = &json["findings"][0];
    assert_eq!(
        finding["source"],
        "Commenting.FunctionComment.SpacingAfterParamType"
    );
    assert_eq!(finding["severity"], "error");
    assert_eq!(
        finding["message"],
        "Expected 1 spaces after parameter type; 2 found"
    );
    assert_eq!(finding["line"], 5);
    assert_eq!(finding["fixable"], true);
}
