// tests/dialect_tests.rs

use sift_lang::operators;
use sift_lang::{Dialect, Value};

// ============================================================================
// Dialect independence
// ============================================================================

#[test]
fn test_keyword_and_symbolic_build_the_same_ast() {
    let cases = vec![
        ("a eq 1", "a == 1"),
        ("a ne 'x'", "a != \"x\""),
        ("a gt 1 and b le 2", "a > 1 && b <= 2"),
        ("not (a eq null)", "! (a == null)"),
        ("price add 1 mul 2", "price + 1 * 2"),
        ("a in (1, 2)", "a in (1, 2)"),
    ];

    let keyword = Dialect::keyword();
    let symbolic = Dialect::symbolic();

    for (keyword_input, symbolic_input) in cases {
        let from_keyword = keyword.parse(keyword_input).unwrap();
        let from_symbolic = symbolic.parse(symbolic_input).unwrap();
        assert_eq!(
            from_keyword, from_symbolic,
            "ASTs differ for '{}' vs '{}'",
            keyword_input, symbolic_input
        );
    }
}

#[test]
fn test_both_dialects_share_operator_instances() {
    let keyword = Dialect::keyword();
    let symbolic = Dialect::symbolic();

    let from_keyword = keyword.binary_operator("eq").unwrap();
    let from_symbolic = symbolic.binary_operator("==").unwrap();
    assert!(std::ptr::eq(from_keyword, from_symbolic));
}

// ============================================================================
// Case sensitivity
// ============================================================================

#[test]
fn test_keyword_dialect_folds_case() {
    let dialect = Dialect::keyword();
    let ast = dialect.parse("a EQ 1 AND b NE 2").unwrap();
    let same = dialect.parse("a eq 1 and b ne 2").unwrap();
    assert_eq!(ast, same);
}

#[test]
fn test_symbolic_dialect_is_case_sensitive() {
    let dialect = Dialect::symbolic();
    // "IN" is not the symbolic spelling; it lexes as a reference and the
    // parse fails on two adjacent primaries
    assert!(dialect.parse("a IN (1, 2)").is_err());
    assert!(dialect.parse("a in (1, 2)").is_ok());
}

// ============================================================================
// Reserved words
// ============================================================================

#[test]
fn test_identifiers_may_start_with_reserved_words() {
    let dialect = Dialect::keyword();
    for field in ["android", "order", "nothing", "indigo", "equity"] {
        let ast = dialect.parse(&format!("{} eq 1", field)).unwrap();
        assert_eq!(
            ast.evaluate_in(&Value::Object(Default::default())),
            Ok(Value::Boolean(false)),
            "Failed for field '{}'",
            field
        );
    }
}

#[test]
fn test_reserved_words_are_not_references() {
    // "eq eq eq" cannot parse: the first token is an operator
    assert!(Dialect::keyword().parse("eq eq eq").is_err());
}

// ============================================================================
// Custom dialects
// ============================================================================

#[test]
fn test_builder_assembles_a_custom_dialect() {
    let dialect = Dialect::builder("terse")
        .binary("=", &operators::EQUAL)
        .binary("&", &operators::AND)
        .unary("~", &operators::NOT)
        .build()
        .unwrap();

    let ast = dialect.parse("~ (a = 1) & b = 2").unwrap();
    let reference = Dialect::keyword().parse("not (a eq 1) and b eq 2").unwrap();
    assert_eq!(ast, reference);
}

#[test]
fn test_custom_trim_pattern() {
    let dialect = Dialect::builder("spacious")
        .trim_pattern(r"\s")
        .binary("==", &operators::EQUAL)
        .build()
        .unwrap();

    let ast = dialect.parse("a\t==\n1").unwrap();
    assert_eq!(ast, Dialect::symbolic().parse("a == 1").unwrap());
}

#[test]
fn test_default_trim_rejects_tabs() {
    // the default trim pattern drops carriage returns and plain spaces only
    assert!(Dialect::keyword().parse("a\teq 1").is_err());
}
