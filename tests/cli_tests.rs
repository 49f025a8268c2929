// tests/cli_tests.rs

use sift_lang::cli::{
    CheckOptions, CheckResult, CliError, CompileOptions, execute_check, execute_compile,
};

// ============================================================================
// check
// ============================================================================

#[test]
fn test_syntax_only_check() {
    let options = CheckOptions {
        expression: "a eq 1 and b gt 2".to_string(),
        dialect: "keyword".to_string(),
        input: None,
        syntax_only: true,
    };
    assert!(matches!(
        execute_check(&options),
        Ok(CheckResult::SyntaxValid)
    ));
}

#[test]
fn test_constant_expression_evaluates_without_input() {
    let options = CheckOptions {
        expression: "(1 add 2) mul 3".to_string(),
        dialect: "keyword".to_string(),
        input: None,
        syntax_only: false,
    };
    match execute_check(&options).unwrap() {
        CheckResult::Success(value) => assert_eq!(value, serde_json::json!(9)),
        other => panic!("Expected Success, got {:?}", other),
    }
}

#[test]
fn test_check_against_json_document() {
    let options = CheckOptions {
        expression: "user.age ge 18".to_string(),
        dialect: "keyword".to_string(),
        input: Some(r#"{"user": {"age": 30}}"#.to_string()),
        syntax_only: false,
    };
    match execute_check(&options).unwrap() {
        CheckResult::Success(value) => assert_eq!(value, serde_json::json!(true)),
        other => panic!("Expected Success, got {:?}", other),
    }
}

#[test]
fn test_symbolic_dialect_selector() {
    let options = CheckOptions {
        expression: "1 + 2 * 3".to_string(),
        dialect: "symbolic".to_string(),
        input: None,
        syntax_only: false,
    };
    match execute_check(&options).unwrap() {
        CheckResult::Success(value) => assert_eq!(value, serde_json::json!(7)),
        other => panic!("Expected Success, got {:?}", other),
    }
}

#[test]
fn test_unknown_dialect_is_reported() {
    let options = CheckOptions {
        expression: "1".to_string(),
        dialect: "odata".to_string(),
        input: None,
        syntax_only: false,
    };
    assert!(matches!(
        execute_check(&options),
        Err(CliError::UnknownDialect(_))
    ));
}

#[test]
fn test_invalid_json_input_is_reported() {
    let options = CheckOptions {
        expression: "a eq 1".to_string(),
        dialect: "keyword".to_string(),
        input: Some("{not json".to_string()),
        syntax_only: false,
    };
    assert!(matches!(execute_check(&options), Err(CliError::Json(_))));
}

// ============================================================================
// compile
// ============================================================================

#[test]
fn test_compile_renders_a_predicate() {
    let options = CompileOptions {
        expression: "name eq 'sift' and items eq null".to_string(),
        dialect: "keyword".to_string(),
        collections: vec!["items".to_string()],
    };
    let predicate = execute_compile(&options).unwrap();
    assert_eq!(predicate.sql, "((name = ?) AND (items IS EMPTY))");
    assert!(predicate.distinct);
}
