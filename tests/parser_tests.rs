// tests/parser_tests.rs

use sift_lang::operators;
use sift_lang::{Dialect, Operand, Operation, ParseError, SyntaxError, Value};

fn literal(value: impl Into<Value>) -> Operand {
    Operand::Literal(value.into())
}

// ============================================================================
// Literals and primaries
// ============================================================================

#[test]
fn test_parse_integer() {
    let ast = Dialect::symbolic().parse("42").unwrap();
    assert_eq!(ast, literal(42i64));
}

#[test]
fn test_parse_float() {
    let ast = Dialect::symbolic().parse("3.15").unwrap();
    assert_eq!(ast, literal(3.15));
}

#[test]
fn test_parse_booleans_and_null() {
    assert_eq!(Dialect::symbolic().parse("true").unwrap(), literal(true));
    assert_eq!(Dialect::symbolic().parse("false").unwrap(), literal(false));
    assert_eq!(
        Dialect::symbolic().parse("null").unwrap(),
        Operand::Literal(Value::Null)
    );
}

#[test]
fn test_parse_double_quoted_string() {
    let ast = Dialect::symbolic().parse(r#""hello world""#).unwrap();
    assert_eq!(ast, literal("hello world"));
}

#[test]
fn test_parse_single_quoted_string_with_escape() {
    let ast = Dialect::keyword().parse("'O''Brien'").unwrap();
    assert_eq!(ast, literal("O'Brien"));
}

#[test]
fn test_parse_reference() {
    let ast = Dialect::symbolic().parse("user.name").unwrap();
    assert_eq!(ast, Operand::Reference("user.name".to_string()));
}

#[test]
fn test_keyword_reference_paths_accept_slashes() {
    let ast = Dialect::keyword().parse("order/items").unwrap();
    assert_eq!(ast, Operand::Reference("order/items".to_string()));
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let ast = Dialect::symbolic().parse("1 + 2 * 3").unwrap();

    let expected = Operand::Operation(Operation::binary(
        &operators::ADD,
        literal(1i64),
        Operand::Operation(Operation::binary(
            &operators::MULTIPLY,
            literal(2i64),
            literal(3i64),
        )),
    ));
    assert_eq!(ast, expected);
    assert_eq!(ast.evaluate().unwrap(), Value::Integer(7));
}

#[test]
fn test_subtraction_is_left_associative() {
    let ast = Dialect::symbolic().parse("10 - 3 - 2").unwrap();

    let expected = Operand::Operation(Operation::binary(
        &operators::SUBTRACT,
        Operand::Operation(Operation::binary(
            &operators::SUBTRACT,
            literal(10i64),
            literal(3i64),
        )),
        literal(2i64),
    ));
    assert_eq!(ast, expected);
    assert_eq!(ast.evaluate().unwrap(), Value::Integer(5));
}

#[test]
fn test_unary_not_is_right_associative() {
    let ast = Dialect::symbolic().parse("! ! true").unwrap();

    let expected = Operand::Operation(Operation::unary(
        &operators::NOT,
        Operand::Operation(Operation::unary(&operators::NOT, literal(true))),
    ));
    assert_eq!(ast, expected);
    assert_eq!(ast.evaluate().unwrap(), Value::Boolean(true));
}

#[test]
fn test_parentheses_override_precedence() {
    let ast = Dialect::symbolic().parse("(1 + 2) * 3").unwrap();
    assert_eq!(ast.evaluate().unwrap(), Value::Integer(9));
}

#[test]
fn test_comparison_binds_tighter_than_and() {
    let ast = Dialect::keyword().parse("a eq 1 and b gt 2").unwrap();

    let expected = Operand::Operation(Operation::binary(
        &operators::AND,
        Operand::Operation(Operation::binary(
            &operators::EQUAL,
            Operand::reference("a"),
            literal(1i64),
        )),
        Operand::Operation(Operation::binary(
            &operators::GREATER_THAN,
            Operand::reference("b"),
            literal(2i64),
        )),
    ));
    assert_eq!(ast, expected);
}

#[test]
fn test_and_binds_tighter_than_or() {
    let ast = Dialect::keyword().parse("a eq 1 or b eq 2 and c eq 3").unwrap();

    // or is the root; (b eq 2 and c eq 3) folds first
    match ast {
        Operand::Operation(op) => assert_eq!(op.operator().name, "||"),
        other => panic!("Expected an operation, got {:?}", other),
    }
}

#[test]
fn test_prefix_not_binds_tighter_than_binary_operators() {
    // not applies to the parenthesized group, the and stays outside
    let ast = Dialect::keyword().parse("not (a eq 1) and b eq 2").unwrap();
    match ast {
        Operand::Operation(op) => assert_eq!(op.operator().name, "&&"),
        other => panic!("Expected an operation, got {:?}", other),
    }
}

// ============================================================================
// Literal lists
// ============================================================================

#[test]
fn test_parenthesized_literal_list() {
    let ast = Dialect::keyword().parse("a in (1, 2, 3)").unwrap();

    let expected = Operand::Operation(Operation::binary(
        &operators::IN,
        Operand::reference("a"),
        Operand::Literal(Value::Array(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
        ])),
    ));
    assert_eq!(ast, expected);
}

#[test]
fn test_list_elements_must_be_literals() {
    let result = Dialect::keyword().parse("a in (1, b)");
    assert!(matches!(
        result,
        Err(ParseError::Syntax(SyntaxError::NonLiteralListElement { .. }))
    ));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unmatched_parenthesis() {
    let result = Dialect::symbolic().parse("(1 + 2");
    assert!(matches!(
        result,
        Err(ParseError::Syntax(SyntaxError::UnmatchedParenthesis { .. }))
    ));
}

#[test]
fn test_truncated_expression() {
    let result = Dialect::symbolic().parse("1 +");
    assert!(matches!(
        result,
        Err(ParseError::Syntax(SyntaxError::UnexpectedEnd { .. }))
    ));
}

#[test]
fn test_trailing_tokens_are_rejected() {
    let result = Dialect::symbolic().parse("1 2");
    assert!(matches!(
        result,
        Err(ParseError::Syntax(SyntaxError::TrailingToken { .. }))
    ));
}

#[test]
fn test_operator_in_operand_position() {
    let result = Dialect::keyword().parse("eq 1");
    assert!(matches!(
        result,
        Err(ParseError::Syntax(SyntaxError::UnexpectedToken { .. }))
    ));
}

#[test]
fn test_lex_error_surfaces_through_parse() {
    let result = Dialect::keyword().parse("a $ b");
    assert!(matches!(result, Err(ParseError::Lex(_))));
}

#[test]
fn test_empty_input_is_a_syntax_error() {
    // tokenizing yields no tokens; the parser wants an expression
    let result = Dialect::keyword().parse("   ");
    assert!(matches!(
        result,
        Err(ParseError::Syntax(SyntaxError::UnexpectedEnd { .. }))
    ));
}
