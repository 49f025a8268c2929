// tests/tokenizer_tests.rs

use sift_lang::dialect::{Dialect, FilterToken};
use sift_lang::tokenizer::{LexError, TokenInfo, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Word,
    Number,
    Symbol,
}

fn word_tokenizer() -> Tokenizer<Kind> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.add(Kind::Word, "[a-zA-Z]+").unwrap();
    tokenizer.add(Kind::Number, "[0-9]+").unwrap();
    tokenizer.add(Kind::Symbol, "[=<>]+").unwrap();
    tokenizer
}

// ============================================================================
// Empty and trimmed input
// ============================================================================

#[test]
fn test_empty_input_yields_no_tokens() {
    let tokens = word_tokenizer().tokenize("").unwrap();
    assert!(tokens.is_empty());
}

#[test]
fn test_all_trim_input_yields_no_tokens() {
    let tokens = word_tokenizer().tokenize("     ").unwrap();
    assert!(tokens.is_empty());

    let tokens = word_tokenizer().tokenize("\r \r ").unwrap();
    assert!(tokens.is_empty());
}

#[test]
fn test_whitespace_between_tokens_is_skipped() {
    let tokens = word_tokenizer().tokenize("  abc   42  ").unwrap();
    assert_eq!(
        tokens,
        vec![
            TokenInfo {
                kind: Kind::Word,
                text: "abc".to_string()
            },
            TokenInfo {
                kind: Kind::Number,
                text: "42".to_string()
            },
        ]
    );
}

#[test]
fn test_crlf_is_normalized() {
    // \r\n becomes \n, which no definition matches
    let result = word_tokenizer().tokenize("abc\r\ndef");
    assert!(matches!(
        result,
        Err(LexError::UnexpectedInput { remaining, .. }) if remaining.starts_with('\n')
    ));
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_lexemes_reconstruct_normalized_input() {
    let inputs = vec!["a eq 1", "a  eq  1 and b     ne 2", "  price gt 100 "];
    let dialect = Dialect::keyword();

    for input in inputs {
        let tokens = dialect.tokenize(input).unwrap();
        let rebuilt: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        let normalized: Vec<&str> = input.split_whitespace().collect();
        assert_eq!(rebuilt, normalized, "Failed for input: {}", input);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unmatched_character_is_a_lex_error() {
    let result = Dialect::keyword().tokenize("a $ b");
    match result {
        Err(LexError::UnexpectedInput {
            remaining,
            position,
        }) => {
            assert_eq!(remaining, "$ b");
            assert_eq!(position, 2);
        }
        other => panic!("Expected UnexpectedInput, got {:?}", other),
    }
}

#[test]
fn test_invalid_pattern_is_reported_at_registration() {
    let mut tokenizer: Tokenizer<Kind> = Tokenizer::new();
    let result = tokenizer.add(Kind::Word, "(unclosed");
    assert!(matches!(result, Err(LexError::InvalidPattern { .. })));
}

// ============================================================================
// Ordering, rejection, and case folding
// ============================================================================

#[test]
fn test_definitions_scan_in_registration_order() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.add(Kind::Number, "[0-9]+").unwrap();
    tokenizer.add(Kind::Word, "[0-9a-z]+").unwrap();

    // Number is registered first, so digits never reach the Word pattern
    let tokens = tokenizer.tokenize("123abc").unwrap();
    assert_eq!(tokens[0].kind, Kind::Number);
    assert_eq!(tokens[0].text, "123");
    assert_eq!(tokens[1].kind, Kind::Word);
    assert_eq!(tokens[1].text, "abc");
}

#[test]
fn test_rejected_match_falls_through_to_later_definitions() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.add(Kind::Word, "[a-z]+").unwrap();
    tokenizer.add(Kind::Symbol, "eq").unwrap();

    let tokens = tokenizer
        .tokenize_with("a eq b", |kind, lexeme| {
            !(kind == Kind::Word && lexeme == "eq")
        })
        .unwrap();

    assert_eq!(tokens[0].kind, Kind::Word);
    assert_eq!(tokens[1].kind, Kind::Symbol);
    assert_eq!(tokens[2].kind, Kind::Word);
}

#[test]
fn test_rejecting_every_definition_is_a_lex_error() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.add(Kind::Word, "[a-z]+").unwrap();

    let result = tokenizer.tokenize_with("abc", |_, _| false);
    assert!(matches!(result, Err(LexError::UnexpectedInput { .. })));
}

#[test]
fn test_case_insensitive_definitions() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.set_case_sensitive(false);
    tokenizer.add(Kind::Word, "select").unwrap();

    let tokens = tokenizer.tokenize("SELECT Select select").unwrap();
    assert_eq!(tokens.len(), 3);
    // lexemes keep their original spelling
    assert_eq!(tokens[0].text, "SELECT");
}

#[test]
fn test_replacing_a_kind_keeps_scan_position() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.add(Kind::Word, "[a-z]+").unwrap();
    tokenizer.add(Kind::Number, "[0-9]+").unwrap();
    // redefine Word; it must still be scanned before Number
    tokenizer.add(Kind::Word, "[a-z0-9]+").unwrap();

    let tokens = tokenizer.tokenize("a1").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, Kind::Word);
}

// ============================================================================
// Dialect token streams
// ============================================================================

#[test]
fn test_keyword_dialect_token_kinds() {
    let tokens = Dialect::keyword()
        .tokenize("a eq 1 and not (b in (2, 3))")
        .unwrap();
    let kinds: Vec<FilterToken> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FilterToken::Reference,
            FilterToken::BinaryOp,
            FilterToken::Number,
            FilterToken::BinaryOp,
            FilterToken::UnaryOp,
            FilterToken::OpenParen,
            FilterToken::Reference,
            FilterToken::BinaryOp,
            FilterToken::OpenParen,
            FilterToken::Number,
            FilterToken::Comma,
            FilterToken::Number,
            FilterToken::CloseParen,
            FilterToken::CloseParen,
        ]
    );
}

#[test]
fn test_reserved_word_prefix_stays_a_reference() {
    let tokens = Dialect::keyword().tokenize("android ne notation").unwrap();
    assert_eq!(tokens[0].kind, FilterToken::Reference);
    assert_eq!(tokens[0].text, "android");
    assert_eq!(tokens[1].kind, FilterToken::BinaryOp);
    assert_eq!(tokens[2].kind, FilterToken::Reference);
    assert_eq!(tokens[2].text, "notation");
}

#[test]
fn test_symbolic_two_char_operators_win_over_one_char() {
    let tokens = Dialect::symbolic().tokenize("a >= 1 && b != 2").unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["a", ">=", "1", "&&", "b", "!=", "2"]);
}
