use crate::ast::operators::Associativity;
use crate::ast::{Operand, Operation};
use crate::dialect::{Dialect, FilterToken};
use crate::tokenizer::{LexError, TokenInfo};
use crate::value::Value;

/// Errors for token streams that do not satisfy the grammar. Positions are
/// indexes into the token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// Input ended mid-expression
    UnexpectedEnd { expected: &'static str },

    /// A token appeared where the grammar does not allow it
    UnexpectedToken {
        token: TokenInfo<FilterToken>,
        position: usize,
        expected: &'static str,
    },

    /// An operator token with no entry in the dialect's table
    UnknownOperator { spelling: String, position: usize },

    /// A group or list was never closed
    UnmatchedParenthesis { position: usize },

    /// A complete expression was followed by more tokens
    TrailingToken {
        token: TokenInfo<FilterToken>,
        position: usize,
    },

    /// A number literal did not fit its representation
    InvalidNumber { text: String, position: usize },

    /// Parenthesized lists may only hold literal elements
    NonLiteralListElement { position: usize },
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of input, expected {}", expected)
            }
            SyntaxError::UnexpectedToken {
                token,
                position,
                expected,
            } => write!(
                f,
                "Unexpected token '{}' at position {}, expected {}",
                token.text, position, expected
            ),
            SyntaxError::UnknownOperator { spelling, position } => {
                write!(f, "Unknown operator '{}' at position {}", spelling, position)
            }
            SyntaxError::UnmatchedParenthesis { position } => {
                write!(f, "Unmatched parenthesis opened at position {}", position)
            }
            SyntaxError::TrailingToken { token, position } => write!(
                f,
                "Trailing input '{}' at position {} after a complete expression",
                token.text, position
            ),
            SyntaxError::InvalidNumber { text, position } => {
                write!(f, "Invalid number '{}' at position {}", text, position)
            }
            SyntaxError::NonLiteralListElement { position } => {
                write!(f, "List elements must be literals (position {})", position)
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Lex-or-syntax failure from the combined tokenize + parse entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Lex(LexError),
    Syntax(SyntaxError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Lex(e) => write!(f, "{}", e),
            ParseError::Syntax(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(e) => Some(e),
            ParseError::Syntax(e) => Some(e),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError::Lex(e)
    }
}

impl From<SyntaxError> for ParseError {
    fn from(e: SyntaxError) -> Self {
        ParseError::Syntax(e)
    }
}

/// Precedence-climbing parser over a dialect's token stream.
///
/// The tokenizer supplies a flat sequence; this component alone recovers
/// the tree structure implied by precedence, associativity, and
/// parenthesization. Binary operators bind while their precedence stays at
/// or above the threshold in force; the right-hand side is parsed with the
/// threshold raised by one for left-associative operators, so equal
/// precedence folds left-to-right.
pub struct Parser<'a> {
    dialect: &'a Dialect,
    tokens: Vec<TokenInfo<FilterToken>>,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(dialect: &'a Dialect, tokens: Vec<TokenInfo<FilterToken>>) -> Self {
        Parser {
            dialect,
            tokens,
            position: 0,
        }
    }

    /// Parses one complete expression; trailing tokens are an error.
    pub fn parse(mut self) -> Result<Operand, SyntaxError> {
        let expression = self.parse_expression(0)?;
        match self.tokens.get(self.position) {
            Some(token) => Err(SyntaxError::TrailingToken {
                token: token.clone(),
                position: self.position,
            }),
            None => Ok(expression),
        }
    }

    fn parse_expression(&mut self, min_precedence: u8) -> Result<Operand, SyntaxError> {
        let mut left = self.parse_primary()?;

        loop {
            let Some(token) = self.tokens.get(self.position) else {
                break;
            };
            if token.kind != FilterToken::BinaryOp {
                break;
            }
            let operator = self.dialect.binary_operator(&token.text).ok_or_else(|| {
                SyntaxError::UnknownOperator {
                    spelling: token.text.clone(),
                    position: self.position,
                }
            })?;
            if operator.precedence < min_precedence {
                break;
            }
            self.position += 1;

            let threshold = match operator.associativity {
                Associativity::Left => operator.precedence + 1,
                Associativity::Right => operator.precedence,
            };
            let right = self.parse_expression(threshold)?;
            left = Operand::Operation(Operation::binary(operator, left, right));
        }
        Ok(left)
    }

    /// Parse primary expressions: literals, references, groups, and prefix
    /// operators.
    fn parse_primary(&mut self) -> Result<Operand, SyntaxError> {
        let position = self.position;
        let token = match self.tokens.get(position) {
            Some(token) => token.clone(),
            None => {
                return Err(SyntaxError::UnexpectedEnd {
                    expected: "an expression",
                });
            }
        };
        self.position += 1;

        match token.kind {
            FilterToken::Number => parse_number(&token.text, position),
            FilterToken::QuotedString => Ok(Operand::Literal(Value::String(unquote(&token.text)))),
            FilterToken::Bool => Ok(Operand::Literal(Value::Boolean(
                token.text.eq_ignore_ascii_case("true"),
            ))),
            FilterToken::Null => Ok(Operand::Literal(Value::Null)),
            FilterToken::Reference => Ok(Operand::Reference(token.text)),
            FilterToken::OpenParen => self.parse_group_or_list(position),
            FilterToken::UnaryOp => {
                let operator = self.dialect.unary_operator(&token.text).ok_or_else(|| {
                    SyntaxError::UnknownOperator {
                        spelling: token.text.clone(),
                        position,
                    }
                })?;
                // prefix operators take their operand at their own
                // precedence, which makes them right-associative
                let operand = self.parse_expression(operator.precedence)?;
                Ok(Operand::Operation(Operation::unary(operator, operand)))
            }
            _ => Err(SyntaxError::UnexpectedToken {
                token,
                position,
                expected: "an expression",
            }),
        }
    }

    /// After '(': either a grouped expression or a literal list for `in`.
    fn parse_group_or_list(&mut self, open_position: usize) -> Result<Operand, SyntaxError> {
        let first = self.parse_expression(0)?;

        if self.peek_kind() == Some(FilterToken::Comma) {
            let mut items = vec![literal_value(first, open_position)?];
            while self.peek_kind() == Some(FilterToken::Comma) {
                self.position += 1;
                let element_position = self.position;
                let element = self.parse_expression(0)?;
                items.push(literal_value(element, element_position)?);
            }
            self.expect_close(open_position)?;
            Ok(Operand::Literal(Value::Array(items)))
        } else {
            self.expect_close(open_position)?;
            Ok(first)
        }
    }

    fn expect_close(&mut self, open_position: usize) -> Result<(), SyntaxError> {
        match self.tokens.get(self.position) {
            Some(token) if token.kind == FilterToken::CloseParen => {
                self.position += 1;
                Ok(())
            }
            Some(token) => Err(SyntaxError::UnexpectedToken {
                token: token.clone(),
                position: self.position,
                expected: "')'",
            }),
            None => Err(SyntaxError::UnmatchedParenthesis {
                position: open_position,
            }),
        }
    }

    fn peek_kind(&self) -> Option<FilterToken> {
        self.tokens.get(self.position).map(|token| token.kind)
    }
}

fn parse_number(text: &str, position: usize) -> Result<Operand, SyntaxError> {
    let value = if text.contains('.') {
        text.parse::<f64>().map(Value::Float)
    } else {
        text.parse::<i64>().map(Value::Integer)
    };
    value.map(Operand::Literal).map_err(|_| SyntaxError::InvalidNumber {
        text: text.to_string(),
        position,
    })
}

fn literal_value(operand: Operand, position: usize) -> Result<Value, SyntaxError> {
    match operand {
        Operand::Literal(value) => Ok(value),
        _ => Err(SyntaxError::NonLiteralListElement { position }),
    }
}

/// Strips quotes and unescapes. Single-quoted strings double their quote
/// (`''`), double-quoted strings use backslash escapes.
fn unquote(text: &str) -> String {
    let inner = if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    };
    if text.starts_with('\'') {
        inner.replace("''", "'")
    } else {
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(other) => out.push(other),
                    None => {}
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}
