//! Surface syntaxes over the shared engine.
//!
//! A dialect bundles token definitions, a trim pattern, a case-sensitivity
//! flag, and the mapping from surface spellings to the shared operator
//! statics. Two dialects ship built in: [`Dialect::keyword`] (OData-style
//! keywords, case-insensitive) and [`Dialect::symbolic`]. Both map onto the
//! same [`crate::ast::operators`] instances, so `a eq 1` and `a == 1`
//! produce the same tree.
//!
//! Keyword/identifier precedence is implemented with the tokenizer's
//! rejection callback: the reference definition is scanned first and its
//! match is vetoed whenever the lexeme is a reserved word, which lets the
//! scan fall through to the operator and literal definitions at the same
//! position. A longer identifier that merely starts with a reserved word
//! (`android`, `order`) survives as a reference.

use std::collections::{HashMap, HashSet};

use crate::ast::operators::{self, Arity, Operator};
use crate::ast::Operand;
use crate::parser::{ParseError, Parser};
use crate::tokenizer::{LexError, TokenInfo, Tokenizer};

/// Token kinds shared by all filter dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterToken {
    /// Integer or decimal number literal
    Number,
    /// Quoted string literal
    QuotedString,
    /// `true` / `false`
    Bool,
    /// `null`
    Null,
    /// Unary operator spelling
    UnaryOp,
    /// Binary operator spelling
    BinaryOp,
    OpenParen,
    CloseParen,
    /// List separator inside parenthesized literal lists
    Comma,
    /// Field/path reference
    Reference,
}

/// An immutable surface syntax: token set plus operator lookup.
pub struct Dialect {
    name: String,
    tokenizer: Tokenizer<FilterToken>,
    unary: HashMap<String, &'static Operator>,
    binary: HashMap<String, &'static Operator>,
    reserved: HashSet<String>,
    case_sensitive: bool,
}

impl Dialect {
    /// OData-flavored keyword dialect, case-insensitive: `eq ne gt ge lt le
    /// and or not in add sub mul div mod includes startswith endswith`.
    /// Strings are single-quoted with `''` as the embedded-quote escape;
    /// reference paths accept `/` or `.` separators.
    pub fn keyword() -> Dialect {
        Dialect::builder("keyword")
            .case_sensitive(false)
            .string_pattern(r"'(?:[^']|'')*'")
            .reference_pattern(r"[A-Za-z_][A-Za-z0-9_]*(?:[./][A-Za-z_][A-Za-z0-9_]*)*")
            .binary("eq", &operators::EQUAL)
            .binary("ne", &operators::NOT_EQUAL)
            .binary("gt", &operators::GREATER_THAN)
            .binary("ge", &operators::GREATER_OR_EQUAL)
            .binary("lt", &operators::LESS_THAN)
            .binary("le", &operators::LESS_OR_EQUAL)
            .binary("and", &operators::AND)
            .binary("or", &operators::OR)
            .binary("in", &operators::IN)
            .binary("add", &operators::ADD)
            .binary("sub", &operators::SUBTRACT)
            .binary("mul", &operators::MULTIPLY)
            .binary("div", &operators::DIVIDE)
            .binary("mod", &operators::REMAINDER)
            .binary("includes", &operators::INCLUDES)
            .binary("startswith", &operators::STARTS_WITH)
            .binary("endswith", &operators::ENDS_WITH)
            .unary("not", &operators::NOT)
            .build()
            .expect("keyword dialect patterns compile")
    }

    /// Symbolic dialect, case-sensitive: `== != < <= > >= && || ! in + - *
    /// / % includes startsWith endsWith`. Strings are double-quoted with
    /// backslash escapes; reference paths use `.` separators (`/` is
    /// division).
    pub fn symbolic() -> Dialect {
        Dialect::builder("symbolic")
            .binary("==", &operators::EQUAL)
            .binary("!=", &operators::NOT_EQUAL)
            .binary(">", &operators::GREATER_THAN)
            .binary(">=", &operators::GREATER_OR_EQUAL)
            .binary("<", &operators::LESS_THAN)
            .binary("<=", &operators::LESS_OR_EQUAL)
            .binary("&&", &operators::AND)
            .binary("||", &operators::OR)
            .binary("in", &operators::IN)
            .binary("+", &operators::ADD)
            .binary("-", &operators::SUBTRACT)
            .binary("*", &operators::MULTIPLY)
            .binary("/", &operators::DIVIDE)
            .binary("%", &operators::REMAINDER)
            .binary("includes", &operators::INCLUDES)
            .binary("startsWith", &operators::STARTS_WITH)
            .binary("endsWith", &operators::ENDS_WITH)
            .unary("!", &operators::NOT)
            .build()
            .expect("symbolic dialect patterns compile")
    }

    pub fn builder(name: impl Into<String>) -> DialectBuilder {
        DialectBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Tokenizes one expression under this dialect's token set. Reserved
    /// words are vetoed as references through the rejection callback.
    pub fn tokenize(&self, input: &str) -> Result<Vec<TokenInfo<FilterToken>>, LexError> {
        self.tokenizer.tokenize_with(input, |kind, lexeme| {
            kind != FilterToken::Reference || !self.reserved.contains(&self.fold(lexeme))
        })
    }

    /// Tokenizes and parses one expression into an AST.
    pub fn parse(&self, input: &str) -> Result<Operand, ParseError> {
        let tokens = self.tokenize(input)?;
        Parser::new(self, tokens).parse().map_err(ParseError::Syntax)
    }

    pub fn unary_operator(&self, spelling: &str) -> Option<&'static Operator> {
        self.unary.get(&self.fold(spelling)).copied()
    }

    pub fn binary_operator(&self, spelling: &str) -> Option<&'static Operator> {
        self.binary.get(&self.fold(spelling)).copied()
    }

    fn fold(&self, spelling: &str) -> String {
        if self.case_sensitive {
            spelling.to_string()
        } else {
            spelling.to_ascii_lowercase()
        }
    }
}

/// Assembles a [`Dialect`] from operator spellings and token patterns.
pub struct DialectBuilder {
    name: String,
    case_sensitive: bool,
    trim_pattern: Option<String>,
    number_pattern: String,
    string_pattern: String,
    reference_pattern: String,
    unary: Vec<(String, &'static Operator)>,
    binary: Vec<(String, &'static Operator)>,
}

impl DialectBuilder {
    fn new(name: impl Into<String>) -> Self {
        DialectBuilder {
            name: name.into(),
            case_sensitive: true,
            trim_pattern: None,
            number_pattern: r"[0-9]+(?:\.[0-9]+)?".to_string(),
            string_pattern: r#""(?:\\.|[^"\\])*""#.to_string(),
            reference_pattern: r"[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*"
                .to_string(),
            unary: Vec::new(),
            binary: Vec::new(),
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn trim_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.trim_pattern = Some(pattern.into());
        self
    }

    pub fn number_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.number_pattern = pattern.into();
        self
    }

    pub fn string_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.string_pattern = pattern.into();
        self
    }

    pub fn reference_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.reference_pattern = pattern.into();
        self
    }

    /// Maps a surface spelling onto a shared unary operator.
    pub fn unary(mut self, spelling: impl Into<String>, operator: &'static Operator) -> Self {
        assert_eq!(operator.arity, Arity::Unary, "unary operator expected");
        self.unary.push((spelling.into(), operator));
        self
    }

    /// Maps a surface spelling onto a shared binary operator.
    pub fn binary(mut self, spelling: impl Into<String>, operator: &'static Operator) -> Self {
        assert_eq!(operator.arity, Arity::Binary, "binary operator expected");
        self.binary.push((spelling.into(), operator));
        self
    }

    pub fn build(self) -> Result<Dialect, LexError> {
        let mut tokenizer = Tokenizer::new();
        tokenizer.set_case_sensitive(self.case_sensitive);
        if let Some(pattern) = &self.trim_pattern {
            tokenizer.set_trim_pattern(pattern)?;
        }

        // Scan order is the disambiguation mechanism. References go first
        // so the reserved-word veto can fall through to the literal and
        // operator definitions; binary spellings go before unary so that
        // "!=" is never split into "!" and an unmatched "=".
        tokenizer.add(FilterToken::Reference, &self.reference_pattern)?;
        tokenizer.add(FilterToken::Bool, "true|false")?;
        tokenizer.add(FilterToken::Null, "null")?;
        if !self.binary.is_empty() {
            tokenizer.add(FilterToken::BinaryOp, &alternation(&self.binary))?;
        }
        if !self.unary.is_empty() {
            tokenizer.add(FilterToken::UnaryOp, &alternation(&self.unary))?;
        }
        tokenizer.add(FilterToken::Number, &self.number_pattern)?;
        tokenizer.add(FilterToken::QuotedString, &self.string_pattern)?;
        tokenizer.add(FilterToken::OpenParen, r"\(")?;
        tokenizer.add(FilterToken::CloseParen, r"\)")?;
        tokenizer.add(FilterToken::Comma, ",")?;

        let fold = |s: &str| {
            if self.case_sensitive {
                s.to_string()
            } else {
                s.to_ascii_lowercase()
            }
        };

        let mut reserved: HashSet<String> = ["true", "false", "null"]
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        for (spelling, _) in self.unary.iter().chain(self.binary.iter()) {
            if spelling.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
                reserved.insert(fold(spelling));
            }
        }

        Ok(Dialect {
            name: self.name,
            tokenizer,
            unary: self
                .unary
                .iter()
                .map(|(spelling, op)| (fold(spelling), *op))
                .collect(),
            binary: self
                .binary
                .iter()
                .map(|(spelling, op)| (fold(spelling), *op))
                .collect(),
            reserved,
            case_sensitive: self.case_sensitive,
        })
    }
}

/// Builds one alternation pattern over operator spellings, longest first so
/// that `>=` wins over `>` inside a single definition.
fn alternation(spellings: &[(String, &'static Operator)]) -> String {
    let mut escaped: Vec<String> = spellings
        .iter()
        .map(|(spelling, _)| regex::escape(spelling))
        .collect();
    escaped.sort_by(|a, b| b.len().cmp(&a.len()));
    escaped.join("|")
}
