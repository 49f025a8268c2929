use regex::{Regex, RegexBuilder};
use std::fmt;

/// A token produced by the tokenizer: the matched kind plus the trimmed
/// lexeme text. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo<T> {
    pub kind: T,
    pub text: String,
}

impl<T: fmt::Debug> fmt::Display for TokenInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.kind, self.text)
    }
}

/// Errors from the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No token definition matched (or all matches were rejected) at a
    /// non-empty position. Carries the unconsumed remainder for diagnostics.
    UnexpectedInput { remaining: String, position: usize },

    /// A token or trim pattern failed to compile as a regex.
    InvalidPattern { pattern: String, message: String },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedInput {
                remaining,
                position,
            } => write!(
                f,
                "Unexpected character in input at offset {}: {}",
                position, remaining
            ),
            LexError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid token pattern '{}': {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for LexError {}

struct TokenDef<T> {
    kind: T,
    regex: Regex,
}

/// A generic regex-table lexer.
///
/// Token definitions are scanned in registration order, each anchored at the
/// current input offset. The first definition that matches wins, unless the
/// caller's rejection callback vetoes it, in which case scanning continues
/// with the remaining definitions at the same position. Registration order
/// is therefore the disambiguation mechanism: specific patterns go before
/// general ones, and the callback implements keyword-vs-identifier
/// precedence on top of that.
///
/// A configurable trim pattern (default: carriage returns and plain spaces)
/// is dropped from both ends of the input, after every consumed token, and
/// from each matched lexeme, so token patterns never need to encode
/// surrounding whitespace.
pub struct Tokenizer<T> {
    defs: Vec<TokenDef<T>>,
    trim_start: Option<Regex>,
    trim_end: Option<Regex>,
    case_sensitive: bool,
}

pub const DEFAULT_TRIM_PATTERN: &str = "\r| ";

impl<T: Copy + Eq + fmt::Debug> Tokenizer<T> {
    pub fn new() -> Self {
        let mut tokenizer = Tokenizer {
            defs: Vec::new(),
            trim_start: None,
            trim_end: None,
            case_sensitive: true,
        };
        tokenizer
            .set_trim_pattern(DEFAULT_TRIM_PATTERN)
            .expect("default trim pattern compiles");
        tokenizer
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Sets the default case sensitivity for definitions added afterwards.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> &mut Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Sets the trim pattern. An empty pattern disables trimming entirely.
    pub fn set_trim_pattern(&mut self, pattern: &str) -> Result<&mut Self, LexError> {
        if pattern.is_empty() {
            self.trim_start = None;
            self.trim_end = None;
        } else {
            self.trim_start = Some(compile(
                &format!("^(?:{})*", pattern),
                self.case_sensitive,
            )?);
            self.trim_end = Some(compile(&format!("(?:{})*$", pattern), self.case_sensitive)?);
        }
        Ok(self)
    }

    /// Registers a token definition with the tokenizer's case sensitivity.
    /// Kinds are unique keys: re-adding a kind replaces its pattern in place
    /// and keeps its scan position.
    pub fn add(&mut self, kind: T, pattern: &str) -> Result<&mut Self, LexError> {
        let case_sensitive = self.case_sensitive;
        self.add_with_case(kind, pattern, case_sensitive)
    }

    pub fn add_with_case(
        &mut self,
        kind: T,
        pattern: &str,
        case_sensitive: bool,
    ) -> Result<&mut Self, LexError> {
        let regex = compile(&format!("^(?:{})", pattern), case_sensitive)?;
        match self.defs.iter_mut().find(|def| def.kind == kind) {
            Some(def) => def.regex = regex,
            None => self.defs.push(TokenDef { kind, regex }),
        }
        Ok(self)
    }

    /// Tokenizes the input, accepting every match.
    pub fn tokenize(&self, input: &str) -> Result<Vec<TokenInfo<T>>, LexError> {
        self.tokenize_with(input, |_, _| true)
    }

    /// Tokenizes the input with a rejection callback. The callback receives
    /// each candidate (kind, trimmed lexeme); returning false rejects the
    /// match and the scan continues with later definitions at the same
    /// position.
    pub fn tokenize_with(
        &self,
        input: &str,
        mut accept: impl FnMut(T, &str) -> bool,
    ) -> Result<Vec<TokenInfo<T>>, LexError> {
        let normalized = input.replace("\r\n", "\n");
        let mut tokens = Vec::new();
        let mut position = self.skip_leading(&normalized, 0);

        while position < normalized.len() {
            let remaining = &normalized[position..];
            let mut consumed = None;
            for def in &self.defs {
                if let Some(found) = def.regex.find(remaining) {
                    // a zero-length match would stall the scan
                    if found.end() == 0 {
                        continue;
                    }
                    let lexeme = self.trim(found.as_str());
                    if accept(def.kind, &lexeme) {
                        tokens.push(TokenInfo {
                            kind: def.kind,
                            text: lexeme,
                        });
                        consumed = Some(found.end());
                        break;
                    }
                }
            }
            match consumed {
                Some(len) => {
                    position += len;
                    position = self.skip_leading(&normalized, position);
                }
                None => {
                    return Err(LexError::UnexpectedInput {
                        remaining: remaining.to_string(),
                        position,
                    });
                }
            }
        }
        Ok(tokens)
    }

    fn skip_leading(&self, input: &str, position: usize) -> usize {
        match &self.trim_start {
            Some(regex) => regex
                .find(&input[position..])
                .map(|found| position + found.end())
                .unwrap_or(position),
            None => position,
        }
    }

    fn trim(&self, text: &str) -> String {
        let mut trimmed = text;
        if let Some(regex) = &self.trim_start
            && let Some(found) = regex.find(trimmed)
        {
            trimmed = &trimmed[found.end()..];
        }
        if let Some(regex) = &self.trim_end
            && let Some(found) = regex.find(trimmed)
        {
            trimmed = &trimmed[..found.start()];
        }
        trimmed.to_string()
    }
}

impl<T: Copy + Eq + fmt::Debug> Default for Tokenizer<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str, case_sensitive: bool) -> Result<Regex, LexError> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| LexError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

#[test]
fn test_registration_order_wins() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Keyword,
        Word,
    }

    let mut tokenizer = Tokenizer::new();
    tokenizer.add(Kind::Keyword, "if").unwrap();
    tokenizer.add(Kind::Word, "[a-z]+").unwrap();

    let tokens = tokenizer.tokenize("if ifx").unwrap();
    assert_eq!(tokens[0].kind, Kind::Keyword);
    // prefix match: "ifx" lexes as "if" + "x" because Keyword is scanned first
    assert_eq!(tokens[1].kind, Kind::Keyword);
    assert_eq!(tokens[2], TokenInfo { kind: Kind::Word, text: "x".to_string() });
}

#[test]
fn test_rejection_continues_at_same_position() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Word,
        Keyword,
    }

    let mut tokenizer = Tokenizer::new();
    tokenizer.add(Kind::Word, "[a-z]+").unwrap();
    tokenizer.add(Kind::Keyword, "if").unwrap();

    let tokens = tokenizer
        .tokenize_with("if iffy", |kind, lexeme| {
            !(kind == Kind::Word && lexeme == "if")
        })
        .unwrap();
    assert_eq!(tokens[0].kind, Kind::Keyword);
    assert_eq!(tokens[1].kind, Kind::Word);
    assert_eq!(tokens[1].text, "iffy");
}
