//! CLI support for sift-lang
//!
//! Provides programmatic access to sift CLI functionality for embedding
//! in other tools.

mod check;
mod compile;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use compile::{CompileOptions, execute_compile};

use crate::dialect::Dialect;
use std::io;

/// Resolve a dialect selector as passed on the command line.
pub fn dialect_by_name(name: &str) -> Option<Dialect> {
    match name {
        "keyword" => Some(Dialect::keyword()),
        "symbolic" => Some(Dialect::symbolic()),
        _ => None,
    }
}

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Lexer or parser error
    Parse(crate::ParseError),
    /// Evaluation error
    Eval(crate::EvalError),
    /// Compile error from the SQL backend
    Sql(crate::SqlError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// Unknown dialect selector
    UnknownDialect(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Parse(e) => write!(f, "Parse error: {}", e),
            CliError::Eval(e) => write!(f, "Evaluation error: {}", e),
            CliError::Sql(e) => write!(f, "Compile error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::UnknownDialect(name) => {
                write!(f, "Unknown dialect: '{}' (expected 'keyword' or 'symbolic')", name)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Parse(e) => Some(e),
            CliError::Eval(e) => Some(e),
            CliError::Sql(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<crate::EvalError> for CliError {
    fn from(e: crate::EvalError) -> Self {
        CliError::Eval(e)
    }
}

impl From<crate::SqlError> for CliError {
    fn from(e: crate::SqlError) -> Self {
        CliError::Sql(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
