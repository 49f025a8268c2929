//! Validate and evaluate filter expressions

use super::{CliError, dialect_by_name};
use crate::value::Value;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter expression to check
    pub expression: String,
    /// Dialect selector ("keyword" or "symbolic")
    pub dialect: String,
    /// JSON document to evaluate references against
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated successfully with JSON output
    Success(serde_json::Value),
}

/// Parse an expression and, unless syntax-only, evaluate it. With a JSON
/// document, references resolve into the document; without one the
/// expression must be constant-foldable.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let dialect = dialect_by_name(&options.dialect)
        .ok_or_else(|| CliError::UnknownDialect(options.dialect.clone()))?;

    let ast = dialect.parse(&options.expression)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let result = match &options.input {
        Some(json_str) => {
            let document = Value::from(serde_json::from_str::<serde_json::Value>(json_str)?);
            ast.evaluate_in(&document)?
        }
        None => ast.evaluate()?,
    };

    Ok(CheckResult::Success(serde_json::Value::from(result)))
}
