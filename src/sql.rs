//! Reference query backend: parameterized SQL-style WHERE clauses.
//!
//! This is the in-repo proof of the [`QueryBuilder`] contract. Values never
//! end up inside the rendered text; every constant becomes a `?`
//! placeholder with its value collected in order. Collection-valued paths
//! are declared up front; comparing against one renders the JPQL-flavored
//! `IS EMPTY` form for null equality and flips the distinct flag.
//!
//! ```
//! use sift_lang::{Dialect, SqlBuilder};
//!
//! let ast = Dialect::keyword().parse("name eq 'sift' and age ge 21").unwrap();
//! let predicate = SqlBuilder::new().render(&ast).unwrap();
//! assert_eq!(predicate.sql, "((name = ?) AND (age >= ?))");
//! ```

use std::collections::HashSet;

use crate::ast::Operand;
use crate::compile::{ArithOp, CompareOp, JunctionOp, MatchMode, QueryBuilder};
use crate::eval::EvalError;
use crate::value::Value;

/// One rendered fragment plus the parameters it consumes, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlExpr {
    sql: String,
    params: Vec<Value>,
    from_collection: bool,
}

impl SqlExpr {
    fn new(sql: String, params: Vec<Value>) -> Self {
        SqlExpr {
            sql,
            params,
            from_collection: false,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// A finished predicate: WHERE-clause text, ordered parameters, and the
/// deduplication flag the engine may have raised.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlPredicate {
    pub sql: String,
    pub params: Vec<Value>,
    pub distinct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlError {
    Eval(EvalError),
}

impl std::fmt::Display for SqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlError::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SqlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SqlError::Eval(e) => Some(e),
        }
    }
}

impl From<EvalError> for SqlError {
    fn from(e: EvalError) -> Self {
        SqlError::Eval(e)
    }
}

/// WHERE-clause builder.
#[derive(Debug, Default)]
pub struct SqlBuilder {
    collections: HashSet<String>,
    distinct: bool,
}

impl SqlBuilder {
    pub fn new() -> Self {
        SqlBuilder::default()
    }

    /// Declares a reference path as collection-valued. Comparisons against
    /// it render empty-tests for null equality and raise the distinct flag.
    pub fn collection(mut self, path: impl Into<String>) -> Self {
        self.collections.insert(path.into());
        self
    }

    pub fn distinct(&self) -> bool {
        self.distinct
    }

    /// Compiles an expression tree into a finished predicate.
    pub fn render(&mut self, operand: &Operand) -> Result<SqlPredicate, SqlError> {
        let expr = operand.compile(self)?;
        Ok(SqlPredicate {
            sql: expr.sql,
            params: expr.params,
            distinct: self.distinct,
        })
    }
}

fn binary(template_op: &str, left: SqlExpr, right: SqlExpr) -> SqlExpr {
    let mut params = left.params;
    params.extend(right.params);
    SqlExpr::new(format!("({} {} {})", left.sql, template_op, right.sql), params)
}

/// Escapes LIKE wildcards in a pattern before adding our own.
fn escape_like(pattern: &str) -> String {
    pattern
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl QueryBuilder for SqlBuilder {
    type Expr = SqlExpr;
    type Error = SqlError;

    fn constant(&mut self, value: &Value) -> Result<SqlExpr, SqlError> {
        match value {
            // arrays expand to one placeholder per element, for IN lists
            Value::Array(items) => {
                let placeholders = vec!["?"; items.len()].join(", ");
                Ok(SqlExpr::new(format!("({})", placeholders), items.clone()))
            }
            other => Ok(SqlExpr::new("?".to_string(), vec![other.clone()])),
        }
    }

    fn reference(&mut self, path: &str) -> Result<SqlExpr, SqlError> {
        let mut expr = SqlExpr::new(path.to_string(), Vec::new());
        expr.from_collection = self.collections.contains(path);
        Ok(expr)
    }

    fn compare(&mut self, op: CompareOp, left: SqlExpr, right: SqlExpr) -> Result<SqlExpr, SqlError> {
        let symbol = match op {
            CompareOp::Equal => "=",
            CompareOp::LessThan => "<",
            CompareOp::LessOrEqual => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterOrEqual => ">=",
        };
        Ok(binary(symbol, left, right))
    }

    fn junction(&mut self, op: JunctionOp, left: SqlExpr, right: SqlExpr) -> Result<SqlExpr, SqlError> {
        let symbol = match op {
            JunctionOp::And => "AND",
            JunctionOp::Or => "OR",
        };
        Ok(binary(symbol, left, right))
    }

    fn negate(&mut self, operand: SqlExpr) -> Result<SqlExpr, SqlError> {
        Ok(SqlExpr {
            sql: format!("(NOT {})", operand.sql),
            params: operand.params,
            from_collection: false,
        })
    }

    fn arithmetic(&mut self, op: ArithOp, left: SqlExpr, right: SqlExpr) -> Result<SqlExpr, SqlError> {
        let symbol = match op {
            ArithOp::Add => "+",
            ArithOp::Subtract => "-",
            ArithOp::Multiply => "*",
            ArithOp::Divide => "/",
            ArithOp::Remainder => "%",
        };
        Ok(binary(symbol, left, right))
    }

    fn string_match(&mut self, mode: MatchMode, subject: SqlExpr, pattern: &str) -> Result<SqlExpr, SqlError> {
        let like = match mode {
            MatchMode::Includes => format!("%{}%", escape_like(pattern)),
            MatchMode::StartsWith => format!("{}%", escape_like(pattern)),
            MatchMode::EndsWith => format!("%{}", escape_like(pattern)),
        };
        let mut params = subject.params;
        params.push(Value::String(like));
        Ok(SqlExpr::new(format!("({} LIKE ?)", subject.sql), params))
    }

    fn membership(&mut self, needle: SqlExpr, haystack: SqlExpr) -> Result<SqlExpr, SqlError> {
        Ok(binary("IN", needle, haystack))
    }

    fn null_test(&mut self, operand: SqlExpr) -> Result<SqlExpr, SqlError> {
        Ok(SqlExpr {
            sql: format!("({} IS NULL)", operand.sql),
            params: operand.params,
            from_collection: false,
        })
    }

    fn empty_test(&mut self, operand: SqlExpr) -> Result<SqlExpr, SqlError> {
        Ok(SqlExpr {
            sql: format!("({} IS EMPTY)", operand.sql),
            params: operand.params,
            from_collection: false,
        })
    }

    fn is_collection(&self, expr: &SqlExpr) -> bool {
        expr.from_collection
    }

    fn mark_distinct(&mut self) {
        self.distinct = true;
    }
}
