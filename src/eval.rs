//! Value-level operator semantics.
//!
//! These are the evaluation rules the operator table points at. They are
//! pure functions over already-resolved operand values; resolving operands
//! (including nested operations and reference paths) happens in
//! [`crate::ast::Operand`].
//!
//! Arithmetic promotes both operands through [`rust_decimal::Decimal`],
//! rounds to 16 significant digits (half-up), then narrows the result back
//! to the type implied by the non-null operands. Comparing against a null
//! operand yields `Ordering::Equal` rather than an error, so `ge`/`le`
//! against null hold and `gt`/`lt` do not.

use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive, prelude::ToPrimitive};

use crate::value::Value;

/// Errors raised lazily while evaluating or compiling an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Operand types do not fit the operator
    TypeError(String),

    /// A field reference was evaluated without a document to resolve it
    UnresolvedReference(String),

    /// Division or remainder by zero
    DivisionByZero,

    /// Numeric result does not fit the target representation
    Overflow,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::UnresolvedReference(path) => {
                write!(f, "Unresolved reference: '{}' requires a document or a query backend", path)
            }
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::Overflow => write!(f, "Numeric overflow"),
        }
    }
}

impl std::error::Error for EvalError {}

// ---------------------------------------------------------------------------
// boolean
// ---------------------------------------------------------------------------

pub(crate) fn and(values: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = boolean_pair(values)?;
    Ok(Value::Boolean(a && b))
}

pub(crate) fn or(values: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = boolean_pair(values)?;
    Ok(Value::Boolean(a || b))
}

pub(crate) fn not(values: &[Value]) -> Result<Value, EvalError> {
    match &values[0] {
        Value::Boolean(b) => Ok(Value::Boolean(!b)),
        other => Err(EvalError::TypeError(format!(
            "Cannot negate {}",
            other.type_name()
        ))),
    }
}

fn boolean_pair(values: &[Value]) -> Result<(bool, bool), EvalError> {
    match (&values[0], &values[1]) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok((*a, *b)),
        (a, b) => Err(EvalError::TypeError(format!(
            "Logical operators require booleans, got {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

// ---------------------------------------------------------------------------
// equality and ordering
// ---------------------------------------------------------------------------

pub(crate) fn equal(values: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(values[0] == values[1]))
}

pub(crate) fn not_equal(values: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(values[0] != values[1]))
}

pub(crate) fn less_than(values: &[Value]) -> Result<Value, EvalError> {
    compare(&values[0], &values[1]).map(|ord| Value::Boolean(ord == Ordering::Less))
}

pub(crate) fn less_or_equal(values: &[Value]) -> Result<Value, EvalError> {
    compare(&values[0], &values[1]).map(|ord| Value::Boolean(ord != Ordering::Greater))
}

pub(crate) fn greater_than(values: &[Value]) -> Result<Value, EvalError> {
    compare(&values[0], &values[1]).map(|ord| Value::Boolean(ord == Ordering::Greater))
}

pub(crate) fn greater_or_equal(values: &[Value]) -> Result<Value, EvalError> {
    compare(&values[0], &values[1]).map(|ord| Value::Boolean(ord != Ordering::Less))
}

/// Total comparison. A null on either side compares equal by convention.
fn compare(left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => Ok(Ordering::Equal),
        (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => numeric_ordering(*a, *b),
        (Value::Integer(a), Value::Float(b)) => numeric_ordering(*a as f64, *b),
        (Value::Float(a), Value::Integer(b)) => numeric_ordering(*a, *b as f64),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
        (a, b) => Err(EvalError::TypeError(format!(
            "Cannot compare {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn numeric_ordering(a: f64, b: f64) -> Result<Ordering, EvalError> {
    a.partial_cmp(&b)
        .ok_or_else(|| EvalError::TypeError("Cannot compare NaN".to_string()))
}

// ---------------------------------------------------------------------------
// membership
// ---------------------------------------------------------------------------

/// `in`: the right operand is an iterable or a singleton. A null right
/// operand never contains anything.
pub(crate) fn member_of(values: &[Value]) -> Result<Value, EvalError> {
    let needle = &values[0];
    let contained = match &values[1] {
        Value::Null => false,
        Value::Array(items) => items.iter().any(|item| item == needle),
        other => other == needle,
    };
    Ok(Value::Boolean(contained))
}

// ---------------------------------------------------------------------------
// arithmetic
// ---------------------------------------------------------------------------

/// Significant digits carried through decimal arithmetic.
const PRECISION: u32 = 16;

pub(crate) fn add(values: &[Value]) -> Result<Value, EvalError> {
    calculate(values, |x, y| x.checked_add(y).ok_or(EvalError::Overflow))
}

pub(crate) fn subtract(values: &[Value]) -> Result<Value, EvalError> {
    calculate(values, |x, y| x.checked_sub(y).ok_or(EvalError::Overflow))
}

pub(crate) fn multiply(values: &[Value]) -> Result<Value, EvalError> {
    calculate(values, |x, y| x.checked_mul(y).ok_or(EvalError::Overflow))
}

pub(crate) fn divide(values: &[Value]) -> Result<Value, EvalError> {
    calculate(values, |x, y| {
        if y.is_zero() {
            Err(EvalError::DivisionByZero)
        } else {
            x.checked_div(y).ok_or(EvalError::Overflow)
        }
    })
}

pub(crate) fn remainder(values: &[Value]) -> Result<Value, EvalError> {
    calculate(values, |x, y| {
        if y.is_zero() {
            Err(EvalError::DivisionByZero)
        } else {
            x.checked_rem(y).ok_or(EvalError::Overflow)
        }
    })
}

/// Shared arithmetic core: promote to Decimal (null contributes zero),
/// apply, round to 16 significant digits half-up, then narrow back to the
/// type implied by the non-null operands. Both operands null narrows to the
/// integer default.
fn calculate(
    values: &[Value],
    op: impl Fn(Decimal, Decimal) -> Result<Decimal, EvalError>,
) -> Result<Value, EvalError> {
    let left = &values[0];
    let right = &values[1];
    let result = op(to_decimal(left)?, to_decimal(right)?)?;
    let rounded = result
        .round_sf_with_strategy(PRECISION, RoundingStrategy::MidpointAwayFromZero)
        .unwrap_or(result);

    let float_target = matches!(left, Value::Float(_)) || matches!(right, Value::Float(_));
    if !float_target && rounded.is_integer() {
        rounded.to_i64().map(Value::Integer).ok_or(EvalError::Overflow)
    } else {
        rounded.to_f64().map(Value::Float).ok_or(EvalError::Overflow)
    }
}

fn to_decimal(value: &Value) -> Result<Decimal, EvalError> {
    match value {
        Value::Null => Ok(Decimal::ZERO),
        Value::Integer(n) => Ok(Decimal::from(*n)),
        Value::Float(n) => Decimal::from_f64(*n).ok_or_else(|| {
            EvalError::TypeError(format!("{} has no finite decimal representation", n))
        }),
        other => Err(EvalError::TypeError(format!(
            "Arithmetic requires numbers, got {}",
            other.type_name()
        ))),
    }
}

// ---------------------------------------------------------------------------
// string matching
// ---------------------------------------------------------------------------

pub(crate) fn includes(values: &[Value]) -> Result<Value, EvalError> {
    let (subject, pattern) = match_texts(values);
    Ok(Value::Boolean(subject.contains(&pattern)))
}

pub(crate) fn starts_with(values: &[Value]) -> Result<Value, EvalError> {
    let (subject, pattern) = match_texts(values);
    Ok(Value::Boolean(subject.starts_with(&pattern)))
}

pub(crate) fn ends_with(values: &[Value]) -> Result<Value, EvalError> {
    let (subject, pattern) = match_texts(values);
    Ok(Value::Boolean(subject.ends_with(&pattern)))
}

fn match_texts(values: &[Value]) -> (String, String) {
    (match_text(&values[0]), match_text(&values[1]))
}

/// Display coercion for string matching; null reads as the empty string.
pub(crate) fn match_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.as_string(),
    }
}

// ---------------------------------------------------------------------------
// reference resolution
// ---------------------------------------------------------------------------

/// Resolves a dotted reference path against an in-memory document.
/// Both `.` and `/` separate segments; a missing path reads as null.
pub(crate) fn resolve_path(document: &Value, path: &str) -> Value {
    let mut current = document;
    for segment in path.split(['.', '/']) {
        match current {
            Value::Object(map) => match map.get(segment) {
                Some(value) => current = value,
                None => return Value::Null,
            },
            _ => return Value::Null,
        }
    }
    current.clone()
}
