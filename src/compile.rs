//! The query backend capability.
//!
//! Compilation turns an expression tree into a backend predicate without
//! the tree knowing anything about the backend: the caller passes in a
//! [`QueryBuilder`] and gets back whatever expression type that builder
//! produces. The engine's obligations to the backend are small but strict:
//!
//! - equality against a null literal becomes an is-empty test for
//!   collection-valued expressions and an is-null test otherwise, matching
//!   the evaluation convention that null equals null;
//! - whenever a binary operation touches a collection-valued expression on
//!   either side, [`QueryBuilder::mark_distinct`] is invoked; backends must
//!   honor the flag or collection traversal will duplicate result rows;
//! - string-match operators compile only their subject side, the pattern
//!   operand is evaluated to a string.

use crate::ast::operands::{Operand, Operation};
use crate::ast::operators::OpKind;
use crate::eval::EvalError;
use crate::value::Value;

/// Comparison forms a backend must render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionOp {
    And,
    Or,
}

/// Arithmetic forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

/// String-match forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Includes,
    StartsWith,
    EndsWith,
}

/// A backend capable of turning compiled nodes into query predicates.
///
/// Implementations stay entirely outside the engine; [`crate::sql`] ships a
/// reference implementation that renders parameterized WHERE clauses.
pub trait QueryBuilder {
    /// The backend's expression type.
    type Expr;

    /// The backend's error type. Engine-side evaluation failures (a
    /// string-match pattern that cannot be evaluated, for instance) are
    /// funneled through `From<EvalError>`.
    type Error: From<EvalError>;

    fn constant(&mut self, value: &Value) -> Result<Self::Expr, Self::Error>;

    fn reference(&mut self, path: &str) -> Result<Self::Expr, Self::Error>;

    fn compare(
        &mut self,
        op: CompareOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> Result<Self::Expr, Self::Error>;

    fn junction(
        &mut self,
        op: JunctionOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> Result<Self::Expr, Self::Error>;

    fn negate(&mut self, operand: Self::Expr) -> Result<Self::Expr, Self::Error>;

    fn arithmetic(
        &mut self,
        op: ArithOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> Result<Self::Expr, Self::Error>;

    fn string_match(
        &mut self,
        mode: MatchMode,
        subject: Self::Expr,
        pattern: &str,
    ) -> Result<Self::Expr, Self::Error>;

    fn membership(
        &mut self,
        needle: Self::Expr,
        haystack: Self::Expr,
    ) -> Result<Self::Expr, Self::Error>;

    /// Is-null test for scalar expressions.
    fn null_test(&mut self, operand: Self::Expr) -> Result<Self::Expr, Self::Error>;

    /// Is-empty test for collection-valued expressions.
    fn empty_test(&mut self, operand: Self::Expr) -> Result<Self::Expr, Self::Error>;

    /// Whether an expression is collection-valued. Drives the is-empty
    /// null convention and the distinct side channel.
    fn is_collection(&self, _expr: &Self::Expr) -> bool {
        false
    }

    /// Side channel: the compiled query traverses a collection and the
    /// backend must deduplicate result rows.
    fn mark_distinct(&mut self) {}
}

pub(crate) fn compile_operation<B: QueryBuilder>(
    operation: &Operation,
    builder: &mut B,
) -> Result<B::Expr, B::Error> {
    let operands = operation.operands();
    match operation.operator().kind {
        OpKind::Not => {
            let inner = operands[0].compile(builder)?;
            builder.negate(inner)
        }
        OpKind::And => compile_junction(JunctionOp::And, operands, builder),
        OpKind::Or => compile_junction(JunctionOp::Or, operands, builder),
        OpKind::Equal => compile_equality(false, operands, builder),
        OpKind::NotEqual => compile_equality(true, operands, builder),
        OpKind::LessThan => compile_comparison(CompareOp::LessThan, operands, builder),
        OpKind::LessOrEqual => compile_comparison(CompareOp::LessOrEqual, operands, builder),
        OpKind::GreaterThan => compile_comparison(CompareOp::GreaterThan, operands, builder),
        OpKind::GreaterOrEqual => {
            compile_comparison(CompareOp::GreaterOrEqual, operands, builder)
        }
        OpKind::In => {
            let (needle, haystack) = compile_pair(operands, builder)?;
            builder.membership(needle, haystack)
        }
        OpKind::Add => compile_arithmetic(ArithOp::Add, operands, builder),
        OpKind::Subtract => compile_arithmetic(ArithOp::Subtract, operands, builder),
        OpKind::Multiply => compile_arithmetic(ArithOp::Multiply, operands, builder),
        OpKind::Divide => compile_arithmetic(ArithOp::Divide, operands, builder),
        OpKind::Remainder => compile_arithmetic(ArithOp::Remainder, operands, builder),
        OpKind::Includes => compile_string_match(MatchMode::Includes, operands, builder),
        OpKind::StartsWith => compile_string_match(MatchMode::StartsWith, operands, builder),
        OpKind::EndsWith => compile_string_match(MatchMode::EndsWith, operands, builder),
    }
}

/// Compiles both sides and flags the distinct side channel when either is
/// collection-valued.
fn compile_pair<B: QueryBuilder>(
    operands: &[Operand],
    builder: &mut B,
) -> Result<(B::Expr, B::Expr), B::Error> {
    let left = operands[0].compile(builder)?;
    let right = operands[1].compile(builder)?;
    if builder.is_collection(&left) || builder.is_collection(&right) {
        builder.mark_distinct();
    }
    Ok((left, right))
}

fn compile_junction<B: QueryBuilder>(
    op: JunctionOp,
    operands: &[Operand],
    builder: &mut B,
) -> Result<B::Expr, B::Error> {
    let (left, right) = compile_pair(operands, builder)?;
    builder.junction(op, left, right)
}

fn compile_comparison<B: QueryBuilder>(
    op: CompareOp,
    operands: &[Operand],
    builder: &mut B,
) -> Result<B::Expr, B::Error> {
    let (left, right) = compile_pair(operands, builder)?;
    builder.compare(op, left, right)
}

fn compile_arithmetic<B: QueryBuilder>(
    op: ArithOp,
    operands: &[Operand],
    builder: &mut B,
) -> Result<B::Expr, B::Error> {
    let (left, right) = compile_pair(operands, builder)?;
    builder.arithmetic(op, left, right)
}

/// Equality carries the null convention: a null literal on one side turns
/// the comparison into an is-empty test (collection) or an is-null test
/// (scalar); null on both sides is a tautology.
fn compile_equality<B: QueryBuilder>(
    negated: bool,
    operands: &[Operand],
    builder: &mut B,
) -> Result<B::Expr, B::Error> {
    let left_null = operands[0].is_null_literal();
    let right_null = operands[1].is_null_literal();

    let expr = if left_null && right_null {
        builder.constant(&Value::Boolean(true))?
    } else if left_null || right_null {
        let side = if left_null { &operands[1] } else { &operands[0] };
        let compiled = side.compile(builder)?;
        if builder.is_collection(&compiled) {
            builder.mark_distinct();
            builder.empty_test(compiled)?
        } else {
            builder.null_test(compiled)?
        }
    } else {
        let (left, right) = compile_pair(operands, builder)?;
        builder.compare(CompareOp::Equal, left, right)?
    };

    if negated {
        builder.negate(expr)
    } else {
        Ok(expr)
    }
}

fn compile_string_match<B: QueryBuilder>(
    mode: MatchMode,
    operands: &[Operand],
    builder: &mut B,
) -> Result<B::Expr, B::Error> {
    let subject = operands[0].compile(builder)?;
    // the pattern side is evaluated, not compiled
    let pattern = match operands[1].evaluate() {
        Ok(value) => crate::eval::match_text(&value),
        Err(error) => return Err(B::Error::from(error)),
    };
    builder.string_match(mode, subject, &pattern)
}
