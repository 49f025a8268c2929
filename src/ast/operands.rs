use std::fmt;

use crate::ast::operators::{Arity, Operator};
use crate::compile::{self, QueryBuilder};
use crate::eval::{self, EvalError};
use crate::value::Value;

/// Any evaluable/compilable node of the expression tree.
///
/// A reference names a field or path; the engine never resolves it itself.
/// Evaluation resolves references against a caller-supplied document, and
/// compilation hands them to the query backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A constant value
    Literal(Value),

    /// A field/path reference, resolved by the backend (or by
    /// [`Operand::evaluate_in`] against a document)
    Reference(String),

    /// A nested operation
    Operation(Operation),
}

/// An operator applied to an ordered operand list.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    operator: &'static Operator,
    operands: Vec<Operand>,
}

impl Operation {
    /// Builds an operation.
    ///
    /// # Panics
    ///
    /// Panics when the operand count does not match the operator's arity;
    /// that is a programmer error, not a runtime condition.
    pub fn new(operator: &'static Operator, operands: Vec<Operand>) -> Self {
        assert_eq!(
            operands.len(),
            operator.arity.operand_count(),
            "operator '{}' expects {} operand(s)",
            operator.name,
            operator.arity.operand_count()
        );
        Operation { operator, operands }
    }

    pub fn unary(operator: &'static Operator, operand: Operand) -> Self {
        assert_eq!(operator.arity, Arity::Unary, "unary operator expected");
        Operation::new(operator, vec![operand])
    }

    pub fn binary(operator: &'static Operator, left: Operand, right: Operand) -> Self {
        assert_eq!(operator.arity, Arity::Binary, "binary operator expected");
        Operation::new(operator, vec![left, right])
    }

    pub fn operator(&self) -> &'static Operator {
        self.operator
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }
}

impl Operand {
    pub fn literal(value: impl Into<Value>) -> Self {
        Operand::Literal(value.into())
    }

    pub fn reference(path: impl Into<String>) -> Self {
        Operand::Reference(path.into())
    }

    /// Evaluates a constant-foldable expression to a value.
    ///
    /// Any [`Operand::Reference`] in the tree fails with
    /// [`EvalError::UnresolvedReference`]; use [`Operand::evaluate_in`] to
    /// resolve references against a document.
    pub fn evaluate(&self) -> Result<Value, EvalError> {
        self.resolve(None)
    }

    /// Evaluates the expression against an in-memory document. References
    /// resolve as dotted paths into the document; missing paths read as
    /// null.
    pub fn evaluate_in(&self, document: &Value) -> Result<Value, EvalError> {
        self.resolve(Some(document))
    }

    fn resolve(&self, document: Option<&Value>) -> Result<Value, EvalError> {
        match self {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Reference(path) => match document {
                Some(doc) => Ok(eval::resolve_path(doc, path)),
                None => Err(EvalError::UnresolvedReference(path.clone())),
            },
            Operand::Operation(operation) => {
                let mut values = Vec::with_capacity(operation.operands.len());
                for operand in &operation.operands {
                    values.push(operand.resolve(document)?);
                }
                operation.operator.evaluate(&values)
            }
        }
    }

    /// Compiles the expression into a backend predicate. Literals become
    /// backend constants, references backend lookups, and operations apply
    /// their category's construction rule.
    pub fn compile<B: QueryBuilder>(&self, builder: &mut B) -> Result<B::Expr, B::Error> {
        match self {
            Operand::Literal(value) => builder.constant(value),
            Operand::Reference(path) => builder.reference(path),
            Operand::Operation(operation) => compile::compile_operation(operation, builder),
        }
    }

    pub(crate) fn is_null_literal(&self) -> bool {
        matches!(self, Operand::Literal(Value::Null))
    }
}

impl From<Operation> for Operand {
    fn from(operation: Operation) -> Self {
        Operand::Operation(operation)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{}", value.as_string()),
            Operand::Reference(path) => f.write_str(path),
            Operand::Operation(operation) => write!(f, "{}", operation),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator.arity {
            Arity::Unary => write!(f, "{} {}", self.operator, self.operands[0]),
            Arity::Binary => write!(
                f,
                "({} {} {})",
                self.operands[0], self.operator, self.operands[1]
            ),
        }
    }
}
