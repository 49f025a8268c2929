//! # Sift - Abstract Syntax Tree
//!
//! The AST for sift filter expressions. A parsed expression is a single
//! [`Operand`]: a literal, a field reference, or an [`Operation`] applying
//! one [`Operator`] to an ordered operand list. Operations are themselves
//! operands, which is what makes the tree recursive.
//!
//! The same tree supports two interpretations:
//!
//! - **evaluate** - resolve it to a [`crate::Value`], either standalone
//!   (constant-foldable expressions) or against an in-memory document;
//! - **compile** - hand it to a [`crate::QueryBuilder`] and obtain a
//!   backend-specific predicate expression.
//!
//! Operators are shared `static` records. Dialects only decide how they are
//! spelled; the tree, its evaluation rules, and its compile rules are
//! dialect-agnostic.
//!
//! ```
//! use sift_lang::{Dialect, Value};
//!
//! let ast = Dialect::symbolic().parse("(1 + 2) * 3").unwrap();
//! assert_eq!(ast.evaluate().unwrap(), Value::Integer(9));
//! ```
pub mod operands;
pub mod operators;

pub use operands::{Operand, Operation};
pub use operators::{Arity, Associativity, OpKind, Operator};
