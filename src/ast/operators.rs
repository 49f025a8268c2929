use std::fmt;

use crate::eval::{self, EvalError};
use crate::value::Value;

/// Operand count an operator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    pub fn operand_count(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

/// How ties at equal precedence resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// The closed set of operator behaviors. The compile rules dispatch on this
/// tag; grouping is by backend category (boolean, comparison, membership,
/// arithmetic, string match).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    // Boolean
    And,
    Or,
    Not,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,

    // Membership
    In,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,

    // String match
    Includes,
    StartsWith,
    EndsWith,
}

/// An immutable operator definition.
///
/// Operators are `static` values shared by reference across dialects and
/// parses; a dialect maps surface spellings onto them. The evaluation rule
/// is a plain function value over resolved operand values; the compile rule
/// is keyed by [`OpKind`] (see [`crate::compile`]) because it is generic
/// over the backend type. Equality is by name.
pub struct Operator {
    pub name: &'static str,
    pub kind: OpKind,
    pub arity: Arity,
    pub precedence: u8,
    pub associativity: Associativity,
    pub(crate) eval: fn(&[Value]) -> Result<Value, EvalError>,
}

impl Operator {
    /// Applies the evaluation rule to already-resolved operand values.
    ///
    /// # Panics
    ///
    /// Panics when the value count does not match the operator's arity;
    /// that is a programmer error, not a runtime condition.
    pub fn evaluate(&self, values: &[Value]) -> Result<Value, EvalError> {
        assert_eq!(
            values.len(),
            self.arity.operand_count(),
            "operator '{}' expects {} operand(s)",
            self.name,
            self.arity.operand_count()
        );
        (self.eval)(values)
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Operator {}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .field("precedence", &self.precedence)
            .field("associativity", &self.associativity)
            .finish()
    }
}

/// Logical conjunction
pub static AND: Operator = Operator {
    name: "&&",
    kind: OpKind::And,
    arity: Arity::Binary,
    precedence: 40,
    associativity: Associativity::Left,
    eval: eval::and,
};

/// Logical disjunction
pub static OR: Operator = Operator {
    name: "||",
    kind: OpKind::Or,
    arity: Arity::Binary,
    precedence: 30,
    associativity: Associativity::Left,
    eval: eval::or,
};

/// Logical negation. The only right-associative operator in the table.
pub static NOT: Operator = Operator {
    name: "!",
    kind: OpKind::Not,
    arity: Arity::Unary,
    precedence: 140,
    associativity: Associativity::Right,
    eval: eval::not,
};

/// Structural equality; `null == null` holds
pub static EQUAL: Operator = Operator {
    name: "==",
    kind: OpKind::Equal,
    arity: Arity::Binary,
    precedence: 80,
    associativity: Associativity::Left,
    eval: eval::equal,
};

/// Negated structural equality
pub static NOT_EQUAL: Operator = Operator {
    name: "!=",
    kind: OpKind::NotEqual,
    arity: Arity::Binary,
    precedence: 80,
    associativity: Associativity::Left,
    eval: eval::not_equal,
};

pub static LESS_THAN: Operator = Operator {
    name: "<",
    kind: OpKind::LessThan,
    arity: Arity::Binary,
    precedence: 90,
    associativity: Associativity::Left,
    eval: eval::less_than,
};

pub static LESS_OR_EQUAL: Operator = Operator {
    name: "<=",
    kind: OpKind::LessOrEqual,
    arity: Arity::Binary,
    precedence: 90,
    associativity: Associativity::Left,
    eval: eval::less_or_equal,
};

pub static GREATER_THAN: Operator = Operator {
    name: ">",
    kind: OpKind::GreaterThan,
    arity: Arity::Binary,
    precedence: 90,
    associativity: Associativity::Left,
    eval: eval::greater_than,
};

pub static GREATER_OR_EQUAL: Operator = Operator {
    name: ">=",
    kind: OpKind::GreaterOrEqual,
    arity: Arity::Binary,
    precedence: 90,
    associativity: Associativity::Left,
    eval: eval::greater_or_equal,
};

/// Membership test; the right operand is an iterable or a singleton
pub static IN: Operator = Operator {
    name: "in",
    kind: OpKind::In,
    arity: Arity::Binary,
    precedence: 90,
    associativity: Associativity::Left,
    eval: eval::member_of,
};

pub static ADD: Operator = Operator {
    name: "+",
    kind: OpKind::Add,
    arity: Arity::Binary,
    precedence: 110,
    associativity: Associativity::Left,
    eval: eval::add,
};

pub static SUBTRACT: Operator = Operator {
    name: "-",
    kind: OpKind::Subtract,
    arity: Arity::Binary,
    precedence: 110,
    associativity: Associativity::Left,
    eval: eval::subtract,
};

pub static MULTIPLY: Operator = Operator {
    name: "*",
    kind: OpKind::Multiply,
    arity: Arity::Binary,
    precedence: 120,
    associativity: Associativity::Left,
    eval: eval::multiply,
};

pub static DIVIDE: Operator = Operator {
    name: "/",
    kind: OpKind::Divide,
    arity: Arity::Binary,
    precedence: 120,
    associativity: Associativity::Left,
    eval: eval::divide,
};

pub static REMAINDER: Operator = Operator {
    name: "%",
    kind: OpKind::Remainder,
    arity: Arity::Binary,
    precedence: 125,
    associativity: Associativity::Left,
    eval: eval::remainder,
};

/// Substring containment
pub static INCLUDES: Operator = Operator {
    name: "includes",
    kind: OpKind::Includes,
    arity: Arity::Binary,
    precedence: 90,
    associativity: Associativity::Left,
    eval: eval::includes,
};

pub static STARTS_WITH: Operator = Operator {
    name: "startsWith",
    kind: OpKind::StartsWith,
    arity: Arity::Binary,
    precedence: 90,
    associativity: Associativity::Left,
    eval: eval::starts_with,
};

pub static ENDS_WITH: Operator = Operator {
    name: "endsWith",
    kind: OpKind::EndsWith,
    arity: Arity::Binary,
    precedence: 90,
    associativity: Associativity::Left,
    eval: eval::ends_with,
};
