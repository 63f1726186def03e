//! Ordering and arithmetic on atoms
//!
//! `Atom` does not implement `PartialOrd` or the `std::ops`
//! operator traits. Ordering is only defined between two atoms of the same
//! scalar kind, and a comparison that cannot be made is an error rather than
//! a `false`.
//!
//! Supported arithmetic:
//!
//! | op | integer | float | string | boolean / list / dictionary |
//! |----|---------|-------|--------|-----------------------------|
//! | +  | checked | yes   | concat | -                           |
//! | -  | checked | yes   | -      | -                           |
//! | *  | checked | yes   | -      | -                           |
//! | /  | -> float| yes   | -      | -                           |

use std::cmp::Ordering;
use std::fmt;

use crate::{ArithmeticFault, Atom, AtomError, AtomResult, Value};

/// Binary arithmetic operator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    #[inline]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }

    /// Apply the operator, producing a new atom
    pub fn apply(self, lhs: &Atom, rhs: &Atom) -> AtomResult<Atom> {
        match (lhs.value(), rhs.value()) {
            (Value::Integer(a), Value::Integer(b)) => self.apply_integer(*a, *b),
            (Value::Float(a), Value::Float(b)) => self.apply_float(*a, *b),
            (Value::String(a), Value::String(b)) if self == BinaryOp::Add => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Atom::string(joined))
            }
            _ => Err(ArithmeticFault::UnsupportedOperands {
                op: self,
                left: lhs.kind(),
                right: rhs.kind(),
            }
            .into()),
        }
    }

    fn apply_integer(self, a: i64, b: i64) -> AtomResult<Atom> {
        let result = match self {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Subtract => a.checked_sub(b),
            BinaryOp::Multiply => a.checked_mul(b),
            BinaryOp::Divide => {
                if b == 0 {
                    return Err(ArithmeticFault::DivisionByZero.into());
                }
                // True division: integer operands yield a float
                return finite(a as f64 / b as f64);
            }
        };
        result
            .map(Atom::integer)
            .ok_or(AtomError::Arithmetic(ArithmeticFault::Overflow))
    }

    fn apply_float(self, a: f64, b: f64) -> AtomResult<Atom> {
        match self {
            BinaryOp::Add => finite(a + b),
            BinaryOp::Subtract => finite(a - b),
            BinaryOp::Multiply => finite(a * b),
            BinaryOp::Divide => {
                if b == 0.0 {
                    return Err(ArithmeticFault::DivisionByZero.into());
                }
                finite(a / b)
            }
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Float result of an operation; infinities from overflow and NaN are refused
fn finite(x: f64) -> AtomResult<Atom> {
    if x.is_finite() {
        Atom::float(x)
    } else {
        Err(ArithmeticFault::NonFinite.into())
    }
}

impl Atom {
    /// Value equality (same as `==`)
    #[inline]
    pub fn equals(&self, other: &Atom) -> bool {
        self == other
    }

    /// Total order between two atoms of the same scalar kind
    pub fn compare_ordered(&self, other: &Atom) -> AtomResult<Ordering> {
        let ordering = match (self.value(), other.value()) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).ok_or_else(|| {
                AtomError::IncomparableOperands {
                    left: self.kind(),
                    right: other.kind(),
                }
            })?,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            _ => {
                return Err(AtomError::IncomparableOperands {
                    left: self.kind(),
                    right: other.kind(),
                })
            }
        };
        Ok(ordering)
    }

    pub fn less_than(&self, other: &Atom) -> AtomResult<bool> {
        Ok(self.compare_ordered(other)?.is_lt())
    }

    pub fn less_equal(&self, other: &Atom) -> AtomResult<bool> {
        Ok(self.compare_ordered(other)?.is_le())
    }

    pub fn greater_than(&self, other: &Atom) -> AtomResult<bool> {
        Ok(self.compare_ordered(other)?.is_gt())
    }

    pub fn greater_equal(&self, other: &Atom) -> AtomResult<bool> {
        Ok(self.compare_ordered(other)?.is_ge())
    }

    pub fn add(&self, other: &Atom) -> AtomResult<Atom> {
        BinaryOp::Add.apply(self, other)
    }

    pub fn subtract(&self, other: &Atom) -> AtomResult<Atom> {
        BinaryOp::Subtract.apply(self, other)
    }

    pub fn multiply(&self, other: &Atom) -> AtomResult<Atom> {
        BinaryOp::Multiply.apply(self, other)
    }

    pub fn divide(&self, other: &Atom) -> AtomResult<Atom> {
        BinaryOp::Divide.apply(self, other)
    }
}
