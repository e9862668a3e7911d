// hprog-parser - Value types for hprog
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type for hprog.
//!
//! A [`Value`] is a tagged union over nil, booleans, 64-bit integers, 64-bit
//! floats and immutable shared strings. Numeric operations on operands of
//! different types first consult the coercion table ([`coercion`]) to pick a
//! common type; pairs without an entry are type errors.

use std::fmt;
use std::rc::Rc;

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedNeg, CheckedSub, Zero};
use thiserror::Error;

/// The tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Nil,
    Bool,
    Int,
    Float,
    Str,
}

impl ValueType {
    /// Type name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Nil => "nil",
            ValueType::Bool => "boolean",
            ValueType::Int => "integer",
            ValueType::Float => "float",
            ValueType::Str => "string",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The coercion table: the common type two operands are converted to before
/// a binary numeric operation, or `None` if the pair cannot be combined.
pub fn coercion(left: ValueType, right: ValueType) -> Option<ValueType> {
    match (left, right) {
        (ValueType::Float, ValueType::Float)
        | (ValueType::Int, ValueType::Float)
        | (ValueType::Float, ValueType::Int) => Some(ValueType::Float),
        (ValueType::Int, ValueType::Int) => Some(ValueType::Int),
        _ => None,
    }
}

/// Failure of a value-level operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("type error: expected {expected}, got {got}")]
    TypeMismatch { expected: &'static str, got: String },
    #[error("integer overflow in '{0}'")]
    Overflow(&'static str),
    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for value operations.
pub type Result<T> = std::result::Result<T, ValueError>;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
}

/// Numeric operands after coercion to a common type.
enum Operands {
    Int(i64, i64),
    Float(f64, f64),
}

impl Value {
    /// Create a string value.
    pub fn string(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert both operands to the type the coercion table picks for them.
    fn operands(&self, other: &Value) -> Option<Operands> {
        match coercion(self.value_type(), other.value_type())? {
            ValueType::Int => Some(Operands::Int(self.as_int()?, other.as_int()?)),
            ValueType::Float => Some(Operands::Float(self.as_float()?, other.as_float()?)),
            _ => None,
        }
    }

    fn mismatch(&self, op: &str, other: &Value, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            got: format!("{} {} {}", self.type_name(), op, other.type_name()),
        }
    }

    fn arithmetic<FI, FF>(
        &self,
        other: &Value,
        op: &'static str,
        int_op: FI,
        float_op: FF,
    ) -> Result<Value>
    where
        FI: Fn(&i64, &i64) -> Option<i64>,
        FF: Fn(f64, f64) -> f64,
    {
        match self.operands(other) {
            Some(Operands::Int(x, y)) => int_op(&x, &y)
                .map(Value::Int)
                .ok_or(ValueError::Overflow(op)),
            Some(Operands::Float(x, y)) => Ok(Value::Float(float_op(x, y))),
            None => Err(self.mismatch(op, other, "number")),
        }
    }

    /// `+`: numeric addition, or concatenation of two strings.
    pub fn add(&self, other: &Value) -> Result<Value> {
        if let (Value::Str(a), Value::Str(b)) = (self, other) {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            return Ok(Value::Str(Rc::from(joined)));
        }
        self.arithmetic(other, "+", <i64 as CheckedAdd>::checked_add, |x, y| x + y)
    }

    pub fn subtract(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, "-", <i64 as CheckedSub>::checked_sub, |x, y| x - y)
    }

    pub fn multiply(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, "*", <i64 as CheckedMul>::checked_mul, |x, y| x * y)
    }

    /// `/`: integer division truncates; float division follows IEEE 754.
    pub fn divide(&self, other: &Value) -> Result<Value> {
        if let Some(Operands::Int(_, y)) = self.operands(other) {
            if y.is_zero() {
                return Err(ValueError::DivisionByZero);
            }
        }
        self.arithmetic(other, "/", <i64 as CheckedDiv>::checked_div, |x, y| x / y)
    }

    /// Unary minus. Booleans negate logically.
    pub fn negate(&self) -> Result<Value> {
        match self {
            Value::Int(n) => CheckedNeg::checked_neg(n)
                .map(Value::Int)
                .ok_or(ValueError::Overflow("-")),
            Value::Float(n) => Ok(Value::Float(-n)),
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Err(ValueError::TypeMismatch {
                expected: "number or boolean",
                got: self.type_name().into(),
            }),
        }
    }

    /// Logical not. Only booleans are accepted.
    pub fn not(&self) -> Result<Value> {
        match self {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Err(ValueError::TypeMismatch {
                expected: "boolean",
                got: self.type_name().into(),
            }),
        }
    }

    /// Equality after coercion. Values whose types cannot be coerced to a
    /// common type are unequal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => match self.operands(other) {
                Some(Operands::Int(x, y)) => x == y,
                Some(Operands::Float(x, y)) => x == y,
                None => false,
            },
        }
    }

    pub fn greater(&self, other: &Value) -> Result<bool> {
        match self.operands(other) {
            Some(Operands::Int(x, y)) => Ok(x > y),
            Some(Operands::Float(x, y)) => Ok(x > y),
            None => Err(self.mismatch(">", other, "number")),
        }
    }

    pub fn less(&self, other: &Value) -> Result<bool> {
        match self.operands(other) {
            Some(Operands::Int(x, y)) => Ok(x < y),
            Some(Operands::Float(x, y)) => Ok(x < y),
            None => Err(self.mismatch("<", other, "number")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            // Debug keeps the trailing `.0` on integral floats.
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
