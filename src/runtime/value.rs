use std::{fmt, rc::Rc};

use crate::runtime::closure::Closure;

/// Runtime value passed to and returned from closures.
///
/// ## Representation
///
/// Generated code sees every value as a single 64-bit word. Inside the runtime
/// values stay tagged so that an integer result is never mistaken for a
/// closure reference:
///
/// - `Integer` and `Boolean` are unboxed.
/// - `Closure` shares its payload through `Rc`; cloning a closure value is O(1).
///
/// Lowering to a word happens only at the native boundary, see
/// [`RuntimeContext::value_to_word`](crate::runtime::RuntimeContext::value_to_word).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// Boolean value, lowered to `0`/`1` at the native boundary.
    Boolean(bool),
    /// Partially or fully applied function.
    Closure(Rc<Closure>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Closure(closure) => write!(f, "{}", closure),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Closure> for Value {
    fn from(closure: Closure) -> Self {
        Value::Closure(Rc::new(closure))
    }
}

impl Value {
    /// Returns the canonical runtime type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Int",
            Value::Boolean(_) => "Bool",
            Value::Closure(_) => "Closure",
        }
    }

    /// Only `Boolean(false)` and `Integer(0)` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Integer(0))
    }

    pub fn as_closure(&self) -> Option<&Rc<Closure>> {
        match self {
            Value::Closure(closure) => Some(closure),
            _ => None,
        }
    }
}
