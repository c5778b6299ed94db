use std::fmt;

use crate::runtime::{errors, function_ref::FunctionRef, leak_detector, value::Value};

/// A function together with the arguments bound to it so far.
///
/// `applied` holds the bound prefix. Slot storage is reserved fallibly when
/// arguments are bound. A closure is never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub function: FunctionRef,
    arity: usize,
    applied: Vec<Value>,
}

impl Closure {
    /// Fresh closure with nothing bound. Allocates no slots yet.
    pub fn new(function: FunctionRef, arity: usize) -> Self {
        leak_detector::record_closure();
        Self {
            function,
            arity,
            applied: Vec::new(),
        }
    }

    /// Allocates a closure with `applied_count` slots already marked as bound.
    ///
    /// Slots bound this way hold `Integer(0)`; callers that need real values
    /// bind them through [`Closure::extend`].
    pub fn create(
        function: FunctionRef,
        arity: usize,
        applied_count: usize,
    ) -> Result<Self, String> {
        if applied_count > arity {
            return Err(errors::overflow_error(
                &function.to_string(),
                arity,
                0,
                applied_count,
            ));
        }
        let mut applied = Vec::new();
        applied
            .try_reserve_exact(arity)
            .map_err(|_| errors::allocation_error(arity))?;
        applied.resize(applied_count, Value::Integer(0));

        leak_detector::record_closure();
        Ok(Self {
            function,
            arity,
            applied,
        })
    }

    /// Returns a new closure with `extra` bound after the current arguments.
    ///
    /// `self` is left untouched.
    pub fn extend(&self, extra: &[Value]) -> Result<Self, String> {
        if extra.len() > self.remaining() {
            return Err(errors::overflow_error(
                &self.function.to_string(),
                self.arity,
                self.applied.len(),
                extra.len(),
            ));
        }
        let mut applied = Vec::new();
        applied
            .try_reserve_exact(self.arity)
            .map_err(|_| errors::allocation_error(self.arity))?;
        applied.extend_from_slice(&self.applied);
        applied.extend_from_slice(extra);

        leak_detector::record_extension();
        Ok(Self {
            function: self.function.clone(),
            arity: self.arity,
            applied,
        })
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn applied_arguments(&self) -> &[Value] {
        &self.applied
    }

    /// Arguments still missing before the closure can be invoked.
    pub fn remaining(&self) -> usize {
        self.arity - self.applied.len()
    }

    pub fn is_saturated(&self) -> bool {
        self.applied.len() == self.arity
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<closure {} {}/{}>",
            self.function,
            self.applied.len(),
            self.arity
        )
    }
}
