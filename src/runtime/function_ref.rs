use std::fmt;

use crate::{primop::PrimOp, runtime::builtin_function::BuiltinFunction};

/// What a closure eventually calls.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionRef {
    /// Primitive from the runtime's own operation set.
    Prim(PrimOp),
    /// Rust function taking tagged values.
    Builtin(BuiltinFunction),
    /// `extern "C"` code taking N words and returning one word.
    Native(NativeFunction),
}

/// Address of a native function with the uniform `(i64, ..) -> i64` signature.
///
/// The address is trusted: whoever produced it guarantees the code behind it
/// takes exactly as many words as the closure's arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFunction {
    pub address: usize,
}

impl NativeFunction {
    pub const fn new(address: usize) -> Self {
        Self { address }
    }

    /// Interprets a function-reference word emitted by generated code.
    pub fn from_word(word: i64) -> Self {
        Self::new(word as usize)
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionRef::Prim(op) => f.write_str(op.display_name()),
            FunctionRef::Builtin(builtin) => f.write_str(builtin.name),
            FunctionRef::Native(native) => write!(f, "native@{:#x}", native.address),
        }
    }
}

impl From<PrimOp> for FunctionRef {
    fn from(op: PrimOp) -> Self {
        FunctionRef::Prim(op)
    }
}

impl From<BuiltinFunction> for FunctionRef {
    fn from(builtin: BuiltinFunction) -> Self {
        FunctionRef::Builtin(builtin)
    }
}

impl From<NativeFunction> for FunctionRef {
    fn from(native: NativeFunction) -> Self {
        FunctionRef::Native(native)
    }
}
