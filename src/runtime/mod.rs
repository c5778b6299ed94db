//! Closure object model and the currying engine.
//!
//! # Ownership Model
//! Closures are immutable once built and shared through `Rc`. Partial
//! application never mutates a closure; it allocates a new one that copies the
//! bound prefix forward.
//!
//! The invariant is:
//! - A closure's bound argument count never exceeds its arity.
//! - Closures reachable from Rust are freed when the last `Rc` drops.
//! - Closures handed to native code as words are kept alive by the context's
//!   closure arena until the arena is reset.
use crate::runtime::value::Value;

pub mod apply;
pub mod builtin_function;
pub mod closure;
pub mod closure_arena;
pub mod config;
pub mod context;
pub mod errors;
pub mod function_ref;
pub mod invoke;
pub mod leak_detector;
pub mod native_call;
pub mod value;

#[cfg(test)]
mod closure_test;

pub use context::{OutputSink, Runtime, RuntimeContext};

pub type BuiltinFn = fn(&mut dyn RuntimeContext, Vec<Value>) -> Result<Value, String>;
