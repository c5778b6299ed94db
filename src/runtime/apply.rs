//! The currying engine.
//!
//! `apply` takes a closure and the arguments supplied at one call site, in
//! any number. Three outcomes are possible:
//!
//! - too few arguments: a new closure with the arguments bound;
//! - exactly enough: the function is invoked and its result returned;
//! - more than enough: the function is invoked, its result must be a closure,
//!   and the surplus arguments are applied to that closure in turn.
//!
//! The third case is what lets `f a b c d` work when `f` takes two arguments
//! and returns a two-argument function.

use std::rc::Rc;

use crate::runtime::{RuntimeContext, closure::Closure, errors, invoke::invoke, value::Value};

/// Consecutive invocations of zero-arity closures tolerated before a chain is
/// treated as runaway. Every other step consumes at least one argument.
pub const MAX_APPLY_CHAIN: usize = 1024;

pub fn apply(
    ctx: &mut dyn RuntimeContext,
    closure: Rc<Closure>,
    args: Vec<Value>,
) -> Result<Value, String> {
    let mut closure = closure;
    let mut pending: &[Value] = &args;
    let mut stalled = 0;

    loop {
        if ctx.trace_enabled() {
            ctx.trace(&format!("[apply] {} <- [{}]", closure, render_args(pending)));
        }

        let remaining = closure.remaining();

        // Nothing to bind: hand back the same closure instead of a copy.
        if pending.is_empty() && remaining > 0 {
            return Ok(Value::Closure(closure));
        }

        if pending.len() < remaining {
            let extended = closure.extend(pending)?;
            if ctx.trace_enabled() {
                ctx.trace(&format!("[extend] {}", extended));
            }
            return Ok(Value::Closure(Rc::new(extended)));
        }

        let (consumed, leftover) = pending.split_at(remaining);
        let result = invoke(ctx, &closure, consumed)?;
        if leftover.is_empty() {
            return Ok(result);
        }

        if remaining == 0 {
            stalled += 1;
            if stalled > MAX_APPLY_CHAIN {
                return Err(errors::apply_chain_error(MAX_APPLY_CHAIN, leftover.len()));
            }
        } else {
            stalled = 0;
        }

        closure = resolve_callable(ctx, result)?;
        pending = leftover;
    }
}

/// Interprets a call result as the closure that receives surplus arguments.
///
/// Native code returns closures as reference words, so integers are looked
/// up in the context's closure arena.
pub fn resolve_callable(ctx: &dyn RuntimeContext, value: Value) -> Result<Rc<Closure>, String> {
    if let Some(closure) = value.as_closure() {
        return Ok(Rc::clone(closure));
    }
    match value {
        Value::Integer(word) => ctx
            .resolve_closure(word)
            .ok_or_else(|| errors::not_a_function(&format!("Int {}", word))),
        other => Err(errors::not_a_function(other.type_name())),
    }
}

fn render_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
