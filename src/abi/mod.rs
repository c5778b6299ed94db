//! C entry points linked into compiled programs.
//!
//! Every value crossing this boundary is an `i64` word. Closures travel as
//! reference words registered in a thread-local closure arena; function
//! references are code addresses of `extern "C"` functions taking N words.
//!
//! Convention: nothing here returns an error. Any failure is reported on
//! stderr and the process exits with status 1.

use std::{
    cell::RefCell,
    io::{self, Write},
    process,
    rc::Rc,
    slice,
};

use crate::{
    primop::{PrimOp, execute_primop},
    runtime::{
        Runtime, RuntimeContext,
        apply::apply,
        closure::Closure,
        errors,
        function_ref::{FunctionRef, NativeFunction},
        value::Value,
    },
};

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::from_env());
}

/// Runs `f` against this thread's runtime.
///
/// `f` must not call back into the C entry points.
pub fn with_thread_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> R {
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Context handle over the thread-local runtime.
///
/// Each method borrows the runtime only for its own duration, so native code
/// called from an apply step can re-enter the entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRuntime;

impl RuntimeContext for ThreadRuntime {
    fn write_stdout(&mut self, text: &str) -> Result<(), String> {
        with_thread_runtime(|rt| rt.write_stdout(text))
    }

    fn register_closure(&mut self, closure: &Rc<Closure>) -> i64 {
        with_thread_runtime(|rt| rt.register_closure(closure))
    }

    fn resolve_closure(&self, word: i64) -> Option<Rc<Closure>> {
        RUNTIME.with(|rt| rt.borrow().resolve_closure(word))
    }

    fn trace_enabled(&self) -> bool {
        RUNTIME.with(|rt| rt.borrow().config.trace)
    }
}

/// Reports `message` on stderr and exits with status 1.
pub fn fatal(message: &str) -> ! {
    // Straight to the stream: `exit` skips destructors and test capture.
    let _ = writeln!(io::stderr().lock(), "{}", message);
    process::exit(1)
}

fn or_fatal<T>(result: Result<T, String>) -> T {
    result.unwrap_or_else(|message| fatal(&message))
}

fn to_count(value: i64, what: &str) -> Result<usize, String> {
    usize::try_from(value).map_err(|_| format!("{}: negative count {}", what, value))
}

// ---------------------------------------------------------------------------
// Closures
// ---------------------------------------------------------------------------

/// Safe form of [`create_closure`].
pub fn try_create_closure(function: i64, arity: i64, applied_count: i64) -> Result<i64, String> {
    let arity = to_count(arity, "create_closure")?;
    let applied_count = to_count(applied_count, "create_closure")?;
    let closure = Closure::create(
        FunctionRef::Native(NativeFunction::from_word(function)),
        arity,
        applied_count,
    )?;
    Ok(ThreadRuntime.register_closure(&Rc::new(closure)))
}

/// Safe form of [`apply_args_to_closure`].
pub fn try_apply_words(closure: i64, args: &[i64]) -> Result<i64, String> {
    let mut ctx = ThreadRuntime;
    let target = ctx.resolve_closure(closure).ok_or_else(|| {
        format!("apply_args_to_closure: {}", errors::unknown_closure_word(closure))
    })?;
    let args = args.iter().copied().map(Value::Integer).collect();
    let result = apply(&mut ctx, target, args)?;
    Ok(ctx.value_to_word(&result))
}

/// Wraps the native function at `function` as a closure of `arity` arguments.
#[unsafe(no_mangle)]
pub extern "C" fn create_closure(function: i64, arity: i64, applied_count: i64) -> i64 {
    or_fatal(try_create_closure(function, arity, applied_count))
}

/// Applies `argc` words read from `argv` to the closure `closure`.
///
/// # Safety
/// `argv` must point to `argc` readable words, or `argc` must be `0`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn apply_args_to_closure(closure: i64, argc: i64, argv: *const i64) -> i64 {
    let argc = or_fatal(to_count(argc, "apply_args_to_closure"));
    let args = if argc == 0 {
        &[][..]
    } else {
        // SAFETY: guaranteed by the caller.
        unsafe { slice::from_raw_parts(argv, argc) }
    };
    or_fatal(try_apply_words(closure, args))
}

/// Releases every closure handed out as a word on this thread.
#[unsafe(no_mangle)]
pub extern "C" fn rt_reset_closures() {
    with_thread_runtime(|rt| rt.reset_closures());
}

/// Prints allocation stats to stderr when `SHAITAN_LEAK_DETECTOR` is set.
#[unsafe(no_mangle)]
pub extern "C" fn rt_report_leaks() {
    let report = with_thread_runtime(|rt| rt.leak_report());
    if let Some(report) = report {
        eprintln!("{}", or_fatal(report));
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

fn prim_word(op: PrimOp, args: &[i64]) -> i64 {
    let mut ctx = ThreadRuntime;
    let args = args.iter().copied().map(Value::Integer).collect();
    let value = or_fatal(execute_primop(&mut ctx, op, args));
    ctx.value_to_word(&value)
}

#[unsafe(export_name = "add")]
pub extern "C" fn rt_add(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Add, &[x, y])
}

#[unsafe(export_name = "sub")]
pub extern "C" fn rt_sub(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Sub, &[x, y])
}

#[unsafe(export_name = "mul")]
pub extern "C" fn rt_mul(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Mul, &[x, y])
}

#[unsafe(export_name = "divd")]
pub extern "C" fn rt_div(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Div, &[x, y])
}

#[unsafe(export_name = "eq")]
pub extern "C" fn rt_eq(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Eq, &[x, y])
}

#[unsafe(export_name = "neq")]
pub extern "C" fn rt_neq(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Neq, &[x, y])
}

#[unsafe(export_name = "less")]
pub extern "C" fn rt_less(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Less, &[x, y])
}

#[unsafe(export_name = "leq")]
pub extern "C" fn rt_leq(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Leq, &[x, y])
}

#[unsafe(export_name = "gre")]
pub extern "C" fn rt_gre(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Gre, &[x, y])
}

#[unsafe(export_name = "geq")]
pub extern "C" fn rt_geq(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Geq, &[x, y])
}

#[unsafe(export_name = "and")]
pub extern "C" fn rt_and(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::And, &[x, y])
}

#[unsafe(export_name = "or")]
pub extern "C" fn rt_or(x: i64, y: i64) -> i64 {
    prim_word(PrimOp::Or, &[x, y])
}

#[unsafe(export_name = "print_int")]
pub extern "C" fn rt_print_int(x: i64) -> i64 {
    prim_word(PrimOp::PrintInt, &[x])
}

/// Never returns: reports `Match failure` and exits with status 1.
#[unsafe(export_name = "fail_match")]
pub extern "C" fn rt_fail_match(x: i64) -> i64 {
    prim_word(PrimOp::FailMatch, &[x])
}

/// Code address of the exported function for `op`, usable as a function
/// reference in [`create_closure`].
pub fn prim_address(op: PrimOp) -> i64 {
    let f: extern "C" fn(i64, i64) -> i64 = match op {
        PrimOp::Add => rt_add,
        PrimOp::Sub => rt_sub,
        PrimOp::Mul => rt_mul,
        PrimOp::Div => rt_div,
        PrimOp::Eq => rt_eq,
        PrimOp::Neq => rt_neq,
        PrimOp::Less => rt_less,
        PrimOp::Leq => rt_leq,
        PrimOp::Gre => rt_gre,
        PrimOp::Geq => rt_geq,
        PrimOp::And => rt_and,
        PrimOp::Or => rt_or,
        PrimOp::PrintInt => return rt_print_int as usize as i64,
        PrimOp::FailMatch => return rt_fail_match as usize as i64,
    };
    f as usize as i64
}
