//! Message builders for runtime failures.
//!
//! Every runtime failure is an `Err(String)`; the C ABI reports the message on
//! stderr and exits. Keep the leading phrase of each message stable, tests and
//! callers match on it.

/// Fixed diagnostic emitted by the `fail_match` primitive.
pub const MATCH_FAILURE: &str = "Match failure";

pub(crate) fn format_hint(signature: &str) -> String {
    format!("\n\nHint:\n  {}", signature)
}

pub(crate) fn arity_error(name: &str, expected: usize, got: usize) -> String {
    format!(
        "wrong number of arguments\n\n  function: {}\n  expected: {}\n  got: {}",
        name, expected, got
    )
}

pub(crate) fn type_error(name: &str, label: &str, expected: &str, got: &str) -> String {
    format!("{} expected {} to be {}, got {}", name, label, expected, got)
}

pub(crate) fn not_a_function(got: &str) -> String {
    format!(
        "not a function: cannot apply leftover arguments to {}{}",
        got,
        format_hint("a saturated call given extra arguments must return a closure")
    )
}

pub(crate) fn allocation_error(arity: usize) -> String {
    format!("closure allocation failed: could not reserve {} argument slots", arity)
}

pub(crate) fn overflow_error(name: &str, arity: usize, applied: usize, extra: usize) -> String {
    format!(
        "closure overflow: {} has arity {} with {} bound, cannot bind {} more",
        name, arity, applied, extra
    )
}

pub(crate) fn saturation_error(name: &str, arity: usize, got: usize) -> String {
    format!(
        "call_closure: {} needs exactly {} arguments to be invoked, got {}",
        name, arity, got
    )
}

pub(crate) fn call_interface_error(arity: usize, max: usize) -> String {
    format!(
        "call_closure: cannot prepare call interface for arity {}{}",
        arity,
        format_hint(&format!("native functions take at most {} arguments", max))
    )
}

pub(crate) fn apply_chain_error(limit: usize, left: usize) -> String {
    format!(
        "apply chain exceeded {} zero-arity invocations with {} arguments left",
        limit, left
    )
}

pub(crate) fn unknown_closure_word(word: i64) -> String {
    format!("unknown closure reference {:#x}", word)
}
