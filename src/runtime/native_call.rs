//! Arity-keyed call shims for native functions.
//!
//! Native functions share one signature shape: N `i64` words in, one `i64`
//! word out, C calling convention. The arity is only known once a closure is
//! inspected, so each supported arity gets a typed shim and the table picks
//! one at runtime.

use crate::runtime::{errors, function_ref::NativeFunction, leak_detector};

/// Largest arity with a call shim.
pub const MAX_NATIVE_ARITY: usize = 16;

macro_rules! word {
    ($index:tt) => {
        i64
    };
}

macro_rules! native_call_table {
    ($address:expr, $args:expr; $($arity:literal => ($($index:tt),*)),* $(,)?) => {
        match $args.len() {
            $(
                $arity => {
                    // SAFETY: the caller guarantees the address is an
                    // `extern "C"` function taking exactly this many words.
                    let f: extern "C" fn($(word!($index)),*) -> i64 =
                        unsafe { std::mem::transmute::<*const (), _>($address as *const ()) };
                    Some(f($($args[$index]),*))
                }
            )*
            _ => None,
        }
    };
}

/// Calls `native` with `args`, choosing the shim that matches `args.len()`.
///
/// Fails when no shim exists for the arity.
///
/// # Safety
/// `native.address` must point to an `extern "C"` function taking exactly
/// `args.len()` `i64` parameters and returning `i64`.
pub unsafe fn call_native(native: NativeFunction, args: &[i64]) -> Result<i64, String> {
    leak_detector::record_native_call();
    native_call_table!(native.address, args;
        0 => (),
        1 => (0),
        2 => (0, 1),
        3 => (0, 1, 2),
        4 => (0, 1, 2, 3),
        5 => (0, 1, 2, 3, 4),
        6 => (0, 1, 2, 3, 4, 5),
        7 => (0, 1, 2, 3, 4, 5, 6),
        8 => (0, 1, 2, 3, 4, 5, 6, 7),
        9 => (0, 1, 2, 3, 4, 5, 6, 7, 8),
        10 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9),
        11 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10),
        12 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11),
        13 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12),
        14 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13),
        15 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14),
        16 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15),
    )
    .ok_or_else(|| errors::call_interface_error(args.len(), MAX_NATIVE_ARITY))
}
