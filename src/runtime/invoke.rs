use crate::{
    primop::execute_primop,
    runtime::{
        RuntimeContext, closure::Closure, errors, function_ref::FunctionRef, leak_detector,
        native_call::call_native, value::Value,
    },
};

/// Calls a closure's function with its bound arguments followed by `trailing`.
///
/// `closure.applied_count() + trailing.len()` must equal the arity exactly;
/// anything else is reported as an error before any call is made.
pub fn invoke(
    ctx: &mut dyn RuntimeContext,
    closure: &Closure,
    trailing: &[Value],
) -> Result<Value, String> {
    let supplied = closure.applied_count() + trailing.len();
    if supplied != closure.arity() {
        return Err(errors::saturation_error(
            &closure.function.to_string(),
            closure.arity(),
            supplied,
        ));
    }

    let mut args = Vec::with_capacity(closure.arity());
    args.extend_from_slice(closure.applied_arguments());
    args.extend_from_slice(trailing);

    leak_detector::record_invocation();
    if ctx.trace_enabled() {
        let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        ctx.trace(&format!(
            "[invoke] {}({})",
            closure.function,
            rendered.join(", ")
        ));
    }

    match &closure.function {
        FunctionRef::Prim(op) => execute_primop(ctx, *op, args),
        FunctionRef::Builtin(builtin) => (builtin.func)(ctx, args),
        FunctionRef::Native(native) => {
            let words: Vec<i64> = args.iter().map(|arg| ctx.value_to_word(arg)).collect();
            // SAFETY: closures over native code are built from function
            // references whose arity the code generator guarantees.
            let word = unsafe { call_native(*native, &words) }?;
            Ok(Value::Integer(word))
        }
    }
}
