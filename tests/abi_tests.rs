use shaitan_runtime::{
    abi::{
        apply_args_to_closure, create_closure, prim_address, rt_add, rt_and, rt_div, rt_eq,
        rt_geq, rt_gre, rt_leq, rt_less, rt_mul, rt_neq, rt_or, rt_reset_closures, rt_sub,
        try_apply_words, try_create_closure, with_thread_runtime,
    },
    primop::PrimOp,
};

extern "C" fn add3(x: i64, y: i64, z: i64) -> i64 {
    x + y + z
}

extern "C" fn add2(x: i64, y: i64) -> i64 {
    x + y
}

/// Generated-code shape of `let make_adder x = fun y -> x + y`.
extern "C" fn make_adder(x: i64) -> i64 {
    let adder = create_closure(add2 as usize as i64, 2, 0);
    apply(adder, &[x])
}

/// `twice f x = f (f x)`, re-entering the runtime from native code.
extern "C" fn twice(f: i64, x: i64) -> i64 {
    let once = apply(f, &[x]);
    apply(f, &[once])
}

fn apply(closure: i64, args: &[i64]) -> i64 {
    unsafe { apply_args_to_closure(closure, args.len() as i64, args.as_ptr()) }
}

fn fresh(function: extern "C" fn(i64, i64, i64) -> i64) -> i64 {
    create_closure(function as usize as i64, 3, 0)
}

#[test]
fn add3_through_the_c_entry_points() {
    let closure = fresh(add3);
    let step1 = apply(closure, &[1]);
    let step2 = apply(step1, &[2]);
    assert_eq!(apply(step2, &[3]), 6);

    with_thread_runtime(|rt| {
        let c1 = rt.arena().resolve(step1).expect("step1 registered");
        let c2 = rt.arena().resolve(step2).expect("step2 registered");
        assert_eq!(c1.applied_count(), 1);
        assert_eq!(c2.applied_count(), 2);
        assert_eq!(c2.arity(), 3);
    });

    // Each step is still usable on its own.
    assert_eq!(apply(step1, &[10, 20]), 31);
    assert_eq!(apply(closure, &[4, 5, 6]), 15);
}

#[test]
fn surplus_arguments_reach_the_returned_closure() {
    let closure = create_closure(make_adder as usize as i64, 1, 0);
    assert_eq!(apply(closure, &[10, 5]), 15);

    let partial = apply(closure, &[7]);
    assert_eq!(apply(partial, &[8]), 15);
}

#[test]
fn closures_passed_as_arguments() {
    let inc = apply(create_closure(prim_address(PrimOp::Add), 2, 0), &[1]);
    let twice = create_closure(twice as usize as i64, 2, 0);
    assert_eq!(apply(twice, &[inc, 40]), 42);
}

#[test]
fn zero_arguments_keep_the_closure() {
    let closure = fresh(add3);
    assert_eq!(apply(closure, &[]), closure);
    let null_argv = unsafe { apply_args_to_closure(closure, 0, std::ptr::null()) };
    assert_eq!(null_argv, closure);
}

#[test]
fn primitive_addresses_are_callable_closures() {
    let sub = create_closure(prim_address(PrimOp::Sub), 2, 0);
    assert_eq!(apply(sub, &[10, 3]), 7);

    let less = create_closure(prim_address(PrimOp::Less), 2, 0);
    assert_eq!(apply(less, &[1, 2]), 1);
    assert_eq!(apply(less, &[2, 1]), 0);
}

#[test]
fn primitive_exports() {
    assert_eq!(rt_add(2, 3), 5);
    assert_eq!(rt_sub(2, 3), -1);
    assert_eq!(rt_mul(6, 7), 42);
    assert_eq!(rt_div(9, 2), 4);
    assert_eq!(rt_eq(3, 3), 1);
    assert_eq!(rt_neq(3, 3), 0);
    assert_eq!(rt_less(1, 2), 1);
    assert_eq!(rt_leq(2, 2), 1);
    assert_eq!(rt_gre(1, 2), 0);
    assert_eq!(rt_geq(1, 2), 0);
    assert_eq!(rt_and(1, 0), 0);
    assert_eq!(rt_or(0, 7), 1);
}

#[test]
fn reset_invalidates_reference_words() {
    let closure = fresh(add3);
    rt_reset_closures();
    let err = try_apply_words(closure, &[1, 2, 3]).unwrap_err();
    assert!(
        err.starts_with("apply_args_to_closure: unknown closure reference"),
        "got: {}",
        err
    );
    with_thread_runtime(|rt| assert!(rt.arena().is_empty()));
}

#[test]
fn integer_results_are_not_closures() {
    let closure = fresh(add3);
    let err = try_apply_words(closure, &[1, 2, 3, 4]).unwrap_err();
    assert!(err.starts_with("not a function"), "got: {}", err);
}

#[test]
fn invalid_create_arguments_are_rejected() {
    assert!(try_create_closure(add3 as usize as i64, -1, 0).is_err());
    assert!(try_create_closure(add3 as usize as i64, 2, 3).is_err());

    let seeded = try_create_closure(add3 as usize as i64, 3, 1).unwrap();
    // The pre-bound slot holds zero.
    assert_eq!(apply(seeded, &[4, 5]), 9);
}

#[test]
fn unreservable_arity_is_rejected() {
    let err = try_create_closure(add3 as usize as i64, i64::MAX, 0).unwrap_err();
    assert!(err.starts_with("closure allocation failed"), "got: {}", err);
}
