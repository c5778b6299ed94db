use crate::{
    primop::PrimOp,
    runtime::{closure::Closure, function_ref::FunctionRef, value::Value},
};

fn add3() -> FunctionRef {
    FunctionRef::Prim(PrimOp::Add)
}

#[test]
fn new_closure_has_nothing_bound() {
    let closure = Closure::new(add3(), 3);
    assert_eq!(closure.arity(), 3);
    assert_eq!(closure.applied_count(), 0);
    assert_eq!(closure.remaining(), 3);
    assert!(!closure.is_saturated());
    assert!(closure.applied_arguments().is_empty());
}

#[test]
fn create_marks_initial_slots_as_bound() {
    let closure = Closure::create(add3(), 3, 2).unwrap();
    assert_eq!(closure.applied_count(), 2);
    assert_eq!(
        closure.applied_arguments(),
        &[Value::Integer(0), Value::Integer(0)]
    );
}

#[test]
fn create_rejects_count_above_arity() {
    let err = Closure::create(add3(), 1, 2).unwrap_err();
    assert!(err.starts_with("closure overflow"), "got: {}", err);
}

#[test]
fn extend_appends_in_order() {
    let closure = Closure::new(add3(), 3);
    let once = closure.extend(&[Value::Integer(1)]).unwrap();
    let twice = once.extend(&[Value::Integer(2)]).unwrap();

    assert_eq!(once.applied_arguments(), &[Value::Integer(1)]);
    assert_eq!(
        twice.applied_arguments(),
        &[Value::Integer(1), Value::Integer(2)]
    );
    assert_eq!(twice.remaining(), 1);
    assert_eq!(twice.function, closure.function);
}

#[test]
fn extend_never_mutates_source() {
    let source = Closure::new(add3(), 4)
        .extend(&[Value::Integer(7)])
        .unwrap();
    let before = source.clone();

    let extended = source
        .extend(&[Value::Integer(8), Value::Boolean(true)])
        .unwrap();

    assert_eq!(source, before);
    assert_eq!(source.applied_count(), 1);
    assert_eq!(source.applied_arguments(), &[Value::Integer(7)]);
    assert_eq!(extended.applied_count(), 3);
}

#[test]
fn extend_to_saturation() {
    let closure = Closure::new(add3(), 2)
        .extend(&[Value::Integer(1), Value::Integer(2)])
        .unwrap();
    assert!(closure.is_saturated());
    assert_eq!(closure.remaining(), 0);
}

#[test]
fn extend_past_arity_is_rejected() {
    let closure = Closure::new(add3(), 1);
    let err = closure
        .extend(&[Value::Integer(1), Value::Integer(2)])
        .unwrap_err();
    assert!(err.contains("cannot bind 2 more"), "got: {}", err);
}

#[test]
fn display_shows_binding_progress() {
    let closure = Closure::new(FunctionRef::Prim(PrimOp::Less), 2)
        .extend(&[Value::Integer(1)])
        .unwrap();
    assert_eq!(closure.to_string(), "<closure less 1/2>");
}

#[test]
fn create_reports_unreservable_arity() {
    let err = Closure::create(add3(), usize::MAX, 0).unwrap_err();
    assert!(err.starts_with("closure allocation failed"), "got: {}", err);
}

#[test]
fn new_defers_slot_reservation_to_extend() {
    let closure = Closure::new(add3(), usize::MAX);
    assert_eq!(closure.remaining(), usize::MAX);

    let err = closure.extend(&[Value::Integer(1)]).unwrap_err();
    assert!(err.starts_with("closure allocation failed"), "got: {}", err);
    assert_eq!(closure.applied_count(), 0);
}
