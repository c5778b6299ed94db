use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeakStats {
    pub closures_created: usize,
    pub closures_extended: usize,
    pub invocations: usize,
    pub native_calls: usize,
    pub arena_registrations: usize,
}

static CLOSURES_CREATED: AtomicUsize = AtomicUsize::new(0);
static CLOSURES_EXTENDED: AtomicUsize = AtomicUsize::new(0);
static INVOCATIONS: AtomicUsize = AtomicUsize::new(0);
static NATIVE_CALLS: AtomicUsize = AtomicUsize::new(0);
static ARENA_REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

pub fn record_closure() {
    CLOSURES_CREATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_extension() {
    CLOSURES_EXTENDED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_invocation() {
    INVOCATIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_native_call() {
    NATIVE_CALLS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_arena_registration() {
    ARENA_REGISTRATIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> LeakStats {
    LeakStats {
        closures_created: CLOSURES_CREATED.load(Ordering::Relaxed),
        closures_extended: CLOSURES_EXTENDED.load(Ordering::Relaxed),
        invocations: INVOCATIONS.load(Ordering::Relaxed),
        native_calls: NATIVE_CALLS.load(Ordering::Relaxed),
        arena_registrations: ARENA_REGISTRATIONS.load(Ordering::Relaxed),
    }
}

impl LeakStats {
    /// Human-readable report, one counter per line.
    pub fn render_text(&self) -> String {
        format!(
            "Leak stats (approx):\n  closures_created: {}\n  closures_extended: {}\n  invocations: {}\n  native_calls: {}\n  arena_registrations: {}",
            self.closures_created,
            self.closures_extended,
            self.invocations,
            self.native_calls,
            self.arena_registrations
        )
    }

    pub fn render_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("leak stats: {}", e))
    }
}
