use std::env;

pub const TRACE_VAR: &str = "SHAITAN_TRACE";
pub const LEAK_DETECTOR_VAR: &str = "SHAITAN_LEAK_DETECTOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeakReport {
    #[default]
    Text,
    Json,
}

/// Runtime switches.
///
/// Compiled programs are started without a runtime argument contract, so the
/// switches are read from the environment:
///
/// - `SHAITAN_TRACE=1` prints one stderr line per apply, extend and invoke step.
/// - `SHAITAN_LEAK_DETECTOR=1` (or `json`) prints approximate allocation stats
///   when `rt_report_leaks` is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuntimeConfig {
    pub trace: bool,
    pub leak_detector: bool,
    pub leak_report: LeakReport,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let trace = lookup(TRACE_VAR).is_some_and(|v| is_enabled(&v));
        let (leak_detector, leak_report) = match lookup(LEAK_DETECTOR_VAR) {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => (true, LeakReport::Json),
            Some(v) if is_enabled(&v) => (true, LeakReport::Text),
            _ => (false, LeakReport::Text),
        };

        Self {
            trace,
            leak_detector,
            leak_report,
        }
    }
}

fn is_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}
