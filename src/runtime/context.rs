use std::{
    io::{self, Write},
    rc::Rc,
};

use crate::runtime::{
    closure::Closure,
    closure_arena::ClosureArena,
    config::{LeakReport, RuntimeConfig},
    leak_detector,
    value::Value,
};

/// Services the applier, invoker and primitives need from their host.
///
/// Methods must not hold borrows of shared state across calls: native code
/// invoked from inside an apply step may re-enter the runtime.
pub trait RuntimeContext {
    /// Writes program output. `print_int` is the only writer.
    fn write_stdout(&mut self, text: &str) -> Result<(), String>;

    /// Registers a closure so native code can hold it as a word.
    fn register_closure(&mut self, closure: &Rc<Closure>) -> i64;

    /// Resolves a word produced by [`RuntimeContext::register_closure`].
    fn resolve_closure(&self, word: i64) -> Option<Rc<Closure>>;

    fn trace_enabled(&self) -> bool {
        false
    }

    fn trace(&mut self, line: &str) {
        eprintln!("{}", line);
    }

    /// Lowers a value to the word passed to native code.
    fn value_to_word(&mut self, value: &Value) -> i64 {
        match value {
            Value::Integer(v) => *v,
            Value::Boolean(v) => i64::from(*v),
            Value::Closure(closure) => self.register_closure(closure),
        }
    }
}

/// Where `print_int` output goes.
#[derive(Debug, Default)]
pub enum OutputSink {
    #[default]
    Stdout,
    Buffer(Vec<u8>),
}

/// Owned runtime state: configuration, output and the closure arena.
#[derive(Debug, Default)]
pub struct Runtime {
    pub config: RuntimeConfig,
    output: OutputSink,
    arena: ClosureArena,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            output: OutputSink::Stdout,
            arena: ClosureArena::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(RuntimeConfig::from_env())
    }

    /// Runtime whose program output is captured in memory.
    pub fn buffered() -> Self {
        Self {
            output: OutputSink::Buffer(Vec::new()),
            ..Self::default()
        }
    }

    /// Takes captured output. Always empty when writing to stdout.
    pub fn take_output(&mut self) -> String {
        match &mut self.output {
            OutputSink::Stdout => String::new(),
            OutputSink::Buffer(buffer) => {
                String::from_utf8_lossy(&std::mem::take(buffer)).into_owned()
            }
        }
    }

    pub fn arena(&self) -> &ClosureArena {
        &self.arena
    }

    /// Ends the current computation scope for closures handed out as words.
    pub fn reset_closures(&mut self) {
        if self.config.trace {
            self.trace(&format!("[arena] reset {} closures", self.arena.len()));
        }
        self.arena.reset();
    }

    /// Renders allocation stats when the leak detector is enabled.
    pub fn leak_report(&self) -> Option<Result<String, String>> {
        if !self.config.leak_detector {
            return None;
        }
        let stats = leak_detector::snapshot();
        Some(match self.config.leak_report {
            LeakReport::Text => Ok(stats.render_text()),
            LeakReport::Json => stats.render_json(),
        })
    }
}

impl RuntimeContext for Runtime {
    fn write_stdout(&mut self, text: &str) -> Result<(), String> {
        match &mut self.output {
            OutputSink::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())
                    .and_then(|_| out.flush())
                    .map_err(|e| format!("print_int: failed to write stdout: {}", e))
            }
            OutputSink::Buffer(buffer) => {
                buffer.extend_from_slice(text.as_bytes());
                Ok(())
            }
        }
    }

    fn register_closure(&mut self, closure: &Rc<Closure>) -> i64 {
        self.arena.register(closure)
    }

    fn resolve_closure(&self, word: i64) -> Option<Rc<Closure>> {
        self.arena.resolve(word)
    }

    fn trace_enabled(&self) -> bool {
        self.config.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        primop::PrimOp,
        runtime::{config::RuntimeConfig, function_ref::FunctionRef},
    };

    #[test]
    fn buffered_output_is_taken_once() {
        let mut rt = Runtime::buffered();
        rt.write_stdout("1\n").unwrap();
        rt.write_stdout("2\n").unwrap();
        assert_eq!(rt.take_output(), "1\n2\n");
        assert_eq!(rt.take_output(), "");
    }

    #[test]
    fn values_lower_to_words() {
        let mut rt = Runtime::buffered();
        assert_eq!(rt.value_to_word(&Value::Integer(-3)), -3);
        assert_eq!(rt.value_to_word(&Value::Boolean(true)), 1);
        assert_eq!(rt.value_to_word(&Value::Boolean(false)), 0);

        let closure = Rc::new(Closure::new(FunctionRef::Prim(PrimOp::Add), 2));
        let word = rt.value_to_word(&Value::Closure(Rc::clone(&closure)));
        assert!(Rc::ptr_eq(&rt.resolve_closure(word).unwrap(), &closure));
    }

    #[test]
    fn reset_releases_registered_closures() {
        let mut rt = Runtime::buffered();
        let word = rt.register_closure(&Rc::new(Closure::new(FunctionRef::Prim(PrimOp::Eq), 2)));
        assert_eq!(rt.arena().len(), 1);
        rt.reset_closures();
        assert!(rt.resolve_closure(word).is_none());
    }

    #[test]
    fn leak_report_respects_config() {
        assert!(Runtime::buffered().leak_report().is_none());

        let rt = Runtime::new(RuntimeConfig {
            leak_detector: true,
            ..RuntimeConfig::default()
        });
        let report = rt.leak_report().unwrap().unwrap();
        assert!(report.starts_with("Leak stats (approx):"));
    }
}
