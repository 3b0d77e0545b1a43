//! Execution tracing hooks for the evaluator: a trait with default no-op
//! methods so a production [`NoopTracer`] compiles away entirely via
//! monomorphization, plus a couple of concrete implementations for
//! debugging. This is pure observability — no tracer implementation is
//! allowed to change evaluation results.

use crate::exception::TinyError;

/// Hook points the evaluator calls into during execution.
///
/// All methods have default no-op bodies; implementations override only
/// the hooks they care about.
pub trait EvalTracer {
    /// A user function call is about to push its frame.
    fn on_call(&mut self, _name: &str, _depth: usize) {}

    /// A user function call's frame has been popped.
    fn on_return(&mut self, _name: &str, _depth: usize) {}

    /// An error is about to unwind the call stack.
    fn on_error(&mut self, _err: &TinyError) {}
}

/// Zero-cost tracer used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl EvalTracer for NoopTracer {}

/// Human-readable execution log written to stderr, useful for debugging a
/// script's control flow without a debugger attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrTracer;

impl EvalTracer for StderrTracer {
    fn on_call(&mut self, name: &str, depth: usize) {
        eprintln!("{}-> {name}()", "  ".repeat(depth));
    }

    fn on_return(&mut self, name: &str, depth: usize) {
        eprintln!("{}<- {name}()", "  ".repeat(depth));
    }

    fn on_error(&mut self, err: &TinyError) {
        eprintln!("!! {err}");
    }
}

/// Collects call events in memory instead of printing them, for tests that
/// want to assert on the call trace shape rather than reading stderr.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    pub events: Vec<String>,
}

impl EvalTracer for RecordingTracer {
    fn on_call(&mut self, name: &str, depth: usize) {
        self.events.push(format!("call:{name}:{depth}"));
    }

    fn on_return(&mut self, name: &str, depth: usize) {
        self.events.push(format!("return:{name}:{depth}"));
    }

    fn on_error(&mut self, err: &TinyError) {
        self.events.push(format!("error:{}", err.kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_tracer_captures_call_and_return() {
        let mut tracer = RecordingTracer::default();
        tracer.on_call("fact", 0);
        tracer.on_return("fact", 0);
        assert_eq!(tracer.events, vec!["call:fact:0", "return:fact:0"]);
    }
}
