//! The scope stack backing variable declaration and lookup.
//!
//! There is no bytecode compiler here to pre-assign variable slots, so each
//! frame owns an [`IndexMap`] from identifier to [`Value`] instead of a
//! fixed-size array. `IndexMap` over `HashMap` buys stable declaration
//! order, useful for any diagnostic that wants to print "variables in
//! scope" in the order a reader would expect.

use indexmap::IndexMap;

use crate::value::Value;

/// Whether a stack frame is an ordinary lexical block or the outermost
/// frame of a function call.
///
/// A name lookup walks frames from the top down but stops at (and
/// includes) the first [`FrameKind::Function`] frame it meets — the
/// function barrier — so a function body never sees its caller's locals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Block,
    Function,
}

/// One entry of the scope stack: a kind tag plus the variables declared
/// directly in it.
#[derive(Debug, Default)]
pub struct Frame {
    kind_is_function: bool,
    vars: IndexMap<String, Value>,
}

impl Frame {
    #[must_use]
    pub fn new(kind: FrameKind) -> Self {
        Self {
            kind_is_function: kind == FrameKind::Function,
            vars: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FrameKind {
        if self.kind_is_function {
            FrameKind::Function
        } else {
            FrameKind::Block
        }
    }

    /// Promotes a `Block` frame to `Function` in place.
    ///
    /// This is the second half of the two-stage call protocol: a frame is
    /// pushed as `Block` while arguments are bound in the *caller's*
    /// visible scope, then promoted to `Function` immediately before the
    /// body executes, so the barrier lands between the bound parameters
    /// and the caller's own locals.
    pub fn promote_to_function(&mut self) {
        self.kind_is_function = true;
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }
}

/// The live call stack of lexical frames.
///
/// Always non-empty during evaluation: `ScopeStack::new` starts with one
/// `Function` frame standing in for the top-level `main` call.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(FrameKind::Function)],
        }
    }

    pub fn push(&mut self, kind: FrameKind) {
        self.frames.push(Frame::new(kind));
    }

    /// Pops the innermost frame.
    ///
    /// # Panics
    /// Panics if called with no frame left to pop; this would indicate a
    /// push/pop mismatch in the call protocol, not a user-reachable error.
    pub fn pop(&mut self) {
        assert!(self.frames.len() > 1, "scope stack underflow");
        self.frames.pop();
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("scope stack is never empty")
    }

    /// Declares `name` in the innermost frame, e.g. for `VAR_CREATION`.
    ///
    /// Redeclaration in the *same* frame is a static-semantic error the
    /// caller is expected to have already checked with
    /// [`Self::is_redeclaration`]; this simply overwrites.
    pub fn declare(&mut self, name: impl Into<String>, value: Value) {
        self.top_mut().vars.insert(name.into(), value);
    }

    /// Whether `name` is already declared in the innermost frame.
    #[must_use]
    pub fn is_redeclaration(&self, name: &str) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.contains(name))
    }

    /// Looks up `name`, walking from the innermost frame outward and
    /// stopping at (and including) the nearest function-barrier frame.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.vars.get(name) {
                return Some(value);
            }
            if frame.kind_is_function {
                break;
            }
        }
        None
    }

    /// Mutable counterpart of [`Self::lookup`], for `ASSIGN`/`CIN` targets.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Value> {
        for frame in self.frames.iter_mut().rev() {
            if frame.vars.contains_key(name) {
                return frame.vars.get_mut(name);
            }
            if frame.kind_is_function {
                break;
            }
        }
        None
    }

    /// Promotes the innermost frame from `Block` to `Function`; see
    /// [`Frame::promote_to_function`].
    pub fn promote_top_to_function(&mut self) {
        self.top_mut().promote_to_function();
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn lookup_finds_innermost_shadowing_declaration() {
        let mut stack = ScopeStack::new();
        stack.declare("x", Value::int(1));
        stack.push(FrameKind::Block);
        stack.declare("x", Value::int(2));
        assert_eq!(stack.lookup("x").unwrap().as_i64(), 2);
        stack.pop();
        assert_eq!(stack.lookup("x").unwrap().as_i64(), 1);
    }

    #[test]
    fn lookup_stops_at_function_barrier() {
        let mut stack = ScopeStack::new();
        stack.declare("outer", Value::int(1));
        stack.push(FrameKind::Function);
        assert!(stack.lookup("outer").is_none());
    }

    #[test]
    fn block_frame_does_not_block_lookup_through_it() {
        let mut stack = ScopeStack::new();
        stack.declare("outer", Value::int(1));
        stack.push(FrameKind::Block);
        assert_eq!(stack.lookup("outer").unwrap().as_i64(), 1);
    }

    #[test]
    fn two_stage_call_protocol_isolates_params_from_caller_locals() {
        let mut stack = ScopeStack::new();
        stack.declare("caller_local", Value::int(99));
        // Stage 1: push as Block, bind params while caller locals are
        // still visible for default-argument-style expressions.
        stack.push(FrameKind::Block);
        stack.declare("param", Value::int(1));
        // Stage 2: promote to Function immediately before the body runs.
        stack.promote_top_to_function();
        assert!(stack.lookup("caller_local").is_none());
        assert_eq!(stack.lookup("param").unwrap().as_i64(), 1);
    }

    #[test]
    fn is_redeclaration_checks_innermost_frame_only() {
        let mut stack = ScopeStack::new();
        stack.declare("x", Value::int(1));
        assert!(stack.is_redeclaration("x"));
        stack.push(FrameKind::Block);
        assert!(!stack.is_redeclaration("x"));
    }
}
