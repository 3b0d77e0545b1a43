//! `tinycpp`: a tree-walking interpreter for a small C++-flavoured
//! imperative scripting language (typed `int`/`double`/`string`/`bool`
//! variables plus `auto` inference and `null`, user functions, `if`/`for`
//! control flow, `cin`/`cout`, and five string builtins).
//!
//! The evaluator is the core of this crate; the lexer and parser under
//! [`frontend`] exist to hand it an AST.

pub mod builtins;
pub mod exception;
pub mod expressions;
pub mod frontend;
pub mod function;
pub mod interpreter;
pub mod io;
pub mod namespace;
pub mod resource;
pub mod strings;
pub mod tracer;
pub mod value;

pub use exception::{ErrorKind, TinyError, TinyResult};
pub use frontend::parser::Parser;
pub use interpreter::Interpreter;
pub use io::{CinReader, CollectingCout, CoutWriter, ScriptedCin, StdCin, StdCout};
pub use tracer::{EvalTracer, NoopTracer, RecordingTracer, StderrTracer};

/// Parses and runs `src` to completion against real stdin/stdout, the
/// shape the CLI binary uses directly.
pub fn run_source(src: &str) -> TinyResult<()> {
    let program = Parser::parse_source(src)?;
    let mut interpreter = Interpreter::new(NoopTracer, StdCout, StdCin);
    interpreter.load_program(program)?;
    interpreter.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_runs_through_the_surface_api() {
        let mut interpreter = Interpreter::new(
            NoopTracer,
            CollectingCout::new(),
            ScriptedCin::new(Vec::<String>::new()),
        );
        let program = Parser::parse_source("int main() { cout << 2 + 3; return 0; }").unwrap();
        interpreter.load_program(program).unwrap();
        interpreter.run().unwrap();
        assert_eq!(interpreter.cout.output(), "5");
    }

    #[test]
    fn missing_main_is_semantic_error() {
        let program = Parser::parse_source("int helper() { return 1; }").unwrap();
        let mut interpreter = Interpreter::new(
            NoopTracer,
            CollectingCout::new(),
            ScriptedCin::new(Vec::<String>::new()),
        );
        assert_eq!(
            interpreter.load_program(program).unwrap_err().kind,
            ErrorKind::Semantic
        );
    }
}
