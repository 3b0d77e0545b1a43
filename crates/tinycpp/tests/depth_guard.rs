//! Recursion-depth guard behavior: unbounded user-function recursion must
//! raise `RUNTIME_OTHER`, not overflow the native call stack.

use tinycpp::{CollectingCout, ErrorKind, Interpreter, NoopTracer, Parser, ScriptedCin};

fn run(src: &str) -> Result<(), ErrorKind> {
    let program = Parser::parse_source(src).unwrap();
    let mut interpreter = Interpreter::new(
        NoopTracer,
        CollectingCout::new(),
        ScriptedCin::new(Vec::<String>::new()),
    );
    interpreter.load_program(program).unwrap();
    interpreter.run().map_err(|e| e.kind)
}

#[test]
fn infinite_recursion_is_caught_as_runtime_other() {
    let outcome = run(
        "int loop(int n) { return loop(n + 1); } \
         int main() { return loop(0); }",
    );
    assert_eq!(outcome, Err(ErrorKind::RuntimeOther));
}

#[test]
fn recursion_within_the_limit_still_succeeds() {
    let outcome = run(
        "int countdown(int n) { if (n <= 0) { return 0; } else { return countdown(n - 1); } } \
         int main() { return countdown(100); }",
    );
    assert_eq!(outcome, Ok(()));
}
