//! End-to-end scenarios run through the public frontend + evaluator API
//! exactly as a real source file would be.

use pretty_assertions::assert_eq;
use tinycpp::{CollectingCout, ErrorKind, Interpreter, NoopTracer, Parser, ScriptedCin};

/// Runs `src` to completion, returning captured stdout and the outcome.
fn run_with_input(src: &str, input: Vec<&str>) -> (String, Result<(), ErrorKind>) {
    let program = Parser::parse_source(src).expect("source should parse");
    let mut interpreter = Interpreter::new(
        NoopTracer,
        CollectingCout::new(),
        ScriptedCin::new(input),
    );
    interpreter
        .load_program(program)
        .expect("program should register cleanly");
    let outcome = interpreter.run().map_err(|e| e.kind);
    (interpreter.cout.output().to_string(), outcome)
}

fn run(src: &str) -> (String, Result<(), ErrorKind>) {
    run_with_input(src, Vec::new())
}

#[test]
fn addition_prints_five() {
    let (out, outcome) = run("int main() { cout << 2 + 3; return 0; }");
    assert_eq!(out, "5");
    assert_eq!(outcome, Ok(()));
}

#[test]
fn uninitialized_read_exits_7() {
    let (_, outcome) = run("int main() { int x; cout << x; return 0; }");
    assert_eq!(outcome, Err(ErrorKind::UninitializedId));
}

#[test]
fn division_by_zero_exits_8() {
    let (_, outcome) = run("int main() { int x = 0; cout << 10 / x; return 0; }");
    assert_eq!(outcome, Err(ErrorKind::DivByZero));
}

#[test]
fn recursive_factorial_prints_120() {
    let (out, outcome) = run(
        "int fact(int n) { if (n <= 1) { return 1; } else { return n * fact(n - 1); } } \
         int main() { cout << fact(5); return 0; }",
    );
    assert_eq!(out, "120");
    assert_eq!(outcome, Ok(()));
}

#[test]
fn auto_string_and_builtins() {
    let (out, outcome) = run(
        "int main() { auto s = \"abc\"; cout << length(s) << sort(\"cba\"); return 0; }",
    );
    assert_eq!(out, "3abc");
    assert_eq!(outcome, Ok(()));
}

#[test]
fn incompatible_assignment_exits_4() {
    let (_, outcome) = run("int main() { string s = \"x\"; int y = s; return 0; }");
    assert_eq!(outcome, Err(ErrorKind::Compatibility));
}

#[test]
fn for_loop_prints_012() {
    let (out, outcome) =
        run("int main() { for (int i = 0; i < 3; i = i + 1) { cout << i; } return 0; }");
    assert_eq!(out, "012");
    assert_eq!(outcome, Ok(()));
}

#[test]
fn cin_reads_declared_types_in_order() {
    let (out, outcome) = run_with_input(
        "int main() { int x; double y; string s; cin >> x >> y >> s; cout << x << y << s; return 0; }",
        vec!["7", "2.5", "hi"],
    );
    assert_eq!(out, "72.5hi");
    assert_eq!(outcome, Ok(()));
}

#[test]
fn cin_into_bool_target_is_rejected() {
    let (_, outcome) = run_with_input(
        "int main() { bool b; cin >> b; return 0; }",
        vec!["true"],
    );
    assert_eq!(outcome, Err(ErrorKind::RuntimeOther));
}

#[test]
fn function_barrier_hides_caller_locals() {
    let (_, outcome) = run(
        "int helper() { return caller_only; } \
         int main() { int caller_only = 1; helper(); return 0; }",
    );
    assert_eq!(outcome, Err(ErrorKind::Semantic));
}

#[test]
fn shadowing_in_inner_block_is_allowed() {
    let (out, outcome) = run(
        "int main() { int x = 1; { int x = 2; cout << x; } cout << x; return 0; }",
    );
    assert_eq!(out, "21");
    assert_eq!(outcome, Ok(()));
}

#[test]
fn redeclaration_in_same_frame_exits_3() {
    let (_, outcome) = run("int main() { int x = 1; int x = 2; return 0; }");
    assert_eq!(outcome, Err(ErrorKind::Semantic));
}

#[test]
fn missing_file_style_parse_error_exits_2() {
    let program = Parser::parse_source("int main() { return 0 ");
    assert!(matches!(
        program,
        Err(e) if e.kind == ErrorKind::Syntax
    ));
}

#[test]
fn builtin_arity_mismatch_exits_4() {
    let (_, outcome) = run("int main() { cout << length(\"a\", \"b\"); return 0; }");
    assert_eq!(outcome, Err(ErrorKind::Compatibility));
}

#[test]
fn deep_recursion_is_bounded_not_a_stack_overflow() {
    let (_, outcome) = run(
        "int count(int n) { return count(n + 1); } \
         int main() { return count(0); }",
    );
    assert_eq!(outcome, Err(ErrorKind::RuntimeOther));
}
