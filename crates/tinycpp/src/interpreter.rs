//! The statement interpreter and call protocol.
//!
//! The scope stack, function registry, recursion guard, tracer, and I/O
//! all live on one explicit `Interpreter` context value threaded through
//! every evaluation call, rather than as process-wide mutable state. It is
//! generic over the tracer and I/O implementations (rather than boxed
//! trait objects) so a production run with `NoopTracer`/real stdio
//! monomorphizes the tracing hooks away entirely.

use crate::exception::{
    compatibility_error, runtime_other_error, semantic_error, uninitialized_error, TinyResult,
};
use crate::expressions::payload_matches_declared;
use crate::frontend::ast::{FunctionAst, Program, Stmt};
use crate::function::{FunctionDef, FunctionRegistry, Param};
use crate::io::{CinReader, CoutWriter};
use crate::namespace::{FrameKind, ScopeStack};
use crate::resource::RecursionGuard;
use crate::tracer::EvalTracer;
use crate::value::{format_for_cout, Value, ValueType};

/// Evaluation context threaded through every statement/expression call.
pub struct Interpreter<T: EvalTracer, O: CoutWriter, I: CinReader> {
    pub(crate) scopes: ScopeStack,
    pub(crate) functions: FunctionRegistry,
    pub(crate) guard: RecursionGuard,
    pub tracer: T,
    pub cout: O,
    pub cin: I,
}

/// The sentinel threaded through a statement-list walk. `Some(_)` means a
/// `return` has already fired and the walk should unwind without
/// executing further statements.
type ReturnSlot = Option<Value>;

impl<T: EvalTracer, O: CoutWriter, I: CinReader> Interpreter<T, O, I> {
    #[must_use]
    pub fn new(tracer: T, cout: O, cin: I) -> Self {
        Self {
            scopes: ScopeStack::new(),
            functions: FunctionRegistry::new(),
            guard: RecursionGuard::default(),
            tracer,
            cout,
            cin,
        }
    }

    /// Registers every function in `program`, then requires that a
    /// function named `main` exists.
    pub fn load_program(&mut self, program: Program) -> TinyResult<()> {
        for func in program.functions {
            self.functions.register(to_function_def(func))?;
        }
        if !self.functions.has_main() {
            return Err(semantic_error("program has no 'main' function"));
        }
        Ok(())
    }

    /// Runs the loaded program starting from `main`. The process exit code
    /// comes from the error taxonomy, not `main`'s return value.
    pub fn run(&mut self) -> TinyResult<()> {
        self.call_user_function("main", Vec::new())?;
        Ok(())
    }

    /// The user-function call protocol: arity check, recursion guard,
    /// frame push/bind/promote, body execution, frame pop, return-type
    /// check. Builtin dispatch happens in [`crate::expressions`] before
    /// this is ever reached.
    pub(crate) fn call_user_function(&mut self, name: &str, args: Vec<Value>) -> TinyResult<Value> {
        let def = self
            .functions
            .find(name)
            .ok_or_else(|| semantic_error(format!("undeclared function '{name}'")))?
            .clone();

        if args.len() != def.params.len() {
            return Err(semantic_error(format!(
                "function '{name}' expects {} argument(s), got {}",
                def.params.len(),
                args.len()
            )));
        }
        if !self.guard.enter() {
            return Err(runtime_other_error(format!(
                "maximum call depth exceeded calling '{name}'"
            )));
        }
        self.tracer.on_call(name, self.guard.depth());

        // Step 3: push BLOCK (not FUNCTION yet).
        self.scopes.push(FrameKind::Block);
        // Step 4: bind each argument, evaluated already in caller scope,
        // as a fresh copy under its parameter name.
        for (param, value) in def.params.iter().zip(args.into_iter()) {
            self.scopes.declare(param.name.clone(), value);
        }
        // Step 5: promote to FUNCTION — the isolation boundary now exists.
        self.scopes.promote_top_to_function();

        // Step 6: interpret the body with a fresh return slot.
        let mut return_slot: ReturnSlot = None;
        let body_result = self.interpret_list(&def.body, &mut return_slot);

        // Step 7 happens before step 8 unconditionally: pop the frame.
        self.scopes.pop();
        self.guard.leave();

        if let Err(err) = &body_result {
            self.tracer.on_error(err);
        }
        body_result?;

        let result = return_slot.unwrap_or_else(Value::null);
        if !crate::value::compatible(result.ty, def.return_type) {
            let err = compatibility_error(format!(
                "function '{name}' returned {} but declares {}",
                result.ty, def.return_type
            ));
            self.tracer.on_error(&err);
            return Err(err);
        }

        self.tracer.on_return(name, self.guard.depth());
        Ok(result)
    }

    /// Walks a statement list until exhausted or until `return_slot` has
    /// fired.
    fn interpret_list(&mut self, stmts: &[Stmt], return_slot: &mut ReturnSlot) -> TinyResult<()> {
        for stmt in stmts {
            if return_slot.is_some() {
                break;
            }
            self.interpret_stmt(stmt, return_slot)?;
        }
        Ok(())
    }

    fn interpret_stmt(&mut self, stmt: &Stmt, return_slot: &mut ReturnSlot) -> TinyResult<()> {
        match stmt {
            Stmt::Empty => Ok(()),
            Stmt::VarCreate { name, ty } => {
                if self.scopes.is_redeclaration(name) {
                    return Err(semantic_error(format!("'{name}' is already declared")));
                }
                self.scopes.declare(name.clone(), Value::pending(*ty));
                Ok(())
            }
            Stmt::VarCreateAssign { name, ty, value } => {
                if self.scopes.is_redeclaration(name) {
                    return Err(semantic_error(format!("'{name}' is already declared")));
                }
                let rhs = self.eval(value)?;
                if !rhs.initialized {
                    return Err(uninitialized_error(
                        "right-hand side of declaration is uninitialized",
                    ));
                }
                let final_ty = if *ty == ValueType::Auto { rhs.ty } else { *ty };
                if !crate::value::compatible(final_ty, rhs.ty) {
                    return Err(compatibility_error(format!(
                        "cannot initialize '{name}' of type {final_ty} with a {} value",
                        rhs.ty
                    )));
                }
                self.scopes.declare(
                    name.clone(),
                    Value {
                        ty: final_ty,
                        payload: rhs.payload,
                        initialized: true,
                    },
                );
                Ok(())
            }
            Stmt::Assign { name, value } => {
                let rhs = self.eval(value)?;
                if !rhs.initialized {
                    return Err(uninitialized_error(
                        "right-hand side of assignment is uninitialized",
                    ));
                }
                let slot = self
                    .scopes
                    .lookup_mut(name)
                    .ok_or_else(|| semantic_error(format!("undeclared identifier '{name}'")))?;
                let target_ty = if slot.ty == ValueType::Auto { rhs.ty } else { slot.ty };
                if !crate::value::compatible(target_ty, rhs.ty) {
                    return Err(compatibility_error(format!(
                        "cannot assign a {} value to '{name}' of type {target_ty}",
                        rhs.ty
                    )));
                }
                slot.ty = target_ty;
                slot.payload = rhs.payload;
                slot.initialized = true;
                Ok(())
            }
            Stmt::ExprStmt(expr) => {
                self.eval(expr)?;
                Ok(())
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_value = self.eval(cond)?;
                if !crate::value::compatible(cond_value.ty, ValueType::Bool) {
                    return Err(compatibility_error(
                        "if condition must be bool-compatible",
                    ));
                }
                self.scopes.push(FrameKind::Block);
                let branch = if cond_value.as_bool() {
                    then_branch
                } else {
                    else_branch
                };
                let result = self.interpret_list(branch, return_slot);
                self.scopes.pop();
                result
            }
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                self.scopes.push(FrameKind::Block);
                let result = self.run_for(init, cond, step, body, return_slot);
                self.scopes.pop();
                result
            }
            Stmt::Block(body) => {
                self.scopes.push(FrameKind::Block);
                let result = self.interpret_list(body, return_slot);
                self.scopes.pop();
                result
            }
            Stmt::Cout(parts) => {
                for expr in parts {
                    let value = self.eval(expr)?;
                    if !value.initialized {
                        return Err(uninitialized_error("cout of an uninitialized value"));
                    }
                    self.cout.write_str(&format_for_cout(&value))?;
                }
                Ok(())
            }
            Stmt::Cin(targets) => {
                for name in targets {
                    self.read_cin_target(name)?;
                }
                Ok(())
            }
            Stmt::Return(expr) => {
                let value = self.eval(expr)?;
                *return_slot = Some(value);
                Ok(())
            }
        }
    }

    fn run_for(
        &mut self,
        init: &Stmt,
        cond: &crate::frontend::ast::Expr,
        step: &Stmt,
        body: &[Stmt],
        return_slot: &mut ReturnSlot,
    ) -> TinyResult<()> {
        let mut dummy_slot: ReturnSlot = None;
        self.interpret_stmt(init, &mut dummy_slot)?;

        loop {
            let cond_value = self.eval(cond)?;
            if !crate::value::compatible(cond_value.ty, ValueType::Bool) {
                return Err(compatibility_error("for condition must be bool-compatible"));
            }
            if !cond_value.as_bool() || return_slot.is_some() {
                break;
            }
            self.scopes.push(FrameKind::Block);
            let body_result = self.interpret_list(body, return_slot);
            self.scopes.pop();
            body_result?;
            if return_slot.is_some() {
                break;
            }
            self.interpret_stmt(step, &mut dummy_slot)?;
        }
        Ok(())
    }

    fn read_cin_target(&mut self, name: &str) -> TinyResult<()> {
        let ty = self
            .scopes
            .lookup(name)
            .ok_or_else(|| semantic_error(format!("undeclared identifier '{name}'")))?
            .ty;
        let value = match ty {
            ValueType::Int => Value::int(self.cin.read_int()?),
            ValueType::Double => Value::double(self.cin.read_double()?),
            ValueType::String | ValueType::Auto => Value::string(
                crate::strings::ScriptString::new_str(self.cin.read_line_string()?.into_bytes()),
            ),
            // Bool/Null cin targets are rejected explicitly rather than
            // silently left unread.
            ValueType::Bool | ValueType::Null => {
                return Err(runtime_other_error(format!(
                    "cannot read cin into '{name}' of type {ty}"
                )))
            }
        };
        let slot = self
            .scopes
            .lookup_mut(name)
            .expect("looked up successfully above");
        debug_assert!(payload_matches_declared(value.ty, &value.payload) || value.ty == ValueType::String);
        slot.payload = value.payload;
        slot.initialized = true;
        Ok(())
    }
}

fn to_function_def(func: FunctionAst) -> FunctionDef {
    FunctionDef {
        name: func.name,
        return_type: func.return_type,
        params: func
            .params
            .into_iter()
            .map(|p| Param {
                name: p.name,
                ty: p.ty,
            })
            .collect(),
        body: func.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::Parser;
    use crate::io::{CollectingCout, ScriptedCin};
    use crate::tracer::NoopTracer;

    fn run(src: &str) -> (String, TinyResult<()>) {
        let program = Parser::parse_source(src).unwrap();
        let mut interp =
            Interpreter::new(NoopTracer, CollectingCout::new(), ScriptedCin::new(Vec::<String>::new()));
        interp.load_program(program).unwrap();
        let result = interp.run();
        (interp.cout.output().to_string(), result)
    }

    #[test]
    fn recursive_factorial() {
        let (out, result) = run(
            "int fact(int n) { if (n <= 1) { return 1; } else { return n * fact(n - 1); } } \
             int main() { cout << fact(5); return 0; }",
        );
        result.unwrap();
        assert_eq!(out, "120");
    }

    #[test]
    fn for_loop_prints_counter() {
        let (out, result) =
            run("int main() { for (int i = 0; i < 3; i = i + 1) { cout << i; } return 0; }");
        result.unwrap();
        assert_eq!(out, "012");
    }

    #[test]
    fn uninitialized_read_is_reported() {
        let (_, result) = run("int main() { int x; cout << x; return 0; }");
        assert_eq!(
            result.unwrap_err().kind,
            crate::exception::ErrorKind::UninitializedId
        );
    }

    #[test]
    fn declaring_same_name_twice_in_one_frame_is_semantic_error() {
        let (_, result) = run("int main() { int x; int x; return 0; }");
        assert_eq!(result.unwrap_err().kind, crate::exception::ErrorKind::Semantic);
    }

    #[test]
    fn mismatched_assignment_type_is_compatibility_error() {
        let (_, result) = run("int main() { string s = \"x\"; int y = s; return 0; }");
        assert_eq!(
            result.unwrap_err().kind,
            crate::exception::ErrorKind::Compatibility
        );
    }

    #[test]
    fn falling_off_the_end_without_return_is_compatibility_error() {
        let (_, result) = run("int helper() { int x = 1; } int main() { helper(); return 0; }");
        assert_eq!(
            result.unwrap_err().kind,
            crate::exception::ErrorKind::Compatibility
        );
    }

    #[test]
    fn scope_is_empty_after_successful_run() {
        let program = Parser::parse_source("int main() { int x = 1; return 0; }").unwrap();
        let mut interp =
            Interpreter::new(NoopTracer, CollectingCout::new(), ScriptedCin::new(Vec::<String>::new()));
        interp.load_program(program).unwrap();
        interp.run().unwrap();
        assert_eq!(interp.scopes.depth(), 1);
    }
}
