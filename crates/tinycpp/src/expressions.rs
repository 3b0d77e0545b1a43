//! The expression evaluator. `eval(node) -> Value` always returns a
//! fully-typed `Value`; reading an uninitialized variable is caught
//! immediately by the statement interpreter's `initialized` check at each
//! use site, not here.

use smallvec::SmallVec;

use crate::exception::{
    compatibility_error, div_by_zero_error, semantic_error, uninitialized_error, TinyResult,
};
use crate::frontend::ast::{BinOp, Expr, Literal};
use crate::interpreter::Interpreter;
use crate::strings::ScriptString;
use crate::value::{compatible, Payload, Value, ValueType};

/// Most calls in practice pass a handful of arguments; inlining up to four
/// avoids a heap allocation per call site for the common case.
type ArgList = SmallVec<[Value; 4]>;

impl<T, O, I> Interpreter<T, O, I>
where
    T: crate::tracer::EvalTracer,
    O: crate::io::CoutWriter,
    I: crate::io::CinReader,
{
    pub fn eval(&mut self, expr: &Expr) -> TinyResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(eval_literal(lit)),
            Expr::Var(name) => self
                .scopes
                .lookup(name)
                .cloned()
                .ok_or_else(|| semantic_error(format!("undeclared identifier '{name}'"))),
            Expr::Call { name, args } => self.eval_call(name, args),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
        }
    }

    fn eval_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> TinyResult<Value> {
        // Left operand is fully evaluated before right.
        let l = self.eval(left)?;
        let r = self.eval(right)?;

        if !compatible(l.ty, r.ty) {
            return Err(compatibility_error(format!(
                "incompatible operand types {} and {} for binary operator",
                l.ty, r.ty
            )));
        }

        if l.ty == ValueType::Null {
            // compatible() only lets Null through when both sides are
            // Null; propagate without error.
            return Ok(Value::null());
        }

        if !l.initialized || !r.initialized {
            return Err(uninitialized_error(
                "binary operator operand is uninitialized",
            ));
        }

        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => eval_arithmetic(op, &l, &r),
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => eval_ordering(op, &l, &r),
            BinOp::Eq | BinOp::Ne => eval_equality(op, &l, &r),
        }
    }

    fn eval_call(&mut self, name: &str, args: &[Expr]) -> TinyResult<Value> {
        let mut values: ArgList = SmallVec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }
        if crate::function::is_builtin_name(name) {
            return crate::builtins::call(name, &values);
        }
        self.call_user_function(name, values.into_vec())
    }
}

fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Int(v) => Value::int(*v),
        Literal::Double(v) => Value::double(*v),
        Literal::Str(bytes) => Value::string(ScriptString::new_str(bytes.clone())),
        Literal::Bool(v) => Value::boolean(*v),
        Literal::Null => Value::null(),
    }
}

fn both_numeric_or_string_plus(op: BinOp, l: &Value, r: &Value) -> bool {
    let numeric = |ty: ValueType| matches!(ty, ValueType::Int | ValueType::Double);
    if numeric(l.ty) && numeric(r.ty) {
        return true;
    }
    op == BinOp::Add && l.ty == ValueType::String && r.ty == ValueType::String
}

fn eval_arithmetic(op: BinOp, l: &Value, r: &Value) -> TinyResult<Value> {
    // Arithmetic on a bool operand is rejected symmetrically, regardless
    // of which side it's on.
    if l.ty == ValueType::Bool || r.ty == ValueType::Bool {
        return Err(semantic_error(
            "cannot perform arithmetic on a bool operand",
        ));
    }
    if !both_numeric_or_string_plus(op, l, r) {
        return Err(semantic_error(format!(
            "cannot perform arithmetic on {} and {}",
            l.ty, r.ty
        )));
    }
    if op == BinOp::Add && l.ty == ValueType::String {
        let a = l.as_str().expect("checked String above");
        let b = r.as_str().expect("checked String above");
        return Ok(Value::string(ScriptString::cat_str(a, b)));
    }

    let is_double = l.ty == ValueType::Double || r.ty == ValueType::Double;
    if is_double {
        let (lf, rf) = (l.as_f64(), r.as_f64());
        if op == BinOp::Div && rf == 0.0 {
            return Err(div_by_zero_error("division by zero"));
        }
        let result = match op {
            BinOp::Add => lf + rf,
            BinOp::Sub => lf - rf,
            BinOp::Mul => lf * rf,
            BinOp::Div => lf / rf,
            _ => unreachable!(),
        };
        Ok(Value::double(result))
    } else {
        let (li, ri) = (l.as_i64(), r.as_i64());
        if op == BinOp::Div && ri == 0 {
            return Err(div_by_zero_error("division by zero"));
        }
        let result = match op {
            BinOp::Add => li + ri,
            BinOp::Sub => li - ri,
            BinOp::Mul => li * ri,
            BinOp::Div => li / ri,
            _ => unreachable!(),
        };
        Ok(Value::int(result))
    }
}

fn eval_ordering(op: BinOp, l: &Value, r: &Value) -> TinyResult<Value> {
    match (l.ty, r.ty) {
        (ValueType::String, _) | (_, ValueType::String) => Err(semantic_error(
            "cannot order-compare string operands",
        )),
        (ValueType::Bool, _) | (_, ValueType::Bool) => Err(semantic_error(
            "cannot order-compare bool operands",
        )),
        _ => {
            let (lf, rf) = (l.as_f64(), r.as_f64());
            let result = match op {
                BinOp::Lt => lf < rf,
                BinOp::Gt => lf > rf,
                BinOp::Le => lf <= rf,
                BinOp::Ge => lf >= rf,
                _ => unreachable!(),
            };
            Ok(Value::boolean(result))
        }
    }
}

fn eval_equality(op: BinOp, l: &Value, r: &Value) -> TinyResult<Value> {
    if l.ty == ValueType::String {
        let a = l.as_str().expect("checked String above");
        let b = r.as_str().expect("checked String above");
        let equal = ScriptString::equals(a, b);
        let result = if op == BinOp::Eq { equal } else { !equal };
        // Legacy quirk, preserved deliberately: string (in)equality reports
        // Int, not Bool.
        return Ok(Value::int(i64::from(result)));
    }
    if l.ty == ValueType::Bool {
        let (lb, rb) = (l.as_bool(), r.as_bool());
        let result = if op == BinOp::Eq { lb == rb } else { lb != rb };
        return Ok(Value::boolean(result));
    }
    let (lf, rf) = (l.as_f64(), r.as_f64());
    let result = if op == BinOp::Eq { lf == rf } else { lf != rf };
    Ok(Value::boolean(result))
}

pub(crate) fn payload_matches_declared(ty: ValueType, payload: &Payload) -> bool {
    matches!(
        (ty, payload),
        (ValueType::Int, Payload::Int(_))
            | (ValueType::Double, Payload::Double(_))
            | (ValueType::String, Payload::Str(_))
            | (ValueType::Bool, Payload::Bool(_))
            | (ValueType::Null, Payload::Null)
    )
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
    fn simple_addition() {
        let (out, result) = run("int main() { cout << 2 + 3; return 0; }");
        result.unwrap();
        assert_eq!(out, "5");
    }

    #[test]
    fn string_plus_string_concatenates() {
        let (out, result) = run("int main() { cout << \"a\" + \"b\"; return 0; }");
        result.unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn bool_arithmetic_is_semantic_error() {
        let (_, result) = run("int main() { bool b = true; cout << b + 1; return 0; }");
        assert_eq!(result.unwrap_err().kind, crate::exception::ErrorKind::Semantic);
    }

    #[test]
    fn string_equality_reports_int() {
        let (out, result) = run("int main() { cout << (\"ab\" == \"ab\"); return 0; }");
        result.unwrap();
        assert_eq!(out, "1");
    }

    #[test]
    fn division_by_zero_is_reported() {
        let (_, result) = run("int main() { int x = 0; cout << 10 / x; return 0; }");
        assert_eq!(
            result.unwrap_err().kind,
            crate::exception::ErrorKind::DivByZero
        );
    }

    #[test]
    fn null_propagates_without_error() {
        let (out, result) = run("int main() { cout << (null == null); return 0; }");
        result.unwrap();
        assert_eq!(out, "NULL");
    }

    #[test]
    fn mixing_null_with_a_concrete_type_is_compatibility_error() {
        let (_, result) = run("int main() { int x = 1; cout << (x == null); return 0; }");
        assert_eq!(
            result.unwrap_err().kind,
            crate::exception::ErrorKind::Compatibility
        );
    }
}
