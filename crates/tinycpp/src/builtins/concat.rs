use super::{expect_arity, expect_string};
use crate::exception::TinyResult;
use crate::strings::ScriptString;
use crate::value::Value;

/// `concat(a: string, b: string) -> string`: byte concatenation.
pub fn call(args: &[Value]) -> TinyResult<Value> {
    expect_arity("concat", args, 2)?;
    let a = expect_string("concat", args, 0)?;
    let b = expect_string("concat", args, 1)?;
    Ok(Value::string(ScriptString::cat_str(a, b)))
}
