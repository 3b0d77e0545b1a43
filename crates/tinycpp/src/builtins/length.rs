use super::{expect_arity, expect_string};
use crate::exception::TinyResult;
use crate::strings;
use crate::value::Value;

/// `length(s: string) -> int`: byte length.
pub fn call(args: &[Value]) -> TinyResult<Value> {
    expect_arity("length", args, 1)?;
    let s = expect_string("length", args, 0)?;
    Ok(Value::int(strings::length(s)))
}
