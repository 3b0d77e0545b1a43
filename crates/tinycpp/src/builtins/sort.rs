use super::{expect_arity, expect_string};
use crate::exception::TinyResult;
use crate::strings;
use crate::value::Value;

/// `sort(s: string) -> string`: bytes in non-decreasing order.
pub fn call(args: &[Value]) -> TinyResult<Value> {
    expect_arity("sort", args, 1)?;
    let s = expect_string("sort", args, 0)?;
    Ok(Value::string(strings::sort(s)))
}
