use super::{expect_arity, expect_int, expect_string};
use crate::exception::TinyResult;
use crate::strings;
use crate::value::Value;

/// `substr(s: string, start: int, len: int) -> string`.
pub fn call(args: &[Value]) -> TinyResult<Value> {
    expect_arity("substr", args, 3)?;
    let s = expect_string("substr", args, 0)?;
    let start = expect_int("substr", args, 1)?;
    let len = expect_int("substr", args, 2)?;
    Ok(Value::string(strings::substr(s, start, len)))
}
