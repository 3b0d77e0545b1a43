use super::{expect_arity, expect_string};
use crate::exception::TinyResult;
use crate::strings;
use crate::value::Value;

/// `find(haystack: string, needle: string) -> int`: first byte offset, or
/// `-1` when absent.
pub fn call(args: &[Value]) -> TinyResult<Value> {
    expect_arity("find", args, 2)?;
    let haystack = expect_string("find", args, 0)?;
    let needle = expect_string("find", args, 1)?;
    Ok(Value::int(strings::find(haystack, needle)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::ScriptString;

    fn s(text: &str) -> Value {
        Value::string(ScriptString::new_str(text.as_bytes().to_vec()))
    }

    #[test]
    fn finds_substring_offset() {
        let result = call(&[s("hello world"), s("world")]).unwrap();
        assert_eq!(result.as_i64(), 6);
    }

    #[test]
    fn returns_sentinel_when_absent() {
        let result = call(&[s("hello"), s("xyz")]).unwrap();
        assert_eq!(result.as_i64(), -1);
    }
}
