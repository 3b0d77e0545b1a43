//! The five reserved string builtins.
//!
//! Each builtin explicitly checks arity and argument types before doing
//! anything else, raising `Compatibility` on mismatch.

mod concat;
mod find;
mod length;
mod sort;
mod substr;

use crate::exception::{compatibility_error, TinyResult};
use crate::function::BUILTIN_NAMES;
use crate::value::Value;

/// Dispatches a call to one of the five builtins by name.
///
/// # Panics
/// Panics if `name` is not one of [`BUILTIN_NAMES`]; callers must check
/// [`crate::function::is_builtin_name`] first.
pub fn call(name: &str, args: &[Value]) -> TinyResult<Value> {
    match name {
        "concat" => concat::call(args),
        "length" => length::call(args),
        "substr" => substr::call(args),
        "sort" => sort::call(args),
        "find" => find::call(args),
        other => unreachable!("'{other}' is not a registered builtin"),
    }
}

fn expect_arity(name: &str, args: &[Value], expected: usize) -> TinyResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(compatibility_error(format!(
            "'{name}' expects {expected} argument(s), got {}",
            args.len()
        )))
    }
}

fn expect_string<'a>(name: &str, args: &'a [Value], index: usize) -> TinyResult<&'a crate::strings::ScriptString> {
    args[index].as_str().ok_or_else(|| {
        compatibility_error(format!(
            "'{name}' expects a string argument at position {}, got {}",
            index + 1,
            args[index].ty
        ))
    })
}

fn expect_int(name: &str, args: &[Value], index: usize) -> TinyResult<i64> {
    match &args[index].payload {
        crate::value::Payload::Int(v) => Ok(*v),
        _ => Err(compatibility_error(format!(
            "'{name}' expects an int argument at position {}, got {}",
            index + 1,
            args[index].ty
        ))),
    }
}

const _: () = assert!(BUILTIN_NAMES.len() == 5);
