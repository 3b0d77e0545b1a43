//! The tagged value representation and the assignment/operator
//! compatibility rule it defines.

use std::fmt;
use std::rc::Rc;

use crate::strings::ScriptString;

/// The five concrete value types plus the `auto` placeholder.
///
/// `Auto` only ever appears transiently on a freshly-declared `auto`
/// variable before its first assignment; every [`Value`] produced by the
/// expression evaluator has a concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Double,
    String,
    Bool,
    Null,
    Auto,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// The payload carried by a [`Value`].
///
/// `Pending` is the placeholder written by `VAR_CREATION` for a variable
/// that has been declared but never assigned; reading it is always gated by
/// [`Value::initialized`] first.
#[derive(Debug, Clone)]
pub enum Payload {
    Int(i64),
    Double(f64),
    Str(Rc<ScriptString>),
    Bool(bool),
    Null,
    Pending,
}

/// A single tagged value: a type tag, its payload, and whether it has
/// been assigned yet.
#[derive(Debug, Clone)]
pub struct Value {
    pub ty: ValueType,
    pub payload: Payload,
    pub initialized: bool,
}

impl Value {
    pub fn int(v: i64) -> Self {
        Self {
            ty: ValueType::Int,
            payload: Payload::Int(v),
            initialized: true,
        }
    }

    pub fn double(v: f64) -> Self {
        Self {
            ty: ValueType::Double,
            payload: Payload::Double(v),
            initialized: true,
        }
    }

    pub fn string(v: ScriptString) -> Self {
        Self {
            ty: ValueType::String,
            payload: Payload::Str(Rc::new(v)),
            initialized: true,
        }
    }

    pub fn boolean(v: bool) -> Self {
        Self {
            ty: ValueType::Bool,
            payload: Payload::Bool(v),
            initialized: true,
        }
    }

    pub fn null() -> Self {
        Self {
            ty: ValueType::Null,
            payload: Payload::Null,
            initialized: true,
        }
    }

    /// An uninitialized, declared-but-unassigned slot of the given type.
    ///
    /// This is what `VAR_CREATION` puts in a scope frame; reading it before
    /// an `ASSIGN`/`CIN` sets `initialized` is `UNINITIALIZED_ID`.
    pub fn pending(ty: ValueType) -> Self {
        Self {
            ty,
            payload: Payload::Pending,
            initialized: false,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match &self.payload {
            Payload::Int(v) => *v,
            Payload::Double(v) => *v as i64,
            Payload::Bool(v) => i64::from(*v),
            _ => 0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match &self.payload {
            Payload::Int(v) => *v as f64,
            Payload::Double(v) => *v,
            Payload::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    pub fn as_bool(&self) -> bool {
        match &self.payload {
            Payload::Bool(v) => *v,
            Payload::Int(v) => *v != 0,
            Payload::Double(v) => *v != 0.0,
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&ScriptString> {
        match &self.payload {
            Payload::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders a [`Value`] the way `cout` does: decimal `Int`,
/// shortest-round-trippable `Double` (via `ryu`), verbatim `String` bytes,
/// the literal words `true`/`false` for `Bool`, and the literal word
/// `NULL`.
///
/// # Panics
/// Panics if called on a `Value` whose payload is `Pending` — callers must
/// check `initialized` before formatting.
#[must_use]
pub fn format_for_cout(value: &Value) -> String {
    match &value.payload {
        Payload::Int(v) => v.to_string(),
        Payload::Double(v) => ryu::Buffer::new().format(*v).to_string(),
        Payload::Str(s) => s.display_lossy().into_owned(),
        Payload::Bool(v) => if *v { "true" } else { "false" }.to_string(),
        Payload::Null => "NULL".to_string(),
        Payload::Pending => unreachable!("cout of an uninitialized value must be caught earlier"),
    }
}

/// Symmetric-extended type equality plus the two implicit coercions
/// (`Double <- Int`, `Int <-> Bool`) that assignments and binary operators
/// are allowed to cross.
///
/// `Auto` is never a legal argument here in practice: an `auto` variable
/// adopts its concrete type at the moment of first assignment, strictly
/// before this function is ever consulted for that variable again.
#[must_use]
pub fn compatible(a: ValueType, b: ValueType) -> bool {
    if a == b {
        return true;
    }
    matches!(
        (a, b),
        (ValueType::Double, ValueType::Int)
            | (ValueType::Int, ValueType::Double)
            | (ValueType::Int, ValueType::Bool)
            | (ValueType::Bool, ValueType::Int)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_int_compatible_both_directions() {
        assert!(compatible(ValueType::Double, ValueType::Int));
        assert!(compatible(ValueType::Int, ValueType::Double));
    }

    #[test]
    fn int_bool_compatible_both_directions() {
        assert!(compatible(ValueType::Int, ValueType::Bool));
        assert!(compatible(ValueType::Bool, ValueType::Int));
    }

    #[test]
    fn string_only_compatible_with_itself() {
        assert!(compatible(ValueType::String, ValueType::String));
        assert!(!compatible(ValueType::String, ValueType::Int));
        assert!(!compatible(ValueType::String, ValueType::Bool));
        assert!(!compatible(ValueType::String, ValueType::Null));
    }

    #[test]
    fn null_only_compatible_with_null() {
        assert!(compatible(ValueType::Null, ValueType::Null));
        assert!(!compatible(ValueType::Null, ValueType::Int));
        assert!(!compatible(ValueType::Null, ValueType::Bool));
    }

    #[test]
    fn double_bool_incompatible() {
        assert!(!compatible(ValueType::Double, ValueType::Bool));
        assert!(!compatible(ValueType::Bool, ValueType::Double));
    }

    #[test]
    fn format_for_cout_renders_each_scalar_kind() {
        assert_eq!(format_for_cout(&Value::int(5)), "5");
        assert_eq!(format_for_cout(&Value::boolean(true)), "true");
        assert_eq!(format_for_cout(&Value::boolean(false)), "false");
        assert_eq!(format_for_cout(&Value::null()), "NULL");
    }

    #[test]
    fn format_for_cout_double_is_shortest_round_trip() {
        assert_eq!(format_for_cout(&Value::double(1.5)), "1.5");
    }
}
