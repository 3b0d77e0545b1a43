//! User-defined function declarations and the program's function registry.
//!
//! There are no closures, no bytecode body, and no default arguments, so a
//! `FunctionDef` is just a signature plus its statement list.

use indexmap::IndexMap;

use crate::exception::{semantic_error, TinyResult};
use crate::frontend::ast::Stmt;
use crate::value::ValueType;

/// One declared parameter: a name paired with its declared type.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: ValueType,
}

/// A user function declaration: name, return type, parameters, and body.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub return_type: ValueType,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

/// The five built-in string functions, reserved so no program can declare
/// a user function that collides with one.
pub const BUILTIN_NAMES: [&str; 5] = ["concat", "length", "substr", "sort", "find"];

#[must_use]
pub fn is_builtin_name(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// The whole-program table of user function declarations, built once while
/// the AST is prepared for evaluation and consulted read-only afterward.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, FunctionDef>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            functions: IndexMap::new(),
        }
    }

    /// Registers a function declaration, rejecting a name that collides
    /// with a builtin or an earlier declaration.
    pub fn register(&mut self, def: FunctionDef) -> TinyResult<()> {
        if is_builtin_name(&def.name) {
            return Err(semantic_error(format!(
                "function '{}' collides with a builtin",
                def.name
            )));
        }
        if self.functions.contains_key(&def.name) {
            return Err(semantic_error(format!(
                "function '{}' is already declared",
                def.name
            )));
        }
        self.functions.insert(def.name.clone(), def);
        Ok(())
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    #[must_use]
    pub fn has_main(&self) -> bool {
        self.functions.contains_key("main")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str) -> FunctionDef {
        FunctionDef {
            name: name.to_string(),
            return_type: ValueType::Int,
            params: vec![],
            body: vec![],
        }
    }

    #[test]
    fn register_then_find_roundtrips() {
        let mut registry = FunctionRegistry::new();
        registry.register(def("fact")).unwrap();
        assert!(registry.find("fact").is_some());
        assert!(registry.find("missing").is_none());
    }

    #[test]
    fn register_rejects_builtin_collision() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.register(def("length")).is_err());
    }

    #[test]
    fn register_rejects_duplicate_declaration() {
        let mut registry = FunctionRegistry::new();
        registry.register(def("fact")).unwrap();
        assert!(registry.register(def("fact")).is_err());
    }

    #[test]
    fn has_main_reflects_registration() {
        let mut registry = FunctionRegistry::new();
        assert!(!registry.has_main());
        registry.register(def("main")).unwrap();
        assert!(registry.has_main());
    }
}
