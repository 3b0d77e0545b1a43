//! The error taxonomy and its process-exit codes.

use std::fmt;

/// One entry of the error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// (External) lexical error — code 1.
    Lex,
    /// (External) parse error — code 2.
    Syntax,
    /// Undeclared name, redeclaration, missing `main`, builtin collision,
    /// wrong argument count — code 3.
    Semantic,
    /// Incompatible types in assignment/operator/return, wrong builtin
    /// argument type — code 4.
    Compatibility,
    /// Reserved for other static-semantic issues — code 5.
    SemanticOther,
    /// Failed numeric input parsing — code 6.
    NumberIn,
    /// Read of an uninitialized variable in an expression or `cout` —
    /// code 7.
    UninitializedId,
    /// Division where the divisor evaluates to zero — code 8.
    DivByZero,
    /// Unrecognized AST type or other runtime invariant violation —
    /// code 9.
    RuntimeOther,
    /// Allocator failure, unreachable code reached — code 99.
    Internal,
}

impl ErrorKind {
    /// The process exit code for this error kind.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Lex => 1,
            Self::Syntax => 2,
            Self::Semantic => 3,
            Self::Compatibility => 4,
            Self::SemanticOther => 5,
            Self::NumberIn => 6,
            Self::UninitializedId => 7,
            Self::DivByZero => 8,
            Self::RuntimeOther => 9,
            Self::Internal => 99,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lex => "LEX",
            Self::Syntax => "SYNTAX",
            Self::Semantic => "SEMANTIC",
            Self::Compatibility => "COMPATIBILITY",
            Self::SemanticOther => "SEMANT_OTHER",
            Self::NumberIn => "NUMBER_IN",
            Self::UninitializedId => "UNINITIALIZED_ID",
            Self::DivByZero => "RUNTIME_DIV_BY_0",
            Self::RuntimeOther => "RUNTIME_OTHER",
            Self::Internal => "INTERNAL",
        };
        f.write_str(name)
    }
}

/// An error raised anywhere in the frontend or the evaluator.
///
/// Keeping the kind and a free-text message distinct (rather than one
/// per-site formatted string) lets tests match on `kind` without caring
/// about message wording, while the CLI still gets a readable diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TinyError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TinyError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl fmt::Display for TinyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TinyError {}

macro_rules! error_ctor {
    ($name:ident, $kind:expr) => {
        #[must_use]
        pub fn $name(message: impl Into<String>) -> TinyError {
            TinyError::new($kind, message)
        }
    };
}

error_ctor!(lex_error, ErrorKind::Lex);
error_ctor!(syntax_error, ErrorKind::Syntax);
error_ctor!(semantic_error, ErrorKind::Semantic);
error_ctor!(compatibility_error, ErrorKind::Compatibility);
error_ctor!(number_in_error, ErrorKind::NumberIn);
error_ctor!(uninitialized_error, ErrorKind::UninitializedId);
error_ctor!(div_by_zero_error, ErrorKind::DivByZero);
error_ctor!(runtime_other_error, ErrorKind::RuntimeOther);
error_ctor!(internal_error, ErrorKind::Internal);

pub type TinyResult<T> = Result<T, TinyError>;
