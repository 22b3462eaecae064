// ABOUTME: Error types for lexing, parsing, and evaluation failures

use crate::value::Value;
use thiserror::Error;

/// A lex-time failure: invalid character, invalid float, unterminated string.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at line {line}, col {col}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

/// The parser's accumulated diagnostics, already joined into one message.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ParseError(pub String);

/// A compile-time failure turning an AST into bytecode (§4.6): an AST shape
/// the subset compiler doesn't lower, or an infix/prefix operator it has no
/// opcode for.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct CompileError(pub String);

#[allow(dead_code)]
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Operator not defined for this pair of operand types.
    #[error("Operator '{op}' not defined for {left} and {right}")]
    UnsupportedOperator {
        op: String,
        left: String,
        right: String,
    },

    /// Type mismatch error with function name, expected type, actual type, and position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String, // "2", "1-3", "at least 1"
        actual: usize,
    },

    /// Runtime error with function context
    #[error("{function}: {message}")]
    RuntimeError { function: String, message: String },

    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("Value is not callable: {0}")]
    NotCallable(String),

    #[error("Index out of range: {index} (length {len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Cannot assign to this expression")]
    InvalidAssignmentTarget,

    #[error("Arity mismatch calling '{name}': expected {expected}, got {actual}")]
    CallArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Attempted to call a class with arguments but it has no 'init'")]
    NoInitForArgs,

    #[error("Cannot iterate over non-list value")]
    IterOverNonList,

    #[error("Member '{0}' is reserved and cannot be reassigned")]
    ReservedMember(String),

    #[error("stack overflow")]
    StackOverflow,

    #[error("{0}")]
    Custom(String),
}

impl EvalError {
    /// Create a type mismatch error with full context
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a runtime error with function context
    pub fn runtime_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::RuntimeError {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn unsupported_operator(op: &str, left: &Value, right: &Value) -> Self {
        EvalError::UnsupportedOperator {
            op: op.to_string(),
            left: left.type_name().to_string(),
            right: right.type_name().to_string(),
        }
    }

    /// Whether the embedder's default policy should treat this as a process-exit
    /// condition (spec.md §7 "Fatal") rather than a recoverable `Value::Error`.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EvalError::IndexOutOfRange { .. }
                | EvalError::CallArityMismatch { .. }
                | EvalError::IterOverNonList
                | EvalError::NotCallable(_)
                | EvalError::UndefinedSymbol(_)
                | EvalError::InvalidAssignmentTarget
                | EvalError::NoInitForArgs
        )
    }
}

/// Top-level error returned by [`crate::eval`] and [`crate::compile`].
#[derive(Error, Debug, Clone)]
pub enum InterpError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("*** RUNTIME ERROR ***\n{0}")]
    Eval(#[from] EvalError),
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
}
