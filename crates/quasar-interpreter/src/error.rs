//! Error types for the interpreter and the bytecode emitter

use std::fmt;
use thiserror::Error;

/// Kind of value a type check expected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
    Integer,
    Number,
    String,
    Boolean,
    Indexable,
    Iterable,
    Callable,
    Context,
    Procedure,
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExpectedType::Integer => "integer",
            ExpectedType::Number => "number",
            ExpectedType::String => "string",
            ExpectedType::Boolean => "boolean",
            ExpectedType::Indexable => "indexable value",
            ExpectedType::Iterable => "iterable value",
            ExpectedType::Callable => "callable value",
            ExpectedType::Context => "object",
            ExpectedType::Procedure => "procedure",
        };
        f.write_str(text)
    }
}

/// Script-visible runtime errors
///
/// Structural problems (arity, type, assignment, serialization) are errors.
/// "Does not exist" conditions are never errors; they are `Ok(None)` results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Wrong number of arguments; always checked before argument types
    #[error("{}", arity_message(.min, .got))]
    Arity { min: usize, max: usize, got: usize },

    /// Value has the wrong kind for the operation
    #[error("Type error, expecting {0}")]
    Type(ExpectedType),

    /// Write to a read-only property or indexable
    #[error("Not assignable")]
    NotAssignable,

    /// Value has no persistent representation
    #[error("Value is not serializable")]
    NotSerializable,

    /// Argument value out of range
    #[error("Range error")]
    Range,

    /// Named lock is held already
    #[error("Lock \"{name}\" is already held")]
    LockConflict { name: String },

    /// Name does not resolve to a property or variable
    #[error("Unknown identifier \"{0}\"")]
    UnknownIdentifier(String),

    /// Script file could not be opened
    #[error("File not found: \"{0}\"")]
    FileNotFound(String),

    /// Call depth exceeded
    #[error("Stack overflow")]
    StackOverflow,

    /// Malformed instruction stream
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),

    /// Malformed serialized data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error raised by a script or reported by the host
    #[error("{0}")]
    User(String),
}

fn arity_message(min: &usize, got: &usize) -> &'static str {
    if got < min {
        "Too few arguments"
    } else {
        "Too many arguments"
    }
}

impl Error {
    /// Error raised by script code or a host collaborator
    pub fn user(text: impl Into<String>) -> Self {
        Error::User(text.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::InvalidData(e.to_string())
    }
}

/// Errors detected while building or relocating a bytecode object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A jump references a label that was never placed
    #[error("Label {0} is referenced but never placed")]
    UnboundLabel(u16),

    /// A label was placed twice
    #[error("Label {0} is placed more than once")]
    DuplicateLabel(u16),

    /// A jump references a label that was never created
    #[error("Unknown label {0}")]
    UnknownLabel(u16),

    /// Too many literals (max 65536)
    #[error("Too many literals (max 65536)")]
    TooManyLiterals,

    /// Too many names (max 65536)
    #[error("Too many names (max 65536)")]
    TooManyNames,

    /// Too many labels (max 65536)
    #[error("Too many labels (max 65536)")]
    TooManyLabels,

    /// Code too large (jump target overflow)
    #[error("Code too large (jump target overflow)")]
    CodeTooLarge,
}
