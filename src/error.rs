//! Crate errors

use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the debugger core, the script parser and the interpreter
#[derive(Debug, Error)]
pub enum Error {
    /// `end_keyword` without a matching `start_keyword`
    #[error("protocol violation: end_keyword called with no keyword open")]
    ProtocolViolation,

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("keyword '{name}' defined twice (lines {first} and {second})")]
    DuplicateKeyword {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("unknown keyword '{name}' at line {line}")]
    UnknownKeyword { name: String, line: usize },

    #[error("unknown variable '${{{name}}}' at line {line}")]
    UnknownVariable { name: String, line: usize },

    #[error("keyword '{name}' expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    /// More than [`crate::executor::MAX_NESTING`] user keywords open at once
    #[error("keyword '{name}' at line {line} exceeds the maximum keyword nesting depth")]
    RecursionLimit { name: String, line: usize },

    #[error("keyword '{name}' failed: {message}")]
    KeywordFailed { name: String, message: String },

    #[error("invalid argument for '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
