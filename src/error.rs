//! Error kinds surfaced by a backend invocation.
//!
//! Every error is terminal to the invocation that raised it. Nothing is
//! retried; the dispatcher turns the error into an exit status with
//! [`LookupError::exit_code`].

use thiserror::Error;

/// Status returned by a successful invocation.
pub const EXIT_SUCCESS: i32 = 0;

/// Status returned when an invocation fails because of user input.
pub const EXIT_FAILURE: i32 = 1;

/// Status returned when the guard rejects the caller.
pub const EXIT_PERMISSION: i32 = 77;

/// Lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The backend was entered without going through the dispatcher.
    #[error("backend must be invoked through the dispatcher")]
    Permission,

    /// Unknown flag, or a string-valued flag without its value.
    #[error("{0}")]
    Argument(#[from] ArgumentError),

    /// Input parsed fine but is not acceptable to the backend.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Opaque non-zero status reported by the launcher.
    #[error("launcher exited with status {0}")]
    Launch(i32),

    /// The style file or one of its patterns is malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No backend is registered under this name.
    #[error("no such backend: {0}")]
    UnknownBackend(String),
}

impl LookupError {
    /// Exit status the dispatcher propagates for this error.
    ///
    /// Launch failures pass the launcher's own status through unchanged.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            LookupError::Permission => EXIT_PERMISSION,
            LookupError::Launch(code) => *code,
            LookupError::Argument(_)
            | LookupError::Validation(_)
            | LookupError::Config(_)
            | LookupError::UnknownBackend(_) => EXIT_FAILURE,
        }
    }
}

/// Option parsing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("unknown option: -{0}")]
    UnknownFlag(String),

    #[error("missing argument for option: -{0}")]
    MissingValue(String),
}

/// Input validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown language selector: {0}")]
    UnknownSelector(String),

    #[error("empty query")]
    EmptyQuery,
}

pub type Result<T> = std::result::Result<T, LookupError>;
