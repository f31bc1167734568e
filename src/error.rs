use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};
use thiserror::Error;

/// Every way a test run can fail. None of these cross the library boundary as a
/// panic, they are folded into the returned result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TesterError {
    #[error("Pattern cannot be empty")]
    EmptyPattern,

    /// The engine rejected the pattern. The engine's message is kept verbatim.
    #[error("{0}")]
    Compile(String),

    #[error("Test string is too large ({length} characters, the limit is {limit})")]
    InputTooLarge { length: usize, limit: usize },

    #[error("Too many iterations (over {0}), the pattern may be matching empty strings forever")]
    TooManyIterations(usize),

    #[error("Execution timed out after {0}ms, possible catastrophic backtracking")]
    Timeout(u64),

    #[error("{0}")]
    Execution(String),

    #[error("Replacement failed: {0}")]
    Replacement(String),
}

/// Stable identifier of a [TesterError], used for metric labels and for
/// callers that branch on the failure.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter,
)]
pub enum ErrorKind {
    EmptyPatternError,
    CompileError,
    InputTooLargeError,
    TooManyIterationsError,
    TimeoutError,
    ExecutionError,
    ReplacementError,
}

impl TesterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TesterError::EmptyPattern => ErrorKind::EmptyPatternError,
            TesterError::Compile(_) => ErrorKind::CompileError,
            TesterError::InputTooLarge { .. } => ErrorKind::InputTooLargeError,
            TesterError::TooManyIterations(_) => ErrorKind::TooManyIterationsError,
            TesterError::Timeout(_) => ErrorKind::TimeoutError,
            TesterError::Execution(_) => ErrorKind::ExecutionError,
            TesterError::Replacement(_) => ErrorKind::ReplacementError,
        }
    }

    /// Whether the failure blanks all match data. Only a failed replacement
    /// leaves the matches in place.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TesterError::Replacement(_))
    }
}
