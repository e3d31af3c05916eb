//! Error types for exceptfix-edit.
//!
//! This module distinguishes between:
//! - Fix-set rejections (exit code 2): overlapping spans, bad spans, precondition mismatch
//! - Runtime errors (exit code 1): I/O errors

use exceptfix_types::span::Span;
use thiserror::Error;

/// The top-level error type for exceptfix-edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// The fix set cannot be applied as given (exit code 2).
    #[error("invalid fix set: {0}")]
    InvalidFixSet(#[from] InvalidFixError),

    /// A runtime/tool error occurred (exit code 1).
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

/// Rejections of the fix set itself.
#[derive(Debug, Error)]
pub enum InvalidFixError {
    /// Two fixes claim overlapping byte ranges of the same file.
    #[error("overlapping fixes at {first:?} and {second:?}")]
    Overlap { first: Span, second: Span },

    /// A span falls outside the source or cuts a UTF-8 character.
    #[error("span {span:?} is out of bounds or off a character boundary")]
    BadSpan { span: Span },

    /// The file changed since the fixes were planned (sha256 mismatch).
    #[error("precondition mismatch: {message}")]
    PreconditionMismatch { message: String },
}

impl EditError {
    /// Returns true if the fix set itself was rejected.
    pub fn is_invalid_fix_set(&self) -> bool {
        matches!(self, EditError::InvalidFixSet(_))
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EditError::InvalidFixSet(_) => 2,
            EditError::Runtime(_) => 1,
        }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
