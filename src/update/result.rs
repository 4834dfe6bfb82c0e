//! The value returned by every public stage and by the pipeline.

use crate::core::{ResultKind, UpdraftError};
use serde::Serialize;
use std::fmt;

/// Outcome of a stage or a whole run.
///
/// `success` always agrees with [`ResultKind::is_success`]. Early exits that are not
/// errors (already up to date, pre-release rejected, setup skipped) are successes
/// with their own kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateResult<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Machine-checkable outcome
    pub kind: ResultKind,
    /// Human-readable description
    pub message: String,
    /// Payload, when the operation produced one
    pub value: Option<T>,
}

impl<T> UpdateResult<T> {
    /// A successful outcome.
    ///
    /// # Panics
    ///
    /// Panics when `kind` is a failure kind.
    pub fn success(kind: ResultKind, message: impl Into<String>, value: Option<T>) -> Self {
        assert!(kind.is_success(), "{kind} is not a success kind");
        Self {
            success: true,
            kind,
            message: message.into(),
            value,
        }
    }

    /// A failed outcome built from `error`, optionally carrying a partial value.
    pub fn failure(error: &UpdraftError, value: Option<T>) -> Self {
        Self {
            success: false,
            kind: error.kind(),
            message: error.to_string(),
            value,
        }
    }

    /// Convert an internal result: `Ok` becomes `kind` with `message`, `Err` keeps
    /// the error's kind and text.
    pub fn from_result(result: Result<T, UpdraftError>, kind: ResultKind, message: impl FnOnce(&T) -> String) -> Self {
        match result {
            Ok(value) => {
                let message = message(&value);
                Self::success(kind, message, Some(value))
            }
            Err(e) => Self::failure(&e, None),
        }
    }

    /// Transform the payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UpdateResult<U> {
        UpdateResult {
            success: self.success,
            kind: self.kind,
            message: self.message,
            value: self.value.map(f),
        }
    }
}

impl<T> From<UpdraftError> for UpdateResult<T> {
    fn from(error: UpdraftError) -> Self {
        Self::failure(&error, None)
    }
}

impl<T> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
