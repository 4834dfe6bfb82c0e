//! Core types for updraft
//!
//! This module holds the error taxonomy shared by every stage of an update run.
//!
//! # Error Management
//!
//! - **Strongly-typed errors** ([`UpdraftError`]) for precise error handling in code
//! - **Outcome labels** ([`ResultKind`]) attached to every public result, success or failure
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions for CLI users
//!
//! # Examples
//!
//! ```rust,no_run
//! use updraft::core::{UpdraftError, user_friendly_error};
//!
//! fn example_operation() -> anyhow::Result<()> {
//!     Err(UpdraftError::ArchiveMissing {
//!         path: "/tmp/update.zip".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, ResultKind, UpdraftError, user_friendly_error};

/// Result alias used by library internals.
pub type Result<T, E = UpdraftError> = std::result::Result<T, E>;
