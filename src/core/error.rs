//! Error handling for updraft
//!
//! This module provides the error taxonomy for every stage of an update run, plus the
//! user-facing rendering used by the CLI. The error system follows two rules:
//! 1. **Strongly-typed errors** ([`UpdraftError`]) inside the library, propagated with `?`
//! 2. **Machine-checkable kinds** ([`ResultKind`]) at every public boundary, so callers can
//!    branch on an outcome without string matching
//!
//! # Error Categories
//!
//! - **Input**: [`UpdraftError::InvalidRepository`], [`UpdraftError::InvalidUrl`],
//!   [`UpdraftError::InvalidPath`], [`UpdraftError::InvalidVersion`]
//! - **Network**: [`UpdraftError::Network`], [`UpdraftError::Timeout`],
//!   [`UpdraftError::HttpStatus`], [`UpdraftError::MalformedResponse`]
//! - **File System**: [`UpdraftError::PathTooLong`], [`UpdraftError::PermissionDenied`],
//!   [`UpdraftError::FileNotFound`], [`UpdraftError::ReadOnly`],
//!   [`UpdraftError::DirectoryConflict`], [`UpdraftError::FileExists`], [`UpdraftError::Io`]
//! - **Domain**: [`UpdraftError::ArchiveMissing`], [`UpdraftError::ArchiveCorrupt`],
//!   [`UpdraftError::SetupNotFound`], [`UpdraftError::LaunchFailed`],
//!   [`UpdraftError::UnsupportedPlatform`], [`UpdraftError::Cancelled`]
//!
//! Outcomes that end a run early but successfully (already up to date, preview rejected,
//! setup skipped) are never errors. They only exist as [`ResultKind`] values.
//!
//! # Examples
//!
//! ```rust,no_run
//! use updraft::core::{ResultKind, UpdraftError};
//!
//! let error = UpdraftError::SetupNotFound {
//!     folder: "/tmp/extract/".to_string(),
//! };
//! assert_eq!(error.kind(), ResultKind::SetupNotFound);
//! assert!(!error.kind().is_success());
//! ```

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Machine-checkable label attached to every outcome.
///
/// The first block of variants describes successful outcomes, the rest mirror the
/// failure taxonomy of [`UpdraftError`]. [`ResultKind::is_success`] separates the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    /// The whole requested pipeline ran to the end.
    Completed,
    /// A check found a release newer than the installed version.
    UpdateAvailable,
    /// The installed version is the same as or newer than the published one.
    UpdateAlreadyInstalled,
    /// The latest release is a pre-release and the caller rejects those.
    PreviewRejected,
    /// Download and extraction finished; the caller asked not to launch the installer.
    SetupSkipped,

    /// Owner or repository name is missing or malformed.
    InvalidRepository,
    /// A URL could not be parsed or built.
    InvalidUrl,
    /// A path string failed validation.
    InvalidPath,
    /// A version string had no numeric component.
    InvalidVersion,

    /// Connection-level network failure.
    NetworkError,
    /// The server did not answer within the configured timeout.
    ServerTimeout,
    /// The server answered with a non-success HTTP status.
    HttpStatus,
    /// The response body could not be decoded.
    MalformedResponse,

    /// Path exceeds the platform limit.
    PathTooLong,
    /// The OS refused access.
    PermissionDenied,
    /// A required file or folder does not exist.
    FileNotFound,
    /// Target is on a read-only file system or marked read-only.
    ReadOnly,
    /// A file was found where a directory was expected, or the reverse.
    DirectoryConflict,
    /// Refused to overwrite an existing file.
    FileExists,
    /// Any other disk I/O failure.
    DiskIo,

    /// The archive to extract does not exist.
    ArchiveMissing,
    /// The archive exists but is not a readable zip file.
    ArchiveCorrupt,
    /// No installer matched inside the extracted tree.
    SetupNotFound,
    /// The OS failed to start the installer process.
    LaunchFailed,
    /// The requested operation has no implementation on this platform.
    UnsupportedPlatform,
    /// The run was cancelled through its cancellation token.
    Cancelled,
}

impl ResultKind {
    /// Returns `true` for the kinds that describe a successful outcome.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::UpdateAvailable
                | Self::UpdateAlreadyInstalled
                | Self::PreviewRejected
                | Self::SetupSkipped
        )
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug names are the stable identifiers we print
        fmt::Debug::fmt(self, f)
    }
}

/// The main error type for updraft operations
///
/// Each variant represents one failure mode from the taxonomy above and carries the
/// context (URL, path, operation) needed to render an actionable message.
/// Use [`UpdraftError::kind`] to get the machine-checkable [`ResultKind`].
///
/// Low-level I/O and HTTP failures are translated into this type through
/// [`UpdraftError::from_io`] and [`UpdraftError::from_http`]; raw platform errors never
/// escape the stage that produced them.
#[derive(Error, Debug)]
pub enum UpdraftError {
    /// Owner or repository name is empty or contains characters GitHub never allows
    #[error("Invalid repository '{value}': {reason}")]
    InvalidRepository {
        /// The offending owner or repository value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// URL could not be parsed or built
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed
        url: String,
        /// Parser or builder message
        reason: String,
    },

    /// Path string failed validation for its category
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The raw path string
        path: String,
        /// Which rule was violated
        reason: String,
    },

    /// Version string had no numeric component
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion {
        /// The raw version string
        input: String,
        /// Why parsing failed
        reason: String,
    },

    /// Connection or transport failure
    #[error("Network error during {operation}: {reason}")]
    Network {
        /// What was being attempted (e.g. "fetch latest release")
        operation: String,
        /// Transport error message
        reason: String,
    },

    /// Request exceeded the configured timeout
    #[error("Request to {url} timed out")]
    Timeout {
        /// The URL that timed out
        url: String,
    },

    /// Server answered with a non-success status
    #[error("Request to {url} failed with HTTP {status}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// Response body could not be decoded
    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse {
        /// The requested URL
        url: String,
        /// Decoder message
        reason: String,
    },

    /// Path is longer than the platform allows
    #[error("Path is too long: {path}")]
    PathTooLong {
        /// The offending path
        path: String,
    },

    /// Permission denied
    #[error("Permission denied: {operation} on {path}")]
    PermissionDenied {
        /// The operation that was denied
        operation: String,
        /// Path where permission was denied
        path: String,
    },

    /// File or directory not found
    #[error("Not found: {path}")]
    FileNotFound {
        /// The missing path
        path: String,
    },

    /// Target is read-only
    #[error("Read-only file system or file: {path}")]
    ReadOnly {
        /// The read-only path
        path: String,
    },

    /// A file sits where a directory is expected, or the reverse
    #[error("File/directory conflict at {path}")]
    DirectoryConflict {
        /// The conflicting path
        path: String,
    },

    /// Refused to overwrite an existing file
    #[error("File already exists: {path}")]
    FileExists {
        /// The existing file
        path: String,
    },

    /// Any other disk I/O failure
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        /// The operation being performed
        operation: String,
        /// The path involved
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Archive to extract does not exist
    #[error("Archive not found: {path}")]
    ArchiveMissing {
        /// Expected archive location
        path: String,
    },

    /// Archive exists but cannot be read as a zip file
    #[error("Archive {path} is corrupt or not a zip file: {reason}")]
    ArchiveCorrupt {
        /// Archive location
        path: String,
        /// Decoder message
        reason: String,
    },

    /// No installer was found in the extracted tree
    #[error("No installer found under {folder}")]
    SetupNotFound {
        /// The folder that was searched
        folder: String,
    },

    /// The OS refused to start the installer
    #[error("Failed to launch {path}: {reason}")]
    LaunchFailed {
        /// Installer path
        path: String,
        /// OS error message
        reason: String,
    },

    /// Operation not supported on this platform
    #[error("Operation not supported on this platform: {operation}")]
    UnsupportedPlatform {
        /// The operation that is not supported
        operation: String,
    },

    /// Run was cancelled
    #[error("Cancelled before {stage}")]
    Cancelled {
        /// The stage that did not start
        stage: String,
    },
}

impl UpdraftError {
    /// The machine-checkable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ResultKind {
        match self {
            Self::InvalidRepository { .. } => ResultKind::InvalidRepository,
            Self::InvalidUrl { .. } => ResultKind::InvalidUrl,
            Self::InvalidPath { .. } => ResultKind::InvalidPath,
            Self::InvalidVersion { .. } => ResultKind::InvalidVersion,
            Self::Network { .. } => ResultKind::NetworkError,
            Self::Timeout { .. } => ResultKind::ServerTimeout,
            Self::HttpStatus { .. } => ResultKind::HttpStatus,
            Self::MalformedResponse { .. } => ResultKind::MalformedResponse,
            Self::PathTooLong { .. } => ResultKind::PathTooLong,
            Self::PermissionDenied { .. } => ResultKind::PermissionDenied,
            Self::FileNotFound { .. } => ResultKind::FileNotFound,
            Self::ReadOnly { .. } => ResultKind::ReadOnly,
            Self::DirectoryConflict { .. } => ResultKind::DirectoryConflict,
            Self::FileExists { .. } => ResultKind::FileExists,
            Self::Io { .. } => ResultKind::DiskIo,
            Self::ArchiveMissing { .. } => ResultKind::ArchiveMissing,
            Self::ArchiveCorrupt { .. } => ResultKind::ArchiveCorrupt,
            Self::SetupNotFound { .. } => ResultKind::SetupNotFound,
            Self::LaunchFailed { .. } => ResultKind::LaunchFailed,
            Self::UnsupportedPlatform { .. } => ResultKind::UnsupportedPlatform,
            Self::Cancelled { .. } => ResultKind::Cancelled,
        }
    }

    /// Translate an [`io::Error`] into the file system part of the taxonomy.
    ///
    /// `operation` and `path` describe what was being done so the resulting message
    /// stays useful after the original error is gone.
    pub fn from_io(error: io::Error, operation: impl Into<String>, path: impl AsRef<str>) -> Self {
        let path = path.as_ref().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound {
                path,
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                operation: operation.into(),
                path,
            },
            io::ErrorKind::ReadOnlyFilesystem => Self::ReadOnly {
                path,
            },
            io::ErrorKind::IsADirectory | io::ErrorKind::NotADirectory => {
                Self::DirectoryConflict {
                    path,
                }
            }
            io::ErrorKind::AlreadyExists => Self::FileExists {
                path,
            },
            _ => Self::Io {
                operation: operation.into(),
                path,
                source: error,
            },
        }
    }

    /// Translate a [`reqwest::Error`] into the network part of the taxonomy.
    ///
    /// Timeouts become [`UpdraftError::Timeout`] rather than a generic network error.
    pub fn from_http(error: &reqwest::Error, operation: &str, url: &str) -> Self {
        if error.is_timeout() {
            return Self::Timeout {
                url: url.to_string(),
            };
        }
        if let Some(status) = error.status() {
            return Self::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }
        if error.is_builder() {
            return Self::InvalidUrl {
                url: url.to_string(),
                reason: error.to_string(),
            };
        }
        if error.is_decode() {
            return Self::MalformedResponse {
                url: url.to_string(),
                reason: error.to_string(),
            };
        }
        Self::Network {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` carries the rendered error message and kind, plus optional details and
/// a suggestion. This is how the CLI presents failures.
///
/// # Display Format
///
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use updraft::core::{ErrorContext, ResultKind};
///
/// let context = ErrorContext::new("No installer found under /tmp/x/", Some(ResultKind::SetupNotFound))
///     .with_suggestion("Check that the release archive ships a setup executable")
///     .with_details("The locator looks for file names containing every match token");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The main error message
    pub message: String,
    /// The machine-checkable kind, when the error came from updraft
    pub kind: Option<ResultKind>,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub fn new(message: impl Into<String>, kind: Option<ResultKind>) -> Self {
        Self {
            message: message.into(),
            kind,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// An [`ErrorContext`] is passed through unchanged. Recognizes [`UpdraftError`]
/// (tailored suggestions per kind) and bare [`std::io::Error`]; anything else is rendered with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<ErrorContext>() {
        Ok(context) => return context,
        Err(error) => error,
    };

    if let Some(updraft_error) = error.downcast_ref::<UpdraftError>() {
        return create_error_context(updraft_error);
    }

    if let Some(io_error) = error.downcast_ref::<io::Error>() {
        let translated = UpdraftError::from_io(
            io::Error::new(io_error.kind(), io_error.to_string()),
            "file access",
            "unknown",
        );
        return create_error_context(&translated);
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(message, None)
}

/// Map each error kind to a suggestion and some background.
fn create_error_context(error: &UpdraftError) -> ErrorContext {
    let kind = error.kind();
    let context = ErrorContext::new(error.to_string(), Some(kind));

    match error {
        UpdraftError::InvalidRepository { .. } => context
            .with_suggestion("Pass the repository as 'owner/name', e.g. 'octocat/hello-world'")
            .with_details("Owner and repository names may only contain letters, digits, '-', '_' and '.'"),

        UpdraftError::InvalidVersion { .. } => context
            .with_suggestion("Use a tag such as 'v1.2.3', '1.2' or 'v2.0.0-beta'")
            .with_details("At least one numeric component is required"),

        UpdraftError::InvalidPath { .. } | UpdraftError::PathTooLong { .. } => context
            .with_suggestion("Use an absolute path without wildcard or control characters"),

        UpdraftError::Timeout { .. } => context
            .with_suggestion("Retry later or raise 'timeout_secs' in ~/.updraft/config.toml"),

        UpdraftError::HttpStatus { status, .. } => {
            let suggestion = match status {
                404 => "Check the owner/repository spelling and that the repository has a published release",
                401 | 403 => "Set UPDRAFT_GITHUB_TOKEN to raise the GitHub API rate limit or access private repositories",
                _ => "GitHub returned an error; retry later",
            };
            context.with_suggestion(suggestion)
        }

        UpdraftError::Network { .. } => {
            context.with_suggestion("Check your internet connection and proxy settings")
        }

        UpdraftError::PermissionDenied { .. } | UpdraftError::ReadOnly { .. } => context
            .with_suggestion("Choose a writable download/extraction folder or run with elevated permissions")
            .with_details("updraft needs write access to the archive path and the extraction folder"),

        UpdraftError::FileExists { .. } => context
            .with_suggestion("Extract into an empty folder or enable overwriting"),

        UpdraftError::ArchiveCorrupt { .. } => context
            .with_suggestion("Delete the downloaded archive and run the update again"),

        UpdraftError::SetupNotFound { .. } => context
            .with_suggestion("Check that the release archive ships a setup executable")
            .with_details("The locator looks for file names containing every match token (default: 'setup' and 'exe')"),

        UpdraftError::UnsupportedPlatform { .. } => context
            .with_suggestion("Launch the installer manually"),

        _ => context,
    }
}
