//! Test utilities for updraft
//!
//! Helpers shared by the unit tests and the integration test binaries:
//! - [`init_test_logging`] - one-time tracing setup that writes through the test harness
//! - [`fixtures`] - zip archives and GitHub release JSON built in memory
//! - [`fakes`] - recording implementations of the pipeline collaborator traits
//!
//! # Example
//!
//! ```rust,no_run
//! use updraft::test_utils::fixtures::ZipFixture;
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let zip = ZipFixture::new()
//!     .file("owner-repo-abc123/setup.exe", b"MZ")
//!     .write_to(&temp.path().join("update.zip"))
//!     .unwrap();
//! assert!(zip.exists());
//! ```

pub mod fakes;
pub mod fixtures;

pub use fakes::{FakeReleaseSource, RecordingDownloader, RecordingExtractor, RecordingLauncher};
pub use fixtures::{ReleaseFixture, ZipFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise `RUST_LOG`;
/// with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=updraft=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
