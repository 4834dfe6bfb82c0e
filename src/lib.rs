//! Updraft - self-update from GitHub releases
//!
//! Updraft lets a desktop application update itself from the releases of its GitHub
//! repository. It checks the latest release, compares the tag with the installed
//! version, downloads and extracts the release archive, locates the installer inside
//! it, and starts that installer.
//!
//! # Architecture Overview
//!
//! Each stage is a small component behind a trait, and [`update::UpdatePipeline`]
//! runs them in order:
//!
//! ```text
//! ReleaseSource ─▶ VersionComparator ─▶ ArchiveDownloader ─▶ ArchiveExtractor
//!                                                                   │
//!                            InstallerLauncher ◀─ InstallerLocator ◀┘
//! ```
//!
//! The first failing stage stops the run. Every stage and the run itself report an
//! [`update::UpdateResult`] whose [`core::ResultKind`] tells the caller exactly what
//! happened, including the non-error early exits (already up to date, pre-release
//! rejected, setup skipped).
//!
//! ## Key Features
//!
//! - **Validated paths**: archive, folder and installer paths are checked and
//!   normalized when they are created, never at the point of use
//! - **Loose tags**: `v3.1`, `3.1.5`, `v4.0.0-beta` and `2.0 Preview` all parse
//! - **Deterministic locator**: the same tree always yields the same installer
//! - **Cancellation**: every stage honors a `CancellationToken`
//!
//! # Core Modules
//!
//! ## Pipeline
//! - [`update`] - fluent builder, state machine, session record, one-shot helpers
//!
//! ## Stages
//! - [`github`] - release metadata from the GitHub REST API
//! - [`download`] - streaming HTTP download with progress
//! - [`archive`] - zip extraction
//! - [`installer`] - installer search and process launch
//!
//! ## Value Types
//! - [`version`] - [`version::VersionTag`] parsing and ordering
//! - [`paths`] - [`paths::FolderPath`], [`paths::ZipPath`], [`paths::InstallerPath`]
//!
//! ## Supporting Modules
//! - [`config`] - `~/.updraft/config.toml` and environment overrides
//! - [`core`] - error taxonomy and user-facing error rendering
//! - [`cli`] - the `updraft` command-line interface
//! - [`utils`] - progress bars
//!
//! # Example
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use updraft::core::ResultKind;
//! use updraft::update::Updater;
//!
//! # async fn example() -> Result<(), updraft::core::UpdraftError> {
//! let result = Updater::create("octocat", "hello-world")?
//!     .where_paths("/tmp/hello/", "/tmp/hello/")?
//!     .run_update()
//!     .if_version_bigger_than_str("v3.1.5")?
//!     .build()?
//!     .run(&CancellationToken::new())
//!     .await;
//!
//! match result.kind {
//!     ResultKind::Completed => println!("installer started"),
//!     ResultKind::UpdateAlreadyInstalled => println!("up to date"),
//!     kind => println!("{kind}: {}", result.message),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Is there something newer than 3.1.5?
//! updraft check octocat/hello-world --current v3.1.5
//!
//! # Full update, keeping the extracted files
//! updraft run octocat/hello-world --zip /tmp/hello/ --extract-to /tmp/hello/ --current v3.1.5
//!
//! # Individual stages
//! updraft download https://example.com/app.zip /tmp/app.zip
//! updraft extract /tmp/app.zip /tmp/app/
//! updraft find-installer /tmp/app/
//! ```

// Pipeline
pub mod update;

// Stages
pub mod archive;
pub mod download;
pub mod github;
pub mod installer;

// Value types
pub mod paths;
pub mod version;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
