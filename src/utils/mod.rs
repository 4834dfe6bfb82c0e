//! Shared utilities.
//!
//! - [`progress`]: progress bars honoring `UPDRAFT_NO_PROGRESS`

pub mod progress;

pub use progress::{ProgressBar, ProgressStyle};
