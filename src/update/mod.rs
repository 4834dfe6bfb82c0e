//! The update pipeline.
//!
//! An update run checks GitHub for the latest release, compares it to the installed
//! version, downloads and extracts the archive, then locates and starts the installer.
//! Every stage reports through [`UpdateResult`], and the run as a whole is recorded
//! in an [`UpdateSession`] whose [`StatusHistory`] only the pipeline appends to.
//!
//! # Module Organization
//!
//! - [`builder`](UpdateBuilder) - typestate fluent configuration
//! - [`UpdatePipeline`] - the state machine that runs the stages
//! - [`UpdateSession`], [`UpdateStatus`], [`StatusHistory`] - the run record
//! - [`UpdateResult`] - the outcome value shared by every stage
//! - [`check_for_updates`], [`download_zip`], [`extract_zip_file`], [`locate_setup`],
//!   [`launch_setup`] - stages usable on their own
//!
//! # Examples
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use updraft::update::Updater;
//! use updraft::version::VersionTag;
//!
//! # async fn example() -> Result<(), updraft::core::UpdraftError> {
//! let pipeline = Updater::create("octocat", "hello-world")?
//!     .where_paths("/tmp/hello/update.zip", "/tmp/hello/")?
//!     .run_update()
//!     .if_version_bigger_than(VersionTag::parse("v3.1.5")?)
//!     .if_not_preview()
//!     .build()?;
//!
//! let result = pipeline.run(&CancellationToken::new()).await;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

mod builder;
mod helpers;
mod pipeline;
mod result;
mod session;
mod status;

pub use builder::{Configuring, NeedsAction, NeedsPaths, UpdateBuilder, Updater};
pub use helpers::{
    VersionInfo, check_for_updates, check_with_source, download_zip, extract_zip_file, launch_setup,
    locate_setup,
};
pub use pipeline::{PipelineOptions, PipelineState, UpdatePipeline};
pub use result::UpdateResult;
pub use session::UpdateSession;
pub use status::{StatusHistory, UpdateStage, UpdateStatus};
