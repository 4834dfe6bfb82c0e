//! Progress indicators for long-running stages.
//!
//! A thin wrapper over `indicatif` that stays silent in CI and scripted use.
//!
//! # Disabling Progress
//!
//! Progress bars are hidden when either:
//! - the `UPDRAFT_NO_PROGRESS` environment variable is set (any value), or
//! - [`set_progress_disabled`] was called with `true` (the CLI `--no-progress` flag)
//!
//! # Examples
//!
//! ```rust,no_run
//! use updraft::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new_download(Some(2_048));
//! progress.set_prefix("update.zip");
//! progress.inc(1_024);
//! progress.finish_and_clear();
//! ```

use crate::constants::NO_PROGRESS_ENV;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static PROGRESS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Hide all progress bars created from now on.
pub fn set_progress_disabled(disabled: bool) {
    PROGRESS_DISABLED.store(disabled, Ordering::Relaxed);
}

/// Whether progress output is currently suppressed.
pub fn is_progress_disabled() -> bool {
    PROGRESS_DISABLED.load(Ordering::Relaxed) || std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// Progress bar that respects the global disable switches.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Byte-counting bar for downloads.
    ///
    /// With an unknown total a spinner showing the byte count is used instead.
    pub fn new_download(total_bytes: Option<u64>) -> Self {
        if is_progress_disabled() {
            return Self::hidden();
        }

        let bar = match total_bytes {
            Some(total) => {
                let bar = IndicatifBar::new(total);
                bar.set_style(ProgressStyle::download());
                bar
            }
            None => {
                let bar = IndicatifBar::new_spinner();
                bar.set_style(ProgressStyle::spinner());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        Self {
            inner: bar,
        }
    }

    /// Spinner for work of unknown size, such as extraction.
    pub fn new_spinner() -> Self {
        if is_progress_disabled() {
            return Self::hidden();
        }

        let bar = IndicatifBar::new_spinner();
        bar.set_style(ProgressStyle::spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            inner: bar,
        }
    }

    /// A bar that never draws.
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    /// Set the message shown after the bar.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Set the label shown before the bar.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    /// Advance by `delta` units.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Current position.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Finish and erase the bar.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Styles shared by all updraft progress output.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Byte transfer style.
    ///
    /// ```text
    /// update.zip [━━━━━━━━━━━━━━━━━━━━╸━━━━━━━━━━━━━━━━━━━] 1.05 MiB/2.10 MiB (00:05)
    /// ```
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| IndicatifStyle::default_bar())
            .progress_chars("━╸━")
    }

    /// Spinner style with a message.
    pub fn spinner() -> IndicatifStyle {
        IndicatifStyle::default_spinner()
            .template("{prefix:.bold} {spinner:.cyan} {msg} {bytes}")
            .unwrap_or_else(|_| IndicatifStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }
}
