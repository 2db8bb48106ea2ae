//! Progressive reveal of a finished document.
//!
//! A complete roadmap is fed line by line through [`build_html`] so the
//! display grows as if it were streaming. Each run carries a [`JobId`]; once
//! a newer job is issued the older run stops at its next checkpoint without
//! touching the display again.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::builder::build_html;
use crate::config::RevealConfig;

/// Identifier of one render job. Later jobs compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct JobId(u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Hands out job ids and remembers the latest one.
#[derive(Debug, Default)]
pub struct JobTracker {
    latest: AtomicU64,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new job, superseding every earlier one.
    pub fn issue(&self) -> JobId {
        JobId(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> JobId {
        JobId(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, job: JobId) -> bool {
        self.latest() == job
    }
}

/// Somewhere rendered HTML is displayed. Each paint replaces the previous one.
pub trait Surface: Send + Sync {
    fn paint(&self, html: String);
}

impl<F> Surface for F
where
    F: Fn(String) + Send + Sync,
{
    fn paint(&self, html: String) {
        self(html)
    }
}

/// Pauses between revealed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub line: Duration,
    pub blank_line: Duration,
}

impl Pacing {
    /// No pauses at all.
    pub fn instant() -> Self {
        Self {
            line: Duration::ZERO,
            blank_line: Duration::ZERO,
        }
    }

    fn after(&self, line: &str) -> Duration {
        if line.trim().is_empty() {
            self.blank_line
        } else {
            self.line
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from(&RevealConfig::default())
    }
}

impl From<&RevealConfig> for Pacing {
    fn from(config: &RevealConfig) -> Self {
        Self {
            line: Duration::from_millis(config.line_delay_ms),
            blank_line: Duration::from_millis(config.blank_line_delay_ms),
        }
    }
}

/// Drives progressive reveals against a shared [`JobTracker`].
#[derive(Debug, Clone)]
pub struct Revealer {
    tracker: Arc<JobTracker>,
    pacing: Pacing,
}

impl Revealer {
    pub fn new(tracker: Arc<JobTracker>, pacing: Pacing) -> Self {
        Self { tracker, pacing }
    }

    pub fn tracker(&self) -> &Arc<JobTracker> {
        &self.tracker
    }

    /// Reveal `markdown` on `surface` one line at a time.
    ///
    /// Returns `true` when the run finished and painted the full document,
    /// `false` when `job` was superseded. A superseded run never paints
    /// again after noticing it is stale.
    pub async fn reveal(&self, markdown: &str, job: JobId, surface: &dyn Surface) -> bool {
        if !self.tracker.is_current(job) {
            tracing::debug!(%job, "job superseded before reveal started");
            return false;
        }

        let mut prefix = String::with_capacity(markdown.len());
        for (index, line) in markdown.split('\n').enumerate() {
            if index > 0 {
                prefix.push('\n');
            }
            prefix.push_str(line);
            surface.paint(build_html(&prefix));

            tokio::time::sleep(self.pacing.after(line)).await;
            if !self.tracker.is_current(job) {
                tracing::debug!(%job, lines = index + 1, "job superseded mid-reveal");
                return false;
            }
        }

        surface.paint(build_html(markdown));
        tracing::debug!(%job, "reveal complete");
        true
    }
}
