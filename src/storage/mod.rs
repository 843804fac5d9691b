//! Storage abstractions for crawl results.
//!
//! ## Directory Structure
//!
//! ```text
//! {output_dir}/
//! └── {username}/
//!     └── solved_problems.json   # Per-user collected submissions
//! {report_dir}/
//! └── monthly_solved_problems.json   # Batch monthly report
//! ```

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{MonthlyReport, Submission};

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for submission storage backends.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a user's collected submissions, returning the written path.
    async fn save_submissions(
        &self,
        username: &str,
        submissions: &[Submission],
    ) -> Result<PathBuf>;

    /// Persist the batch monthly report, returning the written path.
    async fn save_report(&self, report: &MonthlyReport) -> Result<PathBuf>;
}
