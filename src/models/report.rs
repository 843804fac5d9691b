//! Batch report data structures.
//!
//! Report maps keep their insertion order when serialized (serde_json's
//! preserve_order feature), so builders insert keys already sorted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Monthly aggregate across all users of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// Month key ("YYYY-MM") to that month's summary, newest month first
    pub monthly_stats: Map<String, Value>,

    /// Number of users in the batch list
    pub total_users: usize,

    /// Number of distinct months with at least one submission
    pub total_months: usize,

    /// Report generation time, "YYYY-MM-DD HH:MM:SS"
    pub generated_at: String,
}

/// Per-month breakdown inside a [`MonthlyReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummary {
    /// Total submissions across all users for the month
    pub total_solved: u64,

    /// Username to solved count, highest first; every batch user appears
    pub users: Map<String, Value>,
}
