//! Accepted-submission data structure.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used on the judge's status pages.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single accepted submission scraped from a status page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    /// Submission unique identifier
    pub submission_id: String,

    /// Problem number
    pub problem_id: String,

    /// Problem title (from the link's title attribute)
    pub problem_title: String,

    /// Language the solution was written in
    pub language: String,

    /// Submission time, "YYYY-MM-DD HH:MM:SS"
    pub submission_time: String,
}

impl Submission {
    /// Parse the submission time into a datetime.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.submission_time, TIMESTAMP_FORMAT).ok()
    }

    /// Month truncation of the submission time, "YYYY-MM".
    pub fn month_key(&self) -> Option<String> {
        self.timestamp().map(|dt| dt.format("%Y-%m").to_string())
    }
}
