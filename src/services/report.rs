// src/services/report.rs

//! Monthly report aggregation.
//!
//! Collects per-user monthly solve counts during a batch run and folds
//! them into a [`MonthlyReport`] at the end.

use std::collections::{BTreeMap, HashMap};

use chrono::Local;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::{MonthSummary, MonthlyReport, Submission};
use crate::utils::log;

/// Accumulator for batch-run monthly statistics.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    /// Month key ("YYYY-MM") to per-user solved counts
    months: BTreeMap<String, HashMap<String, u64>>,
}

impl ReportBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user's submissions, bucketed by month.
    ///
    /// Calling again for the same user replaces that user's count in every
    /// month the new records cover. Submissions with malformed timestamps
    /// are logged and ignored.
    pub fn accumulate(&mut self, username: &str, submissions: &[Submission]) {
        let mut per_month: HashMap<String, u64> = HashMap::new();
        for submission in submissions {
            match submission.month_key() {
                Some(month) => *per_month.entry(month).or_insert(0) += 1,
                None => log::warn(&format!(
                    "Ignoring submission {} with malformed timestamp '{}'",
                    submission.submission_id, submission.submission_time
                )),
            }
        }
        for (month, count) in per_month {
            self.months
                .entry(month)
                .or_default()
                .insert(username.to_string(), count);
        }
    }

    /// Build the final report for the given batch user list.
    ///
    /// Months appear newest first. Every username appears in every month,
    /// sorted by solved count descending; users with equal counts keep
    /// their order from `usernames`.
    pub fn finalize(&self, usernames: &[String]) -> Result<MonthlyReport> {
        let mut monthly_stats = Map::new();

        for (month, counts) in self.months.iter().rev() {
            let mut users: Vec<(&str, u64)> = usernames
                .iter()
                .map(|name| (name.as_str(), counts.get(name).copied().unwrap_or(0)))
                .collect();
            users.sort_by(|a, b| b.1.cmp(&a.1));

            let total_solved: u64 = users.iter().map(|(_, count)| count).sum();
            let mut users_map = Map::new();
            for (name, count) in users {
                users_map.insert(name.to_string(), Value::from(count));
            }

            let summary = MonthSummary {
                total_solved,
                users: users_map,
            };
            monthly_stats.insert(month.clone(), serde_json::to_value(summary)?);
        }

        Ok(MonthlyReport {
            total_users: usernames.len(),
            total_months: monthly_stats.len(),
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            monthly_stats,
        })
    }
}
