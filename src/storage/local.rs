//! Local filesystem storage implementation.
//!
//! Writes are atomic: JSON is written to a `.tmp` sibling first, then
//! renamed into place, so a crash never leaves a half-written file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{MonthlyReport, PathsConfig, Submission};
use crate::storage::SubmissionStore;

/// File name for a user's collected submissions.
const SUBMISSIONS_FILE: &str = "solved_problems.json";

/// File name for the batch monthly report.
const REPORT_FILE: &str = "monthly_solved_problems.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    output_dir: PathBuf,
    report_dir: PathBuf,
}

impl LocalStorage {
    /// Create a storage backend from configured paths.
    pub fn new(paths: &PathsConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&paths.output_dir),
            report_dir: PathBuf::from(&paths.report_dir),
        }
    }

    /// Write pretty JSON atomically (write to temp, then rename).
    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for LocalStorage {
    async fn save_submissions(
        &self,
        username: &str,
        submissions: &[Submission],
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(username).join(SUBMISSIONS_FILE);
        Self::write_json(&path, submissions).await?;
        Ok(path)
    }

    async fn save_report(&self, report: &MonthlyReport) -> Result<PathBuf> {
        let path = self.report_dir.join(REPORT_FILE);
        Self::write_json(&path, report).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value};
    use tempfile::TempDir;

    use super::*;

    fn storage_in(tmp: &TempDir) -> LocalStorage {
        LocalStorage::new(&PathsConfig {
            output_dir: tmp.path().join("out").display().to_string(),
            report_dir: tmp.path().join("reports").display().to_string(),
        })
    }

    fn sample_submissions() -> Vec<Submission> {
        vec![Submission {
            submission_id: "90000001".to_string(),
            problem_id: "1000".to_string(),
            problem_title: "A+B".to_string(),
            language: "Rust 2021".to_string(),
            submission_time: "2024-01-15 21:03:44".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_save_submissions_path_and_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = storage_in(&tmp);

        let path = storage
            .save_submissions("alice", &sample_submissions())
            .await
            .unwrap();
        assert_eq!(
            path,
            tmp.path().join("out").join("alice").join("solved_problems.json")
        );

        let bytes = tokio::fs::read(&path).await.unwrap();
        let loaded: Vec<Submission> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(loaded, sample_submissions());
    }

    #[tokio::test]
    async fn test_save_report_path_and_contents() {
        let tmp = TempDir::new().unwrap();
        let storage = storage_in(&tmp);

        let mut monthly_stats = Map::new();
        monthly_stats.insert("2024-01".to_string(), Value::Null);
        let report = MonthlyReport {
            monthly_stats,
            total_users: 1,
            total_months: 1,
            generated_at: "2024-02-01 00:00:00".to_string(),
        };

        let path = storage.save_report(&report).await.unwrap();
        assert_eq!(
            path,
            tmp.path().join("reports").join("monthly_solved_problems.json")
        );

        let bytes = tokio::fs::read(&path).await.unwrap();
        let loaded: MonthlyReport = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(loaded.total_users, 1);
        assert!(loaded.monthly_stats.contains_key("2024-01"));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let storage = storage_in(&tmp);

        let path = storage
            .save_submissions("bob", &sample_submissions())
            .await
            .unwrap();
        let leftover = path.with_extension("tmp");
        assert!(!leftover.exists());
    }
}
