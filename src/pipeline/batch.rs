// src/pipeline/batch.rs

//! Batch crawl pipeline over a username list.
//!
//! Users are crawled sequentially with a delay in between. One user
//! failing never stops the rest of the batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{Config, DateFilter};
use crate::services::{ReportBuilder, SubmissionCrawler};
use crate::storage::SubmissionStore;
use crate::utils::log;
use crate::utils::read_usernames;

/// Crawl every user in a username file and aggregate a monthly report.
pub async fn run_batch(
    config: Arc<Config>,
    storage: &dyn SubmissionStore,
    file: &str,
    filter: &DateFilter,
    generate_report: bool,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let usernames = read_usernames(file).await?;
    if usernames.is_empty() {
        return Err(AppError::config(format!(
            "Username file '{file}' contains no usernames"
        )));
    }

    log::header(&format!("Batch crawl for {} users", usernames.len()));
    log::info(&format!("Filter: {filter}"));

    let crawler = SubmissionCrawler::new(Arc::clone(&config), Arc::clone(&shutdown))?;
    let user_delay = Duration::from_secs(config.crawler.user_delay_secs);
    let mut builder = ReportBuilder::new();

    for (index, username) in usernames.iter().enumerate() {
        if shutdown.load(Ordering::Relaxed) {
            log::warn("Shutdown requested, stopping batch run");
            break;
        }

        log::step(index + 1, usernames.len(), &format!("Crawling {username}"));
        let outcome = crawler.crawl(username, filter).await;

        if outcome.submissions.is_empty() {
            log::sub_item(&format!("{username}: no matching submissions"));
        } else {
            builder.accumulate(username, &outcome.submissions);
            match storage
                .save_submissions(username, &outcome.submissions)
                .await
            {
                Ok(path) => log::sub_item(&format!(
                    "{username}: {} submissions saved to {}",
                    outcome.submissions.len(),
                    path.display()
                )),
                Err(error) => log::error(&format!(
                    "Failed to save submissions for {username}: {error}"
                )),
            }
        }

        if index + 1 < usernames.len() && !user_delay.is_zero() {
            tokio::time::sleep(user_delay).await;
        }
    }

    if generate_report {
        let report = builder.finalize(&usernames)?;
        match storage.save_report(&report).await {
            Ok(path) => log::success(&format!("Monthly report saved to {}", path.display())),
            Err(error) => log::error(&format!("Failed to save monthly report: {error}")),
        }
    }

    Ok(())
}
