// src/pipeline/crawl.rs

//! Single-user crawl pipeline.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, DateFilter};
use crate::services::SubmissionCrawler;
use crate::storage::SubmissionStore;
use crate::utils::log;

/// Crawl one user's accepted submissions and persist them.
pub async fn run_crawl(
    config: Arc<Config>,
    storage: &dyn SubmissionStore,
    username: &str,
    filter: &DateFilter,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    log::header(&format!("Crawling accepted submissions for {username}"));
    log::info(&format!("Filter: {filter}"));

    let crawler = SubmissionCrawler::new(Arc::clone(&config), shutdown)?;
    let outcome = crawler.crawl(username, filter).await;

    log::summary(
        "Crawl finished",
        &[
            ("user", username.to_string()),
            ("pages fetched", outcome.pages_fetched.to_string()),
            ("submissions", outcome.submissions.len().to_string()),
            ("stopped early", outcome.stopped_early.to_string()),
        ],
    );

    if outcome.submissions.is_empty() {
        log::warn(&format!(
            "No matching submissions for {username}, nothing to save"
        ));
        return Ok(());
    }

    let path = storage
        .save_submissions(username, &outcome.submissions)
        .await?;
    log::success(&format!(
        "Saved {} submissions to {}",
        outcome.submissions.len(),
        path.display()
    ));

    Ok(())
}
