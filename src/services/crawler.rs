// src/services/crawler.rs

//! Submission crawler service.
//!
//! Walks a user's accepted-submission status pages, applying the date
//! filter and following pagination until the filter or the site says stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::{Config, DateFilter, Submission};
use crate::services::fetcher::PageFetcher;
use crate::services::parser::{StatusPage, StatusParser};
use crate::utils::log;

/// Summary of one user's crawl.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Collected submissions in page order (newest first)
    pub submissions: Vec<Submission>,

    /// Number of status pages fetched
    pub pages_fetched: usize,

    /// Whether the crawl stopped before pagination ran out
    pub stopped_early: bool,
}

/// Service for crawling a user's accepted submissions.
pub struct SubmissionCrawler {
    config: Arc<Config>,
    fetcher: PageFetcher,
    parser: StatusParser,
    shutdown: Arc<AtomicBool>,
}

impl SubmissionCrawler {
    /// Create a new crawler with the given configuration and shutdown flag.
    pub fn new(config: Arc<Config>, shutdown: Arc<AtomicBool>) -> Result<Self> {
        let fetcher = PageFetcher::new(&config.crawler, &config.proxy)?;
        let parser = StatusParser::new()?;
        Ok(Self {
            config,
            fetcher,
            parser,
            shutdown,
        })
    }

    /// URL of the first accepted-submissions status page for a user.
    ///
    /// `result_id=4` restricts the listing to accepted verdicts.
    fn first_page_url(&self, user_id: &str) -> String {
        format!(
            "{}/status?user_id={}&result_id=4",
            self.config.crawler.base_url.trim_end_matches('/'),
            user_id
        )
    }

    /// Crawl all matching submissions for a user.
    ///
    /// Never fails: fetch or parse errors end the crawl and whatever was
    /// accumulated so far is returned. The shutdown flag is checked at
    /// each page boundary.
    pub async fn crawl(&self, user_id: &str, filter: &DateFilter) -> CrawlOutcome {
        let page_delay = Duration::from_secs(self.config.crawler.page_delay_secs);
        let mut outcome = CrawlOutcome::default();
        let mut next_url = Some(self.first_page_url(user_id));

        while let Some(url) = next_url.take() {
            if self.shutdown.load(Ordering::Relaxed) {
                log::warn(&format!(
                    "Shutdown requested, stopping crawl for {user_id}"
                ));
                outcome.stopped_early = true;
                break;
            }

            let page = match self.fetch_page(&url).await {
                Ok(page) => page,
                Err(error) => {
                    log::error(&format!(
                        "Crawl for {} ended at page {}: {}",
                        user_id,
                        outcome.pages_fetched + 1,
                        error
                    ));
                    break;
                }
            };
            outcome.pages_fetched += 1;

            let before = outcome.submissions.len();
            for submission in page.submissions {
                if filter.is_before_range(&submission.submission_time) {
                    // Pages are newest first, so nothing below or beyond
                    // this row can match the filter.
                    outcome.stopped_early = true;
                    break;
                }
                if filter.includes(&submission.submission_time) {
                    outcome.submissions.push(submission);
                }
            }
            log::debug(&format!(
                "Page {} for {}: kept {} submissions",
                outcome.pages_fetched,
                user_id,
                outcome.submissions.len() - before
            ));

            if outcome.stopped_early {
                break;
            }

            next_url = page.next_page;
            if next_url.is_some() && !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }
        }

        outcome
    }

    async fn fetch_page(&self, url: &str) -> Result<StatusPage> {
        let base = Url::parse(url)?;
        let document = self.fetcher.fetch(url).await?;
        self.parser.parse(&document, &base)
    }
}
