// src/services/fetcher.rs

//! HTTP page fetching with block-aware retries.
//!
//! The judge site answers scripted traffic with 403 or 429 when it is
//! unhappy; those statuses are retried with a delay before giving up.

use std::time::Duration;

use reqwest::{Client, Proxy, StatusCode};
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, ProxyConfig};
use crate::utils::log;

/// HTTP fetcher shared by every page request of a run.
pub struct PageFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl PageFetcher {
    /// Build a fetcher from crawler and proxy settings.
    pub fn new(crawler: &CrawlerConfig, proxy: &ProxyConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&crawler.user_agent)
            .timeout(Duration::from_secs(crawler.timeout_secs));

        if let Some(http) = &proxy.http {
            builder = builder.proxy(Proxy::http(http)?);
        }
        if let Some(https) = &proxy.https {
            builder = builder.proxy(Proxy::https(https)?);
        }

        Ok(Self {
            client: builder.build()?,
            max_retries: crawler.max_retries,
            retry_delay: Duration::from_secs(crawler.retry_delay_secs),
        })
    }

    /// Fetch a URL and parse the response body as HTML.
    ///
    /// Block statuses (403, 429) are retried up to the configured budget,
    /// then surface as [`AppError::Blocked`]. Any other error status or
    /// transport failure fails immediately.
    pub async fn fetch(&self, url: &str) -> Result<Html> {
        let max_attempts = self.max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if !is_block_status(status) {
                let text = response.error_for_status()?.text().await?;
                return Ok(Html::parse_document(&text));
            }

            if attempt >= max_attempts {
                return Err(AppError::Blocked {
                    url: url.to_string(),
                    attempts: attempt,
                });
            }

            log::warn(&format!(
                "Request blocked with {} for {} (attempt {}/{}), retrying in {}s",
                status.as_u16(),
                url,
                attempt,
                max_attempts,
                self.retry_delay.as_secs()
            ));
            if !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }
}

/// Statuses the site uses to push back on crawlers.
fn is_block_status(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_status_classification() {
        assert!(is_block_status(StatusCode::FORBIDDEN));
        assert!(is_block_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_block_status(StatusCode::OK));
        assert!(!is_block_status(StatusCode::NOT_FOUND));
        assert!(!is_block_status(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_fetcher_builds_with_proxies() {
        let crawler = CrawlerConfig::default();
        let proxy = ProxyConfig {
            http: Some("http://127.0.0.1:8080".to_string()),
            https: Some("http://127.0.0.1:8080".to_string()),
        };
        assert!(PageFetcher::new(&crawler, &proxy).is_ok());
    }

    #[test]
    fn test_fetcher_rejects_malformed_proxy() {
        let crawler = CrawlerConfig::default();
        let proxy = ProxyConfig {
            http: Some("not a url".to_string()),
            https: None,
        };
        assert!(PageFetcher::new(&crawler, &proxy).is_err());
    }
}
