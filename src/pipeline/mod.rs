//! Pipeline entry points for harvester operations.
//!
//! - `run_crawl`: Crawl one user's accepted submissions
//! - `run_batch`: Crawl a list of users and build a monthly report

pub mod batch;
pub mod crawl;

pub use batch::run_batch;
pub use crawl::run_crawl;
