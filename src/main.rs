// src/main.rs

//! boj-harvest: accepted-submission harvester CLI
//!
//! Crawls accepted submissions for one user or a batch of users from the
//! judge's status pages and saves them as JSON.

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use boj_harvest::error::Result;
use boj_harvest::models::{Config, DateFilter};
use boj_harvest::pipeline::{run_batch, run_crawl};
use boj_harvest::storage::LocalStorage;
use boj_harvest::utils::log;

#[derive(Parser, Debug)]
#[command(
    name = "boj-harvest",
    version,
    about = "Accepted-submission harvester for Baekjoon Online Judge"
)]

/// CLI Arguments
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Proxy for plain HTTP requests
    #[arg(long, global = true, value_name = "URL")]
    proxy_http: Option<String>,

    /// Proxy for HTTPS requests
    #[arg(long, global = true, value_name = "URL")]
    proxy_https: Option<String>,

    /// Proxy for both HTTP and HTTPS requests
    #[arg(
        long,
        global = true,
        value_name = "URL",
        conflicts_with_all = ["proxy_http", "proxy_https"]
    )]
    proxy_all: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl one user's accepted submissions
    Crawl {
        /// Judge username to crawl
        #[arg(short, long)]
        username: String,
        /// Only collect submissions from this month (YYYYMM)
        #[arg(short, long)]
        month: Option<String>,
        /// Collect submissions on or after this date (YYMMDD)
        #[arg(short, long)]
        start_date: Option<String>,
        /// Collect submissions on or before this date (YYMMDD)
        #[arg(short, long)]
        end_date: Option<String>,
    },
    /// Crawl every user in a file and build a monthly report
    Batch {
        /// Username list file, one name per line
        #[arg(short, long)]
        file: String,
        /// Only collect submissions from this month (YYYYMM)
        #[arg(short, long)]
        month: Option<String>,
        /// Collect submissions on or after this date (YYMMDD)
        #[arg(short, long)]
        start_date: Option<String>,
        /// Collect submissions on or before this date (YYMMDD)
        #[arg(short, long)]
        end_date: Option<String>,
        /// Skip writing the monthly report
        #[arg(long)]
        no_report: bool,
    },
}

/// Main entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    if cli.quiet {
        config.logging.level = "warn".to_string();
    }
    log::init(&config.logging.level);

    if let Err(error) = run(cli, config).await {
        log::error(&error.to_string());
        process::exit(1);
    }
}

async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(all) = &cli.proxy_all {
        config.proxy.http = Some(all.clone());
        config.proxy.https = Some(all.clone());
    }
    if let Some(http) = &cli.proxy_http {
        config.proxy.http = Some(http.clone());
    }
    if let Some(https) = &cli.proxy_https {
        config.proxy.https = Some(https.clone());
    }
    if config.proxy.is_configured() {
        log::info("Using proxy servers for outbound requests");
    }
    config.validate()?;

    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_shutdown_listener(Arc::clone(&shutdown));

    let storage = LocalStorage::new(&config.paths);
    let config = Arc::new(config);

    match cli.command {
        Command::Crawl {
            username,
            month,
            start_date,
            end_date,
        } => {
            let filter = DateFilter::from_args(
                month.as_deref(),
                start_date.as_deref(),
                end_date.as_deref(),
            )?;
            run_crawl(config, &storage, &username, &filter, shutdown).await
        }
        Command::Batch {
            file,
            month,
            start_date,
            end_date,
            no_report,
        } => {
            let filter = DateFilter::from_args(
                month.as_deref(),
                start_date.as_deref(),
                end_date.as_deref(),
            )?;
            run_batch(config, &storage, &file, &filter, !no_report, shutdown).await
        }
    }
}

/// Flip the shutdown flag on Ctrl-C so crawls stop at a page boundary.
fn spawn_shutdown_listener(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn("Ctrl-C received, finishing the current page before stopping");
            shutdown.store(true, Ordering::Relaxed);
        }
    });
}
