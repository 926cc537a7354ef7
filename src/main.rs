//! Page-Broker main entry point
//!
//! Command-line front end for the fetch-and-cache broker: fetches a list of
//! URLs through one shared fetcher and prints what it got.

use anyhow::Context;
use clap::Parser;
use page_broker::config::{load_config_with_hash, Config};
use page_broker::report::{purge_empty_fields, write_report};
use page_broker::{BrokerError, Document, Fetcher};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Page-Broker: a polite fetch-and-cache broker for web scrapers
///
/// Fetches the given URLs one at a time, pacing requests and retrying
/// transient failures. Repeated URLs are served from the in-memory cache.
#[derive(Parser, Debug)]
#[command(name = "page-broker")]
#[command(version = "1.0.0")]
#[command(about = "A polite fetch-and-cache broker", long_about = None)]
struct Cli {
    /// URLs to fetch
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write a JSON report of the fetched pages to this path
    #[arg(short, long, value_name = "REPORT")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Per-page entry in the JSON report
#[derive(Debug, Serialize)]
struct PageReport {
    url: String,
    title: Option<String>,
    text: String,
    #[serde(rename = "link-count")]
    link_count: usize,
}

impl From<&Document> for PageReport {
    fn from(document: &Document) -> Self {
        Self {
            url: document.url.clone(),
            title: document.title.clone(),
            text: document.text.clone(),
            link_count: document.links.len(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, falling back to defaults without a file
    let config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let fetcher = Arc::new(Fetcher::from_config(&config)?);

    tracing::info!(
        "Fetching {} URLs ({} at a time, {}ms spacing)",
        cli.urls.len(),
        config.limiter.max_concurrent,
        config.limiter.min_time_ms
    );

    // Fan out; the limiter inside the fetcher paces the actual requests
    let mut handles = Vec::new();
    for url in &cli.urls {
        let fetcher = Arc::clone(&fetcher);
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            let result = fetcher.get(&url).await;
            (url, result)
        }));
    }

    let mut documents = Vec::new();
    let mut failures = 0usize;
    for handle in handles {
        let (url, result) = handle.await?;
        match result {
            Ok(document) => {
                print_page_summary(&document);
                documents.push(document);
            }
            Err(BrokerError::RetriesExhausted { attempts, source, .. }) => {
                failures += 1;
                tracing::error!("{} failed after {} attempts: {}", url, attempts, source);
            }
            Err(error) => {
                failures += 1;
                tracing::error!("{} failed: {}", url, error);
            }
        }
    }

    // Marker line is done; give it its newline
    println!();
    println!("{} fetched, {} failed", documents.len(), failures);

    if let Some(path) = &cli.report {
        let pages: Vec<serde_json::Value> = documents
            .iter()
            .map(|document| {
                let mut value = serde_json::to_value(PageReport::from(document.as_ref()))?;
                purge_empty_fields(&mut value);
                Ok(value)
            })
            .collect::<Result<_, serde_json::Error>>()?;

        write_report(&pages, path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    if failures > 0 {
        anyhow::bail!("{} of {} URLs failed", failures, cli.urls.len());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_broker=info,warn"),
            1 => EnvFilter::new("page_broker=debug,info"),
            2 => EnvFilter::new("page_broker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints a one-line summary for a fetched page
fn print_page_summary(document: &Document) {
    let title = document.title.as_deref().unwrap_or("(no title)");
    println!(
        "\n{}: {} ({} chars, {} links)",
        document.url,
        title,
        document.text.len(),
        document.links.len()
    );
}
