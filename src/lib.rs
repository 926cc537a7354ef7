//! Page-Broker: a polite fetch-and-cache layer for web scrapers
//!
//! This crate implements a single-process request broker that fetches remote
//! documents over HTTP, throttles outgoing request rate, caches parsed
//! results, and retries transient failures.

pub mod broker;
pub mod cache;
pub mod config;
pub mod document;
pub mod limiter;
pub mod report;

use thiserror::Error;

/// Main error type for Page-Broker operations
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gave up on {url} after {attempts} failed attempts")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single failed fetch attempt
///
/// Every variant is caught at the fetcher boundary, reported through the
/// diagnostics sink, and converted into a retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("parse error for {url}: {message}")]
    Parse { url: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Page-Broker operations
pub type Result<T> = std::result::Result<T, BrokerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use broker::{
    Attempt, ConsoleDiagnostics, DiagnosticsSink, DocumentParser, Fetcher, HtmlParser,
    HttpTransport, MemoryDiagnostics, Transport,
};
pub use cache::DocumentCache;
pub use config::Config;
pub use document::Document;
pub use limiter::Limiter;
