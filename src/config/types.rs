use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Page-Broker
///
/// Every section is optional; defaults reproduce the original tool's
/// behavior (500-entry cache, one request at a time, 200ms spacing) except
/// for the retry budget, which defaults to bounded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub limiter: LimiterConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Document cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of documents kept in memory
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// Request limiter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LimiterConfig {
    /// Maximum number of requests in flight at once
    #[serde(rename = "max-concurrent", default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Minimum time between successive request starts (milliseconds)
    #[serde(rename = "min-time-ms", default = "default_min_time_ms")]
    pub min_time_ms: u64,
}

impl LimiterConfig {
    /// The minimum start spacing as a `Duration`
    pub fn min_time(&self) -> Duration {
        Duration::from_millis(self.min_time_ms)
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum fetch attempts per URL before giving up
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Retry forever, ignoring `max-attempts`
    ///
    /// This replicates the original scraping tool, which assumed eventual
    /// availability of remote resources and never gave up on a URL.
    #[serde(default)]
    pub unlimited: bool,
}

impl RetryConfig {
    /// The effective attempt budget; `None` means retry forever
    pub fn attempt_limit(&self) -> Option<u32> {
        if self.unlimited {
            None
        } else {
            Some(self.max_attempts)
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Overall request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_capacity() -> usize {
    500
}

fn default_max_concurrent() -> usize {
    1
}

fn default_min_time_ms() -> u64 {
    200
}

fn default_max_attempts() -> u32 {
    8
}

fn default_user_agent() -> String {
    format!("page-broker/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            min_time_ms: default_min_time_ms(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            unlimited: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}
