//! Fetch orchestration: cache lookup, scheduled fetch, retry
//!
//! The fetcher is the only entry point callers use. Each `get`:
//! 1. Returns straight from the cache on a hit (no limiter, no network)
//! 2. Otherwise schedules fetch-and-parse through the limiter
//! 3. On success records a success marker, fills the cache, and returns
//! 4. On failure records a failure marker and retries from step 1
//!
//! Retries consume a fresh limiter slot, so a persistently failing URL is
//! re-attempted at the limiter's pace rather than in a tight loop. The
//! attempt budget is configurable; unlimited mode retries forever.

use crate::broker::{
    ConsoleDiagnostics, DiagnosticsSink, DocumentParser, HtmlParser, HttpTransport, Transport,
};
use crate::cache::DocumentCache;
use crate::config::Config;
use crate::document::Document;
use crate::limiter::Limiter;
use crate::{BrokerError, FetchError};
use std::sync::Arc;

/// Orchestrates cache, limiter, transport, and parser for document fetches
///
/// All collaborators are injected, so tests run with stub transports and
/// fresh caches; `Fetcher::from_config` wires the production set. The
/// fetcher is cheap to share: wrap it in an `Arc` and call `get` from as
/// many tasks as needed, and the limiter serializes the actual requests.
pub struct Fetcher {
    cache: Arc<DocumentCache>,
    limiter: Arc<Limiter>,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn DocumentParser>,
    diagnostics: Arc<dyn DiagnosticsSink>,

    /// Maximum fetch attempts per `get` call; `None` retries forever
    attempt_limit: Option<u32>,
}

impl Fetcher {
    /// Creates a fetcher from explicitly injected collaborators
    pub fn new(
        cache: Arc<DocumentCache>,
        limiter: Arc<Limiter>,
        transport: Arc<dyn Transport>,
        parser: Arc<dyn DocumentParser>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        attempt_limit: Option<u32>,
    ) -> Self {
        Self {
            cache,
            limiter,
            transport,
            parser,
            diagnostics,
            attempt_limit,
        }
    }

    /// Creates a fetcher with the production collaborators wired from
    /// configuration: reqwest transport, scraper parser, console markers
    pub fn from_config(config: &Config) -> Result<Self, BrokerError> {
        let transport = HttpTransport::new(&config.http)?;

        Ok(Self::new(
            Arc::new(DocumentCache::new(config.cache.capacity)),
            Arc::new(Limiter::new(
                config.limiter.max_concurrent,
                config.limiter.min_time(),
            )),
            Arc::new(transport),
            Arc::new(HtmlParser),
            Arc::new(ConsoleDiagnostics),
            config.retry.attempt_limit(),
        ))
    }

    /// Fetches a document, consulting the cache first
    ///
    /// Resolves with a shared handle to the parsed document. Failures are
    /// logged and retried; the only error this returns is
    /// `RetriesExhausted` once a bounded attempt budget runs out. In
    /// unlimited mode the call does not return until a fetch succeeds, so
    /// callers needing bounded patience must impose their own timeout.
    pub async fn get(&self, url: &str) -> Result<Arc<Document>, BrokerError> {
        let mut attempts: u32 = 0;

        loop {
            // Re-checked every attempt: another caller may have populated
            // the entry while this one waited for a limiter slot
            if let Some(document) = self.cache.get(url).await {
                tracing::trace!("cache hit for {}", url);
                return Ok(document);
            }

            let outcome = self.limiter.schedule(|| self.attempt(url)).await;

            match outcome {
                Ok(document) => {
                    self.diagnostics.record_success(url);
                    let document = Arc::new(document);
                    self.cache.insert(url, Arc::clone(&document)).await;
                    return Ok(document);
                }
                Err(error) => {
                    attempts += 1;
                    self.diagnostics.record_failure(url, &error);

                    if let Some(limit) = self.attempt_limit {
                        if attempts >= limit {
                            return Err(BrokerError::RetriesExhausted {
                                url: url.to_string(),
                                attempts,
                                source: error,
                            });
                        }
                    }
                    // Pacing between attempts comes from the limiter slot
                    // the retry consumes; no extra backoff
                }
            }
        }
    }

    /// One fetch-and-parse attempt, run inside a limiter slot
    async fn attempt(&self, url: &str) -> Result<Document, FetchError> {
        let body = self.transport.fetch(url).await?;
        self.parser.parse(url, &body)
    }

    /// The cache this fetcher populates
    pub fn cache(&self) -> &Arc<DocumentCache> {
        &self.cache
    }
}
