//! The request broker: fetch orchestration and its collaborator seams
//!
//! This module contains the core fetch path, including:
//! - The `Fetcher` that ties cache, limiter, transport, and parser together
//! - The HTTP transport over reqwest
//! - HTML parsing into owned `Document` values
//! - Per-attempt diagnostics reporting

mod diagnostics;
mod fetcher;
mod parser;
mod transport;

pub use diagnostics::{Attempt, ConsoleDiagnostics, DiagnosticsSink, MemoryDiagnostics};
pub use fetcher::Fetcher;
pub use parser::{DocumentParser, HtmlParser};
pub use transport::{build_http_client, HttpTransport, Transport};
