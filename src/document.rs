//! The parsed-document value shared between the fetcher and its callers
//!
//! `Document` is owned data extracted from a fetched page rather than a live
//! DOM handle: the `scraper` document type is not `Send`, so parsing happens
//! inside the fetch task and only the extracted fields cross await points.

/// Parsed representation of a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The URL the page was fetched from
    pub url: String,

    /// The page title (from the <title> tag)
    pub title: Option<String>,

    /// Visible text content, whitespace-normalized
    pub text: String,

    /// All links found on the page (absolute URLs)
    pub links: Vec<String>,
}

impl Document {
    /// Creates a document with the given URL and text and nothing else
    ///
    /// Mostly useful for embedders with their own parsers and for tests.
    pub fn with_text(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            text: text.into(),
            links: Vec::new(),
        }
    }
}
