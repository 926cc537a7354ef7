//! HTML parsing into owned `Document` values
//!
//! This module converts a raw response body into the queryable `Document`
//! the cache stores:
//! - Page title from the <title> tag
//! - Whitespace-normalized visible text
//! - Absolute links from <a href> tags
//!
//! Parse failures are reported as `FetchError::Parse` so the fetcher treats
//! them exactly like transport failures.

use crate::document::Document;
use crate::FetchError;
use scraper::{Html, Selector};
use url::Url;

/// Converts a raw body into a `Document`
///
/// Implementations must be cheap to call repeatedly; the fetcher invokes
/// the parser once per attempt, inside the limiter's slot.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, url: &str, body: &str) -> Result<Document, FetchError>;
}

/// Default parser backed by the `scraper` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl DocumentParser for HtmlParser {
    fn parse(&self, url: &str, body: &str) -> Result<Document, FetchError> {
        let html = Html::parse_document(body);

        let title = extract_title(&html);
        let text = extract_text(&html);
        let links = extract_links(url, &html)?;

        Ok(Document {
            url: url.to_string(),
            title,
            text,
            links,
        })
    }
}

/// Extracts the page title from the parsed document
fn extract_title(html: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    html.select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Collects the visible text of the page, collapsing whitespace runs
fn extract_text(html: &Html) -> String {
    let words: Vec<&str> = html
        .root_element()
        .text()
        .flat_map(|chunk| chunk.split_whitespace())
        .collect();
    words.join(" ")
}

/// Extracts absolute links from <a href> tags
///
/// Links with non-web schemes (javascript:, mailto:, tel:, data:) and
/// fragment-only anchors are skipped. Relative hrefs are resolved against
/// the page URL.
fn extract_links(url: &str, html: &Html) -> Result<Vec<String>, FetchError> {
    let base_url = Url::parse(url).map_err(|error| FetchError::Parse {
        url: url.to_string(),
        message: format!("invalid base URL: {}", error),
    })?;

    let selector = Selector::parse("a[href]").map_err(|error| FetchError::Parse {
        url: url.to_string(),
        message: format!("selector error: {:?}", error),
    })?;

    let mut links = Vec::new();
    for element in html.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute) = resolve_link(href, &base_url) {
                links.push(absolute);
            }
        }
    }

    Ok(links)
}

/// Resolves a link href to an absolute URL, filtering non-web targets
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://example.com/page";

    fn parse(body: &str) -> Document {
        HtmlParser.parse(PAGE_URL, body).unwrap()
    }

    #[test]
    fn test_extract_title() {
        let doc = parse(r#"<html><head><title>Test Page</title></head><body></body></html>"#);
        assert_eq!(doc.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_title_trimmed() {
        let doc = parse(r#"<html><head><title>  Test Page  </title></head><body></body></html>"#);
        assert_eq!(doc.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let doc = parse(r#"<html><head></head><body></body></html>"#);
        assert_eq!(doc.title, None);
    }

    #[test]
    fn test_extract_text() {
        let doc = parse("<p>ok</p>");
        assert_eq!(doc.text, "ok");
    }

    #[test]
    fn test_text_whitespace_collapsed() {
        let doc = parse("<body><p>first\n   second</p> <p>third</p></body>");
        assert_eq!(doc.text, "first second third");
    }

    #[test]
    fn test_extract_absolute_link() {
        let doc = parse(r#"<body><a href="https://other.com/page">Link</a></body>"#);
        assert_eq!(doc.links, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_relative_link() {
        let doc = parse(r#"<body><a href="/other">Link</a></body>"#);
        assert_eq!(doc.links, vec!["https://example.com/other"]);
    }

    #[test]
    fn test_skip_special_schemes() {
        let doc = parse(
            r#"<body>
                <a href="javascript:void(0)">js</a>
                <a href="mailto:test@example.com">mail</a>
                <a href="tel:+1234567890">tel</a>
                <a href="data:text/html,x">data</a>
            </body>"#,
        );
        assert!(doc.links.is_empty());
    }

    #[test]
    fn test_skip_fragment_only_link() {
        let doc = parse(r##"<body><a href="#section">Jump</a></body>"##);
        assert!(doc.links.is_empty());
    }

    #[test]
    fn test_document_records_source_url() {
        let doc = parse("<p>ok</p>");
        assert_eq!(doc.url, PAGE_URL);
    }

    #[test]
    fn test_invalid_base_url_is_parse_error() {
        let result = HtmlParser.parse("not a url", "<p>ok</p>");
        assert!(matches!(result, Err(FetchError::Parse { .. })));
    }
}
