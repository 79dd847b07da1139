//! Web page fetching and text extraction.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::error::{CurateError, Result};

/// Longest text returned by [`clean_html`], in characters.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Marker appended to truncated text.
pub const TRUNCATION_MARKER: &str = "...";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// Blocks whose text is never content. The regex crate has no backreferences,
// hence one pattern per element.
static NON_CONTENT_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap(),
        Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap(),
        Regex::new(r"(?is)<noscript\b[^>]*>.*?</noscript\s*>").unwrap(),
        Regex::new(r"(?s)<!--.*?-->").unwrap(),
    ]
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

const ENTITIES: [(&str, &str); 8] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&#x27;", "'"),
    // Last so "&amp;lt;" decodes to "&lt;" rather than "<".
    ("&amp;", "&"),
];

/// Anything that can fetch a page and return its readable text.
pub trait PageFetcher: Send + Sync {
    fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP scraper.
pub struct HttpScraper {
    client: Client,
}

impl HttpScraper {
    /// Create a scraper with a 10 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CurateError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpScraper {
    fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .map_err(|e| CurateError::Scrape(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(CurateError::Scrape(format!(
                "{}: HTTP {}",
                url,
                response.status().as_u16()
            )));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_text_content(content_type) {
                return Err(CurateError::Scrape(format!(
                    "{}: not a text document ({})",
                    url, content_type
                )));
            }
        }

        let body = response
            .text()
            .map_err(|e| CurateError::Scrape(format!("{}: {}", url, e)))?;

        Ok(clean_html(&body))
    }
}

/// Whether a Content-Type header denotes readable text.
pub fn is_text_content(content_type: &str) -> bool {
    let ct = content_type.to_lowercase();
    ct.starts_with("text/") || ct.contains("html") || ct.contains("xml") || ct.contains("json")
}

/// Strip markup from an HTML document and cap its length.
pub fn clean_html(html: &str) -> String {
    let mut text = html.to_string();
    for pattern in NON_CONTENT_BLOCKS.iter() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    let mut text = TAG.replace_all(&text, " ").into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_text(&collapsed, MAX_TEXT_CHARS)
}

/// Keep the first `max_chars` characters, appending the truncation marker
/// when anything was cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
