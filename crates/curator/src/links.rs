//! URL validation for curated reports.
//!
//! Detects placeholder URLs a model may have invented, malformed URLs and
//! links that no longer answer.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CurateError, Result};

/// Substrings that mark an invented URL.
pub const FAKE_INDICATORS: [&str; 6] = [
    "example.com",
    "example-url",
    "http://example",
    "placeholder",
    "fake-url",
    "sample-url",
];

static URL_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*URL:\*\*\s+(https?://\S+)").unwrap());
static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s)>\]]+").unwrap());

/// Whether the URL contains a placeholder marker.
pub fn is_fake_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    FAKE_INDICATORS.iter().any(|marker| lower.contains(marker))
}

/// Reserved documentation domains (RFC 2606).
const RESERVED_DOMAINS: [&str; 3] = ["example.com", "example.org", "example.net"];

/// Whether the URL's host is a reserved documentation domain.
///
/// Stricter than [`is_fake_url`]: only the host is inspected, so real pages
/// such as `codeexample.com` or a path ending in `/placeholder` pass.
pub fn is_placeholder_host(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.trim_end_matches('.').to_lowercase();
    host == "example"
        || host.ends_with(".example")
        || RESERVED_DOMAINS
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Whether the URL is absolute http(s) with a host.
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}

/// Extract URLs from report text, first occurrence order, no duplicates.
pub fn extract_urls(content: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    let labelled = URL_LINE
        .captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str()));
    let bare = BARE_URL.find_iter(content).map(|m| m.as_str());

    for candidate in labelled.chain(bare) {
        let url = candidate.trim_end_matches(['.', ',', ';', ':']).to_string();
        if !urls.contains(&url) {
            urls.push(url);
        }
    }
    urls
}

/// Outcome of checking one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Fake,
    InvalidFormat,
    Reachable,
    Unreachable,
}

/// One checked URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkCheck {
    pub url: String,
    pub status: LinkStatus,
}

/// Result of validating every URL in a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub checks: Vec<LinkCheck>,
}

impl ValidationReport {
    pub fn count(&self, status: LinkStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn urls_with(&self, status: LinkStatus) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| c.status == status)
            .map(|c| c.url.as_str())
            .collect()
    }

    /// Percentage of URLs that are reachable (0 when there are none).
    pub fn success_rate(&self) -> f64 {
        if self.checks.is_empty() {
            return 0.0;
        }
        self.count(LinkStatus::Reachable) as f64 / self.checks.len() as f64 * 100.0
    }
}

/// Anything that can tell whether a URL currently answers.
pub trait LinkChecker: Send + Sync {
    fn is_reachable(&self, url: &str) -> bool;
}

/// HEAD-request link checker; redirects are followed, status < 400 is success.
pub struct HttpLinkChecker {
    client: Client,
}

impl HttpLinkChecker {
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

impl LinkChecker for HttpLinkChecker {
    fn is_reachable(&self, url: &str) -> bool {
        self.client
            .head(url)
            .header(
                USER_AGENT,
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .send()
            .map(|r| r.status().as_u16() < 400)
            .unwrap_or(false)
    }
}

/// Classify one URL, calling the checker only for well-formed real URLs.
pub fn classify(url: &str, checker: &dyn LinkChecker) -> LinkStatus {
    if is_fake_url(url) {
        LinkStatus::Fake
    } else if !is_valid_url(url) {
        LinkStatus::InvalidFormat
    } else if checker.is_reachable(url) {
        LinkStatus::Reachable
    } else {
        LinkStatus::Unreachable
    }
}

/// Check every URL, pausing `pause` after each network check.
pub fn validate_urls(urls: &[String], checker: &dyn LinkChecker, pause: Duration) -> ValidationReport {
    let mut checks = Vec::with_capacity(urls.len());
    for url in urls {
        let status = classify(url, checker);
        let hit_network = matches!(status, LinkStatus::Reachable | LinkStatus::Unreachable);
        checks.push(LinkCheck {
            url: url.clone(),
            status,
        });
        if hit_network && !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    ValidationReport { checks }
}

/// Read a report file and validate its URLs.
pub fn validate_file(path: &Path, checker: &dyn LinkChecker, pause: Duration) -> Result<ValidationReport> {
    let content = fs::read_to_string(path).map_err(|e| CurateError::io(path, e))?;
    Ok(validate_urls(&extract_urls(&content), checker, pause))
}

/// Most recent `course_*.markdown` report in `dir`, by run-id timestamp.
pub fn find_latest_report(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            name.starts_with("course_") && name.ends_with(".markdown")
        })
        .max_by(|a, b| timestamp_key(a).cmp(&timestamp_key(b)))
}

/// The trailing `YYYYMMDD_HHMMSS` of a run id, or the whole stem.
fn timestamp_key(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let parts: Vec<&str> = stem.rsplitn(3, '_').collect();
    match parts.as_slice() {
        [time, date, _] => format!("{}_{}", date, time),
        _ => stem.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct AlwaysUp;
    impl LinkChecker for AlwaysUp {
        fn is_reachable(&self, _url: &str) -> bool {
            true
        }
    }

    struct Down(&'static str);
    impl LinkChecker for Down {
        fn is_reachable(&self, url: &str) -> bool {
            !url.contains(self.0)
        }
    }

    #[test]
    fn test_fake_and_valid() {
        assert!(is_fake_url("http://example.com/tutorial"));
        assert!(is_fake_url("https://site.dev/PLACEHOLDER"));
        assert!(!is_fake_url("https://realpython.com/primer-on-python-decorators/"));

        assert!(is_valid_url("https://realpython.com/x"));
        assert!(!is_valid_url("ftp://files.org/x"));
        assert!(!is_valid_url("realpython.com/x"));
    }

    #[test]
    fn test_placeholder_host_checks_host_only() {
        assert!(is_placeholder_host("http://example.com/tutorial"));
        assert!(is_placeholder_host("https://docs.EXAMPLE.org/guide"));
        assert!(is_placeholder_host("https://www.example.net/"));
        assert!(is_placeholder_host("https://course.example/intro"));

        assert!(!is_placeholder_host(
            "https://developer.mozilla.org/en-US/docs/Web/HTML/Attributes/placeholder"
        ));
        assert!(!is_placeholder_host("https://www.codeexample.com/html-forms"));
        assert!(!is_placeholder_host("https://myexample.com/"));
        assert!(!is_placeholder_host("https://example.com.evil.dev/"));
        assert!(!is_placeholder_host("not-a-url"));
    }

    #[test]
    fn test_extract_urls_dedup_and_trim() {
        let report = "**URL:** https://a.dev/one\nSee https://a.dev/one, and (https://b.org/two).\n";
        assert_eq!(extract_urls(report), vec!["https://a.dev/one", "https://b.org/two"]);
    }

    #[test]
    fn test_validate_urls_classifies() {
        let urls = vec![
            "https://a.dev/ok".to_string(),
            "https://example.com/x".to_string(),
            "not-a-url".to_string(),
            "https://gone.dev/x".to_string(),
        ];
        let report = validate_urls(&urls, &Down("gone.dev"), Duration::ZERO);
        assert_eq!(report.count(LinkStatus::Reachable), 1);
        assert_eq!(report.count(LinkStatus::Fake), 1);
        assert_eq!(report.count(LinkStatus::InvalidFormat), 1);
        assert_eq!(report.urls_with(LinkStatus::Unreachable), vec!["https://gone.dev/x"]);
        assert_eq!(report.success_rate(), 25.0);
    }

    #[test]
    fn test_empty_report_rate() {
        let report = validate_urls(&[], &AlwaysUp, Duration::ZERO);
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_find_latest_report() {
        let dir = TempDir::new().unwrap();
        for name in [
            "course_rust_20240101_235959.markdown",
            "course_rust_async_20240102_000001.markdown",
            "course_go_20231231_120000.markdown",
            "notes.markdown",
        ] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let latest = find_latest_report(dir.path()).unwrap();
        assert!(latest.ends_with("course_rust_async_20240102_000001.markdown"));
    }

    #[test]
    fn test_find_latest_report_missing_dir() {
        assert!(find_latest_report(Path::new("/definitely/not/here")).is_none());
    }
}
