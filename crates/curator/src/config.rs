//! Run configuration: credentials, model names and client limits.
//!
//! Settings are read once at start-up (usually from the environment after the
//! CLI has loaded a `.env` file) and then passed explicitly into every client
//! constructor.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CurateError, Result};

/// Environment variable holding the OpenAI key (strategy stage).
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the Serper key (web search).
pub const SERPER_API_KEY: &str = "SERPER_API_KEY";
/// Environment variable holding the Google key (Gemini analysis).
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Output format for the written report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
}

impl OutputFormat {
    /// File extension used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Html => "html",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown format: {}. Use markdown or html.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// API keys required before any network call is made.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub serper_api_key: String,
    pub google_api_key: String,
}

/// Configuration for a curation run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub google_api_key: Option<String>,

    /// Model used for the topic strategy stage.
    pub openai_model: String,
    /// Model used by the analysis client.
    pub gemini_model: String,
    /// Sampling temperature for both models.
    pub temperature: f64,

    /// `num` sent to the search provider (only the first 5 hits are kept).
    pub max_search_results: usize,
    /// `gl`/`hl` sent to the search provider.
    pub search_language: String,

    pub output_format: OutputFormat,
    pub output_dir: PathBuf,

    pub search_timeout: Duration,
    pub scrape_timeout: Duration,
    pub llm_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            serper_api_key: None,
            google_api_key: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            max_search_results: 10,
            search_language: "es".to_string(),
            output_format: OutputFormat::Markdown,
            output_dir: PathBuf::from("output"),
            search_timeout: Duration::from_secs(10),
            scrape_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(60),
        }
    }
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let output_format = match get("OUTPUT_FORMAT") {
            Some(raw) => raw.parse().map_err(CurateError::Config)?,
            None => defaults.output_format,
        };

        Ok(Self {
            openai_api_key: get(OPENAI_API_KEY),
            serper_api_key: get(SERPER_API_KEY),
            google_api_key: get(GOOGLE_API_KEY),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            temperature: parse_or("TEMPERATURE", get("TEMPERATURE"), defaults.temperature)?,
            max_search_results: parse_or(
                "MAX_SEARCH_RESULTS",
                get("MAX_SEARCH_RESULTS"),
                defaults.max_search_results,
            )?,
            search_language: get("SEARCH_LANGUAGE").unwrap_or(defaults.search_language),
            output_format,
            output_dir: get("OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            search_timeout: secs_or("SEARCH_TIMEOUT_SECS", get("SEARCH_TIMEOUT_SECS"), defaults.search_timeout)?,
            scrape_timeout: secs_or("SCRAPE_TIMEOUT_SECS", get("SCRAPE_TIMEOUT_SECS"), defaults.scrape_timeout)?,
            llm_timeout: secs_or("LLM_TIMEOUT_SECS", get("LLM_TIMEOUT_SECS"), defaults.llm_timeout)?,
        })
    }

    /// Validate that every required API key is present.
    ///
    /// All missing keys are reported together.
    pub fn credentials(&self) -> Result<Credentials> {
        let mut missing = Vec::new();
        if self.openai_api_key.is_none() {
            missing.push(OPENAI_API_KEY);
        }
        if self.serper_api_key.is_none() {
            missing.push(SERPER_API_KEY);
        }
        if self.google_api_key.is_none() {
            missing.push(GOOGLE_API_KEY);
        }

        match (&self.openai_api_key, &self.serper_api_key, &self.google_api_key) {
            (Some(openai), Some(serper), Some(google)) => Ok(Credentials {
                openai_api_key: openai.clone(),
                serper_api_key: serper.clone(),
                google_api_key: google.clone(),
            }),
            _ => Err(CurateError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ))),
        }
    }

    /// Fetch a single key, for commands that only need one provider.
    pub fn require(&self, key: &str) -> Result<String> {
        let value = match key {
            OPENAI_API_KEY => self.openai_api_key.as_ref(),
            SERPER_API_KEY => self.serper_api_key.as_ref(),
            GOOGLE_API_KEY => self.google_api_key.as_ref(),
            _ => None,
        };
        value
            .cloned()
            .ok_or_else(|| CurateError::Config(format!("Missing required environment variables: {}", key)))
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| CurateError::Config(format!("Invalid value for {}: '{}'", key, value))),
        None => Ok(default),
    }
}

fn secs_or(key: &str, raw: Option<String>, default: Duration) -> Result<Duration> {
    parse_or(key, raw, default.as_secs()).map(Duration::from_secs)
}
