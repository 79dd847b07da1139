//! API connectivity self-test.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GOOGLE_API_KEY, OPENAI_API_KEY, SERPER_API_KEY, Settings};
use crate::error::Result;
use crate::llm::{GeminiProvider, LlmConfig, LlmProvider, OpenAIProvider};
use crate::search::{SearchProvider, SerperClient};

/// Characters of an error message kept in a failed check.
const DETAIL_CHARS: usize = 50;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of probing one external API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCheck {
    pub name: String,
    pub ok: bool,
    /// Short error excerpt when the check failed.
    pub detail: Option<String>,
}

impl ApiCheck {
    fn from_outcome(name: &str, outcome: Result<()>) -> Self {
        match outcome {
            Ok(()) => Self {
                name: name.to_string(),
                ok: true,
                detail: None,
            },
            Err(e) => Self {
                name: name.to_string(),
                ok: false,
                detail: Some(e.to_string().chars().take(DETAIL_CHARS).collect()),
            },
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.ok { "Connected" } else { "Failed" }
    }
}

/// Probe OpenAI, Serper and Gemini with tiny requests.
///
/// A missing key fails that check without a network call.
pub fn check_apis(settings: &Settings) -> Vec<ApiCheck> {
    vec![
        ApiCheck::from_outcome("openai", probe_openai(settings)),
        ApiCheck::from_outcome("serper", probe_serper(settings)),
        ApiCheck::from_outcome("gemini", probe_gemini(settings)),
    ]
}

fn probe_openai(settings: &Settings) -> Result<()> {
    let key = settings.require(OPENAI_API_KEY)?;
    let provider = OpenAIProvider::with_timeout(
        key,
        LlmConfig::for_model(&settings.openai_model).with_max_tokens(5),
        settings.llm_timeout,
    )?;
    let reply = provider.complete(None, "test")?;
    debug!(reply = %reply, "openai probe");
    Ok(())
}

fn probe_serper(settings: &Settings) -> Result<()> {
    let key = settings.require(SERPER_API_KEY)?;
    let client = SerperClient::with_options(key, settings.search_language.clone(), 1, SEARCH_TIMEOUT)?;
    client.search("test")?;
    Ok(())
}

fn probe_gemini(settings: &Settings) -> Result<()> {
    let key = settings.require(GOOGLE_API_KEY)?;
    let provider = GeminiProvider::with_timeout(
        key,
        LlmConfig::for_model(&settings.gemini_model).with_max_tokens(5),
        settings.llm_timeout,
    )?;
    provider.complete(None, "test")?;
    Ok(())
}
