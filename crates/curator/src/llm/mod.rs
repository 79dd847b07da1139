//! LLM provider integration for topic strategy and content analysis.
//!
//! Two roles use a provider during a run:
//! - the **strategist** drafts the bilingual search strategy (OpenAI by default)
//! - the **analyst** scores each discovered resource (Gemini by default)
//!
//! # Supported Providers
//!
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Gemini** - Google models via API (requires `GOOGLE_API_KEY`)
//! - **Mock** - canned responses for tests and offline runs
//!
//! # Example
//!
//! ```no_run
//! use curator::llm::{GeminiProvider, LlmConfig, LlmProvider};
//!
//! let gemini = GeminiProvider::with_config("key", LlmConfig::for_model("gemini-1.5-flash")).unwrap();
//! let text = gemini.complete(None, "List three Rust learning sites").unwrap();
//! println!("{}", text);
//! ```

mod gemini;
mod mock;
mod openai;
pub mod prompts;
mod provider;

use serde::Deserialize;

use crate::error::{CurateError, Result};

pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use openai::OpenAIProvider;
pub use provider::{LlmConfig, LlmProvider};

/// Parse JSON from an LLM response, handling markdown code blocks.
pub fn parse_json_response<T: for<'de> Deserialize<'de>>(response: &str) -> Result<T> {
    let json_str = if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        let trimmed = response.trim();
        // Models sometimes wrap the object in prose.
        match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(start), Some(end)) if start < end => &trimmed[start..=end],
            _ => trimmed,
        }
    };

    serde_json::from_str(json_str).map_err(|e| {
        CurateError::Analysis(format!("Failed to parse LLM JSON response: {}", e))
    })
}
