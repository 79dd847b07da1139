//! LLM provider trait and types.

use crate::error::Result;

/// Configuration for LLM providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "gpt-3.5-turbo", "gemini-1.5-flash").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

impl LlmConfig {
    /// Config for a specific model with default limits.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Trait for text-generation providers.
///
/// Implementations must be thread-safe (Send + Sync) so a provider can be
/// shared between the pipeline and the tool layer.
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for `prompt`, optionally framed by a system prompt.
    ///
    /// Provider failures are reported as `CurateError::Analysis` carrying the
    /// raw provider message.
    fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}
