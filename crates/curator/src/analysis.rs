//! Analysis client: prompt plus optional context in, free text out.

use std::sync::Arc;

use tracing::debug;

use crate::error::{CurateError, Result};
use crate::llm::{LlmProvider, prompts};

/// Wraps a provider in the educational-analyst framing.
#[derive(Clone)]
pub struct AnalysisClient {
    provider: Arc<dyn LlmProvider>,
}

impl AnalysisClient {
    pub fn new(provider: impl LlmProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Share an existing provider.
    pub fn from_shared(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Run `prompt` with optional `context`.
    ///
    /// Provider failures keep the raw provider message and are never retried.
    pub fn analyze(&self, prompt: &str, context: Option<&str>) -> Result<String> {
        let full_prompt = prompts::analyst_prompt(prompt, context);
        debug!(provider = self.provider.name(), chars = full_prompt.len(), "analysis request");

        self.provider
            .complete(Some(prompts::analyst_system_prompt()), &full_prompt)
            .map_err(|e| match e {
                CurateError::Analysis(message) => CurateError::Analysis(message),
                other => CurateError::Analysis(other.to_string()),
            })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
