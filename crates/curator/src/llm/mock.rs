//! Mock LLM provider for testing.

use std::sync::Mutex;

use crate::error::{CurateError, Result};

use super::prompts;
use super::provider::{LlmConfig, LlmProvider};

const DEFAULT_STRATEGY: &str = "\
Subtopics: fundamentals, practical usage, common pitfalls.
Keywords (EN): tutorial, guide, examples, best practices.
Keywords (ES): tutorial, guía, ejemplos, buenas prácticas.
Audiences: beginner, intermediate, advanced.
Content types: articles, tutorials, documentation.";

const DEFAULT_EVALUATION: &str = r#"{
  "quality": 8,
  "educational_value": 8,
  "credibility": 8,
  "audience_level": "intermediate",
  "content_type": "comprehensive_tutorial",
  "language": "en",
  "relevance": "Recurso claro con ejemplos prácticos."
}"#;

/// Mock LLM provider that returns predictable responses for testing.
///
/// Evaluation prompts get a JSON evaluation (8/8/8 by default), every other
/// prompt gets a fixed strategy text. Overrides registered with
/// [`MockProvider::with_response_for`] win when their needle appears in the
/// prompt.
pub struct MockProvider {
    config: LlmConfig,
    strategy: String,
    evaluation: String,
    overrides: Vec<(String, String)>,
    failure: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self {
            config: LlmConfig::for_model("mock"),
            strategy: DEFAULT_STRATEGY.to_string(),
            evaluation: DEFAULT_EVALUATION.to_string(),
            overrides: Vec::new(),
            failure: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Replace the strategy text.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }

    /// Replace the default evaluation response.
    pub fn with_evaluation(mut self, evaluation: impl Into<String>) -> Self {
        self.evaluation = evaluation.into();
        self
    }

    /// Respond with `response` whenever `needle` appears in the prompt.
    pub fn with_response_for(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.overrides.push((needle.into(), response.into()));
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for MockProvider {
    fn complete(&self, _system: Option<&str>, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(ref message) = self.failure {
            return Err(CurateError::Analysis(message.clone()));
        }

        if let Some((_, response)) = self.overrides.iter().find(|(needle, _)| prompt.contains(needle)) {
            return Ok(response.clone());
        }

        if prompt.contains(prompts::EVALUATION_MARKER) {
            Ok(self.evaluation.clone())
        } else {
            Ok(self.strategy.clone())
        }
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
