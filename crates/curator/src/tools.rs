//! Named capabilities that can be invoked with a single text input.
//!
//! Four tools wrap the library components: `web_search`, `webpage_scraper`,
//! `gemini_analysis` and `quality_evaluator`.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisClient;
use crate::config::{GOOGLE_API_KEY, SERPER_API_KEY, Settings};
use crate::error::CurateError;
use crate::links;
use crate::llm::{GeminiProvider, LlmConfig};
use crate::quality::QualityScorer;
use crate::scrape::{HttpScraper, PageFetcher};
use crate::search::{SearchProvider, SerperClient};

/// Names of the built-in tools.
pub const TOOL_NAMES: [&str; 4] = [
    WebSearchTool::NAME,
    WebScrapeTool::NAME,
    AnalysisTool::NAME,
    QualityTool::NAME,
];

/// Errors from the tool layer.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Failed(#[from] CurateError),
}

/// A named capability.
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn invoke(&self, input: &str) -> Result<String, ToolError>;
}

fn non_empty<'a>(input: &'a str, what: &str) -> Result<&'a str, ToolError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(ToolError::InvalidInput(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}

#[derive(Serialize)]
struct SearchHit<'a> {
    title: &'a str,
    snippet: &'a str,
    link: &'a str,
}

/// Search the web; returns a pretty JSON array of `{title, snippet, link}`.
pub struct WebSearchTool {
    search: Arc<dyn SearchProvider>,
}

impl WebSearchTool {
    pub const NAME: &'static str = "web_search";

    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }
}

impl Tool for WebSearchTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Search for information on the web"
    }

    fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let query = non_empty(input, "query")?;
        let resources = self.search.search(query)?;
        let hits: Vec<SearchHit> = resources
            .iter()
            .map(|r| SearchHit {
                title: &r.title,
                snippet: &r.snippet,
                link: &r.url,
            })
            .collect();
        Ok(serde_json::to_string_pretty(&hits).map_err(CurateError::from)?)
    }
}

/// Extract readable text from a web page.
pub struct WebScrapeTool {
    fetcher: Arc<dyn PageFetcher>,
}

impl WebScrapeTool {
    pub const NAME: &'static str = "webpage_scraper";

    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

impl Tool for WebScrapeTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Extract content from webpages"
    }

    fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let url = non_empty(input, "url")?;
        if !links::is_valid_url(url) {
            return Err(ToolError::InvalidInput(format!("not an http(s) URL: {}", url)));
        }
        Ok(self.fetcher.fetch_text(url)?)
    }
}

/// Deep analysis through the analysis client.
pub struct AnalysisTool {
    analyst: AnalysisClient,
    context: Option<String>,
}

impl AnalysisTool {
    pub const NAME: &'static str = "gemini_analysis";

    pub fn new(analyst: AnalysisClient) -> Self {
        Self {
            analyst,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl Tool for AnalysisTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Perform deep analysis using Gemini AI"
    }

    fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let prompt = non_empty(input, "prompt")?;
        Ok(self.analyst.analyze(prompt, self.context.as_deref())?)
    }
}

/// Heuristic quality report for a block of text.
#[derive(Default)]
pub struct QualityTool {
    scorer: QualityScorer,
}

impl QualityTool {
    pub const NAME: &'static str = "quality_evaluator";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for QualityTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Evaluate content quality"
    }

    fn invoke(&self, input: &str) -> Result<String, ToolError> {
        Ok(self.scorer.evaluate(input).render())
    }
}

/// A set of tools addressed by name.
#[derive(Default)]
pub struct Toolbox {
    tools: Vec<Box<dyn Tool>>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool with the same name.
    pub fn register(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(Box::new(tool));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn invoke(&self, name: &str, input: &str) -> Result<String, ToolError> {
        self.get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?
            .invoke(input)
    }
}

/// Build one built-in tool, requiring only the credential it needs.
pub fn build_tool(name: &str, settings: &Settings) -> Result<Box<dyn Tool>, ToolError> {
    match name {
        WebSearchTool::NAME => {
            let key = settings.require(SERPER_API_KEY)?;
            let client = SerperClient::with_options(
                key,
                settings.search_language.clone(),
                settings.max_search_results,
                settings.search_timeout,
            )?;
            Ok(Box::new(WebSearchTool::new(Arc::new(client))))
        }
        WebScrapeTool::NAME => {
            let scraper = HttpScraper::with_timeout(settings.scrape_timeout)?;
            Ok(Box::new(WebScrapeTool::new(Arc::new(scraper))))
        }
        AnalysisTool::NAME => {
            let key = settings.require(GOOGLE_API_KEY)?;
            let provider = GeminiProvider::with_timeout(
                key,
                LlmConfig::for_model(&settings.gemini_model).with_temperature(settings.temperature),
                settings.llm_timeout,
            )?;
            Ok(Box::new(AnalysisTool::new(AnalysisClient::new(provider))))
        }
        QualityTool::NAME => Ok(Box::new(QualityTool::new())),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
