//! Five-stage curation pipeline.
//!
//! Stages run strictly forward, once each:
//!
//! 1. **Topic analysis**: the strategist model writes a bilingual search strategy.
//! 2. **Research**: the query battery runs through the search provider.
//! 3. **Content analysis**: every unique resource gets an [`Evaluation`].
//! 4. **Quality filtering**: bad URLs and Archive-tier entries are dropped.
//! 5. **Final curation**: entries are ranked, selected and rendered.
//!
//! Any stage error ends the run; [`CurationPipeline::run`] turns it into a
//! failed [`CurationResult`] instead of returning it.

mod evaluate;
mod filter;
mod report;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::analysis::AnalysisClient;
use crate::config::Settings;
use crate::error::{CurateError, Result};
use crate::links::LinkChecker;
use crate::llm::{GeminiProvider, LlmConfig, LlmProvider, OpenAIProvider, prompts};
use crate::model::{CuratedResource, Evaluation, Resource};
use crate::scrape::PageFetcher;
use crate::search::{SearchProvider, SerperClient};

pub use evaluate::{
    Evaluator, ScoringMode, detect_content_type, detect_language, detect_level,
    heuristic_evaluation, is_reputable_host,
};
pub use filter::{FilterOutcome, Rejection, dedupe_resources, filter_evaluations, rank, select};
pub use report::{ReportSummary, html_document, markdown_to_html, render_report};

/// Query templates run during research; `{topic}` is substituted.
pub const DEFAULT_QUERY_TEMPLATES: [&str; 7] = [
    "{topic} tutorial",
    "{topic} guide",
    "{topic} article",
    "{topic} beginner",
    "{topic} español",
    "{topic} blog post",
    "learn {topic}",
];

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Research queries, each containing `{topic}`.
    pub query_templates: Vec<String>,
    /// Number of resources in the final report.
    pub final_count: usize,
    /// How stage 3 scores resources.
    pub scoring: ScoringMode,
    /// Swap entries so every language and level present is represented.
    pub balance: bool,
    /// Aggregated pool size below which a warning is logged.
    pub min_pool_warning: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            query_templates: DEFAULT_QUERY_TEMPLATES.iter().map(|t| t.to_string()).collect(),
            final_count: 10,
            scoring: ScoringMode::Model,
            balance: true,
            min_pool_warning: 15,
        }
    }
}

impl PipelineConfig {
    pub fn with_templates<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_templates = templates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_final_count(mut self, final_count: usize) -> Self {
        self.final_count = final_count;
        self
    }

    pub fn with_balance(mut self, balance: bool) -> Self {
        self.balance = balance;
        self
    }

    /// Queries for `topic`, in template order.
    pub fn queries(&self, topic: &str) -> Vec<String> {
        self.query_templates
            .iter()
            .map(|t| t.replace("{topic}", topic))
            .collect()
    }
}

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TopicAnalysis,
    Research,
    ContentAnalysis,
    QualityFiltering,
    FinalCuration,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::TopicAnalysis => "Topic Analysis",
            Stage::Research => "Research",
            Stage::ContentAnalysis => "Content Analysis",
            Stage::QualityFiltering => "Quality Filtering",
            Stage::FinalCuration => "Final Curation",
        }
    }
}

/// What a completed stage produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    /// Items the stage handed to the next one.
    pub items: usize,
    pub detail: String,
}

/// Outcome of one curation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationResult {
    pub topic: String,
    /// Selected resources in report order.
    pub resources: Vec<CuratedResource>,
    /// Stage 1 output.
    pub strategy: String,
    /// Rendered markdown report; `None` when the run failed.
    pub report: Option<String>,
    pub stages: Vec<StageRecord>,
    pub generated_at: DateTime<Utc>,
    pub success: bool,
    pub error: Option<String>,
}

impl CurationResult {
    fn started(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            resources: Vec::new(),
            strategy: String::new(),
            report: None,
            stages: Vec::new(),
            generated_at: Utc::now(),
            success: false,
            error: None,
        }
    }

    fn record(&mut self, stage: Stage, items: usize, detail: impl Into<String>) {
        let detail = detail.into();
        info!(stage = stage.label(), items, "{}", detail);
        self.stages.push(StageRecord { stage, items, detail });
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_resources(&self.resources)
    }
}

/// The curation pipeline and its collaborators.
pub struct CurationPipeline {
    config: PipelineConfig,
    search: Arc<dyn SearchProvider>,
    strategist: Arc<dyn LlmProvider>,
    analyst: AnalysisClient,
    scraper: Option<Arc<dyn PageFetcher>>,
    link_checker: Option<Arc<dyn LinkChecker>>,
}

impl CurationPipeline {
    /// Create a pipeline with default configuration.
    pub fn new(
        search: Arc<dyn SearchProvider>,
        strategist: Arc<dyn LlmProvider>,
        analyst: AnalysisClient,
    ) -> Self {
        Self {
            config: PipelineConfig::default(),
            search,
            strategist,
            analyst,
            scraper: None,
            link_checker: None,
        }
    }

    /// Build the production pipeline (Serper, OpenAI strategist, Gemini analyst).
    ///
    /// Fails with a configuration error before any network call when a key is
    /// missing.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let credentials = settings.credentials()?;

        let search = SerperClient::from_settings(&credentials, settings)?;
        let strategist = OpenAIProvider::with_timeout(
            credentials.openai_api_key.clone(),
            LlmConfig::for_model(&settings.openai_model).with_temperature(settings.temperature),
            settings.llm_timeout,
        )?;
        let analyst = GeminiProvider::with_timeout(
            credentials.google_api_key.clone(),
            LlmConfig::for_model(&settings.gemini_model).with_temperature(settings.temperature),
            settings.llm_timeout,
        )?;

        Ok(Self::new(
            Arc::new(search),
            Arc::new(strategist),
            AnalysisClient::new(analyst),
        ))
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Enrich evaluations with scraped page text.
    pub fn with_scraper(mut self, scraper: Arc<dyn PageFetcher>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    /// Drop resources whose URL does not answer during filtering.
    pub fn with_link_checker(mut self, checker: Arc<dyn LinkChecker>) -> Self {
        self.link_checker = Some(checker);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage for `topic`. Errors are reported in the result.
    pub fn run(&self, topic: &str) -> CurationResult {
        let mut result = CurationResult::started(topic.trim());
        match self.try_run(topic.trim(), &mut result) {
            Ok(()) => {
                result.success = true;
                info!(topic = %result.topic, selected = result.resources.len(), "curation finished");
            }
            Err(e) => {
                error!(topic = %result.topic, error = %e, "curation failed");
                result.error = Some(e.to_string());
                result.resources.clear();
                result.report = None;
            }
        }
        result
    }

    fn try_run(&self, topic: &str, result: &mut CurationResult) -> Result<()> {
        if topic.is_empty() {
            return Err(CurateError::InvalidInput("topic must not be empty".to_string()));
        }

        // Stage 1
        let strategy = self
            .strategist
            .complete(Some(prompts::strategist_system_prompt()), &prompts::strategy_prompt(topic))?;
        result.strategy = strategy.trim().to_string();
        result.record(
            Stage::TopicAnalysis,
            1,
            format!("strategy drafted by {}", self.strategist.name()),
        );

        // Stage 2
        let pool = self.research(topic)?;
        result.record(
            Stage::Research,
            pool.len(),
            format!("{} resources from {} queries", pool.len(), self.config.query_templates.len()),
        );

        // Stage 3
        let evaluations = self.analyze(topic, &result.strategy, pool)?;
        result.record(
            Stage::ContentAnalysis,
            evaluations.len(),
            format!("{} unique resources evaluated", evaluations.len()),
        );

        // Stage 4
        let outcome = filter_evaluations(evaluations, self.link_checker.as_deref());
        result.record(
            Stage::QualityFiltering,
            outcome.retained.len(),
            format!(
                "{} retained, {} rejected",
                outcome.retained.len(),
                outcome.rejected.len()
            ),
        );
        if outcome.retained.is_empty() {
            warn!(topic, "no resource reached the Good tier");
        }

        // Stage 5
        let selected = select(rank(outcome.retained), self.config.final_count, self.config.balance);
        let report = render_report(topic, &selected, self.config.final_count);
        result.record(
            Stage::FinalCuration,
            selected.len(),
            format!("{} resources selected", selected.len()),
        );
        result.resources = selected;
        result.report = Some(report);
        Ok(())
    }

    /// Run the query battery and aggregate every hit in discovery order.
    fn research(&self, topic: &str) -> Result<Vec<Resource>> {
        let mut pool: Vec<Resource> = Vec::new();
        for query in self.config.queries(topic) {
            match self.search.search(&query) {
                Ok(hits) => {
                    debug!(query = %query, count = hits.len(), "search returned");
                    for hit in hits {
                        let index = pool.len();
                        pool.push(hit.with_index(index));
                    }
                }
                Err(e) => warn!(query = %query, error = %e, "search failed, skipping query"),
            }
        }

        if pool.is_empty() {
            return Err(CurateError::NoResources(format!(
                "no search results for '{}'",
                topic
            )));
        }
        if pool.len() < self.config.min_pool_warning {
            warn!(
                count = pool.len(),
                expected = self.config.min_pool_warning,
                "research pool is smaller than expected"
            );
        }
        Ok(pool)
    }

    /// Evaluate the first occurrence of every URL.
    fn analyze(&self, topic: &str, strategy: &str, pool: Vec<Resource>) -> Result<Vec<Evaluation>> {
        let evaluator = Evaluator::new(self.config.scoring, &self.analyst, topic, strategy);
        let unique = dedupe_resources(pool);

        let mut evaluations = Vec::with_capacity(unique.len());
        for resource in &unique {
            let page_text = self.scraper.as_ref().and_then(|scraper| {
                scraper
                    .fetch_text(&resource.url)
                    .map_err(|e| warn!(url = %resource.url, error = %e, "scrape failed"))
                    .ok()
            });
            evaluations.push(evaluator.evaluate(resource, page_text.as_deref())?);
        }
        Ok(evaluations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockProvider;
    use crate::search::MockSearch;

    fn pipeline(search: MockSearch) -> CurationPipeline {
        CurationPipeline::new(
            Arc::new(search),
            Arc::new(MockProvider::new()),
            AnalysisClient::new(MockProvider::new()),
        )
    }

    #[test]
    fn test_queries_substitute_topic() {
        let queries = PipelineConfig::default().queries("Rust");
        assert_eq!(queries.len(), 7);
        assert_eq!(queries[0], "Rust tutorial");
        assert_eq!(queries[4], "Rust español");
        assert_eq!(queries[6], "learn Rust");
    }

    #[test]
    fn test_empty_topic_fails() {
        let result = pipeline(MockSearch::new()).run("   ");
        assert!(!result.success);
        assert!(result.error.unwrap().contains("topic must not be empty"));
    }

    #[test]
    fn test_no_results_fails() {
        let result = pipeline(MockSearch::new()).run("Rust");
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("No resources found"));
        assert!(result.report.is_none());
        // Topic analysis finished before research failed.
        assert_eq!(result.stages.len(), 1);
    }

    #[test]
    fn test_stages_recorded_in_order() {
        let search = MockSearch::new().with_results(
            "Rust tutorial",
            vec![("The Rust Book", "https://doc.rust-lang.org/book/", "Learn Rust")],
        );
        let result = pipeline(search).run("Rust");
        assert!(result.success, "{:?}", result.error);
        let stages: Vec<Stage> = result.stages.iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![
                Stage::TopicAnalysis,
                Stage::Research,
                Stage::ContentAnalysis,
                Stage::QualityFiltering,
                Stage::FinalCuration
            ]
        );
        assert!(result.strategy.contains("Keywords"));
        assert_eq!(result.resources.len(), 1);
    }

    #[test]
    fn test_strategist_failure_fails_run() {
        let search = MockSearch::new().with_results("Rust tutorial", vec![("T", "https://a.com", "s")]);
        let pipeline = CurationPipeline::new(
            Arc::new(search),
            Arc::new(MockProvider::failing("OpenAI API error (401): bad key")),
            AnalysisClient::new(MockProvider::new()),
        );
        let result = pipeline.run("Rust");
        assert!(!result.success);
        assert!(result.error.unwrap().contains("bad key"));
        assert!(result.stages.is_empty());
    }
}
