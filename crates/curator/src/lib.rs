//! Curator: assembles a curated, bilingual list of educational web resources
//! for a topic.
//!
//! A run sequences five stages (topic analysis, research, content analysis,
//! quality filtering, final curation) over a web-search provider and two
//! generative-model providers, then renders a Spanish-labelled report.
//!
//! # Example
//!
//! ```no_run
//! use curator::{CurationPipeline, OutputWriter, Settings, generate_run_id};
//!
//! let settings = Settings::from_env()?;
//! let pipeline = CurationPipeline::from_settings(&settings)?;
//! let result = pipeline.run("Python decorators");
//!
//! if let Some(report) = &result.report {
//!     let run_id = generate_run_id(&result.topic, chrono::Local::now().naive_local());
//!     let writer = OutputWriter::new(&settings.output_dir);
//!     writer.save_content(report, &result.topic, &run_id, settings.output_format, None)?;
//! }
//! # Ok::<(), curator::CurateError>(())
//! ```

pub mod analysis;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod links;
pub mod llm;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod quality;
pub mod scrape;
pub mod search;
pub mod tools;

pub use analysis::AnalysisClient;
pub use config::{Credentials, OutputFormat, Settings};
pub use error::{CurateError, Result};
pub use model::{
    AudienceLevel, ContentType, CuratedResource, Evaluation, EvaluationSource, Language, Resource, Tier,
};
pub use output::{OutputWriter, generate_run_id};
pub use pipeline::{CurationPipeline, CurationResult, PipelineConfig, ScoringMode, Stage, StageRecord};
pub use quality::{QualityReport, QualityScorer};
pub use tools::{Tool, ToolError, Toolbox};
