//! Discovered web resources and their classification enums.

use serde::{Deserialize, Serialize};
use url::Url;

/// A single web item returned by the search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Query that surfaced this resource.
    pub source_query: String,
    /// Position in the aggregated research pool (0-based).
    #[serde(default)]
    pub discovery_index: usize,
}

impl Resource {
    /// Create a new resource.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        source_query: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            source_query: source_query.into(),
            discovery_index: 0,
        }
    }

    /// Set the discovery position.
    pub fn with_index(mut self, index: usize) -> Self {
        self.discovery_index = index;
        self
    }

    /// Host part of the URL, or `"Web"` when the URL has none.
    pub fn domain(&self) -> String {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| "Web".to_string())
    }

    /// Whether the URL uses TLS.
    pub fn is_https(&self) -> bool {
        self.url.starts_with("https://")
    }
}

/// Language of a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Spanish];

    /// Label used in the Spanish report.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "Inglés",
            Language::Spanish => "Español",
        }
    }

    /// Parse a model-provided language name or code.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" | "inglés" | "ingles" => Some(Language::English),
            "es" | "spa" | "spanish" | "español" | "espanol" => Some(Language::Spanish),
            _ => None,
        }
    }
}

/// Target audience of a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl AudienceLevel {
    pub const ALL: [AudienceLevel; 3] = [
        AudienceLevel::Beginner,
        AudienceLevel::Intermediate,
        AudienceLevel::Advanced,
    ];

    /// Label used in the Spanish report.
    pub fn label(&self) -> &'static str {
        match self {
            AudienceLevel::Beginner => "Principiante",
            AudienceLevel::Intermediate => "Intermedio",
            AudienceLevel::Advanced => "Avanzado",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "beginner" | "principiante" | "basic" | "básico" => Some(AudienceLevel::Beginner),
            "intermediate" | "intermedio" => Some(AudienceLevel::Intermediate),
            "advanced" | "avanzado" | "expert" => Some(AudienceLevel::Advanced),
            _ => None,
        }
    }
}

/// Kind of educational content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    QuickStartGuide,
    ComprehensiveTutorial,
    ReferenceDocumentation,
    PracticalExamples,
    #[default]
    TheoreticalExplanation,
}

impl ContentType {
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::QuickStartGuide => "Quick Start Guide",
            ContentType::ComprehensiveTutorial => "Comprehensive Tutorial",
            ContentType::ReferenceDocumentation => "Reference Documentation",
            ContentType::PracticalExamples => "Practical Examples",
            ContentType::TheoreticalExplanation => "Theoretical Explanation",
        }
    }

    /// Parse either the snake_case key or the human label.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "quick_start_guide" | "quick_start" | "quickstart" => Some(ContentType::QuickStartGuide),
            "comprehensive_tutorial" | "tutorial" => Some(ContentType::ComprehensiveTutorial),
            "reference_documentation" | "reference" | "documentation" => {
                Some(ContentType::ReferenceDocumentation)
            }
            "practical_examples" | "examples" => Some(ContentType::PracticalExamples),
            "theoretical_explanation" | "theory" => Some(ContentType::TheoreticalExplanation),
            _ => None,
        }
    }
}
