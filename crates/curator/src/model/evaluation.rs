//! Scored assessments of resources and the tiers derived from them.

use serde::{Deserialize, Serialize};

use super::resource::{AudienceLevel, ContentType, Language, Resource};

/// Highest value of each sub-score.
pub const MAX_SUBSCORE: u8 = 10;

/// Coarse quality bucket derived from a summed score (0-30).
///
/// Variants are ordered from lowest to highest so `Ord` ranks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Below 21: excluded from the final list.
    Archive,
    /// 21-23.
    Good,
    /// 24-26.
    Recommended,
    /// 27-30.
    Essential,
}

impl Tier {
    /// Classify a summed score.
    pub fn from_score(total: u8) -> Self {
        match total {
            27.. => Tier::Essential,
            24..=26 => Tier::Recommended,
            21..=23 => Tier::Good,
            _ => Tier::Archive,
        }
    }

    /// Whether entries of this tier may appear in the final report.
    pub fn is_retained(&self) -> bool {
        *self > Tier::Archive
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Essential => "Essential",
            Tier::Recommended => "Recommended",
            Tier::Good => "Good",
            Tier::Archive => "Archive",
        }
    }
}

/// Where an evaluation's scores came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationSource {
    Model,
    Heuristic,
}

/// Scored assessment of a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub resource: Resource,
    pub quality_score: u8,
    pub educational_value: u8,
    pub credibility: u8,
    pub audience_level: AudienceLevel,
    pub content_type: ContentType,
    pub language: Language,
    /// Why the resource is worth reading; falls back to the snippet.
    pub description: String,
    pub source: EvaluationSource,
}

impl Evaluation {
    /// Create an evaluation, clamping each sub-score into 0-10.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resource: Resource,
        quality_score: u8,
        educational_value: u8,
        credibility: u8,
        audience_level: AudienceLevel,
        content_type: ContentType,
        language: Language,
        source: EvaluationSource,
    ) -> Self {
        let description = resource.snippet.clone();
        Self {
            resource,
            quality_score: quality_score.min(MAX_SUBSCORE),
            educational_value: educational_value.min(MAX_SUBSCORE),
            credibility: credibility.min(MAX_SUBSCORE),
            audience_level,
            content_type,
            language,
            description,
            source,
        }
    }

    /// Replace the description when a non-empty one is given.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.trim().is_empty() {
            self.description = description.trim().to_string();
        }
        self
    }

    /// Summed score (0-30).
    pub fn total(&self) -> u8 {
        self.quality_score + self.educational_value + self.credibility
    }

    pub fn tier(&self) -> Tier {
        Tier::from_score(self.total())
    }
}

/// An evaluation that survived filtering, with its tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratedResource {
    pub evaluation: Evaluation,
    pub tier: Tier,
}

impl CuratedResource {
    pub fn new(evaluation: Evaluation) -> Self {
        let tier = evaluation.tier();
        Self { evaluation, tier }
    }

    pub fn resource(&self) -> &Resource {
        &self.evaluation.resource
    }
}
