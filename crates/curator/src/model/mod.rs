//! Core data types: discovered resources, their evaluations and tiers.

mod evaluation;
mod resource;

pub use evaluation::{CuratedResource, Evaluation, EvaluationSource, Tier};
pub use resource::{AudienceLevel, ContentType, Language, Resource};
