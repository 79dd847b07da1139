//! Per-resource evaluation (content analysis stage).
//!
//! Two scoring paths exist. `Model` asks the analysis client for JSON scores;
//! `Heuristic` derives the same fields deterministically from the quality
//! scorer and keyword signals. A model answer that cannot be parsed falls back
//! to the heuristic for that resource only.

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::analysis::AnalysisClient;
use crate::error::Result;
use crate::llm::{parse_json_response, prompts};
use crate::model::{AudienceLevel, ContentType, Evaluation, EvaluationSource, Language, Resource};
use crate::quality::QualityScorer;

/// How sub-scores are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Ask the analysis model; fall back to the heuristic on malformed output.
    #[default]
    Model,
    /// Deterministic scoring only; no model calls in the analysis stage.
    Heuristic,
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "model" | "llm" => Ok(ScoringMode::Model),
            "heuristic" | "deterministic" => Ok(ScoringMode::Heuristic),
            _ => Err(format!("Unknown scoring mode: {}. Use model or heuristic.", s)),
        }
    }
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringMode::Model => write!(f, "model"),
            ScoringMode::Heuristic => write!(f, "heuristic"),
        }
    }
}

const TUTORIAL_WORDS: [&str; 18] = [
    "tutorial", "tutorials", "guide", "guides", "guía", "guia", "course", "curso", "cursos",
    "how to", "cómo", "como", "learn", "aprende", "primer", "introduction", "introducción",
    "walkthrough",
];

const REPUTABLE_HOSTS: [&str; 11] = [
    "wikipedia.org",
    "github.com",
    "mozilla.org",
    "python.org",
    "rust-lang.org",
    "freecodecamp.org",
    "realpython.com",
    "dev.to",
    "medium.com",
    "w3schools.com",
    "geeksforgeeks.org",
];

const BEGINNER_WORDS: [&str; 14] = [
    "beginner", "beginners", "principiante", "principiantes", "introduction", "introducción",
    "getting started", "basics", "básico", "desde cero", "for dummies", "101",
    "primeros pasos", "novatos",
];

const ADVANCED_WORDS: [&str; 8] = [
    "advanced", "avanzado", "deep dive", "internals", "expert", "experto", "mastering",
    "in depth",
];

const SPANISH_WORDS: [&str; 22] = [
    "el", "la", "los", "las", "de", "del", "para", "con", "una", "un", "que", "qué", "cómo",
    "en", "por", "es", "guía", "curso", "aprende", "aprender", "español", "ejemplos",
];

const ENGLISH_WORDS: [&str; 18] = [
    "the", "and", "of", "to", "for", "with", "how", "what", "your", "in", "is", "learn",
    "guide", "you", "this", "examples", "beginners", "an",
];

/// Evaluates resources for one run.
pub struct Evaluator<'a> {
    mode: ScoringMode,
    analyst: &'a AnalysisClient,
    topic: &'a str,
    strategy: &'a str,
    scorer: QualityScorer,
}

impl<'a> Evaluator<'a> {
    pub fn new(mode: ScoringMode, analyst: &'a AnalysisClient, topic: &'a str, strategy: &'a str) -> Self {
        Self {
            mode,
            analyst,
            topic,
            strategy,
            scorer: QualityScorer::new(),
        }
    }

    /// Evaluate one resource. Only provider failures are errors.
    pub fn evaluate(&self, resource: &Resource, page_text: Option<&str>) -> Result<Evaluation> {
        match self.mode {
            ScoringMode::Heuristic => Ok(heuristic_evaluation(&self.scorer, resource, page_text)),
            ScoringMode::Model => {
                let prompt = prompts::evaluation_prompt(self.topic, resource, page_text);
                let response = self.analyst.analyze(&prompt, Some(self.strategy))?;
                match parse_json_response::<ModelScores>(&response) {
                    Ok(scores) => Ok(scores.into_evaluation(resource.clone())),
                    Err(e) => {
                        warn!(url = %resource.url, error = %e, "unparseable model evaluation, using heuristic");
                        Ok(heuristic_evaluation(&self.scorer, resource, page_text))
                    }
                }
            }
        }
    }
}

/// Scores as returned by the analysis model.
#[derive(Debug, Deserialize)]
struct ModelScores {
    quality: f64,
    educational_value: f64,
    credibility: f64,
    #[serde(default)]
    audience_level: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    relevance: Option<String>,
}

impl ModelScores {
    fn into_evaluation(self, resource: Resource) -> Evaluation {
        let audience = self
            .audience_level
            .as_deref()
            .and_then(AudienceLevel::parse)
            .unwrap_or_else(|| detect_level(&resource));
        let content_type = self
            .content_type
            .as_deref()
            .and_then(ContentType::parse)
            .unwrap_or_else(|| detect_content_type(&resource));
        let language = self
            .language
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or_else(|| detect_language(&resource));

        Evaluation::new(
            resource,
            to_subscore(self.quality),
            to_subscore(self.educational_value),
            to_subscore(self.credibility),
            audience,
            content_type,
            language,
            EvaluationSource::Model,
        )
        .with_description(self.relevance.unwrap_or_default())
    }
}

/// Round and clamp a model score into 0-10.
fn to_subscore(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 10.0) as u8
}

/// Deterministic evaluation from text signals.
pub fn heuristic_evaluation(scorer: &QualityScorer, resource: &Resource, page_text: Option<&str>) -> Evaluation {
    let text = match page_text {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => format!("{}\n\n{}", resource.title, resource.snippet),
    };
    let report = scorer.evaluate(&text);

    let quality = 4 + (report.score as u32 * 6 / 100) as u8;

    let title = resource.title.to_lowercase();
    let names_tutorial = has_any_phrase(&words(&title), &TUTORIAL_WORDS);
    let educational_value = 5
        + 2 * report.has_examples as u8
        + report.has_structure as u8
        + 2 * names_tutorial as u8;

    let complete = !resource.title.trim().is_empty() && !resource.snippet.trim().is_empty();
    let credibility = 5
        + resource.is_https() as u8
        + 2 * is_reputable_host(&resource.url) as u8
        + report.has_sources as u8
        + complete as u8;

    Evaluation::new(
        resource.clone(),
        quality,
        educational_value,
        credibility,
        detect_level(resource),
        detect_content_type(resource),
        detect_language(resource),
        EvaluationSource::Heuristic,
    )
}

/// Documentation, academic, government and well-known tutorial hosts.
pub fn is_reputable_host(url: &str) -> bool {
    let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(|h| h.to_lowercase())) {
        Some(h) => h,
        None => return false,
    };
    if host.starts_with("docs.") || host.starts_with("developer.") {
        return true;
    }
    if host.ends_with(".edu") || host.ends_with(".gov") {
        return true;
    }
    REPUTABLE_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{}", h)))
}

fn lower_text(resource: &Resource) -> String {
    format!("{} {}", resource.title, resource.snippet).to_lowercase()
}

/// Alphanumeric word tokens of already lowercased text.
fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Whether any phrase occurs as a run of whole words.
fn has_any_phrase(words: &[&str], phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| {
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        !needle.is_empty() && words.windows(needle.len()).any(|w| w == needle.as_slice())
    })
}

/// Spanish when Spanish marker words outnumber English ones, or when the
/// resource came from the Spanish query.
pub fn detect_language(resource: &Resource) -> Language {
    if resource.source_query.to_lowercase().trim_end().ends_with("español") {
        return Language::Spanish;
    }

    let text = lower_text(resource);
    let mut spanish = 0usize;
    let mut english = 0usize;
    for token in words(&text) {
        if SPANISH_WORDS.contains(&token) {
            spanish += 1;
        }
        if ENGLISH_WORDS.contains(&token) {
            english += 1;
        }
        if token.chars().any(|c| "áéíóúñ".contains(c)) {
            spanish += 1;
        }
    }
    if text.contains('¿') || text.contains('¡') {
        spanish += 1;
    }

    if spanish > english {
        Language::Spanish
    } else {
        Language::English
    }
}

/// Audience from keyword sets; mixed or absent signals mean Intermediate.
pub fn detect_level(resource: &Resource) -> AudienceLevel {
    let text = lower_text(resource);
    let tokens = words(&text);
    let beginner = has_any_phrase(&tokens, &BEGINNER_WORDS);
    let advanced = has_any_phrase(&tokens, &ADVANCED_WORDS);

    match (beginner, advanced) {
        (true, false) => AudienceLevel::Beginner,
        (false, true) => AudienceLevel::Advanced,
        _ if resource.source_query.to_lowercase().trim_end().ends_with(" beginner") => {
            AudienceLevel::Beginner
        }
        _ => AudienceLevel::Intermediate,
    }
}

/// Content type from keyword families, most specific first.
pub fn detect_content_type(resource: &Resource) -> ContentType {
    let text = lower_text(resource);
    let url = resource.url.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

    if has(&["quick start", "quickstart", "getting started", "inicio rápido", "en 5 minutos"]) {
        ContentType::QuickStartGuide
    } else if url.contains("://docs.")
        || url.contains("/docs/")
        || has(&["documentation", "documentación", "reference", "referencia", "api docs"])
    {
        ContentType::ReferenceDocumentation
    } else if has(&["example", "ejemplo", "cookbook", "snippet", "recipes"]) {
        ContentType::PracticalExamples
    } else if has(&["tutorial", "guide", "guía", "course", "curso", "how to", "step by step", "paso a paso"]) {
        ContentType::ComprehensiveTutorial
    } else {
        ContentType::TheoreticalExplanation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockProvider;
    use crate::model::Tier;

    fn resource(title: &str, url: &str, snippet: &str, query: &str) -> Resource {
        Resource::new(title, url, snippet, query)
    }

    #[test]
    fn test_heuristic_is_deterministic() {
        let scorer = QualityScorer::new();
        let r = resource(
            "Primer on Python Decorators - Real Python",
            "https://realpython.com/primer-on-python-decorators/",
            "In this tutorial, you'll look at what decorators are, with examples.",
            "Python decorators tutorial",
        );
        let a = heuristic_evaluation(&scorer, &r, None);
        let b = heuristic_evaluation(&scorer, &r, None);
        assert_eq!(a.total(), b.total());
        assert_eq!(a.source, EvaluationSource::Heuristic);
        // structure + examples = 40 -> quality 4 + 2
        assert_eq!(a.quality_score, 6);
        // examples, structure ("-"), tutorial title
        assert_eq!(a.educational_value, 10);
        // https, reputable, complete
        assert_eq!(a.credibility, 9);
        assert_eq!(a.tier(), Tier::Recommended);
    }

    #[test]
    fn test_heuristic_uses_page_text() {
        let scorer = QualityScorer::new();
        let r = resource("Notes", "http://blog.local/x", "", "q");
        let page = format!(
            "# Intro\n\n{}\n\nexample at https://a.b\n\nmore\n\nend",
            "word ".repeat(400)
        );
        let with_page = heuristic_evaluation(&scorer, &r, Some(&page));
        let without = heuristic_evaluation(&scorer, &r, None);
        assert_eq!(with_page.quality_score, 10);
        assert!(with_page.total() > without.total());
    }

    #[test]
    fn test_reputable_hosts() {
        assert!(is_reputable_host("https://docs.python.org/3/"));
        assert!(is_reputable_host("https://en.wikipedia.org/wiki/Decorator"));
        assert!(is_reputable_host("https://cs.stanford.edu/x"));
        assert!(!is_reputable_host("https://notgithub.com/x"));
        assert!(!is_reputable_host("nonsense"));
    }

    #[test]
    fn test_detect_language() {
        let es = resource(
            "Decoradores en Python: guía completa",
            "https://a.es",
            "Aprende qué son los decoradores y cómo usarlos",
            "Python decorators guide",
        );
        assert_eq!(detect_language(&es), Language::Spanish);

        let en = resource(
            "Python Decorators: The Complete Guide",
            "https://a.com",
            "Learn how to use decorators in your code",
            "Python decorators guide",
        );
        assert_eq!(detect_language(&en), Language::English);

        let from_query = resource("Decorators", "https://a.com", "", "Python decorators español");
        assert_eq!(detect_language(&from_query), Language::Spanish);
    }

    #[test]
    fn test_detect_level() {
        let b = resource("Decorators for Beginners", "https://a", "", "q");
        assert_eq!(detect_level(&b), AudienceLevel::Beginner);
        let a = resource("Advanced decorator internals", "https://a", "", "q");
        assert_eq!(detect_level(&a), AudienceLevel::Advanced);
        let m = resource("From beginner to advanced", "https://a", "", "q");
        assert_eq!(detect_level(&m), AudienceLevel::Intermediate);
        let q = resource("Decorators", "https://a", "", "python decorators beginner");
        assert_eq!(detect_level(&q), AudienceLevel::Beginner);
        let course = resource("Python 101: decorators", "https://a", "", "q");
        assert_eq!(detect_level(&course), AudienceLevel::Beginner);
        let number = resource("Release 3.10.1 changelog", "https://a", "Issue 21014 fixed", "q");
        assert_eq!(detect_level(&number), AudienceLevel::Intermediate);
    }

    #[test]
    fn test_tutorial_words_match_whole_words() {
        let scorer = QualityScorer::new();
        let tutorial = resource("Decorators: a primer", "https://a.dev/x", "Notes on decorators", "q");
        let lookalike = resource("Primera comodidad", "https://a.dev/x", "Notes on decorators", "q");
        let a = heuristic_evaluation(&scorer, &tutorial, None);
        let b = heuristic_evaluation(&scorer, &lookalike, None);
        assert_eq!(a.educational_value, b.educational_value + 2);

        let phrase = resource("How to write decorators", "https://a.dev/x", "Notes on decorators", "q");
        assert_eq!(heuristic_evaluation(&scorer, &phrase, None).educational_value, a.educational_value);
    }

    #[test]
    fn test_detect_content_type() {
        let docs = resource("Glossary", "https://docs.python.org/3/glossary.html", "", "q");
        assert_eq!(detect_content_type(&docs), ContentType::ReferenceDocumentation);
        let quick = resource("Quickstart", "https://a.com", "", "q");
        assert_eq!(detect_content_type(&quick), ContentType::QuickStartGuide);
        let ex = resource("10 decorator examples", "https://a.com", "", "q");
        assert_eq!(detect_content_type(&ex), ContentType::PracticalExamples);
        let tut = resource("Decorators tutorial", "https://a.com", "", "q");
        assert_eq!(detect_content_type(&tut), ContentType::ComprehensiveTutorial);
        let other = resource("Why decorators matter", "https://a.com", "", "q");
        assert_eq!(detect_content_type(&other), ContentType::TheoreticalExplanation);
    }

    #[test]
    fn test_model_scores_are_used_and_clamped() {
        let mock = MockProvider::new().with_evaluation(
            r#"{"quality": 9.6, "educational_value": 12, "credibility": -3,
                "audience_level": "Avanzado", "content_type": "reference",
                "language": "es", "relevance": "Explica los decoradores a fondo."}"#,
        );
        let analyst = AnalysisClient::new(mock);
        let evaluator = Evaluator::new(ScoringMode::Model, &analyst, "Python", "strategy");
        let r = resource("Decorators", "https://a.com", "snippet", "q");

        let e = evaluator.evaluate(&r, None).unwrap();
        assert_eq!(e.quality_score, 10);
        assert_eq!(e.educational_value, 10);
        assert_eq!(e.credibility, 0);
        assert_eq!(e.audience_level, AudienceLevel::Advanced);
        assert_eq!(e.content_type, ContentType::ReferenceDocumentation);
        assert_eq!(e.language, Language::Spanish);
        assert_eq!(e.description, "Explica los decoradores a fondo.");
        assert_eq!(e.source, EvaluationSource::Model);
    }

    #[test]
    fn test_malformed_model_output_falls_back() {
        let analyst = AnalysisClient::new(MockProvider::new().with_evaluation("I think it is great!"));
        let evaluator = Evaluator::new(ScoringMode::Model, &analyst, "Python", "strategy");
        let r = resource("Decorators", "https://a.com", "snippet", "q");

        let e = evaluator.evaluate(&r, None).unwrap();
        assert_eq!(e.source, EvaluationSource::Heuristic);
    }

    #[test]
    fn test_provider_failure_propagates() {
        let analyst = AnalysisClient::new(MockProvider::failing("Gemini API error (500)"));
        let evaluator = Evaluator::new(ScoringMode::Model, &analyst, "Python", "strategy");
        let r = resource("Decorators", "https://a.com", "snippet", "q");
        assert!(evaluator.evaluate(&r, None).is_err());
    }

    #[test]
    fn test_heuristic_mode_never_calls_model() {
        let analyst = AnalysisClient::new(MockProvider::failing("should not be called"));
        let evaluator = Evaluator::new(ScoringMode::Heuristic, &analyst, "Python", "strategy");
        let r = resource("Decorators", "https://a.com", "snippet", "q");
        assert!(evaluator.evaluate(&r, None).is_ok());
    }

    #[test]
    fn test_scoring_mode_parse() {
        assert_eq!("heuristic".parse::<ScoringMode>().unwrap(), ScoringMode::Heuristic);
        assert_eq!("LLM".parse::<ScoringMode>().unwrap(), ScoringMode::Model);
        assert!("random".parse::<ScoringMode>().is_err());
    }
}
