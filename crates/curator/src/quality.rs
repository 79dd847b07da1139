//! Heuristic content quality scoring.
//!
//! The score is a pure function of the text: five signals, each worth a fixed
//! number of points, summing to at most 100.

use serde::{Deserialize, Serialize};

const STRUCTURE_MARKERS: [&str; 4] = ["#", "1.", "•", "-"];
const EXAMPLE_WORDS: [&str; 3] = ["ejemplo", "example", "caso"];

/// Signals and score for a block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub score: u8,
    pub words: usize,
    pub paragraphs: usize,
    pub has_structure: bool,
    pub has_examples: bool,
    pub has_sources: bool,
}

impl QualityReport {
    /// Human-readable metrics report.
    pub fn render(&self) -> String {
        let yes_no = |b: bool| if b { "Yes" } else { "No" };
        format!(
            "Content Quality Evaluation\n\
             Score: {}/100\n\
             \n\
             Metrics:\n\
             - Words: {}\n\
             - Paragraphs: {}\n\
             - Structured: {}\n\
             - Examples: {}\n\
             - Sources: {}\n",
            self.score,
            self.words,
            self.paragraphs,
            yes_no(self.has_structure),
            yes_no(self.has_examples),
            yes_no(self.has_sources),
        )
    }
}

/// Stateless quality scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Compute every signal and the combined score.
    pub fn evaluate(&self, content: &str) -> QualityReport {
        let words = content.split_whitespace().count();
        let paragraphs = content.split("\n\n").count();
        let has_structure = STRUCTURE_MARKERS.iter().any(|m| content.contains(m));
        let lower = content.to_lowercase();
        let has_examples = EXAMPLE_WORDS.iter().any(|w| lower.contains(w));
        let has_sources = content.contains("http") || content.contains("www");

        let mut score = 0u8;
        if words > 300 {
            score += 20;
        }
        if paragraphs > 3 {
            score += 15;
        }
        if has_structure {
            score += 20;
        }
        if has_examples {
            score += 20;
        }
        if has_sources {
            score += 25;
        }

        QualityReport {
            score,
            words,
            paragraphs,
            has_structure,
            has_examples,
            has_sources,
        }
    }

    /// Score only (0-100).
    pub fn score(&self, content: &str) -> u8 {
        self.evaluate(content).score
    }
}
