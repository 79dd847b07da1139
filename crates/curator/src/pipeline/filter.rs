//! Quality filtering and final selection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::links::{self, LinkChecker};
use crate::model::{AudienceLevel, CuratedResource, Evaluation, Language, Resource};

/// Why an evaluated resource was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Duplicate,
    PlaceholderUrl,
    InvalidUrl,
    Unreachable,
    BelowThreshold,
}

/// Output of the filtering stage.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Retained entries in discovery order.
    pub retained: Vec<CuratedResource>,
    pub rejected: Vec<(String, Rejection)>,
}

impl FilterOutcome {
    pub fn rejected_count(&self, reason: Rejection) -> usize {
        self.rejected.iter().filter(|(_, r)| *r == reason).count()
    }
}

/// Keep the first occurrence of every URL, preserving order.
pub fn dedupe_resources(resources: Vec<Resource>) -> Vec<Resource> {
    let mut unique: IndexMap<String, Resource> = IndexMap::with_capacity(resources.len());
    for resource in resources {
        unique.entry(resource.url.clone()).or_insert(resource);
    }
    unique.into_values().collect()
}

/// Dedupe, drop bad URLs, tier and drop Archive.
///
/// With a `checker`, URLs that do not answer are dropped as well.
pub fn filter_evaluations(
    evaluations: Vec<Evaluation>,
    checker: Option<&dyn LinkChecker>,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    let mut unique: IndexMap<String, Evaluation> = IndexMap::with_capacity(evaluations.len());

    for evaluation in evaluations {
        let url = evaluation.resource.url.clone();
        if unique.contains_key(&url) {
            outcome.rejected.push((url, Rejection::Duplicate));
        } else {
            unique.insert(url, evaluation);
        }
    }

    for (url, evaluation) in unique {
        let rejection = if links::is_placeholder_host(&url) {
            Some(Rejection::PlaceholderUrl)
        } else if !links::is_valid_url(&url) {
            Some(Rejection::InvalidUrl)
        } else if !evaluation.tier().is_retained() {
            Some(Rejection::BelowThreshold)
        } else if checker.is_some_and(|c| !c.is_reachable(&url)) {
            Some(Rejection::Unreachable)
        } else {
            None
        };

        match rejection {
            Some(reason) => {
                debug!(url = %url, reason = ?reason, total = evaluation.total(), "resource rejected");
                outcome.rejected.push((url, reason));
            }
            None => outcome.retained.push(CuratedResource::new(evaluation)),
        }
    }

    outcome
}

/// Highest tier first; ties keep discovery order.
pub fn rank(mut entries: Vec<CuratedResource>) -> Vec<CuratedResource> {
    entries.sort_by(|a, b| {
        b.tier
            .cmp(&a.tier)
            .then(a.resource().discovery_index.cmp(&b.resource().discovery_index))
    });
    entries
}

#[derive(Debug, Clone, Copy)]
enum Group {
    Language(Language),
    Level(AudienceLevel),
}

impl Group {
    fn all() -> impl Iterator<Item = Group> {
        Language::ALL
            .into_iter()
            .map(Group::Language)
            .chain(AudienceLevel::ALL.into_iter().map(Group::Level))
    }

    fn matches(&self, entry: &CuratedResource) -> bool {
        match self {
            Group::Language(l) => entry.evaluation.language == *l,
            Group::Level(l) => entry.evaluation.audience_level == *l,
        }
    }
}

/// Take the top `count` of an already ranked list.
///
/// With `balance`, every language and audience level present in `ranked` is
/// made to appear in the selection when possible: the best-ranked missing
/// entry replaces the lowest-ranked selected entry whose language and level
/// both have another representative. The result stays in rank order.
pub fn select(ranked: Vec<CuratedResource>, count: usize, balance: bool) -> Vec<CuratedResource> {
    let mut selected: Vec<usize> = (0..ranked.len().min(count)).collect();

    if balance && count > 0 {
        for group in Group::all() {
            if selected.iter().any(|&i| group.matches(&ranked[i])) {
                continue;
            }
            let Some(candidate) =
                (0..ranked.len()).find(|i| !selected.contains(i) && group.matches(&ranked[*i]))
            else {
                continue;
            };
            let victim = selected
                .iter()
                .rev()
                .copied()
                .find(|&i| is_replaceable(&ranked, &selected, i));
            if let Some(victim) = victim {
                debug!(group = ?group, "rebalancing selection");
                selected.retain(|&i| i != victim);
                selected.push(candidate);
                selected.sort_unstable();
            }
        }
    }

    ranked
        .into_iter()
        .enumerate()
        .filter(|(i, _)| selected.contains(i))
        .map(|(_, entry)| entry)
        .collect()
}

/// Whether dropping `index` leaves its language and level still represented.
fn is_replaceable(ranked: &[CuratedResource], selected: &[usize], index: usize) -> bool {
    let entry = &ranked[index].evaluation;
    let languages = selected
        .iter()
        .filter(|&&i| ranked[i].evaluation.language == entry.language)
        .count();
    let levels = selected
        .iter()
        .filter(|&&i| ranked[i].evaluation.audience_level == entry.audience_level)
        .count();
    languages > 1 && levels > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, EvaluationSource, Tier};

    fn eval(url: &str, index: usize, score: u8, language: Language, level: AudienceLevel) -> Evaluation {
        let resource = Resource::new("T", url, "s", "q").with_index(index);
        Evaluation::new(
            resource,
            score,
            score,
            score,
            level,
            ContentType::ComprehensiveTutorial,
            language,
            EvaluationSource::Heuristic,
        )
    }

    fn en(url: &str, index: usize, score: u8) -> Evaluation {
        eval(url, index, score, Language::English, AudienceLevel::Intermediate)
    }

    struct Reachable(Vec<&'static str>);
    impl LinkChecker for Reachable {
        fn is_reachable(&self, url: &str) -> bool {
            self.0.iter().any(|u| *u == url)
        }
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let resources = vec![
            Resource::new("First", "https://a.com", "", "q1"),
            Resource::new("Other", "https://b.com", "", "q1"),
            Resource::new("Second title", "https://a.com", "", "q2"),
        ];
        let unique = dedupe_resources(resources);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "First");
        assert_eq!(unique[1].url, "https://b.com");
    }

    #[test]
    fn test_filter_drops_bad_urls_and_archive() {
        let outcome = filter_evaluations(
            vec![
                en("https://a.com", 0, 8),
                en("https://a.com", 1, 9),
                en("https://example.com/x", 2, 9),
                en("ftp://files.org", 3, 9),
                en("https://low.com", 4, 6),
                en("https://edge.com", 5, 7),
            ],
            None,
        );

        let urls: Vec<&str> = outcome.retained.iter().map(|c| c.resource().url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.com", "https://edge.com"]);
        assert_eq!(outcome.retained[1].tier, Tier::Good);
        assert_eq!(outcome.rejected_count(Rejection::Duplicate), 1);
        assert_eq!(outcome.rejected_count(Rejection::PlaceholderUrl), 1);
        assert_eq!(outcome.rejected_count(Rejection::InvalidUrl), 1);
        assert_eq!(outcome.rejected_count(Rejection::BelowThreshold), 1);
        assert!(outcome.retained.iter().all(|c| c.evaluation.total() >= 21));
    }

    #[test]
    fn test_filter_judges_placeholder_by_host() {
        let outcome = filter_evaluations(
            vec![
                en("https://developer.mozilla.org/en-US/docs/Web/HTML/Attributes/placeholder", 0, 8),
                en("https://www.codeexample.com/html-forms", 1, 8),
                en("https://docs.example.org/intro", 2, 8),
            ],
            None,
        );
        assert_eq!(outcome.retained.len(), 2);
        assert_eq!(
            outcome.rejected,
            vec![("https://docs.example.org/intro".to_string(), Rejection::PlaceholderUrl)]
        );
    }

    #[test]
    fn test_filter_with_link_checker() {
        let checker = Reachable(vec!["https://up.com"]);
        let outcome = filter_evaluations(
            vec![en("https://up.com", 0, 9), en("https://down.com", 1, 9)],
            Some(&checker),
        );
        assert_eq!(outcome.retained.len(), 1);
        assert_eq!(outcome.rejected, vec![("https://down.com".to_string(), Rejection::Unreachable)]);
    }

    #[test]
    fn test_rank_by_tier_then_discovery() {
        let retained = filter_evaluations(
            vec![en("https://g.com", 0, 7), en("https://e1.com", 1, 9), en("https://e2.com", 2, 10)],
            None,
        )
        .retained;
        let ranked = rank(retained);
        let urls: Vec<&str> = ranked.iter().map(|c| c.resource().url.as_str()).collect();
        assert_eq!(urls, vec!["https://e1.com", "https://e2.com", "https://g.com"]);
    }

    #[test]
    fn test_select_truncates_without_balance() {
        let retained = filter_evaluations((0..15).map(|i| en(&format!("https://s{}.com", i), i, 9)).collect(), None).retained;
        let selected = select(rank(retained), 10, false);
        assert_eq!(selected.len(), 10);
        assert_eq!(selected[9].resource().discovery_index, 9);
    }

    #[test]
    fn test_select_balances_language_and_level() {
        let mut evaluations: Vec<Evaluation> = (0..10).map(|i| en(&format!("https://en{}.com", i), i, 10)).collect();
        evaluations.push(eval("https://es.com", 10, 7, Language::Spanish, AudienceLevel::Intermediate));
        evaluations.push(eval("https://adv.com", 11, 7, Language::English, AudienceLevel::Advanced));

        let selected = select(rank(filter_evaluations(evaluations, None).retained), 10, true);

        assert_eq!(selected.len(), 10);
        assert!(selected.iter().any(|c| c.evaluation.language == Language::Spanish));
        assert!(selected.iter().any(|c| c.evaluation.audience_level == AudienceLevel::Advanced));
        // The two lowest-ranked English entries were swapped out.
        assert!(!selected.iter().any(|c| c.resource().url == "https://en9.com"));
        assert!(!selected.iter().any(|c| c.resource().url == "https://en8.com"));
        // Rank order is kept.
        assert_eq!(selected[0].resource().url, "https://en0.com");
        assert_eq!(selected[9].resource().url, "https://adv.com");
    }

    #[test]
    fn test_select_keeps_sole_representatives() {
        let evaluations = vec![
            eval("https://es.com", 0, 10, Language::Spanish, AudienceLevel::Beginner),
            en("https://en.com", 1, 10),
            eval("https://adv.com", 2, 7, Language::English, AudienceLevel::Advanced),
        ];
        let selected = select(rank(filter_evaluations(evaluations, None).retained), 2, true);
        let urls: Vec<&str> = selected.iter().map(|c| c.resource().url.as_str()).collect();
        // Each selected entry is the only one in its language.
        assert_eq!(urls, vec!["https://es.com", "https://en.com"]);
    }
}
