//! Prompt templates for LLM interactions.

use crate::model::Resource;

/// Text that only appears in evaluation prompts.
pub const EVALUATION_MARKER: &str = "\"educational_value\"";

/// Longest page excerpt included in an evaluation prompt.
const MAX_EXCERPT_CHARS: usize = 1200;

/// System prompt for the strategist role.
pub fn strategist_system_prompt() -> &'static str {
    "You are an expert instructional designer with 20 years of experience. \
     You break complex topics into manageable components and know where good \
     learning material is published, in both English and Spanish."
}

/// System prompt for the analyst role.
pub fn analyst_system_prompt() -> &'static str {
    "You are an expert educational content analyst. You judge accuracy, clarity, \
     pedagogy and source credibility, and you answer exactly in the format requested."
}

/// Build the topic analysis prompt (stage 1).
pub fn strategy_prompt(topic: &str) -> String {
    format!(
        r#"Analyze the topic '{topic}' to define what types of content to search for:
1. Identify key subtopics and areas to cover
2. Define search keywords in English and Spanish
3. Determine what types of resources are most valuable (articles, tutorials, documentation, guides)
4. Specify target audiences (beginner, intermediate, advanced)
5. Create a search strategy for both languages

Focus on FINDING existing content, not creating new content.
Answer with a concise plain-text strategy."#
    )
}

/// Frame a task for the analysis client.
pub fn analyst_prompt(task: &str, context: Option<&str>) -> String {
    let context = match context {
        Some(c) if !c.trim().is_empty() => c.trim(),
        _ => "General educational content",
    };
    format!(
        "Context: {}\n\nTask: {}\n\nProvide a detailed, structured analysis.",
        context, task
    )
}

/// Build the per-resource evaluation prompt (stage 3).
pub fn evaluation_prompt(topic: &str, resource: &Resource, page_text: Option<&str>) -> String {
    let excerpt = match page_text {
        Some(text) if !text.is_empty() => text.chars().take(MAX_EXCERPT_CHARS).collect::<String>(),
        _ => "Not available".to_string(),
    };

    format!(
        r#"Evaluate this web resource as learning material about '{topic}'.

## Resource
- Title: {title}
- URL: {url}
- Snippet: {snippet}

## Page Excerpt
{excerpt}

## Scoring
- quality (1-10): accuracy, clarity, practical examples, presentation
- educational_value (1-10): coverage, step-by-step guidance, learning outcomes
- credibility (1-10): author expertise, source reputation, references
- audience_level: beginner, intermediate or advanced
- content_type: quick_start_guide, comprehensive_tutorial, reference_documentation, practical_examples or theoretical_explanation
- language: "en" or "es" (language the resource is written in)
- relevance: one or two sentences IN SPANISH on why this resource is valuable and what the reader will learn

Respond with a JSON object only:
{{
  "quality": 0,
  "educational_value": 0,
  "credibility": 0,
  "audience_level": "beginner",
  "content_type": "comprehensive_tutorial",
  "language": "en",
  "relevance": "..."
}}"#,
        topic = topic,
        title = resource.title,
        url = resource.url,
        snippet = if resource.snippet.is_empty() { "(none)" } else { resource.snippet.as_str() },
        excerpt = excerpt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_prompt_carries_marker_and_resource() {
        let resource = Resource::new("Decorators 101", "https://realpython.com/x", "Learn", "q");
        let prompt = evaluation_prompt("Python decorators", &resource, None);
        assert!(prompt.contains(EVALUATION_MARKER));
        assert!(prompt.contains("https://realpython.com/x"));
        assert!(prompt.contains("Not available"));
    }

    #[test]
    fn test_excerpt_is_capped() {
        let resource = Resource::new("t", "https://a.b", "", "q");
        let page = "x".repeat(5000);
        let prompt = evaluation_prompt("t", &resource, Some(&page));
        assert!(!prompt.contains(&"x".repeat(MAX_EXCERPT_CHARS + 1)));
        assert!(prompt.contains("(none)"));
    }

    #[test]
    fn test_strategy_prompt_is_not_an_evaluation() {
        assert!(!strategy_prompt("Rust").contains(EVALUATION_MARKER));
    }

    #[test]
    fn test_analyst_prompt_default_context() {
        let prompt = analyst_prompt("do it", None);
        assert!(prompt.contains("Context: General educational content"));
        let prompt = analyst_prompt("do it", Some("strategy"));
        assert!(prompt.contains("Context: strategy"));
    }
}
