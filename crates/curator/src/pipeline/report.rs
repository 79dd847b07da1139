//! Rendering of the curated report.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{AudienceLevel, CuratedResource, Language};

/// Characters of the description shown as relevance.
pub const RELEVANCE_CHARS: usize = 200;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s<]+").unwrap());

/// Counts shown in the RESUMEN section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub english: usize,
    pub spanish: usize,
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
}

impl ReportSummary {
    pub fn from_resources(resources: &[CuratedResource]) -> Self {
        let mut summary = ReportSummary {
            total: resources.len(),
            ..Default::default()
        };
        for entry in resources {
            match entry.evaluation.language {
                Language::English => summary.english += 1,
                Language::Spanish => summary.spanish += 1,
            }
            match entry.evaluation.audience_level {
                AudienceLevel::Beginner => summary.beginner += 1,
                AudienceLevel::Intermediate => summary.intermediate += 1,
                AudienceLevel::Advanced => summary.advanced += 1,
            }
        }
        summary
    }
}

/// Render the markdown report for the selected resources.
pub fn render_report(topic: &str, resources: &[CuratedResource], top: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("# RECURSOS CURADOS - {}\n\n", topic.to_uppercase()));
    out.push_str(&format!("## TOP {} RECURSOS SELECCIONADOS\n\n", top));

    for (n, entry) in resources.iter().enumerate() {
        let evaluation = &entry.evaluation;
        let resource = &evaluation.resource;
        let relevance: String = evaluation.description.chars().take(RELEVANCE_CHARS).collect();

        out.push_str(&format!("### {}.\n", n + 1));
        out.push_str(&format!("**Título Original:** {}\n", resource.title));
        out.push_str(&format!("**URL:** {}\n", resource.url));
        out.push_str(&format!("**Idioma:** {}\n", evaluation.language.label()));
        out.push_str(&format!("**Autor/Fuente:** {}\n", resource.domain()));
        out.push_str(&format!("**Nivel:** {}\n", evaluation.audience_level.label()));
        out.push_str(&format!("**Relevancia:** {}...\n\n", relevance));
    }

    let summary = ReportSummary::from_resources(resources);
    out.push_str("## RESUMEN\n");
    out.push_str(&format!("- Total de recursos curados: {}\n", summary.total));
    out.push_str(&format!("- Recursos en inglés: {}\n", summary.english));
    out.push_str(&format!("- Recursos en español: {}\n", summary.spanish));
    out.push_str(&format!(
        "- Distribución por nivel: Principiante ({}), Intermedio ({}), Avanzado ({})\n",
        summary.beginner, summary.intermediate, summary.advanced
    ));
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn inline_html(text: &str) -> String {
    let escaped = escape_html(text);
    let bolded = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    LINK.replace_all(&bolded, r#"<a href="$0">$0</a>"#).into_owned()
}

/// Convert the report's markdown subset (headings, bullets, bold, bare links,
/// rules and paragraphs) into an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for line in markdown.lines() {
        let trimmed = line.trim();
        let is_item = trimmed.starts_with("- ");
        if in_list && !is_item {
            html.push_str("</ul>\n");
            in_list = false;
        }

        if trimmed.is_empty() {
            continue;
        } else if is_item {
            if !in_list {
                html.push_str("<ul>\n");
                in_list = true;
            }
            html.push_str(&format!("<li>{}</li>\n", inline_html(&trimmed[2..])));
        } else if trimmed == "---" {
            html.push_str("<hr>\n");
        } else if let Some(level) = heading_level(trimmed) {
            let text = trimmed[level..].trim();
            html.push_str(&format!("<h{0}>{1}</h{0}>\n", level, inline_html(text)));
        } else {
            html.push_str(&format!("<p>{}</p>\n", inline_html(trimmed)));
        }
    }
    if in_list {
        html.push_str("</ul>\n");
    }
    html
}

fn heading_level(line: &str) -> Option<usize> {
    let level = line.chars().take_while(|c| *c == '#').count();
    let rest = &line[level..];
    if (1..=6).contains(&level) && rest.starts_with(' ') {
        Some(level)
    } else {
        None
    }
}

/// Wrap a report in a standalone HTML document.
pub fn html_document(title: &str, markdown: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        markdown_to_html(markdown)
    )
}
