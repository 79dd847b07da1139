//! Run ids, report files and course folder skeletons.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::config::OutputFormat;
use crate::error::{CurateError, Result};
use crate::pipeline::html_document;

/// Longest topic fragment kept in a run id, in characters.
const MAX_TOPIC_CHARS: usize = 30;

/// Course skeleton folders with their README descriptions.
pub const COURSE_DIRS: [(&str, &str); 6] = [
    ("01_modules", "Course modules and lessons"),
    ("02_presentations", "Slide presentations"),
    ("03_exercises", "Practical exercises"),
    ("04_assessments", "Tests and evaluations"),
    ("05_resources", "Additional resources"),
    ("06_guides", "Instructor and student guides"),
];

/// Name of the report file inside a course folder.
const FULL_CONTENT_STEM: &str = "full_content";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `course_<topic>_<YYYYMMDD_HHMMSS>` with spaces and slashes replaced by `_`.
pub fn generate_run_id(topic: &str, now: NaiveDateTime) -> String {
    let safe: String = topic
        .replace([' ', '/'], "_")
        .chars()
        .take(MAX_TOPIC_CHARS)
        .collect();
    format!("course_{}_{}", safe, now.format("%Y%m%d_%H%M%S"))
}

/// Writes run artifacts under an output directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save a report.
    ///
    /// With `base_dir` the file is `base_dir/full_content.<ext>`, otherwise
    /// `<output_dir>/<run_id>.<ext>`. Parent folders are created as needed.
    pub fn save_content(
        &self,
        content: &str,
        topic: &str,
        run_id: &str,
        format: OutputFormat,
        base_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let path = match base_dir {
            Some(dir) => dir.join(format!("{}.{}", FULL_CONTENT_STEM, format.extension())),
            None => self
                .output_dir
                .join(format!("{}.{}", run_id, format.extension())),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CurateError::io(parent, e))?;
        }

        let generated = Local::now().format(TIMESTAMP_FORMAT);
        let body = match format {
            OutputFormat::Markdown => format!(
                "# Recursos Curados: {}\n\nGenerated: {}\n\n---\n\n{}",
                topic, generated, content
            ),
            OutputFormat::Html => html_document(
                &format!("Recursos Curados: {}", topic),
                &format!("Generated: {}\n\n---\n\n{}", generated, content),
            ),
        };

        fs::write(&path, body).map_err(|e| CurateError::io(&path, e))?;
        info!(path = %path.display(), "report saved");
        Ok(path)
    }

    /// Create `<output_dir>/<run_id>/` with the six course folders and a README.
    pub fn create_project_structure(&self, topic: &str, run_id: &str) -> Result<PathBuf> {
        let base_dir = self.output_dir.join(run_id);
        for (name, _) in COURSE_DIRS {
            let dir = base_dir.join(name);
            fs::create_dir_all(&dir).map_err(|e| CurateError::io(&dir, e))?;
        }

        let mut readme = format!("# {}\n\n## Course Structure\n\n", topic);
        for (name, description) in COURSE_DIRS {
            readme.push_str(&format!("- **{}/**: {}\n", name, description));
        }
        readme.push_str(&format!("\nGenerated: {}\n", Local::now().format(TIMESTAMP_FORMAT)));

        let readme_path = base_dir.join("README.md");
        fs::write(&readme_path, readme).map_err(|e| CurateError::io(&readme_path, e))?;
        Ok(base_dir)
    }
}
