//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use curator::{OutputFormat, ScoringMode};
use std::path::PathBuf;

/// Curator: find and rank educational resources on any topic
#[derive(Parser)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub curate: CurateArgs,

    /// Test API connectivity and exit
    #[arg(short, long)]
    pub test: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// Options for a curation run.
#[derive(Args, Debug, Clone)]
pub struct CurateArgs {
    /// Topic to curate resources for (e.g., "Python decorators")
    #[arg(value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Output format (markdown or html); defaults to OUTPUT_FORMAT
    #[arg(short = 'f', long = "output-format")]
    pub format: Option<OutputFormat>,

    /// Create the course folder structure and save the report inside it
    #[arg(short = 's', long = "create-structure")]
    pub structure: bool,

    /// How resources are scored: model or heuristic
    #[arg(long, default_value = "model")]
    pub scoring: ScoringMode,

    /// Fetch each page to enrich scoring
    #[arg(long)]
    pub scrape: bool,

    /// Drop resources whose URL does not answer
    #[arg(long)]
    pub verify_urls: bool,

    /// Keep strict rank order instead of balancing languages and levels
    #[arg(long)]
    pub no_balance: bool,

    /// Directory for reports; defaults to OUTPUT_DIR
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Print the run result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the URLs in a curated report
    Validate {
        /// Report to check (default: latest course_*.markdown in the output directory)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Directory searched for the latest report
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Milliseconds to wait between network checks
        #[arg(long, default_value = "500")]
        pause_ms: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Invoke a single tool (web_search, webpage_scraper, gemini_analysis, quality_evaluator)
    Tool {
        /// Tool name
        #[arg(value_name = "NAME")]
        name: String,

        /// Tool input (query, URL, prompt or text)
        #[arg(value_name = "INPUT", required = true, num_args = 1..)]
        input: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curate_defaults() {
        let cli = Cli::try_parse_from(["curator", "Python decorators"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.curate.topic.as_deref(), Some("Python decorators"));
        assert_eq!(cli.curate.scoring, ScoringMode::Model);
        assert!(!cli.curate.no_balance);
    }

    #[test]
    fn test_curate_flags() {
        let cli = Cli::try_parse_from([
            "curator",
            "Rust",
            "--no-balance",
            "--scoring",
            "heuristic",
            "-f",
            "html",
            "-s",
        ])
        .unwrap();
        assert!(cli.curate.no_balance);
        assert_eq!(cli.curate.scoring, ScoringMode::Heuristic);
        assert_eq!(cli.curate.format, Some(OutputFormat::Html));
        assert!(cli.curate.structure);
    }

    #[test]
    fn test_tool_input_is_collected() {
        let cli = Cli::try_parse_from(["curator", "tool", "web_search", "rust", "book"]).unwrap();
        match cli.command {
            Some(Commands::Tool { name, input }) => {
                assert_eq!(name, "web_search");
                assert_eq!(input, vec!["rust", "book"]);
            }
            _ => panic!("expected tool subcommand"),
        }
    }
}
