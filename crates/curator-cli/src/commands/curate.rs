//! Curate command - run the pipeline for a topic and save the report.

use std::sync::Arc;

use chrono::Local;
use colored::Colorize;
use curator::links::HttpLinkChecker;
use curator::scrape::HttpScraper;
use curator::{CurationPipeline, OutputWriter, PipelineConfig, Settings, Tier, generate_run_id};

use crate::cli::CurateArgs;

pub fn run(topic: String, args: CurateArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let topic = topic.trim().to_string();
    let mut settings = Settings::from_env()?;
    if let Some(dir) = args.output_dir {
        settings.output_dir = dir;
    }
    let format = args.format.unwrap_or(settings.output_format);

    // Credentials are checked here, before any request is made.
    let mut pipeline = CurationPipeline::from_settings(&settings)?
        .with_config(
            PipelineConfig::default()
                .with_scoring(args.scoring)
                .with_balance(!args.no_balance),
        );
    if args.scrape {
        pipeline = pipeline.with_scraper(Arc::new(HttpScraper::with_timeout(settings.scrape_timeout)?));
    }
    if args.verify_urls {
        pipeline = pipeline.with_link_checker(Arc::new(HttpLinkChecker::with_timeout(settings.scrape_timeout)?));
    }

    if !args.json {
        println!("{} {}", "Curating resources for".cyan().bold(), topic.white().bold());
        println!("  Scoring: {}  Format: {}", args.scoring, format);
        println!();
    }

    let result = pipeline.run(&topic);
    if !result.success {
        let message = result.error.unwrap_or_else(|| "curation failed".to_string());
        return Err(message.into());
    }
    let report = result.report.as_deref().ok_or("curation produced no report")?;

    let run_id = generate_run_id(&topic, Local::now().naive_local());
    let writer = OutputWriter::new(&settings.output_dir);
    let base_dir = if args.structure {
        Some(writer.create_project_structure(&topic, &run_id)?)
    } else {
        None
    };
    let path = writer.save_content(report, &topic, &run_id, format, base_dir.as_deref())?;

    if args.json {
        let output = serde_json::json!({
            "run_id": run_id,
            "file": path.display().to_string(),
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if verbose {
        println!("{}", "Stages:".yellow().bold());
        for record in &result.stages {
            println!("  {:<18} {}", record.stage.label(), record.detail);
        }
        println!();
    }

    println!("{}", "Selected resources:".yellow().bold());
    for (i, entry) in result.resources.iter().enumerate() {
        let tier = match entry.tier {
            Tier::Essential => entry.tier.label().green(),
            Tier::Recommended => entry.tier.label().cyan(),
            _ => entry.tier.label().white(),
        };
        println!(
            "  {:>2}. [{}] {} ({}/30)",
            i + 1,
            tier,
            entry.resource().title,
            entry.evaluation.total()
        );
    }
    if result.resources.is_empty() {
        println!("  {}", "No resource reached the Good tier.".yellow());
    }
    println!();

    let summary = result.summary();
    println!(
        "Languages: {} English, {} Spanish",
        summary.english.to_string().white().bold(),
        summary.spanish.to_string().white().bold()
    );
    println!();
    println!("{} {}", "Saved to".green().bold(), path.display());
    if let Some(dir) = base_dir {
        println!("{} {}", "Course structure:".green().bold(), dir.display());
    }

    Ok(())
}
