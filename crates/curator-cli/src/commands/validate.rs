//! Validate command - check the URLs of a curated report.

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use curator::Settings;
use curator::links::{self, HttpLinkChecker, LinkStatus};

pub fn run(
    file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    pause_ms: u64,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = match file {
        Some(path) => path,
        None => {
            let dir = match output_dir {
                Some(dir) => dir,
                None => Settings::from_env()?.output_dir,
            };
            links::find_latest_report(&dir).ok_or_else(|| {
                format!(
                    "No course_*.markdown report found in {}\nRun 'curator <TOPIC>' first.",
                    dir.display()
                )
            })?
        }
    };

    if !path.exists() {
        return Err(format!("Report not found: {}", path.display()).into());
    }

    if !json_output {
        println!("{} {}", "Validating URLs in".cyan().bold(), path.display());
        println!();
    }

    let checker = HttpLinkChecker::new()?;
    let report = links::validate_file(&path, &checker, Duration::from_millis(pause_ms))?;

    if json_output {
        let output = serde_json::json!({
            "file": path.display().to_string(),
            "total": report.checks.len(),
            "reachable": report.count(LinkStatus::Reachable),
            "unreachable": report.count(LinkStatus::Unreachable),
            "fake": report.count(LinkStatus::Fake),
            "invalid_format": report.count(LinkStatus::InvalidFormat),
            "success_rate": report.success_rate(),
            "checks": report.checks,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if report.checks.is_empty() {
        println!("{}", "No URLs found in the report.".yellow());
        return Ok(());
    }

    if verbose {
        for check in &report.checks {
            let mark = match check.status {
                LinkStatus::Reachable => "ok".green(),
                LinkStatus::Unreachable => "down".red(),
                LinkStatus::Fake => "fake".red(),
                LinkStatus::InvalidFormat => "invalid".yellow(),
            };
            println!("  [{}] {}", mark, check.url);
        }
        println!();
    }

    println!("{}", "Summary:".yellow().bold());
    println!("  Total URLs:     {}", report.checks.len().to_string().white());
    println!("  Reachable:      {}", report.count(LinkStatus::Reachable).to_string().green());
    println!("  Unreachable:    {}", report.count(LinkStatus::Unreachable).to_string().red());
    println!("  Fake:           {}", report.count(LinkStatus::Fake).to_string().red());
    println!("  Invalid format: {}", report.count(LinkStatus::InvalidFormat).to_string().yellow());
    println!("  Success rate:   {:.1}%", report.success_rate());

    let fake = report.urls_with(LinkStatus::Fake);
    if !fake.is_empty() {
        println!();
        println!("{}", "Placeholder URLs:".red().bold());
        for url in fake {
            println!("  - {}", url);
        }
    }
    let broken = report.urls_with(LinkStatus::Unreachable);
    if !broken.is_empty() {
        println!();
        println!("{}", "Unreachable URLs:".red().bold());
        for url in broken {
            println!("  - {}", url);
        }
    }

    Ok(())
}
