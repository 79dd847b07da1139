//! Check command - test connectivity to every external API.

use colored::Colorize;
use curator::Settings;
use curator::connectivity::check_apis;

pub fn run(_verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    println!("{}", "Testing API connections...".cyan().bold());
    println!();

    let checks = check_apis(&settings);
    for check in &checks {
        let status = if check.ok {
            check.status_label().green()
        } else {
            check.status_label().red()
        };
        match &check.detail {
            Some(detail) => println!("  {:<8} {} ({})", check.name, status, detail.dimmed()),
            None => println!("  {:<8} {}", check.name, status),
        }
    }
    println!();

    let failed = checks.iter().filter(|c| !c.ok).count();
    if failed > 0 {
        return Err(format!("{} of {} API checks failed", failed, checks.len()).into());
    }
    println!("{}", "All APIs are reachable.".green().bold());
    Ok(())
}
