//! Tool command - invoke one capability directly.

use colored::Colorize;
use curator::Settings;
use curator::tools::{TOOL_NAMES, build_tool};

pub fn run(name: &str, input: &str, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !TOOL_NAMES.contains(&name) {
        return Err(format!("Unknown tool: {}. Use one of: {}", name, TOOL_NAMES.join(", ")).into());
    }

    let settings = Settings::from_env()?;
    let tool = build_tool(name, &settings)?;
    if verbose {
        eprintln!("{} {}: {}", "Running".cyan(), tool.name().bold(), tool.description());
    }

    println!("{}", tool.invoke(input)?);
    Ok(())
}
