//! Health command - report what the extractor can use.

use clap::Args;
use console::style;
use serde_json::json;

use recibo_core::SemanticExtractor;

use super::load_config;

/// Arguments for the health command.
#[derive(Args)]
pub struct HealthArgs {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: HealthArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let semantic = SemanticExtractor::from_config(&config.semantic);

    if args.json {
        let report = json!({
            "status": "ok",
            "semantic": {
                "available": semantic.is_available(),
                "backend": semantic.backend_name(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} Pattern extraction: {}", style("✓").green(), style("ready").green());
    if semantic.is_available() {
        println!(
            "{} Semantic fallback: {} ({})",
            style("✓").green(),
            style("available").green(),
            semantic.backend_name()
        );
    } else {
        println!(
            "{} Semantic fallback: {}",
            style("ℹ").blue(),
            style("unavailable").yellow()
        );
    }

    Ok(())
}
