//! Configuration inspection command

use crate::settings::{self, Overrides};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

/// Print the effective configuration after file and flag merging
pub async fn run_show(config_path: Option<&Path>, overrides: &Overrides) -> Result<()> {
    let options = settings::load(config_path, overrides)?;
    let root = options
        .resolve_root()
        .context("Could not resolve watch root")?;

    println!("{}", "Effective Configuration".bold());
    match config_path {
        Some(path) => println!("{}: {}\n", "Source".dimmed(), path.display()),
        None => println!("{}: {}\n", "Source".dimmed(), "built-in defaults".dimmed()),
    }

    println!("  {} = {}", "root".cyan(), root.display());
    println!("  {} = {}", "recursive".cyan(), options.recursive);
    println!(
        "  {} = {} {}",
        "create_threshold_ms".cyan(),
        options.classifier.create_threshold_ms,
        "(created within this window → create)".dimmed()
    );
    println!(
        "  {} = {} {}",
        "modify_threshold_ms".cyan(),
        options.classifier.modify_threshold_ms,
        "(modified within this window → modify)".dimmed()
    );
    println!(
        "  {} = {}",
        "delete_mode".cyan(),
        toml::Value::try_from(options.classifier.delete_mode)?
    );
    println!("  {} = {:?}", "exclude".cyan(), options.filter.exclude);
    println!("  {} = {}", "use_gitignore".cyan(), options.filter.use_gitignore);
    println!("  {} = {}", "case_sensitive".cyan(), options.filter.case_sensitive);

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    println!("{}", settings::example_config());
    Ok(())
}
