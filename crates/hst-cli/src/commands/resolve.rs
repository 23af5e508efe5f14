//! Resolve command implementation

use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use crate::context::Session;
use crate::error::{CliError, Result};

/// Resolve every configuration in `documents` and summarize it.
///
/// Fails when any configuration could not be loaded, after reporting the
/// ones that did load.
pub fn run_resolve(session: &Session, documents: &[PathBuf], json: bool) -> Result<()> {
    let model = session.resolve(documents)?;

    if json {
        let configurations: Vec<_> = model
            .configurations()
            .values()
            .map(|configuration| {
                json!({
                    "name": configuration.name(),
                    "components": configuration.component_configurations().len(),
                    "total_components": configuration.component_count(),
                    "prototype_pages": configuration.prototype_pages().keys().collect::<Vec<_>>(),
                    "xpage_layouts": configuration.xpage_layouts().keys().collect::<Vec<_>>(),
                    "container_items": configuration.available_container_items().len(),
                    "templates": configuration.templates().len(),
                    "mount_variants": configuration.mount_variants(),
                })
            })
            .collect();
        let output = json!({
            "configurations": configurations,
            "failures": model.failures(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for configuration in model.configurations().values() {
            println!("{}", configuration.name().bold());
            println!(
                "  {}:      {} roots, {} total",
                "Components".dimmed(),
                configuration.component_configurations().len().to_string().cyan(),
                configuration.component_count().to_string().cyan()
            );
            println!(
                "  {}: {}",
                "Container items".dimmed(),
                configuration.available_container_items().len().to_string().cyan()
            );
            println!(
                "  {}:       {}",
                "Templates".dimmed(),
                configuration.templates().len().to_string().cyan()
            );
            if !configuration.mount_variants().is_empty() {
                let variants: Vec<&str> = configuration.mount_variants().iter().map(String::as_str).collect();
                println!("  {}:        {}", "Variants".dimmed(), variants.join(", "));
            }
        }
        for (name, reason) in model.failures() {
            println!("{} {}: {}", "failed".red().bold(), name.bold(), reason);
        }
    }

    if model.failures().is_empty() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} configuration(s) failed to load",
            model.failures().len()
        )))
    }
}
