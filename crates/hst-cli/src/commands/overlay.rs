//! Overlay command implementation

use std::path::PathBuf;

use colored::Colorize;

use crate::commands::render::{component_json, print_tree};
use crate::context::{Session, load_document};
use crate::error::{CliError, Result};

/// Apply an experience page document to a layout and print the result.
pub fn run_overlay(
    session: &Session,
    document: PathBuf,
    layout_id: &str,
    xpage_document: PathBuf,
    json: bool,
) -> Result<()> {
    let model = session.resolve(std::slice::from_ref(&document))?;
    let configuration = model
        .configurations()
        .values()
        .find(|configuration| configuration.xpage_layouts().contains_key(layout_id))
        .ok_or_else(|| CliError::user(format!("XPage layout not found: {layout_id}")))?;

    let page = load_document(&xpage_document)?;
    let overlay = configuration.xpage_overlay(layout_id, &page)?;

    if json {
        let delimiter = session.engine.parameter_prefix_delimiter.as_str();
        println!("{}", serde_json::to_string_pretty(&component_json(&*overlay, delimiter))?);
    } else {
        println!("{} {}", "Overlay of".bold(), layout_id.cyan());
        println!();
        print_tree(&*overlay, 0);
    }
    Ok(())
}
