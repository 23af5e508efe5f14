//! Show command implementation

use std::path::PathBuf;

use crate::commands::render::{component_json, print_component};
use crate::context::Session;
use crate::error::{CliError, Result};

/// Print one resolved component of a document.
pub fn run_show(session: &Session, document: PathBuf, component_id: &str, json: bool) -> Result<()> {
    let model = session.resolve(std::slice::from_ref(&document))?;
    let delimiter = session.engine.parameter_prefix_delimiter.as_str();

    let component = model
        .configurations()
        .values()
        .find_map(|configuration| configuration.component_configuration(component_id))
        .ok_or_else(|| {
            let mut message = format!("Component not found: {component_id}");
            for (name, reason) in model.failures() {
                message.push_str(&format!("\n  configuration {name} failed to load: {reason}"));
            }
            CliError::user(message)
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&component_json(component, delimiter))?);
    } else {
        print_component(component, delimiter);
    }
    Ok(())
}
