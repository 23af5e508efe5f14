//! hstc
//!
//! Command-line interface for resolving and inspecting HST component
//! configurations.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Session;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warnings only, or everything with --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose)
        .init();
    tracing::debug!("Verbose mode enabled");

    let Some(command) = cli.command else {
        println!("{} HST component configuration inspector", "hstc".green().bold());
        println!();
        println!("Run {} for available commands.", "hstc --help".cyan());
        return Ok(());
    };

    let session = Session::open(cli.engine_config.as_deref(), cli.metadata.as_deref())?;
    match command {
        Commands::Resolve { documents, json } => commands::run_resolve(&session, &documents, json),
        Commands::Show {
            document,
            component_id,
            json,
        } => commands::run_show(&session, document, &component_id, json),
        Commands::Overlay {
            document,
            layout_id,
            xpage_document,
            json,
        } => commands::run_overlay(&session, document, &layout_id, xpage_document, json),
    }
}
