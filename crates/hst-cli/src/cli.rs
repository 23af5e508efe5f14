//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// hstc - Resolve and inspect HST component configurations
#[derive(Parser, Debug)]
#[command(name = "hstc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine settings file (TOML)
    #[arg(long, global = true, env = "HSTC_ENGINE_CONFIG")]
    pub engine_config: Option<PathBuf>,

    /// Directory of parameters info definitions and class bindings
    #[arg(long, global = true, env = "HSTC_METADATA")]
    pub metadata: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve configuration documents and summarize every root
    ///
    /// Examples:
    ///   hstc resolve site.yaml
    ///   hstc resolve site.yaml intranet.toml --json
    Resolve {
        /// Configuration documents (.toml, .json, .yaml)
        #[arg(required = true)]
        documents: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show one resolved component
    ///
    /// Examples:
    ///   hstc show site.yaml hst:pages/home
    ///   hstc show site.yaml hst:pages/home/main --json
    Show {
        /// Configuration document
        document: PathBuf,

        /// Component id, for example hst:pages/home/main
        component_id: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Apply an experience page document to a layout
    Overlay {
        /// Configuration document holding the layout
        document: PathBuf,

        /// Id of the layout, for example hst:xpages/article
        layout_id: String,

        /// Experience page document
        xpage_document: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
