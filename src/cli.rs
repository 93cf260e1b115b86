//! CLI parsing for ssl-config

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "ssl-config")]
#[command(about = "Server TLS configuration generator (Mozilla Server Side TLS guidelines)", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dataset directory, overrides the one in the settings file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the TLS configuration of a server
    Generate(commands::generate::Args),

    /// List supported servers and configuration levels
    List(commands::list::Args),

    /// Inspect and select the guideline dataset
    Dataset(commands::dataset::Args),

    /// Update a dataset directory from an ssl-config-generator checkout
    Sync(commands::sync::Args),
}
