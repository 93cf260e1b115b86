use std::path::PathBuf;

use clap::{Args as ClapArgs, Subcommand};
use miette::{Context as _, IntoDiagnostic as _};

use crate::{catalog::Catalog, global};

use super::Context;

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs)]
pub struct UseArgs {
    /// Dataset directory (guidelines.json, configs.js, templates/)
    pub dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the dataset in use
    Show,
    /// Use a dataset directory instead of the embedded dataset
    Use(UseArgs),
    /// Go back to the embedded dataset
    Reset,
}

pub fn run(args: Args, ctx: &Context) -> miette::Result<()> {
    let mut config = ctx.config.clone();

    match args.command {
        Command::Show => {
            let catalog = ctx.load_catalog()?;

            match ctx.dataset_dir() {
                Some(dir) => println!("Dataset: {}", dir.display()),
                None => println!("Dataset: embedded"),
            }

            println!("Guidelines: {}", catalog.guidelines_version());
            println!("Servers: {}", catalog.server_names().join(", "));
        }
        Command::Use(args) => {
            let dir = std::path::absolute(&args.dir)
                .into_diagnostic()
                .context("resolving dataset directory")?;

            Catalog::from_dir(&dir)?;

            config.dataset.path = Some(dir.clone());
            global::save_config(&config)?;

            println!("Dataset: {}", dir.display());
        }
        Command::Reset => {
            config.dataset.path = None;
            global::save_config(&config)?;

            println!("Dataset: embedded");
        }
    }

    Ok(())
}
