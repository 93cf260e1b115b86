use clap::Parser;
use miette::Result;
use tracing::Level;

use ssl_config::{
    cli::{Cli, Commands},
    commands::{self, Context},
};

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let ctx = Context::load()?.with_data_dir(cli.data_dir);

    match cli.command {
        Commands::Generate(args) => commands::generate::run(args, &ctx),
        Commands::List(args) => commands::list::run(args, &ctx),
        Commands::Dataset(args) => commands::dataset::run(args, &ctx),
        Commands::Sync(args) => commands::sync::run(args, &ctx),
    }
}
