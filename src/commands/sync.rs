use std::path::PathBuf;

use clap::Args as ClapArgs;

use crate::sync;

use super::Context;

#[derive(ClapArgs)]
pub struct Args {
    /// The `src` directory of an ssl-config-generator checkout
    #[arg(long)]
    pub source: PathBuf,

    /// Dataset directory to update, defaults to the dataset in use
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Run `git pull` in the checkout first
    #[arg(long)]
    pub pull: bool,
}

pub fn run(args: Args, ctx: &Context) -> miette::Result<()> {
    let dest = args
        .dest
        .clone()
        .or_else(|| ctx.dataset_dir().map(|x| x.to_path_buf()))
        .ok_or_else(|| {
            miette::miette!(
                help = "pass --dest, or select a dataset with `ssl-config dataset use <DIR>`",
                "no dataset directory to update"
            )
        })?;

    let changes = sync::update(&args.source, &dest, args.pull)?;

    if changes.is_empty() {
        println!("Dataset is up to date");
    }

    for (path, change) in changes {
        println!("{} : {}", path, change);
    }

    Ok(())
}
