use std::{io::IsTerminal as _, path::PathBuf};

use clap::Args as ClapArgs;
use inquire::Select;
use miette::{Context as _, IntoDiagnostic as _, bail};

use crate::{
    catalog::Catalog,
    render,
    resolver::{ResolveRequest, Resolver},
};

use super::Context;

#[derive(ClapArgs)]
pub struct Args {
    /// Server software to generate the configuration for
    #[arg(long, short)]
    pub server: Option<String>,

    /// Configuration level: modern, intermediate or old
    #[arg(long, short)]
    pub config: Option<String>,

    /// Server software version, latest if not specified
    #[arg(long)]
    pub server_version: Option<String>,

    /// OpenSSL version, latest if not specified
    #[arg(long)]
    pub openssl_version: Option<String>,

    /// Disable HTTP Strict Transport Security
    #[arg(long)]
    pub hsts_disable: bool,

    /// Disable OCSP stapling
    #[arg(long)]
    pub ocsp_disable: bool,

    /// Output file, printed to standard output if not specified
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the resolved template state as JSON instead of the configuration
    #[arg(long)]
    pub state: bool,
}

fn prompt_server(catalog: &Catalog) -> miette::Result<String> {
    if !std::io::stdin().is_terminal() {
        bail!(
            help = "pass it with --server, run `ssl-config list` to see the supported servers",
            "no server specified"
        );
    }

    let servers = catalog
        .server_names()
        .into_iter()
        .map(String::from)
        .collect();

    Select::new("Server software:", servers)
        .prompt()
        .into_diagnostic()
        .context("selecting server")
}

fn build_request(args: &Args, ctx: &Context, server: String) -> ResolveRequest {
    let defaults = &ctx.config.defaults;

    let config = args
        .config
        .clone()
        .unwrap_or_else(|| defaults.config.clone());

    let mut request = ResolveRequest::new(server)
        .with_config(config)
        .with_hsts(defaults.hsts && !args.hsts_disable)
        .with_ocsp(defaults.ocsp && !args.ocsp_disable);

    request.server_version = args.server_version.clone();
    request.openssl_version = args.openssl_version.clone();

    request
}

pub fn run(args: Args, ctx: &Context) -> miette::Result<()> {
    let catalog = ctx.load_catalog()?;

    let server = match args.server.clone() {
        Some(server) => server,
        None => prompt_server(&catalog)?,
    };

    let request = build_request(&args, ctx, server);

    catalog.server(&request.server)?;
    catalog.configuration(&request.config)?;

    let content = if args.state {
        let state = Resolver::new(&catalog).resolve(&request)?;
        serde_json::to_string_pretty(&state).into_diagnostic()?
    } else {
        render::generate(&catalog, &request)?
    };

    match args.output {
        Some(path) => std::fs::write(&path, content)
            .into_diagnostic()
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", content),
    }

    Ok(())
}
