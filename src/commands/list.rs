use askama::Template;
use clap::Args as ClapArgs;
use miette::IntoDiagnostic as _;
use serde::Serialize;
use termimad::MadSkin;

use crate::catalog::Catalog;

use super::Context;

#[derive(ClapArgs)]
pub struct Args {
    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// View Model
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ServerListItem {
    pub name: String,
    pub display_name: String,
    pub latest_version: String,

    /// First server version with TLS 1.3, `None` when it never supports it
    pub tls13: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelListItem {
    pub name: String,
    pub protocols: Vec<String>,
    pub oldest_clients: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub guidelines_version: String,
    pub dataset: String,
    pub servers: Vec<ServerListItem>,
    pub levels: Vec<LevelListItem>,
}

// ============================================================================
// Askama Template
// ============================================================================

#[derive(Template)]
#[template(path = "list.md")]
struct CatalogListTemplate<'a> {
    view: &'a CatalogView,
}

// ============================================================================
// Command Entry Point
// ============================================================================

pub fn run(args: Args, ctx: &Context) -> miette::Result<()> {
    let catalog = ctx.load_catalog()?;

    let dataset = match ctx.dataset_dir() {
        Some(dir) => dir.display().to_string(),
        None => "embedded".to_string(),
    };

    let view = build_catalog_view(&catalog, dataset);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view).into_diagnostic()?);
        return Ok(());
    }

    let markdown = CatalogListTemplate { view: &view }.render().into_diagnostic()?;
    MadSkin::default().print_text(&markdown);

    Ok(())
}

// ============================================================================
// View Building
// ============================================================================

fn build_catalog_view(catalog: &Catalog, dataset: String) -> CatalogView {
    let servers = catalog
        .server_names()
        .into_iter()
        .filter_map(|name| {
            let profile = catalog.server(name).ok()?;

            Some(ServerListItem {
                name: name.to_string(),
                display_name: profile.name.clone(),
                latest_version: profile.latest_version.clone(),
                tls13: profile.tls13.clone().filter(|x| !x.is_empty()),
            })
        })
        .collect();

    let levels = catalog
        .guidelines()
        .configurations
        .iter()
        .map(|(name, level)| LevelListItem {
            name: name.clone(),
            protocols: level.tls_versions.clone(),
            oldest_clients: level.oldest_clients.clone(),
        })
        .collect();

    CatalogView {
        guidelines_version: catalog.guidelines_version(),
        dataset,
        servers,
        levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::fixture;

    #[test]
    fn view_lists_templated_servers() {
        let view = build_catalog_view(&fixture(), "embedded".into());

        let names: Vec<_> = view.servers.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["gopher", "modest", "picky"]);

        let picky = &view.servers[2];
        assert_eq!(picky.display_name, "Picky");
        assert_eq!(picky.tls13, None);

        let levels: Vec<_> = view.levels.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(levels, vec!["intermediate", "modern", "old"]);
    }

    #[test]
    fn markdown_mentions_every_server() {
        let view = build_catalog_view(&fixture(), "/srv/dataset".into());

        let markdown = CatalogListTemplate { view: &view }.render().unwrap();

        assert!(markdown.contains("Mozilla guidelines 5.7"));
        assert!(markdown.contains("/srv/dataset"));
        assert!(markdown.contains("| modest | Modest | 2.4.62 | 2.4.36 |"));
        assert!(markdown.contains("| picky | Picky | 1.0 | never |"));
        assert!(markdown.contains("| old | TLSv1, TLSv1.1, TLSv1.2, TLSv1.3 | Firefox 1 |"));
    }
}
