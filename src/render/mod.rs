//! Renders a resolved state through the server's Handlebars template.

use handlebars::Handlebars;
use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Catalog,
    resolver::{self, ResolveRequest, ResolvedState, Resolver},
};

pub mod helpers;

pub use helpers::TemplateHelper;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] resolver::Error),

    #[error("invalid template for server '{name}'")]
    #[diagnostic(help("Fix the template in the dataset, or run `ssl-config dataset reset`"))]
    InvalidTemplate {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("no template for server '{0}'")]
    MissingTemplate(String),

    #[error("can't render template for server '{name}'")]
    Render {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },
}

pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    pub fn new(catalog: &Catalog) -> Result<Self, Error> {
        let mut handlebars = Handlebars::new();

        // output is configuration text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        helpers::register(&mut handlebars);

        for (name, content) in catalog.templates() {
            handlebars
                .register_template_string(name, content)
                .map_err(|source| Error::InvalidTemplate {
                    name: name.to_string(),
                    source: Box::new(source),
                })?;
        }

        Ok(Self { handlebars })
    }

    pub fn render(&self, server: &str, state: &ResolvedState) -> Result<String, Error> {
        if !self.handlebars.has_template(server) {
            return Err(Error::MissingTemplate(server.to_string()));
        }

        let output = self
            .handlebars
            .render(server, state)
            .map_err(|source| Error::Render {
                name: server.to_string(),
                source: Box::new(source),
            })?;

        debug!(server, bytes = output.len(), "configuration rendered");

        Ok(output)
    }
}

/// Resolves the request and renders the server template in one go.
pub fn generate(catalog: &Catalog, request: &ResolveRequest) -> Result<String, Error> {
    let state = Resolver::new(catalog).resolve(request)?;

    Renderer::new(catalog)?.render(&request.server, &state)
}
