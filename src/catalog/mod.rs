//! Read-only view over the guideline dataset: the Mozilla guideline document,
//! the per-server capability table and the per-server templates.
//!
//! A dataset directory follows the layout of the upstream generator:
//!
//! ```text
//! guidelines.json
//! configs.js
//! ffdhe2048.txt
//! ffdhe4096.txt
//! templates/<server>.hbs
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

mod configs_js;
pub(crate) mod embedded;
pub mod model;

pub use model::*;

pub const GUIDELINES_FILE: &str = "guidelines.json";
pub const CONFIGS_FILE: &str = "configs.js";
pub const TEMPLATES_DIR: &str = "templates";
pub const TEMPLATE_EXTENSION: &str = "hbs";

/// Entry of the server table that describes the TLS library.
pub const LIBRARY_KEY: &str = "openssl";

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("can't read dataset file {}", path.display())]
    #[diagnostic(help(
        "Check the dataset directory, or run `ssl-config dataset reset` to use the embedded dataset"
    ))]
    CantRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid guidelines document: {0}")]
    InvalidGuidelines(#[source] serde_json::Error),

    #[error("invalid server table: {0}")]
    InvalidServerTable(#[source] serde_json::Error),

    #[error("invalid entry '{name}' in server table: {source}")]
    InvalidProfile {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("server table has no '{0}' entry")]
    MissingLibrary(&'static str),

    #[error("server '{server}' uses cipher format '{format}', missing from the '{config}' configuration")]
    UnknownCipherFormat {
        server: String,
        format: String,
        config: String,
    },

    #[error("unknown server '{0}'")]
    #[diagnostic(help("Run `ssl-config list` to see the supported servers"))]
    UnknownServer(String),

    #[error("unknown configuration '{0}'")]
    #[diagnostic(help("Run `ssl-config list` to see the configuration levels"))]
    UnknownConfiguration(String),
}

/// Where pre-generated Diffie-Hellman groups are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhParamSource {
    /// A dataset directory holding `ffdhe<size>.txt` files
    Directory(PathBuf),

    /// A base URL serving `ffdhe<size>.txt` files
    Remote(String),
}

impl DhParamSource {
    /// Shell command that prints the `ffdhe<size>` group.
    pub fn command(&self, size: u32) -> String {
        let file = format!("ffdhe{}.txt", size);

        match self {
            DhParamSource::Directory(dir) => format!("cat {}", dir.join(file).display()),
            DhParamSource::Remote(base) => {
                format!("curl {}/{}", base.trim_end_matches('/'), file)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    guidelines: Guidelines,
    document: serde_json::Value,
    servers: BTreeMap<String, ServerProfile>,
    library: LibraryProfile,
    templates: BTreeMap<String, String>,
    dh_params: DhParamSource,
}

fn read(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|source| Error::CantRead {
        path: path.to_path_buf(),
        source,
    })
}

impl Catalog {
    /// The dataset compiled into the binary.
    pub fn embedded() -> Result<Self, Error> {
        let templates = embedded::TEMPLATES
            .iter()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect();

        Self::from_parts(
            embedded::GUIDELINES_JSON,
            embedded::CONFIGS_JS,
            templates,
            DhParamSource::Remote(embedded::DH_PARAMS_URL.to_string()),
        )
    }

    pub fn from_dir(dir: &Path) -> Result<Self, Error> {
        let guidelines = read(&dir.join(GUIDELINES_FILE))?;
        let configs = read(&dir.join(CONFIGS_FILE))?;

        let templates_dir = dir.join(TEMPLATES_DIR);
        let cant_read = |source| Error::CantRead {
            path: templates_dir.clone(),
            source,
        };

        let mut templates = BTreeMap::new();

        for entry in std::fs::read_dir(&templates_dir).map_err(cant_read)? {
            let path = entry.map_err(cant_read)?.path();

            if path.extension().and_then(|x| x.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|x| x.to_str()) else {
                continue;
            };

            templates.insert(name.to_string(), read(&path)?);
        }

        Self::from_parts(
            &guidelines,
            &configs,
            templates,
            DhParamSource::Directory(dir.to_path_buf()),
        )
    }

    pub fn from_parts(
        guidelines: &str,
        configs: &str,
        templates: BTreeMap<String, String>,
        dh_params: DhParamSource,
    ) -> Result<Self, Error> {
        let document: serde_json::Value =
            serde_json::from_str(guidelines).map_err(Error::InvalidGuidelines)?;

        let parsed: Guidelines =
            serde_json::from_value(document.clone()).map_err(Error::InvalidGuidelines)?;

        let mut table: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&configs_js::to_json(configs))
                .map_err(Error::InvalidServerTable)?;

        let library = table
            .remove(LIBRARY_KEY)
            .ok_or(Error::MissingLibrary(LIBRARY_KEY))?;

        let library = serde_json::from_value(library).map_err(|source| Error::InvalidProfile {
            name: LIBRARY_KEY.to_string(),
            source,
        })?;

        let mut servers = BTreeMap::new();

        for (name, value) in table {
            match serde_json::from_value::<ServerProfile>(value) {
                Ok(profile) => {
                    servers.insert(name, profile);
                }
                Err(source) => return Err(Error::InvalidProfile { name, source }),
            }
        }

        let catalog = Self {
            guidelines: parsed,
            document,
            servers,
            library,
            templates,
            dh_params,
        };

        catalog.check_cipher_formats()?;

        debug!(
            version = %catalog.guidelines.version,
            servers = catalog.server_names().len(),
            configurations = catalog.guidelines.configurations.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    fn check_cipher_formats(&self) -> Result<(), Error> {
        for name in self.server_names() {
            let format = &self.servers[name].cipher_format;

            for (config, guideline) in self.guidelines.configurations.iter() {
                if !guideline.ciphers.contains_key(format) {
                    return Err(Error::UnknownCipherFormat {
                        server: name.to_string(),
                        format: format.clone(),
                        config: config.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Servers that have both a profile and a template, sorted by name.
    pub fn server_names(&self) -> Vec<&str> {
        self.templates
            .keys()
            .filter(|name| self.servers.contains_key(*name))
            .map(String::as_str)
            .collect()
    }

    pub fn configuration_names(&self) -> Vec<&str> {
        self.guidelines
            .configurations
            .keys()
            .map(String::as_str)
            .collect()
    }

    pub fn server(&self, name: &str) -> Result<&ServerProfile, Error> {
        match self.servers.get(name) {
            Some(profile) if self.templates.contains_key(name) => Ok(profile),
            _ => Err(Error::UnknownServer(name.to_string())),
        }
    }

    pub fn configuration(&self, name: &str) -> Result<&GuidelineConfiguration, Error> {
        self.guidelines
            .configurations
            .get(name)
            .ok_or_else(|| Error::UnknownConfiguration(name.to_string()))
    }

    pub fn library(&self) -> &LibraryProfile {
        &self.library
    }

    pub fn template(&self, server: &str) -> Option<&str> {
        self.templates.get(server).map(String::as_str)
    }

    pub fn templates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }

    pub fn guidelines(&self) -> &Guidelines {
        &self.guidelines
    }

    /// The guideline document exactly as loaded, handed to templates.
    pub fn guidelines_document(&self) -> &serde_json::Value {
        &self.document
    }

    pub fn guidelines_version(&self) -> String {
        self.guidelines.version.to_string()
    }

    pub fn dh_params(&self) -> &DhParamSource {
        &self.dh_params
    }
}
