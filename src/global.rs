use std::path::{Path, PathBuf};

use miette::{Context, IntoDiagnostic};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{catalog::Catalog, resolver::DEFAULT_CONFIGURATION};

/// Overrides the directory holding `config.toml`.
pub const HOME_ENV: &str = "SSL_CONFIG_HOME";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DatasetConfig {
    /// Dataset directory, the embedded dataset is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub config: String,
    pub hsts: bool,
    pub ocsp: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            config: DEFAULT_CONFIGURATION.to_string(),
            hsts: true,
            ocsp: true,
        }
    }
}

pub fn home_dir() -> miette::Result<PathBuf> {
    if let Some(path) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(path));
    }

    let dir = dirs::config_dir()
        .ok_or_else(|| miette::miette!("failed to get config directory"))?
        .join("ssl-config");

    Ok(dir)
}

pub fn config_path() -> miette::Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_FILE))
}

pub fn read_config() -> miette::Result<Config> {
    read_config_from(&config_path()?)
}

/// Reads the settings file, a missing file means defaults.
pub fn read_config_from(path: &Path) -> miette::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .into_diagnostic()
        .context("reading ssl-config config.toml file")?;

    toml::from_str(&contents)
        .into_diagnostic()
        .context("parsing ssl-config config.toml file")
}

pub fn save_config(config: &Config) -> miette::Result<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &Config) -> miette::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .context("creating ssl-config home directory")?;
    }

    let toml_str = toml::to_string_pretty(config).into_diagnostic()?;

    std::fs::write(path, toml_str)
        .into_diagnostic()
        .context("saving ssl-config config.toml file")?;

    Ok(())
}

/// The dataset directory in effect: the command-line override, then the
/// settings file.
pub fn dataset_dir<'a>(data_dir: Option<&'a Path>, config: &'a Config) -> Option<&'a Path> {
    data_dir.or(config.dataset.path.as_deref())
}

pub fn load_catalog(data_dir: Option<&Path>, config: &Config) -> miette::Result<Catalog> {
    let catalog = match dataset_dir(data_dir, config) {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading dataset directory");
            Catalog::from_dir(dir)?
        }
        None => {
            debug!("loading embedded dataset");
            Catalog::embedded()?
        }
    };

    Ok(catalog)
}
