use std::path::{Path, PathBuf};

use crate::{
    catalog::Catalog,
    global::{self, Config},
};

pub mod dataset;
pub mod generate;
pub mod list;
pub mod sync;

/// What every command gets from the global flags and the settings file.
pub struct Context {
    pub config: Config,
    pub data_dir: Option<PathBuf>,
}

impl Context {
    pub fn load() -> miette::Result<Self> {
        Ok(Self {
            config: global::read_config()?,
            data_dir: None,
        })
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn dataset_dir(&self) -> Option<&Path> {
        global::dataset_dir(self.data_dir.as_deref(), &self.config)
    }

    pub fn load_catalog(&self) -> miette::Result<Catalog> {
        global::load_catalog(self.data_dir.as_deref(), &self.config)
    }
}
