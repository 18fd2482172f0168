//! Generator configuration file.
//!
//! ```yaml
//! routes: routes.yaml
//! registry: doc/api.yaml
//! docs_output: doc/api.rst
//! format: rest
//! prefer_saved: true
//! access_rules:
//!   indivo::views::record: "The record owner, or an app with access to it"
//! defaults:
//!   url_params:
//!     RECORD_ID: "the record identifier"
//!   description:
//!     description: "Undocumented."
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use crate::access::AccessRules;
use crate::call::{DefaultMaps, Field};
use crate::error::{Error, Result};
use clap::ValueEnum;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Documentation output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    /// ReST `http` domain directives
    #[default]
    Rest,
    /// JSON dump of every call
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Routing table file
    pub routes: PathBuf,
    /// Registry file, read at start and rewritten when it changes
    pub registry: PathBuf,
    /// Where to write the docs; stdout when absent
    #[serde(default)]
    pub docs_output: Option<PathBuf>,
    #[serde(default)]
    pub format: DocFormat,
    /// Whether hand-edited text wins over discovered text
    #[serde(default = "default_prefer_saved")]
    pub prefer_saved: bool,
    /// Handler path (or short name) -> access rule documentation
    #[serde(default)]
    pub access_rules: BTreeMap<String, String>,
    #[serde(default)]
    pub defaults: DefaultMaps,
}

fn default_prefer_saved() -> bool {
    true
}

impl GeneratorConfig {
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Reads the config at `path` and resolves its relative paths.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        let mut config = Self::parse(&content).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.check_defaults();
        Ok(config)
    }

    pub fn access_rules(&self) -> AccessRules {
        AccessRules::new(self.access_rules.clone())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.routes);
        resolve(&mut self.registry);
        if let Some(output) = self.docs_output.as_mut() {
            resolve(output);
        }
    }

    fn check_defaults(&self) {
        for name in self.defaults.keys() {
            if Field::from_name(name).is_none() {
                warn!("Ignoring defaults for unknown field `{}`", name);
            }
        }
    }
}
