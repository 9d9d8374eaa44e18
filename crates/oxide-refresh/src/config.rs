//! Project configuration.
//!
//! A project is described by an optional `refresh.json` next to the
//! models directory:
//!
//! ```json
//! {
//!     "database": "sqlite:warehouse.db",
//!     "schema": "main",
//!     "models_dir": "models",
//!     "announce": true,
//!     "models": [
//!         { "name": "orders" },
//!         { "name": "customers_v2", "identifier": "customers" }
//!     ]
//! }
//! ```
//!
//! Every field is optional. When `models` is empty, every `*.sql` file in
//! `models_dir` is a model whose target identifier is its file stem.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::relation::RelationName;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "refresh.json";

/// A model and the table it refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model reference, resolved to `<models_dir>/<name>.sql`.
    pub name: String,
    /// Target table identifier. Defaults to the model name.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Target schema. Defaults to the project schema.
    #[serde(default)]
    pub schema: Option<String>,
}

impl ModelConfig {
    /// Creates a model config targeting a table of the same name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            schema: None,
        }
    }
}

/// Project-wide refresh settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Database URL. The command line and `DATABASE_URL` take precedence.
    pub database: Option<String>,
    /// Database (catalog) part of target names.
    pub database_name: String,
    /// Default schema for targets.
    pub schema: String,
    /// Directory holding `<model>.sql` files, relative to the config file.
    pub models_dir: PathBuf,
    /// Announce refresh events at `info` level.
    pub announce: bool,
    /// Configured models. Empty means "discover from `models_dir`".
    pub models: Vec<ModelConfig>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            database: None,
            database_name: String::new(),
            schema: "main".to_string(),
            models_dir: PathBuf::from("models"),
            announce: true,
            models: Vec::new(),
        }
    }
}

impl RefreshConfig {
    /// Loads a config file. A relative `models_dir` is resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&text)?;
        if config.models_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.models_dir = parent.join(&config.models_dir);
            }
        }
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the configured model with the given name, or a default
    /// entry for it.
    #[must_use]
    pub fn model(&self, name: &str) -> ModelConfig {
        self.models
            .iter()
            .find(|m| m.name == name)
            .cloned()
            .unwrap_or_else(|| ModelConfig::new(name))
    }

    /// Returns the relation a model refreshes.
    #[must_use]
    pub fn target_for(&self, model: &ModelConfig) -> RelationName {
        RelationName::new(
            self.database_name.clone(),
            model.schema.clone().unwrap_or_else(|| self.schema.clone()),
            model.identifier.clone().unwrap_or_else(|| model.name.clone()),
        )
    }
}
