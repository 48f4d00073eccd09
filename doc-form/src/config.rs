//! TOML configuration for the form runner.
//!
//! ```toml
//! [api]
//! backend = "http"
//! connection = "http://localhost:8000"
//! timeout_secs = 10
//!
//! [logging]
//! level = "info"
//! stdout = true
//! file = "doc-form.log"
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use doc_core::lookup::LookupConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or any `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    pub stdout: bool,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            stdout: true,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub api: LookupConfig,
    pub logging: LoggingConfig,
}

impl FormConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
