use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::directory::{DocumentDirectory, LookupError};

/// The `[api]` section of the form configuration: which directory serves
/// supplier and resource lookups, and where it lives.
///
/// | backend  | connection                              |
/// |----------|-----------------------------------------|
/// | `http`   | application base URL, `http://host:port`|
/// | `memory` | seed CSV directory, empty for no data   |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub backend: String,
    pub connection: String,
    /// Applies to each supplier or resource request; ignored by `memory`.
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            connection: "http://localhost:8000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Builds a [`DocumentDirectory`] for one backend name.
#[async_trait]
pub trait DirectoryFactory: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &LookupConfig,
    ) -> Result<Box<dyn DocumentDirectory>, LookupError>;
}

/// Lookup backends linked into the binary, selected by `[api] backend`.
pub struct DirectoryRegistry {
    factories: HashMap<&'static str, Box<dyn DirectoryFactory>>,
}

impl DirectoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A later factory with the same name replaces the earlier one.
    pub fn register(
        &mut self,
        factory: Box<dyn DirectoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Sorted by name.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the directory named by `config.backend`. An unknown name is a
    /// [`LookupError::Configuration`] listing the registered backends.
    pub async fn create(
        &self,
        config: &LookupConfig,
    ) -> Result<Box<dyn DocumentDirectory>, LookupError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                LookupError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for DirectoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
