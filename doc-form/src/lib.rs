pub mod config;
pub mod logging;
pub mod replay;
pub mod script;

use doc_core::lookup::DirectoryRegistry;

pub use config::{ConfigError, FormConfig, LoggingConfig};
pub use replay::{ReplayOutcome, replay};
pub use script::{ScriptError, ScriptStep, load_script, parse_script};

/// Registry with every lookup backend linked into this binary.
pub fn build_registry() -> DirectoryRegistry {
    let mut registry = DirectoryRegistry::new();
    doc_lookup::register_backends(&mut registry);
    registry
}
