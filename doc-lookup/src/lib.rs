//! Lookup backends for the document form.
//!
//! Register them with a [`DirectoryRegistry`] to make the `"http"` and
//! `"memory"` backends available:
//!
//! ```rust
//! use doc_core::lookup::DirectoryRegistry;
//!
//! let mut registry = DirectoryRegistry::new();
//! doc_lookup::register_backends(&mut registry);
//! assert_eq!(registry.available_backends(), vec!["http", "memory"]);
//! ```

pub mod http;
pub mod memory;

use doc_core::lookup::DirectoryRegistry;

pub use http::{HttpDirectory, HttpDirectoryFactory};
pub use memory::{MemoryDirectory, MemoryDirectoryFactory};

/// Registers every backend this crate provides.
pub fn register_backends(registry: &mut DirectoryRegistry) {
    registry.register(Box::new(HttpDirectoryFactory));
    registry.register(Box::new(MemoryDirectoryFactory));
}
