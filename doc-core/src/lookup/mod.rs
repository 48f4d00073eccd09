pub mod directory;
pub mod factory;
pub mod resources;
pub mod sequencer;
pub mod supplier;

pub use directory::{DocumentDirectory, LookupError};
pub use factory::{DirectoryFactory, DirectoryRegistry, LookupConfig};
pub use resources::{ResourceOption, ResourceOptions, load_resource_options};
pub use sequencer::{LookupSequencer, LookupTicket};
pub use supplier::{BlurAction, SupplierField, SupplierLookup};
