pub mod calculations;
pub mod form;
pub mod lookup;
pub mod models;
pub mod tax_id;

pub use form::{FormEvent, FormSession};
pub use lookup::{DocumentDirectory, LookupError};
pub use models::*;
