pub mod session;

pub use session::{
    DocumentSubmission, FormEvent, FormProjection, FormSession, InitialValues, SessionMode,
};
