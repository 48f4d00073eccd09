mod discount_mode;
mod document_status;
mod document_type;
mod resource;
mod supplier;

pub use discount_mode::DiscountMode;
pub use document_status::DocumentStatus;
pub use document_type::DocumentType;
pub use resource::Resource;
pub use supplier::Supplier;
