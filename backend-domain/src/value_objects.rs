pub mod document_type;
pub mod identifiers;
pub mod severity;
pub mod statuses;

pub use document_type::*;
pub use identifiers::*;
pub use severity::*;
pub use statuses::*;
