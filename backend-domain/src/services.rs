pub mod detection;
pub mod lifecycle;
pub mod prediction;
pub mod risk;

pub use detection::*;
pub use lifecycle::*;
pub use prediction::*;
pub use risk::*;
