pub mod anomaly;
pub mod appeal;
pub mod assessment;
pub mod audit;
pub mod document;
pub mod review;
pub mod runtime;
pub mod tenant;

pub use anomaly::*;
pub use appeal::*;
pub use assessment::*;
pub use audit::*;
pub use document::*;
pub use review::*;
pub use runtime::*;
pub use tenant::*;
