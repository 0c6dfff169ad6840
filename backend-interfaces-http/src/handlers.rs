pub mod analytics_handlers;
pub mod appeal_handlers;
pub mod ops_handlers;
pub mod verification_handlers;
