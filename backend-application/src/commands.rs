pub mod appeal_commands;
pub mod detection_commands;
pub mod document_commands;
pub mod review_commands;
pub mod tenant_commands;
