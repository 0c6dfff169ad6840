// Document type value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Accreditation,
    Approval,
    EnrollmentData,
    StudentIdSample,
    Registration,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Accreditation => "ACCREDITATION",
            DocumentType::Approval => "APPROVAL",
            DocumentType::EnrollmentData => "ENROLLMENT_DATA",
            DocumentType::StudentIdSample => "STUDENT_ID_SAMPLE",
            DocumentType::Registration => "REGISTRATION",
            DocumentType::Other => "OTHER",
        }
    }
}

// The five categories an application must cover before it counts as
// documentally complete. OTHER is accepted but never required.
pub const REQUIRED_DOCUMENT_TYPES: [DocumentType; 5] = [
    DocumentType::Accreditation,
    DocumentType::Approval,
    DocumentType::EnrollmentData,
    DocumentType::StudentIdSample,
    DocumentType::Registration,
];
