// Audit log entry
// Immutable forever; keyed (tenant, time) for chronological scans by the
// report compiler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    TenantRegistered,
    DocumentSubmitted,
    ReviewRecorded,
    AppealOpened,
    AppealDecided,
    AppealInfoProvided,
    RiskAssessed,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::TenantRegistered => "TENANT_REGISTERED",
            AuditAction::DocumentSubmitted => "DOCUMENT_SUBMITTED",
            AuditAction::ReviewRecorded => "REVIEW_RECORDED",
            AuditAction::AppealOpened => "APPEAL_OPENED",
            AuditAction::AppealDecided => "APPEAL_DECIDED",
            AuditAction::AppealInfoProvided => "APPEAL_INFO_PROVIDED",
            AuditAction::RiskAssessed => "RISK_ASSESSED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub tenant_id: TenantId,
    pub recorded_at: DateTime<Utc>,
    pub action: AuditAction,
    pub detail: serde_json::Value,
    pub performed_by: String,
}

impl AuditEntry {
    pub fn new(
        tenant_id: TenantId,
        action: AuditAction,
        detail: serde_json::Value,
        performed_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant_id,
            recorded_at: now,
            action,
            detail,
            performed_by: performed_by.into(),
        }
    }
}
