use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::entities::{
    AnomalyAlert,
    Appeal,
    AuditEntry,
    Tenant,
    VerificationDocument,
    VerificationReview,
};
use crate::value_objects::{AlertId, AppealId, DocumentId, TenantId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    // The tenant row changed under the caller; reload and retry.
    #[error("version conflict")]
    VersionConflict,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

// Everything a single state transition writes. The implementation must
// commit the whole set or nothing: the audit entry and the transition it
// documents are never split.
#[derive(Debug)]
pub struct TransitionCommit {
    pub tenant: Tenant,
    pub expected_version: u64,
    pub review: Option<VerificationReview>,
    pub documents: Vec<VerificationDocument>,
    pub appeal: Option<Appeal>,
    pub audit: AuditEntry,
}

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: Tenant, audit: AuditEntry) -> Result<(), StoreError>;
    async fn get(&self, id: TenantId) -> Result<Tenant, StoreError>;
    async fn commit_transition(&self, commit: TransitionCommit) -> Result<Tenant, StoreError>;
    async fn approved_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Tenant>, StoreError>;
    async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
    async fn peers_by_student_count(
        &self,
        center: u32,
        radius: u32,
        exclude: TenantId,
    ) -> Result<Vec<Tenant>, StoreError>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn get(&self, id: DocumentId) -> Result<VerificationDocument, StoreError>;
    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<VerificationDocument>, StoreError>;
    async fn attach_analysis(
        &self,
        id: DocumentId,
        analysis: crate::entities::DocumentAnalysis,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<VerificationReview>, StoreError>;
    async fn latest_info_request(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<VerificationReview>, StoreError>;
    async fn count_rejections_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait AppealRepository: Send + Sync {
    async fn get(&self, id: AppealId) -> Result<Appeal, StoreError>;
    async fn open_for_tenant(&self, tenant_id: TenantId) -> Result<Option<Appeal>, StoreError>;
    async fn list_for_tenant(&self, tenant_id: TenantId) -> Result<Vec<Appeal>, StoreError>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    // Batch insert for one detection run. Idempotent per (day, kind):
    // alerts whose kind was already stored for `day` are dropped, and the
    // surviving set is written all-or-nothing. Returns what was stored.
    async fn insert_for_day(
        &self,
        day: NaiveDate,
        alerts: Vec<AnomalyAlert>,
    ) -> Result<Vec<AnomalyAlert>, StoreError>;
    async fn list(&self, acknowledged: Option<bool>) -> Result<Vec<AnomalyAlert>, StoreError>;
    // Idempotent: double-acknowledgement is not an error.
    async fn acknowledge(&self, id: AlertId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<(), StoreError>;
    async fn scan_for_tenant(&self, tenant_id: TenantId) -> Result<Vec<AuditEntry>, StoreError>;
}
