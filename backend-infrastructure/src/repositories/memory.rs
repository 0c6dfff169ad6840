// In-memory system of record implementing every repository port.
//
// All tables live behind one RwLock, so a TransitionCommit is applied
// inside a single writer critical section: the tenant update, the appended
// rows and the audit entry land together or not at all. Durable storage is
// a deployment concern behind the same ports.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use backend_domain::{
    AlertId,
    AlertRepository,
    AnomalyAlert,
    AnomalyKind,
    Appeal,
    AppealId,
    AppealRepository,
    AuditEntry,
    AuditRepository,
    DocumentAnalysis,
    DocumentId,
    DocumentRepository,
    EligibilityStatus,
    ReviewAction,
    ReviewRepository,
    StoreError,
    Tenant,
    TenantId,
    TenantRepository,
    TransitionCommit,
    VerificationDocument,
    VerificationReview,
};

#[derive(Default)]
struct Tables {
    tenants: HashMap<TenantId, Tenant>,
    documents: HashMap<DocumentId, VerificationDocument>,
    reviews: Vec<VerificationReview>,
    appeals: HashMap<AppealId, Appeal>,
    alerts: Vec<AnomalyAlert>,
    // Which (day, kind) pairs already produced an alert; the detector's
    // per-day idempotency key.
    alert_days: HashSet<(NaiveDate, AnomalyKind)>,
    audit: Vec<AuditEntry>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn create(&self, tenant: Tenant, audit: AuditEntry) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.tenants.insert(tenant.id, tenant);
        tables.audit.push(audit);
        Ok(())
    }

    async fn get(&self, id: TenantId) -> Result<Tenant, StoreError> {
        let tables = self.tables.read().await;
        tables
            .tenants
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("tenant"))
    }

    async fn commit_transition(&self, commit: TransitionCommit) -> Result<Tenant, StoreError> {
        let mut tables = self.tables.write().await;

        let current = tables
            .tenants
            .get(&commit.tenant.id)
            .ok_or(StoreError::NotFound("tenant"))?;
        if current.version != commit.expected_version {
            return Err(StoreError::VersionConflict);
        }

        if let Some(review) = commit.review {
            tables.reviews.push(review);
        }
        for document in commit.documents {
            tables.documents.insert(document.id, document);
        }
        if let Some(appeal) = commit.appeal {
            tables.appeals.insert(appeal.id, appeal);
        }
        tables.audit.push(commit.audit);
        tables.tenants.insert(commit.tenant.id, commit.tenant.clone());

        Ok(commit.tenant)
    }

    async fn approved_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Tenant>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tenants
            .values()
            .filter(|t| {
                t.eligibility_status == EligibilityStatus::Approved
                    && t.updated_at >= from
                    && t.updated_at <= to
            })
            .cloned()
            .collect())
    }

    async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tenants
            .values()
            .filter(|t| t.created_at >= from && t.created_at <= to)
            .count() as u64)
    }

    async fn peers_by_student_count(
        &self,
        center: u32,
        radius: u32,
        exclude: TenantId,
    ) -> Result<Vec<Tenant>, StoreError> {
        let tables = self.tables.read().await;
        let min = center.saturating_sub(radius);
        let max = center.saturating_add(radius);
        Ok(tables
            .tenants
            .values()
            .filter(|t| {
                t.id != exclude
                    && t.student_count
                        .map(|count| count >= min && count <= max)
                        .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn get(&self, id: DocumentId) -> Result<VerificationDocument, StoreError> {
        let tables = self.tables.read().await;
        tables
            .documents
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("document"))
    }

    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<VerificationDocument>, StoreError> {
        let tables = self.tables.read().await;
        let mut documents: Vec<_> = tables
            .documents
            .values()
            .filter(|d| d.tenant_id == tenant_id)
            .cloned()
            .collect();
        documents.sort_by_key(|d| d.uploaded_at);
        Ok(documents)
    }

    async fn attach_analysis(
        &self,
        id: DocumentId,
        analysis: DocumentAnalysis,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let document = tables
            .documents
            .get_mut(&id)
            .ok_or(StoreError::NotFound("document"))?;
        document.analysis = Some(analysis);
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<VerificationReview>, StoreError> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<_> = tables
            .reviews
            .iter()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| r.created_at);
        Ok(reviews)
    }

    async fn latest_info_request(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<VerificationReview>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.action == ReviewAction::RequestMoreInfo)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn count_rejections_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .filter(|r| {
                r.action == ReviewAction::Reject && r.created_at >= from && r.created_at <= to
            })
            .count() as u64)
    }
}

#[async_trait]
impl AppealRepository for MemoryStore {
    async fn get(&self, id: AppealId) -> Result<Appeal, StoreError> {
        let tables = self.tables.read().await;
        tables
            .appeals
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("appeal"))
    }

    async fn open_for_tenant(&self, tenant_id: TenantId) -> Result<Option<Appeal>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .appeals
            .values()
            .find(|a| a.tenant_id == tenant_id && a.is_open())
            .cloned())
    }

    async fn list_for_tenant(&self, tenant_id: TenantId) -> Result<Vec<Appeal>, StoreError> {
        let tables = self.tables.read().await;
        let mut appeals: Vec<_> = tables
            .appeals
            .values()
            .filter(|a| a.tenant_id == tenant_id)
            .cloned()
            .collect();
        appeals.sort_by_key(|a| a.submitted_at);
        Ok(appeals)
    }
}

#[async_trait]
impl AlertRepository for MemoryStore {
    async fn insert_for_day(
        &self,
        day: NaiveDate,
        alerts: Vec<AnomalyAlert>,
    ) -> Result<Vec<AnomalyAlert>, StoreError> {
        let mut tables = self.tables.write().await;
        let fresh: Vec<_> = alerts
            .into_iter()
            .filter(|a| !tables.alert_days.contains(&(day, a.kind)))
            .collect();
        for alert in &fresh {
            tables.alert_days.insert((day, alert.kind));
            tables.alerts.push(alert.clone());
        }
        Ok(fresh)
    }

    async fn list(&self, acknowledged: Option<bool>) -> Result<Vec<AnomalyAlert>, StoreError> {
        let tables = self.tables.read().await;
        let mut alerts: Vec<_> = tables
            .alerts
            .iter()
            .filter(|a| acknowledged.map(|wanted| a.acknowledged == wanted).unwrap_or(true))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
        Ok(alerts)
    }

    async fn acknowledge(&self, id: AlertId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let alert = tables
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound("alert"))?;
        alert.acknowledged = true;
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for MemoryStore {
    async fn append(&self, entry: AuditEntry) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.audit.push(entry);
        Ok(())
    }

    async fn scan_for_tenant(&self, tenant_id: TenantId) -> Result<Vec<AuditEntry>, StoreError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<_> = tables
            .audit
            .iter()
            .filter(|e| e.tenant_id == tenant_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.recorded_at);
        Ok(entries)
    }
}
