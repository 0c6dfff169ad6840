use std::sync::Arc;

use backend_domain::ports::{
    AlertRepository,
    AppealRepository,
    AuditRepository,
    DocumentRepository,
    DocumentStorage,
    NotificationDispatcher,
    ReviewRepository,
    TenantRepository,
};
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub document_repo: Arc<dyn DocumentRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub appeal_repo: Arc<dyn AppealRepository>,
    pub alert_repo: Arc<dyn AlertRepository>,
    pub audit_repo: Arc<dyn AuditRepository>,
    pub document_storage: Arc<dyn DocumentStorage>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub metrics: Arc<Metrics>,
}
