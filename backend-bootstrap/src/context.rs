use std::sync::Arc;

use anyhow::Result;

use backend_application::{AppState, Metrics};
use backend_infrastructure::{AppConfig, FileDocumentStorage, MemoryStore, WebhookNotifier};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();

        let store = Arc::new(MemoryStore::new());
        let document_storage = Arc::new(FileDocumentStorage::new(&runtime_config));
        let notifier = Arc::new(WebhookNotifier::new(runtime_config.clone()));

        let state = AppState {
            config: runtime_config,
            tenant_repo: store.clone(),
            document_repo: store.clone(),
            review_repo: store.clone(),
            appeal_repo: store.clone(),
            alert_repo: store.clone(),
            audit_repo: store,
            document_storage,
            notifier,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
