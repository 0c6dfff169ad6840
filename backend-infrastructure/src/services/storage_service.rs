use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use backend_domain::ports::{DocumentStorage, StoredObject};
use backend_domain::RuntimeConfig;

// Filesystem-backed document store. Blobs land under the configured
// directory with a generated object name; the caller only keeps the URL.
pub struct FileDocumentStorage {
    storage_dir: PathBuf,
    public_base_url: String,
}

impl FileDocumentStorage {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            storage_dir: PathBuf::from(&config.storage_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DocumentStorage for FileDocumentStorage {
    async fn store(
        &self,
        file_name: &str,
        _content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredObject> {
        fs::create_dir_all(&self.storage_dir).await?;

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin");
        let object_name = format!("{}.{}", Uuid::new_v4(), extension);
        fs::write(self.storage_dir.join(&object_name), bytes).await?;

        Ok(StoredObject {
            url: format!("{}/uploads/{}", self.public_base_url, object_name),
        })
    }
}
