use crate::domain::ports::FileStore;
use crate::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::error;
use uuid::Uuid;

pub struct LocalFileStore {
    base_dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.base_dir).await.map_err(|e| {
            error!("Failed to create upload dir {:?}: {}", self.base_dir, e);
            AppError::Internal
        })?;

        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let path = self.base_dir.join(format!("{}{}", Uuid::new_v4(), extension));

        tokio::fs::write(&path, data).await.map_err(|e| {
            error!("Failed to write upload {:?}: {}", path, e);
            AppError::Internal
        })?;

        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        tokio::fs::remove_file(path).await.map_err(|e| {
            error!("Failed to remove upload {}: {}", path, e);
            AppError::Internal
        })
    }
}
