use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::StorageError;

/// Blob storage addressed by URL
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `content` and return the URL it can be fetched from
    async fn upload(&self, file_name: &str, content: &[u8]) -> Result<String, InternalError>;

    async fn get(&self, url: &str) -> Result<Vec<u8>, InternalError>;

    /// Deleting a file that no longer exists is not an error
    async fn delete(&self, url: &str) -> Result<(), InternalError>;
}

/// Stores files in a local directory served under `base_url`
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn path_for(&self, url: &str) -> Result<PathBuf, StorageError> {
        let name = url
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(StorageError::ForeignUrl(url.to_string()));
        }
        Ok(self.root.join(name))
    }
}

/// Lowercase alphanumeric extension of an uploaded file name, if any
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn upload(&self, file_name: &str, content: &[u8]) -> Result<String, InternalError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::Io {
                path: self.root.display().to_string(),
                source,
            })?;

        let stored_name = match extension_of(file_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.root.join(&stored_name);

        tokio::fs::write(&path, content)
            .await
            .map_err(|source| StorageError::Io {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!("Stored {} bytes at {}", content.len(), path.display());
        Ok(format!("{}/{}", self.base_url, stored_name))
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, InternalError> {
        let path = self.path_for(url)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(url.to_string()).into()),
            Err(source) => Err(StorageError::Io {
                path: path.display().to_string(),
                source,
            }
            .into()),
        }
    }

    async fn delete(&self, url: &str) -> Result<(), InternalError> {
        let path = self.path_for(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("File already gone: {}", path.display());
                Ok(())
            }
            Err(source) => Err(StorageError::Io {
                path: path.display().to_string(),
                source,
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/files/");

        let url = storage.upload("me.PNG", b"png-bytes").await.unwrap();
        assert!(url.starts_with("/files/"));
        assert!(url.ends_with(".png"));
        assert_eq!(storage.get(&url).await.unwrap(), b"png-bytes");

        storage.delete(&url).await.unwrap();
        assert!(matches!(
            storage.get(&url).await,
            Err(InternalError::Storage(StorageError::NotFound(_)))
        ));
        storage.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_and_traversal_urls_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/files");

        assert!(matches!(
            storage.get("https://elsewhere/x.png").await,
            Err(InternalError::Storage(StorageError::ForeignUrl(_)))
        ));
        assert!(matches!(
            storage.delete("/files/../secret").await,
            Err(InternalError::Storage(StorageError::ForeignUrl(_)))
        ));
    }
}
