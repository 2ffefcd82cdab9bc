//! File storage for documents and generated letters
//!
//! Paths are relative keys such as `{company}/{employee}/{uuid}.pdf`; the
//! public URL is the configured base joined with the key.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `bytes` under `path`, replacing any previous content.
    async fn put(&self, path: &str, bytes: Vec<u8>) -> AppResult<()>;
    /// Remove a stored file. Missing files are not an error.
    async fn remove(&self, path: &str) -> AppResult<()>;
    /// URL clients use to fetch the file.
    fn public_url(&self, path: &str) -> String;
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Reject keys that would escape the storage root.
fn checked_relative(path: &str) -> AppResult<&Path> {
    let candidate = Path::new(path);
    let safe = !path.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(candidate)
    } else {
        Err(AppError::Storage(format!("invalid storage path: {}", path)))
    }
}

/// Files under a local directory, served by the router at `/files`
pub struct LocalFileStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> AppResult<()> {
        let full = self.root.join(checked_relative(path)?);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("creating {}: {}", parent.display(), e)))?;
        }
        tokio::fs::write(&full, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("writing {}: {}", full.display(), e)))?;
        debug!("💾 Stored {}", full.display());
        Ok(())
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        let full = self.root.join(checked_relative(path)?);
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("removing {}: {}", full.display(), e))),
        }
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

/// Files kept in memory, for tests
#[derive(Default)]
pub struct MemoryFileStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
    base_url: String,
}

impl MemoryFileStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            base_url: base_url.into(),
        }
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> AppResult<()> {
        checked_relative(path)?;
        self.files.write().await.insert(path.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        self.files.write().await.remove(path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_joins_base_and_key() {
        let storage = MemoryFileStorage::new("/files/");
        assert_eq!(storage.public_url("c/e/doc.pdf"), "/files/c/e/doc.pdf");
    }

    #[test]
    fn test_rejects_escaping_paths() {
        assert!(checked_relative("../etc/passwd").is_err());
        assert!(checked_relative("/abs/path").is_err());
        assert!(checked_relative("").is_err());
        assert!(checked_relative("a/b/c.html").is_ok());
    }

    #[tokio::test]
    async fn test_local_storage_put_and_remove() {
        let root = std::env::temp_dir().join(format!("hr_admin_storage_{}", uuid::Uuid::new_v4()));
        let storage = LocalFileStorage::new(&root, "/files");

        storage.put("acme/letters/offer.html", b"<p>hi</p>".to_vec()).await.unwrap();
        let written = tokio::fs::read(root.join("acme/letters/offer.html")).await.unwrap();
        assert_eq!(written, b"<p>hi</p>");

        storage.remove("acme/letters/offer.html").await.unwrap();
        // Removing twice is fine.
        storage.remove("acme/letters/offer.html").await.unwrap();

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
