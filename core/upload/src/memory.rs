//! In-memory upload provider for testing.

use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::namespace;
use crate::provider::{
    ByteStream, DeleteOutcome, StoredFile, UploadProvider, DEFAULT_SIZE_LIMIT, UPLOADS_DIR,
};
use mediastow_common::{Error, FileInfo, Result};

/// In-memory upload provider.
///
/// Useful for testing and development. Honors the same size limit,
/// namespace placement and delete contract as the local provider,
/// but keeps everything in a map keyed by public URL. All data is
/// lost on drop.
pub struct MemoryProvider {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    size_limit: u64,
}

impl MemoryProvider {
    /// Create a new empty memory provider with the default size limit.
    pub fn new() -> Self {
        Self::with_size_limit(DEFAULT_SIZE_LIMIT)
    }

    /// Create a new empty memory provider with an explicit size limit.
    pub fn with_size_limit(size_limit: u64) -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            size_limit,
        }
    }

    /// Stored bytes for a public URL, if present.
    pub fn contents(&self, url: &str) -> Option<Vec<u8>> {
        self.files.read().unwrap().get(url).cloned()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.files.read().unwrap().is_empty()
    }

    fn verify_size(&self, file: &FileInfo) -> Result<()> {
        if file.size() > self.size_limit {
            return Err(Error::PayloadTooLarge {
                size: file.size(),
                limit: self.size_limit,
            });
        }
        Ok(())
    }

    fn url_for(file: &FileInfo) -> String {
        match namespace::extract(file.name()) {
            Some(ns) => format!("/{}/{}/{}", UPLOADS_DIR, ns, file.file_name()),
            None => format!("/{}/{}", UPLOADS_DIR, file.file_name()),
        }
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UploadProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn upload(&self, file: &FileInfo, data: Vec<u8>) -> Result<StoredFile> {
        self.verify_size(file)?;

        let url = Self::url_for(file);
        let size = data.len() as u64;

        debug!(url = %url, size, "Storing upload in memory");
        self.files.write().unwrap().insert(url.clone(), data);

        Ok(StoredFile { url, size })
    }

    async fn upload_stream(&self, file: &FileInfo, mut stream: ByteStream) -> Result<StoredFile> {
        self.verify_size(file)?;

        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }

        self.upload(file, data).await
    }

    async fn delete(&self, file: &FileInfo) -> Result<DeleteOutcome> {
        // Same contract as the local provider: only the flat URL is
        // probed, regardless of any namespace in the declared name.
        let url = format!("/{}/{}", UPLOADS_DIR, file.file_name());

        match self.files.write().unwrap().remove(&url) {
            Some(_) => Ok(DeleteOutcome::Removed),
            None => Ok(DeleteOutcome::Missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn file(name: &str, hash: &str, ext: &str, size: u64) -> FileInfo {
        FileInfo::new(name, hash, ext, size).unwrap()
    }

    #[tokio::test]
    async fn test_upload_stores_under_url() {
        let provider = MemoryProvider::new();
        let data = b"Hello, World!".to_vec();

        let stored = provider
            .upload(&file("photo.png", "abc123", ".png", 13), data.clone())
            .await
            .unwrap();

        assert_eq!(stored.url, "/uploads/abc123.png");
        assert_eq!(provider.contents(&stored.url).unwrap(), data);
    }

    #[tokio::test]
    async fn test_namespaced_upload() {
        let provider = MemoryProvider::new();

        let stored = provider
            .upload(&file("::user42::a.png", "abc123", ".png", 1), vec![1])
            .await
            .unwrap();

        assert_eq!(stored.url, "/uploads/user42/abc123.png");
    }

    #[tokio::test]
    async fn test_size_limit_enforced() {
        let provider = MemoryProvider::with_size_limit(4);

        let err = provider
            .upload(&file("big.bin", "big", ".bin", 5), vec![0; 5])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PayloadTooLarge { size: 5, limit: 4 }));
        assert!(provider.is_empty());
    }

    #[tokio::test]
    async fn test_upload_stream_collects_chunks() {
        let provider = MemoryProvider::new();
        let chunks: Vec<Result<Vec<u8>>> = vec![Ok(b"ab".to_vec()), Ok(b"cd".to_vec())];

        let stored = provider
            .upload_stream(
                &file("photo.png", "abc123", ".png", 4),
                Box::pin(stream::iter(chunks)),
            )
            .await
            .unwrap();

        assert_eq!(stored.size, 4);
        assert_eq!(provider.contents(&stored.url).unwrap(), b"abcd");
    }

    #[tokio::test]
    async fn test_delete_is_namespace_blind() {
        let provider = MemoryProvider::new();
        let descriptor = file("::user42::a.png", "abc123", ".png", 1);

        provider.upload(&descriptor, vec![1]).await.unwrap();

        let outcome = provider.delete(&descriptor).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Missing);
        assert_eq!(provider.len(), 1);

        let flat = file("a.png", "abc123", ".png", 1);
        provider.upload(&flat, vec![2]).await.unwrap();
        let outcome = provider.delete(&flat).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Removed);
    }

    #[tokio::test]
    async fn test_delete_missing_resolves() {
        let provider = MemoryProvider::new();

        let outcome = provider
            .delete(&file("nope.png", "nope", ".png", 0))
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Missing);
    }
}
