//! Local filesystem upload provider.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::namespace;
use crate::provider::{
    ByteStream, DeleteOutcome, StoredFile, UploadProvider, DEFAULT_SIZE_LIMIT, UPLOADS_DIR,
};
use mediastow_common::{Error, FileInfo, Result};

/// Local provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Public-assets root supplied by the host framework. The provider
    /// only ever appends the fixed `uploads` segment to it.
    pub public_root: PathBuf,
    /// Maximum accepted payload size in bytes.
    #[serde(default = "default_size_limit")]
    pub size_limit: u64,
}

fn default_size_limit() -> u64 {
    DEFAULT_SIZE_LIMIT
}

/// Local filesystem upload provider.
///
/// Stores uploads under `<public_root>/uploads`, optionally grouped into a
/// namespace subdirectory extracted from the declared file name. Stored
/// paths are a pure function of `(namespace, hash, ext)`; identical
/// descriptors overwrite silently.
#[derive(Debug)]
pub struct LocalProvider {
    root: PathBuf,
    size_limit: u64,
}

impl LocalProvider {
    /// Create a new local provider.
    ///
    /// # Preconditions
    /// - `<public_root>/uploads` must exist and be a directory
    /// - `size_limit` must be positive
    ///
    /// # Postconditions
    /// - Provider is bound to the resolved absolute upload root
    ///
    /// # Errors
    /// - `Configuration` naming the missing or inaccessible directory
    ///
    /// The upload root is never created here. Only namespace
    /// subdirectories beneath it are created on demand during stores.
    pub fn new(config: LocalConfig) -> Result<Self> {
        let root = config.public_root.join(UPLOADS_DIR);
        let root = root.canonicalize().map_err(|_| {
            Error::Configuration(format!(
                "The upload directory ({}) doesn't exist or is not accessible",
                root.display()
            ))
        })?;
        if !root.is_dir() {
            return Err(Error::Configuration(format!(
                "The upload path ({}) is not a directory",
                root.display()
            )));
        }
        if config.size_limit == 0 {
            return Err(Error::Configuration(
                "The size limit must be a positive number of bytes".to_string(),
            ));
        }

        Ok(Self {
            root,
            size_limit: config.size_limit,
        })
    }

    /// Resolved upload root this provider is bound to.
    pub fn root(&self) -> &Path {
        &self.root
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

    /// Compute the directory a descriptor stores into, creating the
    /// namespace subdirectory when one is present. Creation is recursive
    /// and idempotent, so concurrent stores into a new namespace cannot
    /// conflict.
    async fn target_dir(&self, file: &FileInfo) -> Result<(PathBuf, Option<String>)> {
        match namespace::extract(file.name()) {
            Some(ns) => {
                let dir = self.root.join(ns);
                fs::create_dir_all(&dir).await?;
                Ok((dir, Some(ns.to_string())))
            }
            None => Ok((self.root.clone(), None)),
        }
    }

    fn url_for(ns: Option<&str>, file_name: &str) -> String {
        match ns {
            Some(ns) => format!("/{}/{}/{}", UPLOADS_DIR, ns, file_name),
            None => format!("/{}/{}", UPLOADS_DIR, file_name),
        }
    }
}

#[async_trait]
impl UploadProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn upload(&self, file: &FileInfo, data: Vec<u8>) -> Result<StoredFile> {
        self.verify_size(file)?;

        let (dir, ns) = self.target_dir(file).await?;
        let file_name = file.file_name();
        let target = dir.join(&file_name);

        debug!(hash = %file.hash(), target = %target.display(), "Storing buffered upload");

        fs::write(&target, &data).await?;

        let stored = StoredFile {
            url: Self::url_for(ns.as_deref(), &file_name),
            size: data.len() as u64,
        };

        info!(url = %stored.url, size = stored.size, "Upload stored");
        Ok(stored)
    }

    async fn upload_stream(&self, file: &FileInfo, mut stream: ByteStream) -> Result<StoredFile> {
        self.verify_size(file)?;

        let (dir, ns) = self.target_dir(file).await?;
        let file_name = file.file_name();
        let target = dir.join(&file_name);

        debug!(hash = %file.hash(), target = %target.display(), "Storing streamed upload");

        // A failed transfer leaves the partially written file in place.
        let mut out = fs::File::create(&target).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;

        let stored = StoredFile {
            url: Self::url_for(ns.as_deref(), &file_name),
            size: written,
        };

        info!(url = %stored.url, size = stored.size, "Upload stored");
        Ok(stored)
    }

    async fn delete(&self, file: &FileInfo) -> Result<DeleteOutcome> {
        // Always the flat root path: a namespace in the declared name is
        // not consulted, so namespaced files are not reachable from here.
        let target = self.root.join(file.file_name());

        match fs::remove_file(&target).await {
            Ok(()) => {
                info!(target = %target.display(), "Upload removed");
                Ok(DeleteOutcome::Removed)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(target = %target.display(), "No upload to remove");
                Ok(DeleteOutcome::Missing)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Create a local provider from a JSON options value.
pub fn create_local_provider(options: serde_json::Value) -> Result<Arc<dyn UploadProvider>> {
    let config: LocalConfig = serde_json::from_value(options)
        .map_err(|e| Error::InvalidInput(format!("Invalid local provider config: {}", e)))?;

    Ok(Arc::new(LocalProvider::new(config)?))
}
