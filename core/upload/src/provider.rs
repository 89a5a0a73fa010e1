//! Upload provider trait definition.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use mediastow_common::{FileInfo, Result};

/// Name of the fixed subdirectory under the public-assets root, and the
/// leading segment of every served URL.
pub const UPLOADS_DIR: &str = "uploads";

/// Default payload size ceiling in bytes.
pub const DEFAULT_SIZE_LIMIT: u64 = 1_000_000;

/// Byte stream type for streamed store operations.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>> + Send>>;

/// Result of a successful store operation.
///
/// Returned to the caller instead of mutating the descriptor it passed in;
/// the host decides where to record the served URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Root-relative path clients use to fetch the file
    /// (`/uploads/<hash><ext>` or `/uploads/<namespace>/<hash><ext>`).
    pub url: String,
    /// Bytes actually written to the backing store.
    pub size: u64,
}

/// Outcome of a delete operation.
///
/// Deleting a file that is already gone is not an error; `Missing` tells
/// the caller there was nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file existed and was removed.
    Removed,
    /// No file existed at the derived path.
    Missing,
}

/// Upload provider trait for content-management hosts.
///
/// All operations are async and safe to share across the host's request
/// handlers. Stored paths are derived deterministically from the
/// descriptor, so repeated stores of the same descriptor overwrite.
#[async_trait]
pub trait UploadProvider: Send + Sync {
    /// Get the provider name (e.g., "local", "memory").
    fn name(&self) -> &str;

    /// Store a complete in-memory payload.
    ///
    /// # Preconditions
    /// - The declared `file.size()` must not exceed the configured limit
    ///
    /// # Postconditions
    /// - The payload is stored at the path derived from the descriptor,
    ///   replacing any previous content at that path
    /// - Returns the served URL and the number of bytes written
    ///
    /// # Errors
    /// - `PayloadTooLarge` when the size guard trips, before any I/O
    /// - Backing-store failures, propagated verbatim with no retry
    async fn upload(&self, file: &FileInfo, data: Vec<u8>) -> Result<StoredFile>;

    /// Store a payload from a byte stream.
    ///
    /// The size guard is applied to the declared `file.size()` before the
    /// stream is consumed; the bytes themselves are not measured up front.
    /// A failed transfer surfaces the error and leaves any partially
    /// written data in place.
    async fn upload_stream(&self, file: &FileInfo, stream: ByteStream) -> Result<StoredFile>;

    /// Remove a stored file.
    ///
    /// Only `hash` and `ext` are consulted: the path is always derived
    /// flat at the upload root, so files stored under a namespace are not
    /// reachable from here.
    ///
    /// # Errors
    /// - Backing-store failures other than the file being absent
    async fn delete(&self, file: &FileInfo) -> Result<DeleteOutcome>;
}
