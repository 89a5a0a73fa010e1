//! Upload provider abstraction for MediaStow.
//!
//! This module provides a trait-based interface for the upload backends a
//! content-management host mounts (local filesystem, in-memory) and a
//! provider registry for dynamic provider resolution.
//!
//! # Design Principles
//! - Provider isolation: hosts program against `UploadProvider` only
//! - Async operations: all I/O operations are async
//! - Streaming support: large payloads are handled via streams
//! - Deterministic layout: stored paths are a pure function of the
//!   descriptor, never of time or randomness

pub mod provider;
pub mod registry;
pub mod namespace;
pub mod memory;
pub mod local;

pub use provider::{UploadProvider, ByteStream, StoredFile, DeleteOutcome};
pub use registry::{ProviderRegistry, ProviderFactory, create_default_registry};
pub use memory::MemoryProvider;
pub use local::{LocalProvider, LocalConfig, create_local_provider};
