//! MediaStow CLI - Command line interface for upload operations.
//!
//! This tool drives an upload provider end-to-end: store a file under a
//! public root (buffered or streamed) and delete stored files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mediastow_common::FileInfo;
use mediastow_upload::{create_default_registry, ByteStream, DeleteOutcome, UploadProvider};

#[derive(Parser)]
#[command(name = "mediastow")]
#[command(about = "MediaStow - Local upload management")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file under the public root.
    Store {
        /// Public-assets root containing the uploads directory.
        #[arg(short, long)]
        public_root: PathBuf,

        /// Source file to store.
        #[arg(short, long)]
        source: PathBuf,

        /// Declared file name; a `::<namespace>::` token groups the file
        /// into a namespace subdirectory. Defaults to the source file name.
        #[arg(short, long)]
        name: Option<String>,

        /// Stored file stem. Defaults to the source file stem.
        #[arg(long)]
        hash: Option<String>,

        /// Maximum accepted payload size in bytes.
        #[arg(long)]
        size_limit: Option<u64>,

        /// Stream the file chunk by chunk instead of buffering it.
        #[arg(long)]
        streamed: bool,
    },

    /// Delete a stored file by its stem and extension.
    Delete {
        /// Public-assets root containing the uploads directory.
        #[arg(short, long)]
        public_root: PathBuf,

        /// Stored file stem.
        #[arg(long)]
        hash: String,

        /// Stored file extension, including the leading dot.
        #[arg(short, long, default_value = "")]
        ext: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Store {
            public_root,
            source,
            name,
            hash,
            size_limit,
            streamed,
        } => {
            cmd_store(
                &public_root,
                &source,
                name.as_deref(),
                hash.as_deref(),
                size_limit,
                streamed,
            )
            .await
        }

        Commands::Delete {
            public_root,
            hash,
            ext,
        } => cmd_delete(&public_root, &hash, &ext).await,
    }
}

/// Resolve the local provider from the default registry.
fn resolve_local(
    public_root: &PathBuf,
    size_limit: Option<u64>,
) -> Result<Arc<dyn UploadProvider>> {
    let mut config = serde_json::json!({ "public_root": public_root });
    if let Some(limit) = size_limit {
        config["size_limit"] = serde_json::json!(limit);
    }

    create_default_registry()
        .resolve("local", config)
        .context("Failed to initialize the local provider")
}

/// Build the upload descriptor from the source path and overrides.
fn describe(source: &PathBuf, name: Option<&str>, hash: Option<&str>, size: u64) -> Result<FileInfo> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .context("Source path has no usable file name")?;

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Source path has no usable file stem")?;

    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let info = FileInfo::new(name.unwrap_or(file_name), hash.unwrap_or(stem), ext, size)
        .context("Invalid upload descriptor")?;

    Ok(info)
}

/// Store a file under the public root.
async fn cmd_store(
    public_root: &PathBuf,
    source: &PathBuf,
    name: Option<&str>,
    hash: Option<&str>,
    size_limit: Option<u64>,
    streamed: bool,
) -> Result<()> {
    info!("Storing {} under {}", source.display(), public_root.display());

    let provider = resolve_local(public_root, size_limit)?;
    let declared = tokio::fs::metadata(source)
        .await
        .context("Failed to read source file metadata")?
        .len();
    let file = describe(source, name, hash, declared)?;

    let stored = if streamed {
        let reader = tokio::fs::File::open(source)
            .await
            .context("Failed to open source file")?;
        provider
            .upload_stream(&file, chunk_reader(reader))
            .await
            .context("Failed to store file")?
    } else {
        let content = tokio::fs::read(source)
            .await
            .context("Failed to read source file")?;
        provider
            .upload(&file, content)
            .await
            .context("Failed to store file")?
    };

    println!("File stored successfully!");
    println!("  URL: {}", stored.url);
    println!("  Size: {} bytes", stored.size);

    Ok(())
}

/// Delete a stored file by its stem and extension.
async fn cmd_delete(public_root: &PathBuf, hash: &str, ext: &str) -> Result<()> {
    info!("Deleting {}{}", hash, ext);

    let provider = resolve_local(public_root, None)?;
    let file = FileInfo::new("", hash, ext, 0).context("Invalid upload descriptor")?;

    match provider.delete(&file).await.context("Failed to delete file")? {
        DeleteOutcome::Removed => println!("File removed: {}{}", hash, ext),
        DeleteOutcome::Missing => println!("No file to remove: {}{}", hash, ext),
    }

    Ok(())
}

/// Turn an async reader into the chunked stream the provider consumes.
fn chunk_reader(reader: tokio::fs::File) -> ByteStream {
    use tokio::io::AsyncReadExt;

    Box::pin(futures::stream::unfold(reader, |mut reader| async move {
        let mut buf = vec![0u8; 64 * 1024];
        match reader.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(buf), reader))
            }
            Err(e) => Some((Err(e.into()), reader)),
        }
    }))
}
