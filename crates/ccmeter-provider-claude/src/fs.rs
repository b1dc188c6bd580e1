//! Filesystem access used by the scanner and pipeline
//!
//! Ingestion only needs three operations: an existence check, a one-level
//! directory listing and whole-file reads. They sit behind the [`FileSystem`]
//! trait so the pipeline can be driven from an in-memory tree in tests.

use async_trait::async_trait;
use ccmeter_core::error::{CcmeterError, Result};
use std::path::{Path, PathBuf};

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Read-only filesystem operations needed for ingestion
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Whether `path` exists
    async fn exists(&self, path: &Path) -> bool;

    /// Immediate children of `path`, sorted by path
    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>>;

    /// Entire file content as UTF-8 text
    async fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// [`FileSystem`] backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        let root = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            use walkdir::WalkDir;

            let mut children = Vec::new();
            for entry in WalkDir::new(&root)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|e| walk_error(&root, e))?;
                children.push(DirEntryInfo {
                    is_dir: entry.file_type().is_dir(),
                    path: entry.into_path(),
                });
            }
            Ok(children)
        })
        .await
        .map_err(|e| CcmeterError::Io(std::io::Error::other(e.to_string())))?
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CcmeterError::from_io(path, e))
    }
}

fn walk_error(root: &Path, error: walkdir::Error) -> CcmeterError {
    let path = error.path().unwrap_or(root).to_path_buf();
    match error.into_io_error() {
        Some(io) if io.kind() == std::io::ErrorKind::NotFound => {
            CcmeterError::DirectoryNotFound(path)
        }
        Some(io) => CcmeterError::from_io(path, io),
        None => CcmeterError::CorruptedData(format!(
            "filesystem loop detected under {}",
            path.display()
        )),
    }
}
