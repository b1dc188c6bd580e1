//! Shared test utilities for the Claude provider

use crate::fs::{DirEntryInfo, FileSystem};
use async_trait::async_trait;
use ccmeter_core::error::{CcmeterError, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::path::{Path, PathBuf};

/// Serializes environment variable modifications across tests
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// RAII guard restoring environment variables on drop
pub struct EnvVarGuard {
    vars: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.push((key.to_string(), env::var(key).ok()));
        unsafe {
            env::set_var(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.vars.push((key.to_string(), env::var(key).ok()));
        unsafe {
            env::remove_var(key);
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.vars.iter().rev() {
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
enum MemoryFile {
    Text(String),
    Unreadable,
}

/// In-memory [`FileSystem`]; directories are implied by file paths
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, MemoryFile>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .insert(path.into(), MemoryFile::Text(content.to_string()));
        self
    }

    /// A file whose reads fail with a decoding error
    pub fn with_unreadable_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), MemoryFile::Unreadable);
        self
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_dir(path)
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        if !self.is_dir(path) {
            return Err(CcmeterError::DirectoryNotFound(path.to_path_buf()));
        }
        let children: BTreeSet<PathBuf> = self
            .files
            .keys()
            .filter_map(|file| {
                let rest = file.strip_prefix(path).ok()?;
                let first = rest.components().next()?;
                Some(path.join(first))
            })
            .collect();
        Ok(children
            .into_iter()
            .map(|child| DirEntryInfo {
                is_dir: !self.files.contains_key(&child),
                path: child,
            })
            .collect())
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.files.get(path) {
            Some(MemoryFile::Text(content)) => Ok(content.clone()),
            Some(MemoryFile::Unreadable) => Err(CcmeterError::DecodingFailed {
                path: path.to_path_buf(),
                error: "stream did not contain valid UTF-8".to_string(),
            }),
            None => Err(CcmeterError::FileReadFailed {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}
