//! Session log discovery
//!
//! Finds every `<projects_root>/<encoded-project-dir>/*.jsonl` file and orders
//! the result by the earliest timestamp recorded inside each file. Processing
//! files in that order is what makes "first occurrence wins" deduplication
//! keep the chronologically earliest copy of a record.

use crate::fs::FileSystem;
use crate::parser::top_level_timestamp;
use ccmeter_core::diagnostics::ErrorSummary;
use ccmeter_core::error::{CcmeterError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

const LOG_EXTENSION: &str = "jsonl";

/// One session log to ingest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Full path to the log file
    pub path: PathBuf,
    /// Name of the containing project directory, still encoded
    pub project_dir_name: String,
    /// Smallest top-level `timestamp` string found in the file
    pub earliest_timestamp: String,
}

impl FileTask {
    /// The log file's stem, which Claude Code sets to the session id
    pub fn session_file_name(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// Scanner producing ordered [`FileTask`]s from a projects directory
#[derive(Debug, Clone)]
pub struct UsageFileScanner<F> {
    fs: F,
}

impl<F: FileSystem> UsageFileScanner<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Scan `projects_root`, dropping per-file errors
    pub async fn scan(&self, projects_root: &Path) -> Result<Vec<FileTask>> {
        let mut errors = ErrorSummary::new();
        self.scan_with_diagnostics(projects_root, &mut errors).await
    }

    /// Scan `projects_root`, recording skipped projects and files in `errors`
    ///
    /// A missing root yields an empty list. Failing to list an existing root
    /// is returned as an error.
    pub async fn scan_with_diagnostics(
        &self,
        projects_root: &Path,
        errors: &mut ErrorSummary,
    ) -> Result<Vec<FileTask>> {
        if !self.fs.exists(projects_root).await {
            debug!("Projects directory {} does not exist", projects_root.display());
            errors.record(&CcmeterError::DirectoryNotFound(projects_root.to_path_buf()));
            return Ok(Vec::new());
        }

        let mut tasks = Vec::new();
        for project in self.fs.list_dir(projects_root).await? {
            if !project.is_dir {
                continue;
            }
            let Some(project_dir_name) = project
                .path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
            else {
                errors.record(&CcmeterError::PathInvalid(project.path.clone()));
                continue;
            };

            let children = match self.fs.list_dir(&project.path).await {
                Ok(children) => children,
                Err(e) => {
                    warn!("Skipping project {}: {}", project.path.display(), e);
                    errors.record(&e);
                    continue;
                }
            };

            for child in children {
                if child.is_dir || !is_session_log(&child.path) {
                    continue;
                }
                match self.earliest_timestamp(&child.path).await {
                    Ok(Some(earliest_timestamp)) => tasks.push(FileTask {
                        path: child.path,
                        project_dir_name: project_dir_name.clone(),
                        earliest_timestamp,
                    }),
                    Ok(None) => {
                        trace!("No timestamps in {}, skipping", child.path.display());
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", child.path.display(), e);
                        errors.record(&e);
                    }
                }
            }
        }

        tasks.sort_by(|a, b| {
            a.earliest_timestamp
                .cmp(&b.earliest_timestamp)
                .then_with(|| a.path.cmp(&b.path))
        });

        debug!(
            "Found {} session logs under {}",
            tasks.len(),
            projects_root.display()
        );
        Ok(tasks)
    }

    async fn earliest_timestamp(&self, path: &Path) -> Result<Option<String>> {
        let content = self.fs.read_to_string(path).await?;
        Ok(content.lines().filter_map(top_level_timestamp).min())
    }
}

fn is_session_log(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(LOG_EXTENSION)
}
