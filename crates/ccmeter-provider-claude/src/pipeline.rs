//! Ingestion pipeline
//!
//! Drives one complete pass over the session logs: scan, then read every file
//! in scan order and feed its lines through the parser with a single
//! [`DeduplicationStrategy`] shared by the whole run. Files and lines are
//! processed strictly one after another, so "first occurrence wins" always
//! means "earliest file, earliest line".
//!
//! Nothing is retained between runs.
//!
//! # Examples
//!
//! ```no_run
//! use ccmeter_provider_claude::pipeline::IngestionPipeline;
//! use std::path::Path;
//!
//! # async fn example() -> ccmeter_core::Result<()> {
//! let pipeline = IngestionPipeline::default();
//! let entries = pipeline.run(Path::new("/home/dev/.claude/projects")).await?;
//! println!("{} usage entries", entries.len());
//! # Ok(())
//! # }
//! ```

use crate::dedup::DeduplicationStrategy;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::parser::{JsonlRecordParser, LineOutcome};
use crate::scanner::{FileTask, UsageFileScanner};
use async_trait::async_trait;
use ccmeter_core::diagnostics::ErrorSummary;
use ccmeter_core::error::{CcmeterError, Result};
use ccmeter_core::provider::{LoadedUsage, UsageSource};
use ccmeter_core::types::UsageEntry;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything one ingestion run produced
#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    /// Accepted entries in processing order
    pub entries: Vec<UsageEntry>,
    /// Distinct session log files, counted once per project
    pub session_files: usize,
    /// Files that were read and parsed
    pub files_processed: usize,
    /// Records rejected as duplicates
    pub duplicates: usize,
    /// Skipped files and malformed lines
    pub errors: ErrorSummary,
}

impl From<IngestionReport> for LoadedUsage {
    fn from(report: IngestionReport) -> Self {
        LoadedUsage {
            entries: report.entries,
            session_files: report.session_files,
            errors: report.errors,
        }
    }
}

/// Scan-then-parse ingestion over a [`FileSystem`]
#[derive(Debug, Clone)]
pub struct IngestionPipeline<F = LocalFileSystem> {
    fs: F,
    parser: JsonlRecordParser,
    show_progress: bool,
}

impl Default for IngestionPipeline<LocalFileSystem> {
    fn default() -> Self {
        Self::new(LocalFileSystem, JsonlRecordParser::default())
    }
}

impl<F: FileSystem + Clone> IngestionPipeline<F> {
    pub fn new(fs: F, parser: JsonlRecordParser) -> Self {
        Self {
            fs,
            parser,
            show_progress: false,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Ingest a single projects directory
    pub async fn run(&self, projects_root: &Path) -> Result<Vec<UsageEntry>> {
        let report = self.run_detailed(&[projects_root.to_path_buf()]).await?;
        Ok(report.entries)
    }

    /// Ingest several projects directories as one run
    ///
    /// Files from all roots are merged into one ordered task list and share a
    /// single dedup set.
    pub async fn run_detailed(&self, projects_roots: &[PathBuf]) -> Result<IngestionReport> {
        let scanner = UsageFileScanner::new(self.fs.clone());
        let mut errors = ErrorSummary::new();

        let mut tasks = Vec::new();
        for root in projects_roots {
            tasks.extend(scanner.scan_with_diagnostics(root, &mut errors).await?);
        }
        if projects_roots.len() > 1 {
            tasks.sort_by(|a, b| {
                a.earliest_timestamp
                    .cmp(&b.earliest_timestamp)
                    .then_with(|| a.path.cmp(&b.path))
            });
        }
        info!("Found {} JSONL files to process", tasks.len());

        let progress = self.progress_bar(tasks.len());
        let mut dedup = DeduplicationStrategy::new();
        let mut report = IngestionReport {
            session_files: count_session_files(&tasks),
            ..Default::default()
        };

        for task in &tasks {
            if let Some(pb) = &progress {
                pb.inc(1);
            }

            let content = match self.fs.read_to_string(&task.path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping {}: {}", task.path.display(), e);
                    errors.record(&e);
                    continue;
                }
            };

            let before = report.entries.len();
            for (idx, line) in content.lines().enumerate() {
                match self
                    .parser
                    .parse_record(line, &task.project_dir_name, &mut dedup)
                {
                    LineOutcome::Entry(entry) => report.entries.push(entry),
                    LineOutcome::Skipped(_) => {}
                    LineOutcome::Malformed(error) => {
                        errors.record(&CcmeterError::ParsingFailed {
                            file: task.path.clone(),
                            line: Some(idx + 1),
                            error,
                        });
                    }
                }
            }
            report.files_processed += 1;
            debug!(
                "Parsed {} entries from {}",
                report.entries.len() - before,
                task.path.display()
            );
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Loading complete");
        }

        report.duplicates = dedup.duplicates();
        report.errors = errors;
        info!(
            "Processed {} unique entries from {} files ({} duplicates skipped)",
            report.entries.len(),
            report.files_processed,
            report.duplicates
        );
        if !report.errors.is_empty() {
            warn!("Ingestion finished with {}", report.errors);
        }
        Ok(report)
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.show_progress || len == 0 {
            return None;
        }
        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message("Loading usage data");
        Some(pb)
    }
}

/// Number of distinct session logs, treating the same file name in two
/// projects as two sessions
pub fn count_session_files(tasks: &[FileTask]) -> usize {
    tasks
        .iter()
        .filter_map(|task| {
            task.session_file_name()
                .map(|name| (task.project_dir_name.as_str(), name))
        })
        .collect::<HashSet<_>>()
        .len()
}

/// [`UsageSource`] reading Claude Code logs from one or more data roots
///
/// Each root is a Claude base directory; its `projects/` child is scanned.
#[derive(Debug, Clone)]
pub struct ClaudeUsageSource<F = LocalFileSystem> {
    base_dirs: Vec<PathBuf>,
    pipeline: IngestionPipeline<F>,
}

impl<F: FileSystem + Clone> ClaudeUsageSource<F> {
    pub fn new(base_dirs: Vec<PathBuf>, pipeline: IngestionPipeline<F>) -> Self {
        Self {
            base_dirs,
            pipeline,
        }
    }

    /// The `projects/` directory of every base directory
    pub fn projects_roots(&self) -> Vec<PathBuf> {
        self.base_dirs.iter().map(|base| base.join("projects")).collect()
    }
}

#[async_trait]
impl<F: FileSystem + Clone> UsageSource for ClaudeUsageSource<F> {
    async fn load(&self) -> Result<LoadedUsage> {
        let report = self.pipeline.run_detailed(&self.projects_roots()).await?;
        Ok(report.into())
    }
}
