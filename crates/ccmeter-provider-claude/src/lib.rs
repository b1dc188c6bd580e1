//! Claude Code provider for ccmeter
//!
//! This crate finds Claude Code session logs on disk, parses and deduplicates
//! their usage records, and exposes the result as a
//! [`UsageSource`](ccmeter_core::UsageSource).

pub mod dedup;
pub mod discovery;
pub mod fs;
pub mod parser;
pub mod pipeline;
pub mod scanner;

#[cfg(test)]
pub mod test_utils;

pub use dedup::DeduplicationStrategy;
pub use discovery::{discover_claude_dirs, discover_from_env};
pub use fs::{FileSystem, LocalFileSystem};
pub use parser::JsonlRecordParser;
pub use pipeline::{ClaudeUsageSource, IngestionPipeline, IngestionReport};
pub use scanner::{FileTask, UsageFileScanner};
