//! Usage source trait
//!
//! This module defines the `UsageSource` trait implemented by ingestion
//! back ends. The repository façade is generic over it, so queries can run
//! against the on-disk Claude logs or against a fixed set of entries in tests.

use crate::diagnostics::ErrorSummary;
use crate::error::Result;
use crate::types::UsageEntry;
use async_trait::async_trait;

/// Result of one full load from a usage source
#[derive(Debug, Clone, Default)]
pub struct LoadedUsage {
    /// Deduplicated entries in processing order
    pub entries: Vec<UsageEntry>,
    /// Distinct session log files that contributed to the load
    pub session_files: usize,
    /// Failures that were skipped during the load
    pub errors: ErrorSummary,
}

/// Trait for usage data back ends.
///
/// Every call to [`load`](UsageSource::load) performs a complete re-scan; no
/// state carries over between calls.
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Load every usage entry the source knows about.
    async fn load(&self) -> Result<LoadedUsage>;
}
