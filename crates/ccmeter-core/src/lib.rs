//! Core types, errors, and utilities for ccmeter
//!
//! This crate provides the data model shared by every other ccmeter crate:
//! usage entries and token counts, aggregated statistics, the error taxonomy
//! with its batch summary, project path decoding, and timezone configuration.

pub mod aggregation_types;
pub mod diagnostics;
pub mod error;
pub mod path_codec;
pub mod provider;
pub mod timezone;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use aggregation_types::{DailyUsage, ModelUsage, ProjectUsage, SortOrder, UsageStats};
pub use diagnostics::ErrorSummary;
pub use error::{CcmeterError, ErrorKind, Result};
pub use provider::{LoadedUsage, UsageSource};
pub use timezone::TimezoneConfig;
pub use types::{CostMode, ModelName, SessionId, TokenCounts, UsageEntry};
