//! ccmeter - Analyze Claude Code usage data from local JSONL session logs
//!
//! This library provides functionality to:
//! - Discover Claude Code session logs across one or more data directories
//! - Deduplicate and price usage records from a built-in or custom rate card
//! - Aggregate usage by model, calendar day and project
//! - Generate reports in table and JSON formats
//!
//! # Examples
//!
//! ```no_run
//! use ccmeter::{
//!     aggregation::StatisticsAggregator,
//!     repository::{SessionCounting, UsageRepository},
//! };
//! use ccmeter_core::TimezoneConfig;
//! use ccmeter_provider_claude::{ClaudeUsageSource, IngestionPipeline, discover_from_env};
//!
//! #[tokio::main]
//! async fn main() -> ccmeter_core::Result<()> {
//!     let source = ClaudeUsageSource::new(discover_from_env()?, IngestionPipeline::default());
//!     let repository = UsageRepository::new(source, StatisticsAggregator::new(TimezoneConfig::utc()))
//!         .with_session_counting(SessionCounting::SessionIds);
//!
//!     let stats = repository.get_usage_stats().await?;
//!     for day in &stats.by_date {
//!         println!("{}: ${:.2}", day.date, day.total_cost);
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod config;
pub mod filters;
pub mod model_formatter;
pub mod output;
pub mod repository;

// Re-export commonly used types
pub use aggregation::StatisticsAggregator;
pub use ccmeter_core::{CcmeterError, Result};
pub use repository::{LoadState, SessionCounting, UsageRepository};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
