//! CLI interface for ccmeter
//!
//! This module defines the command-line interface using clap. Global flags
//! select where logs are read from and how they are priced; the subcommand
//! picks the report. Running without a subcommand prints the summary.
//!
//! # Example
//!
//! ```bash
//! # Daily breakdown for August 2025, in UTC
//! ccmeter daily --since 2025-08-01 --until 20250831 --utc
//!
//! # Most expensive projects first, as JSON
//! ccmeter projects --order desc --json
//!
//! # Read logs from two Claude installations
//! CLAUDE_CONFIG_DIR=~/.claude,/mnt/work/.claude ccmeter models
//! ```

use crate::filters::DateFilter;
use crate::repository::SessionCounting;
use ccmeter_core::error::{CcmeterError, Result};
use ccmeter_core::{CostMode, SortOrder};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Analyze Claude Code usage data from local JSONL session logs
#[derive(Parser, Debug, Clone)]
#[command(name = "ccmeter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default shows only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Suppress everything below warnings, overriding RUST_LOG
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Claude base directories, comma-separated (each must contain `projects/`)
    #[arg(long, env = "CLAUDE_CONFIG_DIR", global = true)]
    pub claude_dir: Option<String>,

    /// JSON file overriding the built-in model rate cards
    #[arg(long, global = true)]
    pub pricing_file: Option<PathBuf>,

    /// Cost calculation mode (auto, calculate, display)
    #[arg(long, default_value = "auto", global = true)]
    pub mode: CostMode,

    /// How sessions are counted (files, ids)
    #[arg(long, default_value = "files", global = true)]
    pub session_count: SessionCounting,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Show full model identifiers instead of short names
    #[arg(long, global = true)]
    pub full_model_names: bool,

    #[command(flatten)]
    pub timezone_args: TimezoneArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Timezone selection shared by every report
#[derive(Args, Debug, Clone, Default)]
pub struct TimezoneArgs {
    /// Timezone for date grouping (e.g. "America/New_York", "Asia/Tokyo", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC for date grouping (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,
}

/// Inclusive date bounds, as YYYY-MM-DD or YYYYMMDD
#[derive(Args, Debug, Clone, Default)]
pub struct DateRangeArgs {
    /// Start date (inclusive)
    #[arg(long)]
    pub since: Option<String>,

    /// End date (inclusive)
    #[arg(long)]
    pub until: Option<String>,
}

impl DateRangeArgs {
    /// Parse both bounds into a [`DateFilter`]
    pub fn to_filter(&self) -> Result<DateFilter> {
        let mut filter = DateFilter::new();
        if let Some(since) = &self.since {
            filter = filter.with_since(parse_date_filter(since)?);
        }
        if let Some(until) = &self.until {
            filter = filter.with_until(parse_date_filter(until)?);
        }
        if let (Some(since), Some(until)) = (filter.since, filter.until)
            && since > until
        {
            return Err(CcmeterError::InvalidArgument(format!(
                "--since {since} is after --until {until}"
            )));
        }
        Ok(filter)
    }
}

/// Available reports
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Totals across the whole history (default)
    Summary,
    /// Usage per calendar day
    Daily(DateRangeArgs),
    /// Usage per model
    Models,
    /// Usage per project
    Projects {
        #[command(flatten)]
        range: DateRangeArgs,

        /// Order by cost (asc, desc)
        #[arg(long)]
        order: Option<SortOrder>,
    },
    /// Individual usage entries, newest first
    Entries {
        /// Show at most this many entries
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Session counts under both definitions
    Sessions,
}

/// Parse a date given as YYYY-MM-DD or YYYYMMDD
pub fn parse_date_filter(date_str: &str) -> Result<NaiveDate> {
    let date_str = date_str.trim();
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_str, "%Y%m%d"))
        .map_err(|_| {
            CcmeterError::InvalidDate(format!(
                "Invalid date format '{date_str}', expected YYYY-MM-DD or YYYYMMDD"
            ))
        })
}
