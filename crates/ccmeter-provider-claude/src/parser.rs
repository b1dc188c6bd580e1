//! JSONL record parsing
//!
//! Turns one line of a Claude Code session log into a [`UsageEntry`]. The log
//! mixes usage-bearing assistant turns with user turns, tool results and
//! summaries; only lines with a `message.usage` object are accounted.
//!
//! Lines are parsed as generic JSON rather than into a fixed struct so that a
//! single odd field (a string where a number was expected, say) degrades to a
//! zero instead of discarding the whole record.
//!
//! # Examples
//!
//! ```
//! use ccmeter_provider_claude::dedup::DeduplicationStrategy;
//! use ccmeter_provider_claude::parser::JsonlRecordParser;
//!
//! let parser = JsonlRecordParser::default();
//! let mut dedup = DeduplicationStrategy::new();
//! let line = r#"{"timestamp":"2025-08-01T00:00:00Z","message":{"model":"claude-sonnet-4","usage":{"input_tokens":100,"output_tokens":50}}}"#;
//!
//! let entry = parser.parse_line(line, "-Users-dev-app", &mut dedup).unwrap();
//! assert_eq!(entry.project, "/Users/dev/app");
//! assert_eq!(entry.total_tokens(), 150);
//! ```

use crate::dedup::DeduplicationStrategy;
use ccmeter_core::path_codec;
use ccmeter_core::types::{CostMode, ModelName, SessionId, TokenCounts, UsageEntry};
use ccmeter_pricing::CostCalculator;
use serde_json::Value;
use tracing::trace;

/// Model name used when a record does not name one
pub const UNKNOWN_MODEL: &str = "unknown";

/// Why a line produced no entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Whitespace-only line
    Blank,
    /// Valid JSON without a `message.usage` object
    NotUsage,
    /// Dedup key already seen in this run
    Duplicate,
    /// All four token counts are zero
    ZeroTokens,
}

/// Outcome of parsing one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Entry(UsageEntry),
    Skipped(SkipReason),
    /// The line is not valid JSON
    Malformed(String),
}

/// Parser for Claude Code usage log lines
#[derive(Debug, Clone, Default)]
pub struct JsonlRecordParser {
    calculator: CostCalculator,
    cost_mode: CostMode,
}

impl JsonlRecordParser {
    pub fn new(calculator: CostCalculator) -> Self {
        Self {
            calculator,
            cost_mode: CostMode::default(),
        }
    }

    /// Set how logged costs are treated
    pub fn with_cost_mode(mut self, cost_mode: CostMode) -> Self {
        self.cost_mode = cost_mode;
        self
    }

    pub fn cost_mode(&self) -> CostMode {
        self.cost_mode
    }

    /// Parse one line, returning the entry if it should be accounted
    ///
    /// Never fails: malformed and irrelevant lines yield `None`.
    pub fn parse_line(
        &self,
        raw_line: &str,
        project_dir_name: &str,
        dedup: &mut DeduplicationStrategy,
    ) -> Option<UsageEntry> {
        match self.parse_record(raw_line, project_dir_name, dedup) {
            LineOutcome::Entry(entry) => Some(entry),
            LineOutcome::Skipped(_) => None,
            LineOutcome::Malformed(error) => {
                trace!("Skipping malformed line in {}: {}", project_dir_name, error);
                None
            }
        }
    }

    /// Parse one line, reporting why nothing was produced
    pub fn parse_record(
        &self,
        raw_line: &str,
        project_dir_name: &str,
        dedup: &mut DeduplicationStrategy,
    ) -> LineOutcome {
        let line = raw_line.trim();
        if line.is_empty() {
            return LineOutcome::Skipped(SkipReason::Blank);
        }

        let record: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => return LineOutcome::Malformed(e.to_string()),
        };

        let Some(message) = record.get("message") else {
            return LineOutcome::Skipped(SkipReason::NotUsage);
        };
        let Some(usage) = message.get("usage").filter(|u| u.is_object()) else {
            return LineOutcome::Skipped(SkipReason::NotUsage);
        };

        let key = DeduplicationStrategy::key_for(
            message.get("id").and_then(Value::as_str),
            record.get("requestId").and_then(Value::as_str),
        );
        if !dedup.should_include_record(key.as_deref()) {
            return LineOutcome::Skipped(SkipReason::Duplicate);
        }

        let model = ModelName::new(
            message
                .get("model")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_MODEL),
        );
        let tokens = TokenCounts::new(
            token_count(usage, "input_tokens"),
            token_count(usage, "output_tokens"),
            token_count(usage, "cache_creation_input_tokens"),
            token_count(usage, "cache_read_input_tokens"),
        );
        if tokens.is_empty() {
            return LineOutcome::Skipped(SkipReason::ZeroTokens);
        }

        let logged_cost = record.get("costUSD").and_then(Value::as_f64);
        let cost = self
            .calculator
            .calculate_with_mode(&tokens, &model, logged_cost, self.cost_mode);

        let timestamp = record
            .get("timestamp")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let session_id = record
            .get("sessionId")
            .and_then(Value::as_str)
            .map(SessionId::new);

        LineOutcome::Entry(UsageEntry {
            project: path_codec::decode(project_dir_name),
            timestamp,
            model,
            tokens,
            cost,
            session_id,
        })
    }
}

/// Read a token count, treating absent or non-numeric values as zero
fn token_count(usage: &Value, field: &str) -> u64 {
    usage
        .get(field)
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        })
        .unwrap_or(0)
}

/// The top-level `timestamp` string of a log line, if the line is JSON and has one
pub fn top_level_timestamp(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let record: Value = serde_json::from_str(line).ok()?;
    record
        .get("timestamp")
        .and_then(Value::as_str)
        .map(str::to_string)
}
