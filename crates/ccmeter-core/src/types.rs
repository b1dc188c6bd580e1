//! Core domain types for ccmeter
//!
//! This module contains the fundamental types used throughout the ccmeter workspace.
//! These types provide strong typing for model names, session IDs, token counts,
//! and the normalized usage entry produced by ingestion.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Strongly-typed model name wrapper
///
/// Model identifiers are free text in the logs (e.g. `claude-opus-4-1-20250805`),
/// so no normalization happens here.
///
/// # Examples
/// ```
/// use ccmeter_core::types::ModelName;
///
/// let model = ModelName::new("claude-opus-4-1-20250805");
/// assert_eq!(model.as_str(), "claude-opus-4-1-20250805");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelName(String);

impl ModelName {
    /// Create a new ModelName from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly-typed session ID wrapper
///
/// Represents the `sessionId` field of a log record. Claude Code names each
/// session log after the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new SessionId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Token counts for usage tracking
///
/// Tracks the four token kinds reported in `message.usage`.
///
/// # Examples
/// ```
/// use ccmeter_core::types::TokenCounts;
///
/// let tokens = TokenCounts::new(100, 50, 10, 5);
/// assert_eq!(tokens.total(), 165);
///
/// let combined = tokens + TokenCounts::new(50, 25, 5, 2);
/// assert_eq!(combined.input_tokens, 150);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCounts {
    /// Input tokens used
    pub input_tokens: u64,
    /// Output tokens generated
    pub output_tokens: u64,
    /// Cache write (creation) tokens
    pub cache_creation_tokens: u64,
    /// Cache read tokens
    pub cache_read_tokens: u64,
}

impl TokenCounts {
    /// Create new TokenCounts
    pub fn new(
        input_tokens: u64,
        output_tokens: u64,
        cache_creation_tokens: u64,
        cache_read_tokens: u64,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            cache_creation_tokens,
            cache_read_tokens,
        }
    }

    /// Calculate total tokens, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.cache_creation_tokens)
            .saturating_add(self.cache_read_tokens)
    }

    /// True when every token kind is zero
    pub fn is_empty(&self) -> bool {
        self.input_tokens == 0
            && self.output_tokens == 0
            && self.cache_creation_tokens == 0
            && self.cache_read_tokens == 0
    }
}

impl Add for TokenCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            input_tokens: self.input_tokens.saturating_add(other.input_tokens),
            output_tokens: self.output_tokens.saturating_add(other.output_tokens),
            cache_creation_tokens: self
                .cache_creation_tokens
                .saturating_add(other.cache_creation_tokens),
            cache_read_tokens: self.cache_read_tokens.saturating_add(other.cache_read_tokens),
        }
    }
}

impl AddAssign for TokenCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Cost calculation mode
///
/// Decides whether the `costUSD` value logged alongside a record is trusted
/// or recomputed from token counts.
///
/// # Examples
/// ```
/// use ccmeter_core::types::CostMode;
/// use std::str::FromStr;
///
/// let mode = CostMode::from_str("auto").unwrap();
/// assert_eq!(mode, CostMode::Auto);
/// assert_eq!(CostMode::Calculate.to_string(), "calculate");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostMode {
    /// Use the logged cost when present and nonzero, otherwise calculate
    #[default]
    Auto,
    /// Always calculate from tokens using the pricing table
    Calculate,
    /// Only use the logged cost; records without one cost nothing
    Display,
}

impl fmt::Display for CostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Calculate => write!(f, "calculate"),
            Self::Display => write!(f, "display"),
        }
    }
}

impl std::str::FromStr for CostMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "calculate" => Ok(Self::Calculate),
            "display" => Ok(Self::Display),
            _ => Err(format!("Invalid cost mode: {s}")),
        }
    }
}

/// Parse a log timestamp into UTC
///
/// Accepts RFC 3339 (with or without fractional seconds) and, as a fallback,
/// offset-less ISO-8601 date-times which are read as UTC. Returns `None` for
/// anything else; callers treat that as "no date" rather than an error.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Usage entry produced by ingestion
///
/// One accounted unit of model usage, built from a single log line. Entries are
/// immutable once constructed and only ever aggregated over.
///
/// # Examples
/// ```
/// use ccmeter_core::types::{ModelName, SessionId, TokenCounts, UsageEntry};
///
/// let entry = UsageEntry {
///     project: "/Users/dev/project".to_string(),
///     timestamp: "2025-08-06T10:00:00Z".to_string(),
///     model: ModelName::new("claude-sonnet-4-20250514"),
///     tokens: TokenCounts::new(100, 50, 0, 0),
///     cost: 0.00105,
///     session_id: Some(SessionId::new("abc")),
/// };
/// assert_eq!(entry.total_tokens(), 150);
/// assert!(entry.parsed_timestamp().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Decoded absolute project path
    pub project: String,
    /// Raw ISO-8601 timestamp as logged (may be empty)
    pub timestamp: String,
    /// Model that served the request
    pub model: ModelName,
    /// Token counts broken down by kind
    #[serde(flatten)]
    pub tokens: TokenCounts,
    /// Cost in USD, logged or computed
    pub cost: f64,
    /// Session the entry belongs to, when logged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl UsageEntry {
    /// Sum of all four token kinds
    pub fn total_tokens(&self) -> u64 {
        self.tokens.total()
    }

    /// Parse the raw timestamp on demand
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}
