//! Aggregation data types for ccmeter
//!
//! Pure data structures produced by aggregation. These types are rebuilt from
//! scratch on every aggregation pass and never updated incrementally.

use crate::types::{ModelName, TokenCounts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Usage for a single model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelUsage {
    /// Model identifier as logged
    pub model: ModelName,
    /// Token counts for the model
    pub tokens: TokenCounts,
    /// Total cost for the model in USD
    pub total_cost: f64,
    /// Number of entries served by the model
    ///
    /// This counts entries rather than distinct sessions.
    pub session_count: usize,
}

impl ModelUsage {
    pub fn total_tokens(&self) -> u64 {
        self.tokens.total()
    }
}

/// Usage for a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    /// Date in `yyyy-MM-dd` form
    pub date: String,
    /// Token counts for the day
    pub tokens: TokenCounts,
    /// Total cost for the day in USD
    pub total_cost: f64,
    /// Distinct models used during the day
    pub models_used: BTreeSet<ModelName>,
}

impl DailyUsage {
    pub fn total_tokens(&self) -> u64 {
        self.tokens.total()
    }

    /// Number of distinct models used that day
    pub fn model_count(&self) -> usize {
        self.models_used.len()
    }
}

/// Usage for a single project directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUsage {
    /// Decoded absolute project path
    pub project_path: String,
    /// Last path component of `project_path`
    pub project_name: String,
    /// Token counts for the project
    pub tokens: TokenCounts,
    /// Total cost for the project in USD
    pub total_cost: f64,
    /// Distinct session ids seen in the project
    pub session_count: usize,
    /// Greatest raw timestamp seen for the project
    pub last_used: String,
}

impl ProjectUsage {
    pub fn total_tokens(&self) -> u64 {
        self.tokens.total()
    }
}

/// Aggregate statistics over a set of usage entries
///
/// `by_date` is sorted ascending by date; `by_model` and `by_project` have no
/// defined order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Total cost in USD
    pub total_cost: f64,
    /// Sum of all four token kinds
    pub total_tokens: u64,
    /// Per-kind token totals
    pub tokens: TokenCounts,
    /// Number of sessions, as counted by the caller
    pub total_sessions: usize,
    /// Usage grouped by model
    pub by_model: Vec<ModelUsage>,
    /// Usage grouped by day, ascending
    pub by_date: Vec<DailyUsage>,
    /// Usage grouped by project
    pub by_project: Vec<ProjectUsage>,
}

impl UsageStats {
    /// True when no usage was aggregated
    pub fn is_empty(&self) -> bool {
        self.total_tokens == 0 && self.by_model.is_empty()
    }
}

/// Sort direction for cost-ordered listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(format!("Invalid sort order: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = UsageStats::default();
        assert!(stats.is_empty());
        assert_eq!(stats.total_cost, 0.0);
        assert!(stats.by_date.is_empty());
        assert!(stats.by_project.is_empty());
    }

    #[test]
    fn test_daily_model_count() {
        let mut models = BTreeSet::new();
        models.insert(ModelName::new("claude-opus-4-1"));
        models.insert(ModelName::new("claude-sonnet-4"));
        models.insert(ModelName::new("claude-opus-4-1"));
        let daily = DailyUsage {
            date: "2025-08-06".to_string(),
            tokens: TokenCounts::new(1, 1, 1, 1),
            total_cost: 3.5,
            models_used: models,
        };
        assert_eq!(daily.model_count(), 2);
        assert_eq!(daily.total_tokens(), 4);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert_eq!("Descending".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Ascending.to_string(), "asc");
    }
}
