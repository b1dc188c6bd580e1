//! Aggregation of usage entries into [`UsageStats`]
//!
//! A single pass over the entries feeds four accumulators at once: the
//! running totals, a per-model map, a per-day map and a per-project map.
//! Nothing here performs I/O, so the same entries always produce the same
//! statistics.
//!
//! Days are calendar days in the aggregator's [`TimezoneConfig`]. An entry
//! whose timestamp cannot be parsed still counts toward the totals, the model
//! and the project, but is left out of the daily breakdown.
//!
//! # Examples
//!
//! ```
//! use ccmeter::aggregation::StatisticsAggregator;
//! use ccmeter_core::{ModelName, TokenCounts, UsageEntry};
//!
//! let entry = UsageEntry {
//!     project: "/Users/dev/app".to_string(),
//!     timestamp: "2025-08-06T10:00:00Z".to_string(),
//!     model: ModelName::new("claude-sonnet-4"),
//!     tokens: TokenCounts::new(100, 50, 0, 0),
//!     cost: 1.0,
//!     session_id: None,
//! };
//!
//! let stats = StatisticsAggregator::default().aggregate(&[entry], 1);
//! assert_eq!(stats.total_tokens, 150);
//! assert_eq!(stats.by_date[0].date, "2025-08-06");
//! ```

use ccmeter_core::path_codec;
use ccmeter_core::timezone::TimezoneConfig;
use ccmeter_core::types::{ModelName, SessionId, TokenCounts, UsageEntry};
use ccmeter_core::{DailyUsage, ModelUsage, ProjectUsage, UsageStats};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, trace};

/// Pure aggregator from entries to statistics
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    timezone_config: TimezoneConfig,
}

impl StatisticsAggregator {
    pub fn new(timezone_config: TimezoneConfig) -> Self {
        Self { timezone_config }
    }

    pub fn timezone_config(&self) -> &TimezoneConfig {
        &self.timezone_config
    }

    /// Aggregate `entries`; `session_count` is taken as given
    pub fn aggregate(&self, entries: &[UsageEntry], session_count: usize) -> UsageStats {
        let mut tokens = TokenCounts::default();
        let mut total_cost = 0.0;
        let mut models: BTreeMap<&ModelName, ModelUsage> = BTreeMap::new();
        let mut days: BTreeMap<String, DailyUsage> = BTreeMap::new();
        let mut projects: BTreeMap<&str, ProjectAccumulator<'_>> = BTreeMap::new();
        let mut undated = 0usize;

        for entry in entries {
            tokens += entry.tokens;
            total_cost += entry.cost;

            let model = models.entry(&entry.model).or_insert_with(|| ModelUsage {
                model: entry.model.clone(),
                tokens: TokenCounts::default(),
                total_cost: 0.0,
                session_count: 0,
            });
            model.tokens += entry.tokens;
            model.total_cost += entry.cost;
            model.session_count += 1;

            match entry.parsed_timestamp() {
                Some(instant) => {
                    let date = self.timezone_config.date_key(&instant);
                    let day = days.entry(date.clone()).or_insert_with(|| DailyUsage {
                        date,
                        tokens: TokenCounts::default(),
                        total_cost: 0.0,
                        models_used: BTreeSet::new(),
                    });
                    day.tokens += entry.tokens;
                    day.total_cost += entry.cost;
                    day.models_used.insert(entry.model.clone());
                }
                None => {
                    trace!("Unparseable timestamp '{}', not bucketed by date", entry.timestamp);
                    undated += 1;
                }
            }

            projects
                .entry(entry.project.as_str())
                .or_default()
                .add(entry);
        }

        if undated > 0 {
            debug!("{} entries had no usable timestamp", undated);
        }

        UsageStats {
            total_cost,
            total_tokens: tokens.total(),
            tokens,
            total_sessions: session_count,
            by_model: models.into_values().collect(),
            by_date: days.into_values().collect(),
            by_project: projects
                .into_iter()
                .map(|(path, acc)| acc.finish(path))
                .collect(),
        }
    }
}

#[derive(Default)]
struct ProjectAccumulator<'a> {
    tokens: TokenCounts,
    total_cost: f64,
    sessions: HashSet<&'a SessionId>,
    last_used: &'a str,
}

impl<'a> ProjectAccumulator<'a> {
    fn add(&mut self, entry: &'a UsageEntry) {
        self.tokens += entry.tokens;
        self.total_cost += entry.cost;
        if let Some(session_id) = &entry.session_id {
            self.sessions.insert(session_id);
        }
        // ISO-8601 strings order lexically the same as chronologically
        if entry.timestamp.as_str() > self.last_used {
            self.last_used = &entry.timestamp;
        }
    }

    fn finish(self, project_path: &str) -> ProjectUsage {
        ProjectUsage {
            project_path: project_path.to_string(),
            project_name: path_codec::project_name(project_path),
            tokens: self.tokens,
            total_cost: self.total_cost,
            session_count: self.sessions.len(),
            last_used: self.last_used.to_string(),
        }
    }
}

/// Number of distinct session ids among the entries that carry one
pub fn count_distinct_session_ids(entries: &[UsageEntry]) -> usize {
    entries
        .iter()
        .filter_map(|entry| entry.session_id.as_ref())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(project: &str, timestamp: &str, model: &str, input: u64, cost: f64) -> UsageEntry {
        UsageEntry {
            project: project.to_string(),
            timestamp: timestamp.to_string(),
            model: ModelName::new(model),
            tokens: TokenCounts::new(input, 0, 0, 0),
            cost,
            session_id: None,
        }
    }

    #[test]
    fn test_empty_input() {
        let stats = StatisticsAggregator::default().aggregate(&[], 0);
        assert!(stats.is_empty());
        assert_eq!(stats, UsageStats::default());
    }

    #[test]
    fn test_same_day_entries_share_a_bucket() {
        let entries = vec![
            entry("/p", "2025-08-06T09:00:00Z", "claude-sonnet-4", 10, 1.00),
            entry("/p", "2025-08-06T21:30:00Z", "claude-opus-4-1", 20, 2.50),
        ];
        let stats = StatisticsAggregator::default().aggregate(&entries, 1);

        assert_eq!(stats.by_date.len(), 1);
        let day = &stats.by_date[0];
        assert_eq!(day.date, "2025-08-06");
        assert!((day.total_cost - 3.50).abs() < 1e-9);
        assert_eq!(day.model_count(), 2);
    }

    #[test]
    fn test_dates_sorted_ascending() {
        let entries = vec![
            entry("/p", "2025-08-09T00:00:00Z", "m", 1, 0.1),
            entry("/p", "2025-08-01T00:00:00Z", "m", 1, 0.1),
            entry("/p", "2025-08-05T00:00:00Z", "m", 1, 0.1),
        ];
        let stats = StatisticsAggregator::default().aggregate(&entries, 0);
        let dates: Vec<_> = stats.by_date.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-08-01", "2025-08-05", "2025-08-09"]);
    }

    #[test]
    fn test_unparseable_timestamp_counts_everywhere_but_dates() {
        let entries = vec![
            entry("/p", "yesterday-ish", "m", 10, 1.0),
            entry("/p", "2025-08-01T00:00:00Z", "m", 5, 0.5),
        ];
        let stats = StatisticsAggregator::default().aggregate(&entries, 0);

        assert_eq!(stats.total_tokens, 15);
        assert_eq!(stats.by_model[0].total_tokens(), 15);
        assert_eq!(stats.by_project[0].total_tokens(), 15);
        assert_eq!(stats.by_date.len(), 1);
        assert_eq!(stats.by_date[0].total_tokens(), 5);
    }

    #[test]
    fn test_model_counts_entries() {
        let entries = vec![
            entry("/p", "2025-08-01T00:00:00Z", "claude-sonnet-4", 1, 0.1),
            entry("/q", "2025-08-01T00:00:00Z", "claude-sonnet-4", 2, 0.2),
            entry("/q", "2025-08-01T00:00:00Z", "claude-opus-4-1", 3, 0.3),
        ];
        let stats = StatisticsAggregator::default().aggregate(&entries, 0);
        let sonnet = stats
            .by_model
            .iter()
            .find(|m| m.model.as_str() == "claude-sonnet-4")
            .unwrap();
        assert_eq!(sonnet.session_count, 2);
        assert_eq!(sonnet.total_tokens(), 3);
    }

    #[test]
    fn test_project_last_used_and_sessions() {
        let mut first = entry("/Users/dev/app", "2025-08-03T00:00:00Z", "m", 1, 0.1);
        first.session_id = Some(SessionId::new("a"));
        let mut second = entry("/Users/dev/app", "2025-08-01T00:00:00Z", "m", 1, 0.1);
        second.session_id = Some(SessionId::new("b"));
        let mut third = entry("/Users/dev/app", "2025-08-02T00:00:00Z", "m", 1, 0.1);
        third.session_id = Some(SessionId::new("a"));

        let stats = StatisticsAggregator::default().aggregate(&[first, second, third], 2);
        let project = &stats.by_project[0];
        assert_eq!(project.project_name, "app");
        assert_eq!(project.last_used, "2025-08-03T00:00:00Z");
        assert_eq!(project.session_count, 2);
        assert_eq!(stats.total_sessions, 2);
    }

    #[test]
    fn test_timezone_moves_day_boundary() {
        let entries = vec![entry("/p", "2025-08-06T23:30:00Z", "m", 1, 0.1)];
        let tokyo = TimezoneConfig::from_cli(Some("Asia/Tokyo"), false).unwrap();

        let utc_stats = StatisticsAggregator::default().aggregate(&entries, 0);
        let tokyo_stats = StatisticsAggregator::new(tokyo).aggregate(&entries, 0);
        assert_eq!(utc_stats.by_date[0].date, "2025-08-06");
        assert_eq!(tokyo_stats.by_date[0].date, "2025-08-07");
    }

    #[test]
    fn test_count_distinct_session_ids() {
        let mut a = entry("/p", "", "m", 1, 0.0);
        a.session_id = Some(SessionId::new("s1"));
        let mut b = a.clone();
        b.session_id = Some(SessionId::new("s2"));
        let c = a.clone();
        let d = entry("/p", "", "m", 1, 0.0);

        assert_eq!(count_distinct_session_ids(&[a, b, c, d]), 2);
        assert_eq!(count_distinct_session_ids(&[]), 0);
    }
}
