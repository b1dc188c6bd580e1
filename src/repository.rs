//! Query façade over a [`UsageSource`]
//!
//! Every query performs a fresh load from the source and aggregates it from
//! scratch; the repository keeps no entries between calls. It only remembers
//! when the last load happened, how many entries it produced, and which
//! errors were skipped along the way.
//!
//! # Examples
//!
//! ```no_run
//! use ccmeter::aggregation::StatisticsAggregator;
//! use ccmeter::repository::UsageRepository;
//! use ccmeter_provider_claude::{ClaudeUsageSource, IngestionPipeline, discover_from_env};
//!
//! # async fn example() -> ccmeter_core::Result<()> {
//! let source = ClaudeUsageSource::new(discover_from_env()?, IngestionPipeline::default());
//! let repository = UsageRepository::new(source, StatisticsAggregator::default());
//!
//! let stats = repository.get_usage_stats().await?;
//! println!("${:.2} across {} sessions", stats.total_cost, stats.total_sessions);
//! # Ok(())
//! # }
//! ```

use crate::aggregation::{StatisticsAggregator, count_distinct_session_ids};
use crate::filters::{DateFilter, date_key};
use ccmeter_core::diagnostics::ErrorSummary;
use ccmeter_core::error::Result;
use ccmeter_core::provider::{LoadedUsage, UsageSource};
use ccmeter_core::types::{UsageEntry, parse_timestamp};
use ccmeter_core::{ProjectUsage, SortOrder, UsageStats};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Which definition of "session" feeds `UsageStats::total_sessions`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCounting {
    /// One session per log file per project
    #[default]
    LogFiles,
    /// One session per distinct `sessionId`
    SessionIds,
}

impl fmt::Display for SessionCounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogFiles => write!(f, "files"),
            Self::SessionIds => write!(f, "ids"),
        }
    }
}

impl FromStr for SessionCounting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "files" | "log-files" => Ok(Self::LogFiles),
            "ids" | "session-ids" => Ok(Self::SessionIds),
            _ => Err(format!("Invalid session counting: {s} (expected 'files' or 'ids')")),
        }
    }
}

/// Both session counts, side by side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounts {
    /// Distinct `sessionId` values
    pub session_ids: usize,
    /// Distinct session log files, per project
    pub log_files: usize,
}

/// What the repository knows about its most recent load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded {
        entries: usize,
        loaded_at: DateTime<Utc>,
    },
}

#[derive(Debug, Default)]
struct RepositoryState {
    load_state: LoadState,
    last_errors: ErrorSummary,
}

/// Usage queries backed by a [`UsageSource`]
pub struct UsageRepository<S> {
    source: S,
    aggregator: StatisticsAggregator,
    session_counting: SessionCounting,
    state: Mutex<RepositoryState>,
}

impl<S: UsageSource> UsageRepository<S> {
    pub fn new(source: S, aggregator: StatisticsAggregator) -> Self {
        Self {
            source,
            aggregator,
            session_counting: SessionCounting::default(),
            state: Mutex::new(RepositoryState::default()),
        }
    }

    /// Choose how `total_sessions` is counted
    pub fn with_session_counting(mut self, session_counting: SessionCounting) -> Self {
        self.session_counting = session_counting;
        self
    }

    pub fn session_counting(&self) -> SessionCounting {
        self.session_counting
    }

    async fn load(&self) -> Result<LoadedUsage> {
        let loaded = self.source.load().await?;

        let mut state = self.state.lock().await;
        state.load_state = LoadState::Loaded {
            entries: loaded.entries.len(),
            loaded_at: Utc::now(),
        };
        state.last_errors = loaded.errors.clone();
        drop(state);

        info!("Loaded {} usage entries", loaded.entries.len());
        Ok(loaded)
    }

    fn session_count(&self, loaded: &LoadedUsage) -> usize {
        match self.session_counting {
            SessionCounting::LogFiles => loaded.session_files,
            SessionCounting::SessionIds => count_distinct_session_ids(&loaded.entries),
        }
    }

    async fn load_stats(&self) -> Result<UsageStats> {
        let loaded = self.load().await?;
        let sessions = self.session_count(&loaded);
        Ok(self.aggregator.aggregate(&loaded.entries, sessions))
    }

    /// Statistics over the full history
    pub async fn get_usage_stats(&self) -> Result<UsageStats> {
        self.load_stats().await
    }

    /// Statistics whose daily rows fall within `[start, end]`
    ///
    /// Only the daily rows, `total_cost` and `total_tokens` are narrowed. The
    /// model and project breakdowns, per-kind token totals and session count
    /// still describe the whole history.
    pub async fn get_usage_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<UsageStats> {
        let mut stats = self.load_stats().await?;
        let filter = DateFilter::new().with_since(start).with_until(end);

        stats.by_date.retain(|day| filter.contains_key(&day.date));
        stats.total_cost = stats.by_date.iter().map(|day| day.total_cost).sum();
        stats.total_tokens = stats
            .by_date
            .iter()
            .fold(0u64, |acc, day| acc.saturating_add(day.total_tokens()));

        debug!(
            "Date range {}..={}: totals narrowed to {} days, model and project breakdowns cover all dates",
            date_key(start),
            date_key(end),
            stats.by_date.len()
        );
        Ok(stats)
    }

    /// Projects whose last use falls within the filter, optionally ordered by cost
    pub async fn get_session_stats(
        &self,
        filter: DateFilter,
        order: Option<SortOrder>,
    ) -> Result<Vec<ProjectUsage>> {
        let stats = self.load_stats().await?;
        let timezone = self.aggregator.timezone_config();

        let mut projects: Vec<ProjectUsage> = stats
            .by_project
            .into_iter()
            .filter(|project| {
                filter.is_unbounded()
                    || parse_timestamp(&project.last_used)
                        .is_some_and(|instant| filter.contains(timezone.date_of(&instant)))
            })
            .collect();

        match order {
            Some(SortOrder::Ascending) => {
                projects.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost))
            }
            Some(SortOrder::Descending) => {
                projects.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost))
            }
            None => {}
        }
        Ok(projects)
    }

    /// Raw entries, newest first by timestamp string
    pub async fn get_usage_details(&self, limit: Option<usize>) -> Result<Vec<UsageEntry>> {
        let mut entries = self.load().await?.entries;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    /// Distinct non-null `sessionId` values
    pub async fn session_count_by_id(&self) -> Result<usize> {
        let loaded = self.load().await?;
        Ok(count_distinct_session_ids(&loaded.entries))
    }

    /// Distinct session log files, per project
    pub async fn session_count_by_files(&self) -> Result<usize> {
        Ok(self.load().await?.session_files)
    }

    /// Both session counts from a single load
    pub async fn session_counts(&self) -> Result<SessionCounts> {
        let loaded = self.load().await?;
        Ok(SessionCounts {
            session_ids: count_distinct_session_ids(&loaded.entries),
            log_files: loaded.session_files,
        })
    }

    pub async fn load_state(&self) -> LoadState {
        self.state.lock().await.load_state
    }

    /// Errors skipped during the most recent load
    pub async fn last_errors(&self) -> ErrorSummary {
        self.state.lock().await.last_errors.clone()
    }
}
