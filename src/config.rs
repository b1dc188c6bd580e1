//! Runtime configuration resolved from the command line and environment

use crate::aggregation::StatisticsAggregator;
use crate::cli::Cli;
use crate::repository::{SessionCounting, UsageRepository};
use ccmeter_core::error::{CcmeterError, Result};
use ccmeter_core::{CostMode, TimezoneConfig};
use ccmeter_pricing::{CostCalculator, PricingTable};
use ccmeter_provider_claude::{
    ClaudeUsageSource, IngestionPipeline, JsonlRecordParser, LocalFileSystem, discover_claude_dirs,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything needed to build a repository
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub claude_dirs: Vec<PathBuf>,
    pub pricing: PricingTable,
    pub cost_mode: CostMode,
    pub timezone: TimezoneConfig,
    pub session_counting: SessionCounting,
    pub show_progress: bool,
}

impl AppConfig {
    /// Resolve data directories, pricing and timezone from parsed arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let claude_dirs = match discover_claude_dirs(cli.claude_dir.as_deref()) {
            Ok(dirs) => dirs,
            Err(CcmeterError::NoClaudeDirectory) => {
                warn!("No Claude data directory found, reporting empty usage");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let pricing = match &cli.pricing_file {
            Some(path) => {
                info!("Loading pricing from {}", path.display());
                PricingTable::from_json_file(path)?
            }
            None => PricingTable::default(),
        };

        let timezone =
            TimezoneConfig::from_cli(cli.timezone_args.timezone.as_deref(), cli.timezone_args.utc)?;
        info!("Using timezone: {}", timezone.display_name());

        Ok(Self {
            claude_dirs,
            pricing,
            cost_mode: cli.mode,
            timezone,
            session_counting: cli.session_count,
            show_progress: !cli.json && !cli.quiet && is_terminal::is_terminal(std::io::stderr()),
        })
    }

    /// Wire the pipeline, source and aggregator into a repository
    pub fn build_repository(&self) -> UsageRepository<ClaudeUsageSource> {
        let calculator = CostCalculator::new(Arc::new(self.pricing.clone()));
        let parser = JsonlRecordParser::new(calculator).with_cost_mode(self.cost_mode);
        let pipeline = IngestionPipeline::new(LocalFileSystem, parser)
            .with_progress(self.show_progress);
        let source = ClaudeUsageSource::new(self.claude_dirs.clone(), pipeline);

        UsageRepository::new(source, StatisticsAggregator::new(self.timezone))
            .with_session_counting(self.session_counting)
    }
}
