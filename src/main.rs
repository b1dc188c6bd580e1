//! ccmeter - Analyze Claude Code usage data from local JSONL session logs

use ccmeter::{
    cli::{Cli, Command},
    config::AppConfig,
    output::get_formatter,
};
use ccmeter_core::error::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(cli: &Cli) {
    // --quiet overrides RUST_LOG; --verbose only applies when RUST_LOG is unset
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if cli.verbose {
                tracing_subscriber::EnvFilter::new(
                    "ccmeter=info,ccmeter_core=info,ccmeter_pricing=info,ccmeter_provider_claude=info",
                )
            } else {
                tracing_subscriber::EnvFilter::new("warn")
            }
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    if !is_terminal::is_terminal(std::io::stdout()) {
        colored::control::set_override(false);
    }

    let config = AppConfig::from_cli(&cli)?;
    let repository = config.build_repository();
    let formatter = get_formatter(cli.json, cli.full_model_names);

    let command = cli.command.clone().unwrap_or(Command::Summary);
    let output = match command {
        Command::Summary => {
            info!("Running usage summary");
            formatter.format_summary(&repository.get_usage_stats().await?)
        }
        Command::Daily(range) => {
            info!("Running daily usage report");
            let filter = range.to_filter()?;
            let stats = if filter.is_unbounded() {
                repository.get_usage_stats().await?
            } else {
                let (start, end) = filter.bounds();
                repository.get_usage_by_date_range(start, end).await?
            };
            formatter.format_daily(&stats)
        }
        Command::Models => {
            info!("Running model usage report");
            formatter.format_models(&repository.get_usage_stats().await?)
        }
        Command::Projects { range, order } => {
            info!("Running project usage report");
            let projects = repository
                .get_session_stats(range.to_filter()?, order)
                .await?;
            formatter.format_projects(&projects)
        }
        Command::Entries { limit } => {
            info!("Listing usage entries");
            formatter.format_entries(&repository.get_usage_details(limit).await?)
        }
        Command::Sessions => {
            info!("Counting sessions");
            formatter.format_sessions(&repository.session_counts().await?)
        }
    };

    println!("{output}");

    let errors = repository.last_errors().await;
    if !errors.is_empty() {
        eprintln!("{}", formatter.format_errors(&errors));
    }

    Ok(())
}
