//! Output formatting module for ccmeter
//!
//! This module provides formatters for displaying usage data in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use ccmeter::output::get_formatter;
//! use ccmeter_core::UsageStats;
//!
//! let stats = UsageStats::default();
//!
//! let formatter = get_formatter(false, false);
//! assert!(formatter.format_summary(&stats).contains("No usage data"));
//!
//! let json_formatter = get_formatter(true, false);
//! assert!(json_formatter.format_summary(&stats).contains("\"total_cost\""));
//! ```

use crate::model_formatter::{format_model_list, format_model_name};
use crate::repository::SessionCounts;
use ccmeter_core::diagnostics::ErrorSummary;
use ccmeter_core::types::{ModelName, TokenCounts, UsageEntry};
use ccmeter_core::{ProjectUsage, UsageStats};
use colored::Colorize;
use prettytable::{Cell, Row, Table, format, row};
use serde_json::{Value, json};

const NO_DATA: &str = "No usage data found.";

/// Token and cost totals over the daily rows only
///
/// Entries without a usable timestamp have no row, so these can be lower than
/// the overall totals.
fn daily_totals(stats: &UsageStats) -> (TokenCounts, f64) {
    stats
        .by_date
        .iter()
        .fold((TokenCounts::default(), 0.0), |(tokens, cost), day| {
            (tokens + day.tokens, cost + day.total_cost)
        })
}

/// Trait for output formatters
///
/// Every report the CLI can print has one method; implementations decide the
/// presentation.
pub trait OutputFormatter {
    /// Overall totals plus the session count
    fn format_summary(&self, stats: &UsageStats) -> String;

    /// One row per calendar day, ascending
    fn format_daily(&self, stats: &UsageStats) -> String;

    /// One row per model, most expensive first
    fn format_models(&self, stats: &UsageStats) -> String;

    /// One row per project, in the order given
    fn format_projects(&self, projects: &[ProjectUsage]) -> String;

    /// One row per usage entry, in the order given
    fn format_entries(&self, entries: &[UsageEntry]) -> String;

    fn format_sessions(&self, counts: &SessionCounts) -> String;

    /// Errors skipped while loading
    fn format_errors(&self, errors: &ErrorSummary) -> String;
}

/// Table formatter for human-readable output
///
/// Numbers are formatted with thousands separators and costs are shown
/// with dollar signs.
pub struct TableFormatter {
    /// Whether to show full model names or shortened versions
    pub full_model_names: bool,
}

impl TableFormatter {
    pub fn new(full_model_names: bool) -> Self {
        Self { full_model_names }
    }

    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let digits = n.to_string();
        let mut result = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }
        result
    }

    fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }

    fn new_table(titles: Row) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(titles);
        table
    }

    fn token_cells(tokens: &TokenCounts) -> Vec<Cell> {
        [
            tokens.input_tokens,
            tokens.output_tokens,
            tokens.cache_creation_tokens,
            tokens.cache_read_tokens,
            tokens.total(),
        ]
        .into_iter()
        .map(|n| Cell::new(&Self::format_number(n)).style_spec("r"))
        .collect()
    }

    /// A row of `label`, the five token columns, the cost and trailing cells
    fn usage_row(label: &str, tokens: &TokenCounts, cost: f64, trailing: &[String]) -> Row {
        let mut cells = vec![Cell::new(label)];
        cells.extend(Self::token_cells(tokens));
        cells.push(Cell::new(&Self::format_currency(cost)).style_spec("r"));
        cells.extend(trailing.iter().map(|s| Cell::new(s)));
        Row::new(cells)
    }

    fn totals_row(tokens: &TokenCounts, cost: f64, trailing: usize) -> Row {
        let mut row = Self::usage_row("TOTAL", tokens, cost, &vec![String::new(); trailing]);
        for cell in row.iter_mut() {
            cell.style(prettytable::Attr::Bold);
        }
        row
    }

    fn separator_row(width: usize) -> Row {
        Row::new(vec![Cell::new(""); width])
    }

    fn model_label(&self, model: &ModelName) -> String {
        format_model_name(model.as_str(), self.full_model_names)
    }
}

impl OutputFormatter for TableFormatter {
    fn format_summary(&self, stats: &UsageStats) -> String {
        if stats.is_empty() {
            return NO_DATA.to_string();
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);
        let lines = [
            ("Input tokens", Self::format_number(stats.tokens.input_tokens)),
            ("Output tokens", Self::format_number(stats.tokens.output_tokens)),
            (
                "Cache write tokens",
                Self::format_number(stats.tokens.cache_creation_tokens),
            ),
            (
                "Cache read tokens",
                Self::format_number(stats.tokens.cache_read_tokens),
            ),
            ("Total tokens", Self::format_number(stats.total_tokens)),
            ("Sessions", Self::format_number(stats.total_sessions as u64)),
            ("Days active", Self::format_number(stats.by_date.len() as u64)),
            ("Models", Self::format_number(stats.by_model.len() as u64)),
            ("Projects", Self::format_number(stats.by_project.len() as u64)),
        ];
        for (label, value) in lines {
            table.add_row(row![label, r -> value]);
        }

        format!(
            "{} {}\n{}",
            "Total cost:".bold(),
            Self::format_currency(stats.total_cost).green().bold(),
            table
        )
    }

    fn format_daily(&self, stats: &UsageStats) -> String {
        if stats.by_date.is_empty() {
            return NO_DATA.to_string();
        }

        let mut table = Self::new_table(row![
            b -> "Date",
            b -> "Input",
            b -> "Output",
            b -> "Cache Create",
            b -> "Cache Read",
            b -> "Total",
            b -> "Cost",
            b -> "Models"
        ]);

        for day in &stats.by_date {
            let models = format_model_list(
                day.models_used.iter().map(ModelName::as_str),
                self.full_model_names,
                ", ",
            );
            table.add_row(Self::usage_row(&day.date, &day.tokens, day.total_cost, &[models]));
        }

        let (tokens, total_cost) = daily_totals(stats);
        table.add_row(Self::separator_row(8));
        table.add_row(Self::totals_row(&tokens, total_cost, 1));
        table.to_string()
    }

    fn format_models(&self, stats: &UsageStats) -> String {
        if stats.by_model.is_empty() {
            return NO_DATA.to_string();
        }

        let mut table = Self::new_table(row![
            b -> "Model",
            b -> "Input",
            b -> "Output",
            b -> "Cache Create",
            b -> "Cache Read",
            b -> "Total",
            b -> "Cost",
            b -> "Entries"
        ]);

        let mut models: Vec<_> = stats.by_model.iter().collect();
        models.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));
        for model in models {
            table.add_row(Self::usage_row(
                &self.model_label(&model.model),
                &model.tokens,
                model.total_cost,
                &[Self::format_number(model.session_count as u64)],
            ));
        }

        table.add_row(Self::separator_row(8));
        table.add_row(Self::totals_row(&stats.tokens, stats.total_cost, 1));
        table.to_string()
    }

    fn format_projects(&self, projects: &[ProjectUsage]) -> String {
        if projects.is_empty() {
            return NO_DATA.to_string();
        }

        let mut table = Self::new_table(row![
            b -> "Project",
            b -> "Input",
            b -> "Output",
            b -> "Cache Create",
            b -> "Cache Read",
            b -> "Total",
            b -> "Cost",
            b -> "Sessions",
            b -> "Last Used"
        ]);

        let mut tokens = TokenCounts::default();
        let mut cost = 0.0;
        for project in projects {
            tokens += project.tokens;
            cost += project.total_cost;
            table.add_row(Self::usage_row(
                &project.project_name,
                &project.tokens,
                project.total_cost,
                &[
                    Self::format_number(project.session_count as u64),
                    project.last_used.clone(),
                ],
            ));
        }

        table.add_row(Self::separator_row(9));
        table.add_row(Self::totals_row(&tokens, cost, 2));
        table.to_string()
    }

    fn format_entries(&self, entries: &[UsageEntry]) -> String {
        if entries.is_empty() {
            return NO_DATA.to_string();
        }

        let mut table = Self::new_table(row![
            b -> "Timestamp",
            b -> "Input",
            b -> "Output",
            b -> "Cache Create",
            b -> "Cache Read",
            b -> "Total",
            b -> "Cost",
            b -> "Model",
            b -> "Project"
        ]);

        for entry in entries {
            table.add_row(Self::usage_row(
                &entry.timestamp,
                &entry.tokens,
                entry.cost,
                &[self.model_label(&entry.model), entry.project.clone()],
            ));
        }
        table.to_string()
    }

    fn format_sessions(&self, counts: &SessionCounts) -> String {
        let mut table = Self::new_table(row![b -> "Definition", b -> "Sessions"]);
        table.add_row(row![
            "Distinct session ids",
            r -> Self::format_number(counts.session_ids as u64)
        ]);
        table.add_row(row![
            "Session log files",
            r -> Self::format_number(counts.log_files as u64)
        ]);
        table.to_string()
    }

    fn format_errors(&self, errors: &ErrorSummary) -> String {
        if errors.is_empty() {
            return String::new();
        }
        let mut output = format!("{} {}", "warning:".yellow().bold(), errors);
        for sample in errors.samples() {
            output.push_str(&format!("\n  - {sample}"));
        }
        for (kind, _) in errors.counts() {
            output.push_str(&format!("\n  hint ({kind}): {}", kind.recovery_suggestion()));
        }
        output
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn tokens_json(tokens: &TokenCounts) -> Value {
        json!({
            "input_tokens": tokens.input_tokens,
            "output_tokens": tokens.output_tokens,
            "cache_creation_tokens": tokens.cache_creation_tokens,
            "cache_read_tokens": tokens.cache_read_tokens,
            "total": tokens.total(),
        })
    }

    fn render(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, stats: &UsageStats) -> String {
        Self::render(&json!({
            "total_cost": stats.total_cost,
            "total_tokens": stats.total_tokens,
            "tokens": Self::tokens_json(&stats.tokens),
            "total_sessions": stats.total_sessions,
            "days": stats.by_date.len(),
            "models": stats.by_model.len(),
            "projects": stats.by_project.len(),
        }))
    }

    fn format_daily(&self, stats: &UsageStats) -> String {
        let (tokens, total_cost) = daily_totals(stats);
        Self::render(&json!({
            "daily": stats.by_date.iter().map(|day| json!({
                "date": day.date,
                "tokens": Self::tokens_json(&day.tokens),
                "total_cost": day.total_cost,
                "models_used": day.models_used,
            })).collect::<Vec<_>>(),
            "totals": {
                "total_tokens": tokens.total(),
                "total_cost": total_cost,
            }
        }))
    }

    fn format_models(&self, stats: &UsageStats) -> String {
        let mut models: Vec<_> = stats.by_model.iter().collect();
        models.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));
        Self::render(&json!({
            "models": models.iter().map(|model| json!({
                "model": model.model,
                "tokens": Self::tokens_json(&model.tokens),
                "total_cost": model.total_cost,
                "entries": model.session_count,
            })).collect::<Vec<_>>(),
            "totals": {
                "tokens": Self::tokens_json(&stats.tokens),
                "total_cost": stats.total_cost,
            }
        }))
    }

    fn format_projects(&self, projects: &[ProjectUsage]) -> String {
        Self::render(&json!({
            "projects": projects.iter().map(|project| json!({
                "project_path": project.project_path,
                "project_name": project.project_name,
                "tokens": Self::tokens_json(&project.tokens),
                "total_cost": project.total_cost,
                "session_count": project.session_count,
                "last_used": project.last_used,
            })).collect::<Vec<_>>(),
        }))
    }

    fn format_entries(&self, entries: &[UsageEntry]) -> String {
        Self::render(&json!({ "entries": entries }))
    }

    fn format_sessions(&self, counts: &SessionCounts) -> String {
        Self::render(&json!({ "sessions": counts }))
    }

    fn format_errors(&self, errors: &ErrorSummary) -> String {
        if errors.is_empty() {
            return String::new();
        }
        Self::render(&json!({ "errors": errors }))
    }
}

/// Pick the formatter for the requested output mode
pub fn get_formatter(json: bool, full_model_names: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new(full_model_names))
    }
}
