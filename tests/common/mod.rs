//! Common test utilities and helpers for ccmeter tests
//!
//! Fixture builders for session-log trees on disk, a JSONL record builder,
//! and a fixed-content [`UsageSource`] for repository tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ccmeter_core::{
    ErrorSummary, LoadedUsage, ModelName, Result, SessionId, TokenCounts, UsageEntry, UsageSource,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Builder for one assistant-turn log line
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    timestamp: String,
    message_id: Option<String>,
    request_id: Option<String>,
    session_id: Option<String>,
    model: String,
    tokens: TokenCounts,
    cost_usd: Option<f64>,
}

impl RecordBuilder {
    pub fn new(timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            message_id: None,
            request_id: None,
            session_id: None,
            model: "claude-sonnet-4-20250514".to_string(),
            tokens: TokenCounts::new(100, 50, 0, 0),
            cost_usd: None,
        }
    }

    pub fn ids(mut self, message_id: &str, request_id: &str) -> Self {
        self.message_id = Some(message_id.to_string());
        self.request_id = Some(request_id.to_string());
        self
    }

    pub fn session(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn tokens(mut self, input: u64, output: u64, cache_write: u64, cache_read: u64) -> Self {
        self.tokens = TokenCounts::new(input, output, cache_write, cache_read);
        self
    }

    pub fn cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = Some(cost_usd);
        self
    }

    pub fn line(&self) -> String {
        let mut record = json!({
            "type": "assistant",
            "timestamp": self.timestamp,
            "message": {
                "role": "assistant",
                "model": self.model,
                "usage": {
                    "input_tokens": self.tokens.input_tokens,
                    "output_tokens": self.tokens.output_tokens,
                    "cache_creation_input_tokens": self.tokens.cache_creation_tokens,
                    "cache_read_input_tokens": self.tokens.cache_read_tokens,
                }
            }
        });
        if let Some(id) = &self.message_id {
            record["message"]["id"] = json!(id);
        }
        if let Some(id) = &self.request_id {
            record["requestId"] = json!(id);
        }
        if let Some(id) = &self.session_id {
            record["sessionId"] = json!(id);
        }
        if let Some(cost) = self.cost_usd {
            record["costUSD"] = json!(cost);
        }
        record.to_string()
    }
}

/// A user turn, which carries a timestamp but no usage
pub fn user_line(timestamp: &str) -> String {
    json!({
        "type": "user",
        "timestamp": timestamp,
        "message": { "role": "user", "content": "hello" }
    })
    .to_string()
}

/// A temporary Claude base directory with a `projects/` tree
pub struct ClaudeFixture {
    temp_dir: TempDir,
}

impl ClaudeFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(temp_dir.path().join("projects")).expect("create projects dir");
        Self { temp_dir }
    }

    pub fn base_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn projects_root(&self) -> PathBuf {
        self.base_dir().join("projects")
    }

    /// Write `<projects>/<project_dir>/<session>.jsonl` from `lines`
    pub fn add_session(&self, project_dir: &str, session: &str, lines: &[String]) -> PathBuf {
        let dir = self.projects_root().join(project_dir);
        std::fs::create_dir_all(&dir).expect("create project dir");
        let path = dir.join(format!("{session}.jsonl"));
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&path, content).expect("write session log");
        path
    }
}

/// Builder for test [`UsageEntry`] values
pub struct UsageEntryBuilder {
    entry: UsageEntry,
}

impl UsageEntryBuilder {
    pub fn new() -> Self {
        Self {
            entry: UsageEntry {
                project: "/Users/dev/app".to_string(),
                timestamp: "2025-08-06T10:00:00Z".to_string(),
                model: ModelName::new("claude-sonnet-4-20250514"),
                tokens: TokenCounts::new(100, 50, 10, 5),
                cost: 0.01,
                session_id: None,
            },
        }
    }

    pub fn project(mut self, project: &str) -> Self {
        self.entry.project = project.to_string();
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.entry.timestamp = timestamp.to_string();
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.entry.model = ModelName::new(model);
        self
    }

    pub fn tokens(mut self, input: u64, output: u64, cache_write: u64, cache_read: u64) -> Self {
        self.entry.tokens = TokenCounts::new(input, output, cache_write, cache_read);
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.entry.cost = cost;
        self
    }

    pub fn session(mut self, session_id: &str) -> Self {
        self.entry.session_id = Some(SessionId::new(session_id));
        self
    }

    pub fn build(self) -> UsageEntry {
        self.entry
    }
}

/// [`UsageSource`] returning the same entries on every load
pub struct StaticSource {
    loaded: LoadedUsage,
    loads: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(entries: Vec<UsageEntry>, session_files: usize) -> Self {
        Self {
            loaded: LoadedUsage {
                entries,
                session_files,
                errors: ErrorSummary::new(),
            },
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_errors(mut self, errors: ErrorSummary) -> Self {
        self.loaded.errors = errors;
        self
    }

    /// Counter of `load` calls, readable after the source is moved
    pub fn load_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.loads)
    }
}

#[async_trait]
impl UsageSource for StaticSource {
    async fn load(&self) -> Result<LoadedUsage> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.loaded.clone())
    }
}

/// Float comparison for cost sums
pub fn assert_cost_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected cost {expected}, got {actual}"
    );
}
