//! Batch error aggregation
//!
//! A multi-file ingestion run keeps going past broken files. The failures are
//! collected here, grouped by [`ErrorKind`], so they can be reported after the
//! run without interrupting it.

use crate::error::{CcmeterError, ErrorKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of error messages retained verbatim
const MAX_SAMPLES: usize = 5;

/// Errors recorded during one run, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    counts: BTreeMap<ErrorKind, usize>,
    samples: Vec<String>,
}

impl ErrorSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one error
    pub fn record(&mut self, error: &CcmeterError) {
        *self.counts.entry(error.kind()).or_insert(0) += 1;
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(error.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of recorded errors
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of errors of one kind
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Counts per kind, ordered by kind
    pub fn counts(&self) -> impl Iterator<Item = (ErrorKind, usize)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }

    /// The first few error messages, in recording order
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// True if any recorded error needs user intervention
    pub fn has_unrecoverable(&self) -> bool {
        self.counts.keys().any(|kind| !kind.is_recoverable())
    }
}

impl fmt::Display for ErrorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no errors");
        }
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect();
        write!(f, "{} errors ({})", self.total(), parts.join(", "))
    }
}
