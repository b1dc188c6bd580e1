//! Static model rate cards
//!
//! Pricing is keyed by model family rather than by exact model id: a model
//! string is matched case-insensitively against `opus`, `sonnet` and `haiku`,
//! in that order. Anything else is billed at the sonnet rate.
//!
//! The table is a plain immutable value. Callers build one (usually
//! [`PricingTable::default`]) and share it behind an `Arc`, so tests can swap
//! in their own rate cards.
//!
//! # Examples
//!
//! ```
//! use ccmeter_pricing::pricing::{PricingFamily, PricingTable};
//! use ccmeter_core::types::TokenCounts;
//!
//! let table = PricingTable::default();
//! assert_eq!(table.family_for_model("claude-opus-4-1-20250805"), Some(PricingFamily::Opus));
//!
//! let cost = table
//!     .pricing_for_model("claude-opus-4-1")
//!     .calculate_cost(&TokenCounts::new(1_000_000, 0, 0, 0));
//! assert_eq!(cost, 5.0);
//! ```

use ccmeter_core::error::{CcmeterError, Result};
use ccmeter_core::types::TokenCounts;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Rate card for one model family, in USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Price per million input tokens
    pub input: f64,
    /// Price per million output tokens
    pub output: f64,
    /// Price per million cache write tokens
    pub cache_write: f64,
    /// Price per million cache read tokens
    pub cache_read: f64,
}

impl ModelPricing {
    pub const fn new(input: f64, output: f64, cache_write: f64, cache_read: f64) -> Self {
        Self {
            input,
            output,
            cache_write,
            cache_read,
        }
    }

    /// Cost of `tokens` at this rate card
    ///
    /// Cache reads are billed too; leaving them out under-counts long
    /// sessions considerably.
    pub fn calculate_cost(&self, tokens: &TokenCounts) -> f64 {
        (tokens.input_tokens as f64 / TOKENS_PER_MILLION) * self.input
            + (tokens.output_tokens as f64 / TOKENS_PER_MILLION) * self.output
            + (tokens.cache_creation_tokens as f64 / TOKENS_PER_MILLION) * self.cache_write
            + (tokens.cache_read_tokens as f64 / TOKENS_PER_MILLION) * self.cache_read
    }
}

/// Model families that carry distinct pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingFamily {
    Opus,
    Sonnet,
    Haiku,
}

impl PricingFamily {
    /// Match priority when a model string names several families
    pub const ALL: [PricingFamily; 3] = [Self::Opus, Self::Sonnet, Self::Haiku];

    /// Family named by a model string, matched case-insensitively
    pub fn from_model_name(model: &str) -> Option<Self> {
        let lowered = model.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| lowered.contains(family.keyword()))
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Opus => "opus",
            Self::Sonnet => "sonnet",
            Self::Haiku => "haiku",
        }
    }
}

impl fmt::Display for PricingFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Per-family pricing table
///
/// Deserializes from JSON of the form
/// `{"opus": {"input": 5.0, "output": 25.0, "cache_write": 6.25, "cache_read": 0.5}}`;
/// families missing from the document keep their default rate card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTable {
    pub opus: ModelPricing,
    pub sonnet: ModelPricing,
    pub haiku: ModelPricing,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            opus: ModelPricing::new(5.0, 25.0, 6.25, 0.50),
            sonnet: ModelPricing::new(3.0, 15.0, 3.75, 0.30),
            haiku: ModelPricing::new(1.0, 5.0, 1.25, 0.10),
        }
    }
}

impl PricingTable {
    /// Load a table from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CcmeterError::from_io(path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            CcmeterError::Config(format!("invalid pricing file {}: {e}", path.display()))
        })
    }

    /// Replace one family's rate card
    pub fn with_family(mut self, family: PricingFamily, pricing: ModelPricing) -> Self {
        *self.family_mut(family) = pricing;
        self
    }

    /// Rate card for a family
    pub fn family(&self, family: PricingFamily) -> &ModelPricing {
        match family {
            PricingFamily::Opus => &self.opus,
            PricingFamily::Sonnet => &self.sonnet,
            PricingFamily::Haiku => &self.haiku,
        }
    }

    fn family_mut(&mut self, family: PricingFamily) -> &mut ModelPricing {
        match family {
            PricingFamily::Opus => &mut self.opus,
            PricingFamily::Sonnet => &mut self.sonnet,
            PricingFamily::Haiku => &mut self.haiku,
        }
    }

    /// Family named by a model string, if any
    pub fn family_for_model(&self, model: &str) -> Option<PricingFamily> {
        PricingFamily::from_model_name(model)
    }

    /// Rate card for a model string, defaulting to sonnet
    pub fn pricing_for_model(&self, model: &str) -> &ModelPricing {
        match self.family_for_model(model) {
            Some(family) => self.family(family),
            None => {
                debug!("No pricing family matches model '{}', using sonnet rates", model);
                &self.sonnet
            }
        }
    }
}
