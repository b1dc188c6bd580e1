//! Cost calculator for usage entries
//!
//! Combines the injected [`PricingTable`] with a [`CostMode`] to decide the
//! cost of a single record: either the `costUSD` value logged with it, or a
//! figure computed from its token counts.
//!
//! # Examples
//!
//! ```
//! use ccmeter_core::types::{CostMode, ModelName, TokenCounts};
//! use ccmeter_pricing::{CostCalculator, PricingTable};
//! use std::sync::Arc;
//!
//! let calculator = CostCalculator::new(Arc::new(PricingTable::default()));
//! let tokens = TokenCounts::new(1_000_000, 0, 0, 0);
//! let model = ModelName::new("claude-opus-4-1");
//!
//! assert_eq!(calculator.calculate_cost(&tokens, &model), 5.0);
//! assert_eq!(calculator.calculate_with_mode(&tokens, &model, Some(1.25), CostMode::Auto), 1.25);
//! ```

use crate::pricing::PricingTable;
use ccmeter_core::types::{CostMode, ModelName, TokenCounts};
use std::sync::Arc;
use tracing::trace;

/// Calculates costs based on token usage and pricing
#[derive(Debug, Clone)]
pub struct CostCalculator {
    pricing: Arc<PricingTable>,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new(Arc::new(PricingTable::default()))
    }
}

impl CostCalculator {
    /// Create a new CostCalculator over a shared pricing table
    pub fn new(pricing: Arc<PricingTable>) -> Self {
        Self { pricing }
    }

    /// Calculate cost from token counts alone
    pub fn calculate_cost(&self, tokens: &TokenCounts, model_name: &ModelName) -> f64 {
        let cost = self
            .pricing
            .pricing_for_model(model_name.as_str())
            .calculate_cost(tokens);

        trace!(
            "Calculated cost: ${:.6} for {} total tokens of {}",
            cost,
            tokens.total(),
            model_name
        );

        cost
    }

    /// Calculate cost with mode consideration
    ///
    /// - `Auto`: the logged cost if present and nonzero, otherwise calculated
    /// - `Calculate`: always calculated from tokens
    /// - `Display`: the logged cost, or zero when none was logged
    pub fn calculate_with_mode(
        &self,
        tokens: &TokenCounts,
        model_name: &ModelName,
        logged_cost: Option<f64>,
        mode: CostMode,
    ) -> f64 {
        match mode {
            CostMode::Auto => match logged_cost {
                Some(cost) if cost != 0.0 => cost,
                _ => self.calculate_cost(tokens, model_name),
            },
            CostMode::Calculate => self.calculate_cost(tokens, model_name),
            CostMode::Display => logged_cost.unwrap_or(0.0),
        }
    }
}
