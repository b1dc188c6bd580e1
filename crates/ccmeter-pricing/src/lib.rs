//! Pricing tables and cost calculator for ccmeter
//!
//! This crate holds the per-family rate cards and the calculator that turns
//! token counts into USD.

pub mod cost_calculator;
pub mod pricing;

pub use cost_calculator::CostCalculator;
pub use pricing::{ModelPricing, PricingFamily, PricingTable};
