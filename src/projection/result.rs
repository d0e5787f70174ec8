//! Projection output structures

use serde::{Deserialize, Serialize};

use crate::scheme::SchemeId;

/// Derived values of a single projection
///
/// Always recomputed from scratch; no rounding is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub scheme: SchemeId,

    // Timing
    pub years_to_retirement: u32,

    // Pay
    pub projected_salary: f64,
    pub pensionable_pay: f64,

    // Scheme parameters used
    pub accrual_rate: f64,
    pub automatic_lump_factor: f64,

    // Annual pension
    pub base_annual_pension: f64,
    pub early_late_adjustment_factor: f64,
    pub adjusted_annual_pension: f64,
    pub commuted_annual_pension: f64,
    pub annual_pension_after_commutation: f64,

    // Lump sums
    pub automatic_lump_sum: f64,
    pub extra_commutation_lump_sum: f64,
    pub total_lump_sum: f64,

    // Today's money
    pub inflation_factor: f64,
    pub real_annual_pension: f64,
    pub real_lump_sum: f64,
}

impl ProjectionResult {
    /// Monthly pension before tax, after commutation
    pub fn monthly_pension(&self) -> f64 {
        self.annual_pension_after_commutation / 12.0
    }

    /// Whether retirement is still in the future
    pub fn has_future_projection(&self) -> bool {
        self.years_to_retirement > 0
    }
}
