//! Closed-form pension projection engine

use serde::{Deserialize, Serialize};

use super::inputs::ProjectionInputs;
use super::result::ProjectionResult;
use crate::scheme::PayFamily;

/// How career-average pensionable pay is approximated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarePayMethod {
    /// `salary × care_salary_pct / 100`
    #[default]
    FlatPercentage,
    /// Salary at the growth midpoint of the whole service period,
    /// scaled by `care_salary_pct / 100`
    GrowthMidpoint,
}

/// Configuration for a projection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// CARE pensionable pay approximation
    pub care_pay: CarePayMethod,
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

/// Project with the default configuration
pub fn project(inputs: &ProjectionInputs) -> ProjectionResult {
    ProjectionEngine::default().project(inputs)
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run a projection. Pure: identical inputs give bit-identical results.
    pub fn project(&self, inputs: &ProjectionInputs) -> ProjectionResult {
        let scheme = inputs.scheme.definition();

        let years_to_retirement = inputs.years_to_retirement();
        let projected_salary =
            inputs.salary * (1.0 + inputs.salary_growth_rate).powi(whole_years(u64::from(years_to_retirement)));

        let pensionable_pay = match scheme.family {
            PayFamily::FinalSalary => projected_salary,
            PayFamily::CareerAverage => self.care_pensionable_pay(inputs, years_to_retirement),
        };

        let base_annual_pension = pensionable_pay * scheme.accrual_rate * inputs.years_of_service;

        let factor = early_late_factor(inputs);
        let adjusted_annual_pension = base_annual_pension * factor;

        // Commutation
        let automatic_lump_sum = adjusted_annual_pension * scheme.automatic_lump_factor;
        let commuted_annual_pension = adjusted_annual_pension * inputs.commutation_proportion;
        let extra_commutation_lump_sum = commuted_annual_pension * inputs.commutation_factor;
        let annual_pension_after_commutation = adjusted_annual_pension - commuted_annual_pension;
        let total_lump_sum = automatic_lump_sum + extra_commutation_lump_sum;

        // Real terms. The factor is >= 1 for non-negative inflation.
        let raw_inflation_factor =
            (1.0 + inputs.inflation_rate).powi(whole_years(u64::from(years_to_retirement)));
        let inflation_factor = if raw_inflation_factor > 0.0 { raw_inflation_factor } else { 1.0 };
        let real_annual_pension = annual_pension_after_commutation / inflation_factor;
        let real_lump_sum = total_lump_sum / inflation_factor;

        log::trace!(
            "{}: pay={:.2} base={:.2} factor={:.6}",
            inputs.scheme.short_name(),
            pensionable_pay,
            base_annual_pension,
            factor
        );

        ProjectionResult {
            scheme: inputs.scheme,
            years_to_retirement,
            projected_salary,
            pensionable_pay,
            accrual_rate: scheme.accrual_rate,
            automatic_lump_factor: scheme.automatic_lump_factor,
            base_annual_pension,
            early_late_adjustment_factor: factor,
            adjusted_annual_pension,
            commuted_annual_pension,
            annual_pension_after_commutation,
            automatic_lump_sum,
            extra_commutation_lump_sum,
            total_lump_sum,
            inflation_factor,
            real_annual_pension,
            real_lump_sum,
        }
    }

    /// Pensionable pay for the career-average scheme
    fn care_pensionable_pay(&self, inputs: &ProjectionInputs, years_to_retirement: u32) -> f64 {
        let scale = inputs.care_salary_pct / 100.0;

        match self.config.care_pay {
            CarePayMethod::FlatPercentage => inputs.salary * scale,
            CarePayMethod::GrowthMidpoint => {
                let growth = 1.0 + inputs.salary_growth_rate;
                let years_already_worked =
                    (inputs.years_of_service - years_to_retirement as f64).max(0.0);
                let start_salary = inputs.salary / growth.powf(years_already_worked);
                let average_salary = start_salary * growth.powf(inputs.years_of_service / 2.0);
                average_salary * scale
            }
        }
    }
}

/// Year count as a `powi` exponent, saturating at `i32::MAX`
fn whole_years(years: u64) -> i32 {
    i32::try_from(years).unwrap_or(i32::MAX)
}

/// Early/late retirement factor, compounded per year away from NPA
fn early_late_factor(inputs: &ProjectionInputs) -> f64 {
    let years_diff = inputs.years_from_normal_pension_age();
    let years = whole_years(years_diff.unsigned_abs());

    if years_diff < 0 {
        (1.0 - inputs.early_reduction_rate).powi(years)
    } else if years_diff > 0 {
        (1.0 + inputs.late_increase_rate).powi(years)
    } else {
        1.0
    }
}
