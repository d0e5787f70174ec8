//! Rate assumptions for pension projections
//!
//! Values are held as percentages, the way a member enters them. The
//! conversion to fractions happens when projection inputs are built.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Container for all adjustable projection assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Early retirement reduction per year before NPA (%)
    pub early_reduction_per_year: f64,

    /// Late retirement increase per year after NPA (%)
    pub late_increase_per_year: f64,

    /// Share of pension exchanged for a lump sum (%)
    pub commutation_proportion: u32,

    /// Lump sum received per £1 of annual pension given up
    pub commutation_factor: f64,

    /// CARE earnings as a percentage of current pay
    pub care_salary_pct: u32,

    /// Expected annual salary growth (%)
    pub salary_growth_rate: f64,

    /// Expected growth on additional savings (%). Not used by the engine.
    pub investment_growth_rate: f64,

    /// Assumed annual inflation for real-terms values (%)
    pub inflation_rate: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            early_reduction_per_year: 4.0,
            late_increase_per_year: 3.0,
            commutation_proportion: 15,
            commutation_factor: 12.0,
            care_salary_pct: 80,
            salary_growth_rate: 2.0,
            investment_growth_rate: 4.0,
            inflation_rate: 2.5,
        }
    }
}

/// Declared ranges of each assumption
pub mod ranges {
    use super::RangeInclusive;

    pub const RATE_PCT: RangeInclusive<f64> = 0.0..=10.0;
    pub const COMMUTATION_PROPORTION: RangeInclusive<u32> = 0..=30;
    pub const COMMUTATION_FACTOR: RangeInclusive<f64> = 8.0..=20.0;
    pub const CARE_SALARY_PCT: RangeInclusive<u32> = 50..=110;
}

impl Assumptions {
    /// Assumptions with no commutation, growth or inflation
    ///
    /// Handy for reproducing hand calculations.
    pub fn flat() -> Self {
        Self {
            commutation_proportion: 0,
            salary_growth_rate: 0.0,
            investment_growth_rate: 0.0,
            inflation_rate: 0.0,
            ..Self::default()
        }
    }

    /// Check each value against its declared range
    pub fn range_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let rates = [
            ("early reduction per year", self.early_reduction_per_year),
            ("late increase per year", self.late_increase_per_year),
            ("salary growth rate", self.salary_growth_rate),
            ("investment growth rate", self.investment_growth_rate),
            ("inflation rate", self.inflation_rate),
        ];
        for (name, value) in rates {
            if !ranges::RATE_PCT.contains(&value) {
                problems.push(format!("{} {}% outside 0-10%", name, value));
            }
        }

        if !ranges::COMMUTATION_PROPORTION.contains(&self.commutation_proportion) {
            problems.push(format!(
                "commutation proportion {}% outside 0-30%",
                self.commutation_proportion
            ));
        }
        if !ranges::COMMUTATION_FACTOR.contains(&self.commutation_factor) {
            problems.push(format!("commutation factor {} outside 8-20", self.commutation_factor));
        }
        if !ranges::CARE_SALARY_PCT.contains(&self.care_salary_pct) {
            problems.push(format!("CARE salary {}% outside 50-110%", self.care_salary_pct));
        }

        problems
    }
}
