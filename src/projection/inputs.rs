//! Flat input record for a single pension projection

use serde::{Deserialize, Serialize};

use crate::scheme::SchemeId;

/// Everything the engine needs for one projection
///
/// Rates are fractions (0.04 = 4%) except `care_salary_pct`, which stays a
/// percentage. Callers are responsible for range validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInputs {
    pub scheme: SchemeId,

    /// Current annual pensionable pay
    pub salary: f64,

    /// Years of service at retirement
    pub years_of_service: f64,

    pub retirement_age: u32,

    pub normal_pension_age: u32,

    /// Reduction per year of retirement before NPA (fraction)
    pub early_reduction_rate: f64,

    /// Increase per year of retirement after NPA (fraction)
    pub late_increase_rate: f64,

    /// Share of adjusted pension commuted (fraction, 0-1)
    pub commutation_proportion: f64,

    /// Lump sum per £1 of pension commuted
    pub commutation_factor: f64,

    /// CARE earnings as a percentage of current pay
    pub care_salary_pct: f64,

    pub current_age: u32,

    /// Annual salary growth (fraction)
    pub salary_growth_rate: f64,

    /// Annual inflation (fraction)
    pub inflation_rate: f64,
}

impl ProjectionInputs {
    /// Years between now and retirement, floored at zero
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    /// Retirement age minus normal pension age
    pub fn years_from_normal_pension_age(&self) -> i64 {
        self.retirement_age as i64 - self.normal_pension_age as i64
    }

    /// Copy of these inputs under a different scheme, at that scheme's default NPA
    pub fn with_scheme(&self, scheme: SchemeId) -> Self {
        Self {
            scheme,
            normal_pension_age: scheme.definition().default_normal_pension_age,
            ..self.clone()
        }
    }

    /// Copy of these inputs with a different retirement age
    pub fn with_retirement_age(&self, retirement_age: u32) -> Self {
        Self {
            retirement_age,
            ..self.clone()
        }
    }
}
