//! Canonical calculator record: member profile plus assumptions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fields::{Field, FieldValue};
use crate::assumptions::Assumptions;
use crate::member::PersonalProfile;
use crate::projection::{ProjectionEngine, ProjectionInputs, ProjectionResult};

/// Projection requested before the mandatory fields were supplied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", list_labels(.0))]
pub struct MissingFields(pub Vec<Field>);

fn list_labels(fields: &[Field]) -> String {
    fields.iter().map(|f| f.label()).collect::<Vec<_>>().join(", ")
}

/// Everything the calculator knows about one member
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculatorState {
    #[serde(default)]
    pub profile: PersonalProfile,
    #[serde(default)]
    pub assumptions: Assumptions,
}

impl CalculatorState {
    /// State with every field pre-seeded; a projection is always computable
    pub fn seeded() -> Self {
        Self {
            profile: PersonalProfile::seeded(),
            assumptions: Assumptions::default(),
        }
    }

    /// State where the member must supply the mandatory fields first
    pub fn blank() -> Self {
        Self {
            profile: PersonalProfile::blank(),
            assumptions: Assumptions::default(),
        }
    }

    /// Current value of a field, `None` when unset
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        let p = &self.profile;
        let a = &self.assumptions;
        match field {
            Field::CurrentSalary => p.current_salary.map(FieldValue::Number),
            Field::YearsOfService => p.years_of_service.map(FieldValue::Number),
            Field::Scheme => p.scheme.map(FieldValue::Scheme),
            Field::CurrentAge => p.current_age.map(FieldValue::Integer),
            Field::RetirementAge => p.retirement_age.map(FieldValue::Integer),
            Field::NormalPensionAge => p.normal_pension_age.map(FieldValue::Integer),
            Field::EarlyReductionPerYear => Some(FieldValue::Number(a.early_reduction_per_year)),
            Field::LateIncreasePerYear => Some(FieldValue::Number(a.late_increase_per_year)),
            Field::CommutationProportion => Some(FieldValue::Integer(a.commutation_proportion)),
            Field::CommutationFactor => Some(FieldValue::Number(a.commutation_factor)),
            Field::CareSalaryPct => Some(FieldValue::Integer(a.care_salary_pct)),
            Field::SalaryGrowthRate => Some(FieldValue::Number(a.salary_growth_rate)),
            Field::InvestmentGrowthRate => Some(FieldValue::Number(a.investment_growth_rate)),
            Field::InflationRate => Some(FieldValue::Number(a.inflation_rate)),
        }
    }

    /// Overwrite one field. Returns false if the value has the wrong type.
    pub fn set(&mut self, field: Field, value: FieldValue) -> bool {
        let p = &mut self.profile;
        let a = &mut self.assumptions;

        macro_rules! assign {
            ($slot:expr, $conv:expr) => {
                match $conv {
                    Some(v) => {
                        $slot = v;
                        true
                    }
                    None => false,
                }
            };
        }

        match field {
            Field::CurrentSalary => assign!(p.current_salary, value.as_f64().map(Some)),
            Field::YearsOfService => assign!(p.years_of_service, value.as_f64().map(Some)),
            Field::Scheme => assign!(p.scheme, value.as_scheme().map(Some)),
            Field::CurrentAge => assign!(p.current_age, value.as_u32().map(Some)),
            Field::RetirementAge => assign!(p.retirement_age, value.as_u32().map(Some)),
            Field::NormalPensionAge => assign!(p.normal_pension_age, value.as_u32().map(Some)),
            Field::EarlyReductionPerYear => assign!(a.early_reduction_per_year, value.as_f64()),
            Field::LateIncreasePerYear => assign!(a.late_increase_per_year, value.as_f64()),
            Field::CommutationProportion => assign!(a.commutation_proportion, value.as_u32()),
            Field::CommutationFactor => assign!(a.commutation_factor, value.as_f64()),
            Field::CareSalaryPct => assign!(a.care_salary_pct, value.as_u32()),
            Field::SalaryGrowthRate => assign!(a.salary_growth_rate, value.as_f64()),
            Field::InvestmentGrowthRate => assign!(a.investment_growth_rate, value.as_f64()),
            Field::InflationRate => assign!(a.inflation_rate, value.as_f64()),
        }
    }

    pub fn missing_fields(&self) -> Vec<Field> {
        self.profile.missing_fields()
    }

    /// Engine inputs, with percentages converted to fractions
    pub fn projection_inputs(&self) -> Result<ProjectionInputs, MissingFields> {
        let p = &self.profile;
        let a = &self.assumptions;

        match (p.current_salary, p.years_of_service, p.scheme, p.current_age, p.retirement_age) {
            (Some(salary), Some(years_of_service), Some(scheme), Some(current_age), Some(retirement_age)) => {
                Ok(ProjectionInputs {
                    scheme,
                    salary,
                    years_of_service,
                    retirement_age,
                    normal_pension_age: p
                        .normal_pension_age
                        .unwrap_or(scheme.definition().default_normal_pension_age),
                    early_reduction_rate: a.early_reduction_per_year / 100.0,
                    late_increase_rate: a.late_increase_per_year / 100.0,
                    commutation_proportion: a.commutation_proportion as f64 / 100.0,
                    commutation_factor: a.commutation_factor,
                    care_salary_pct: a.care_salary_pct as f64,
                    current_age,
                    salary_growth_rate: a.salary_growth_rate / 100.0,
                    inflation_rate: a.inflation_rate / 100.0,
                })
            }
            _ => Err(MissingFields(self.missing_fields())),
        }
    }

    /// Project this state with the given engine
    pub fn project(&self, engine: &ProjectionEngine) -> Result<ProjectionResult, MissingFields> {
        self.projection_inputs().map(|inputs| engine.project(&inputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SchemeId;
    use approx::assert_relative_eq;

    #[test]
    fn test_seeded_state_projects() {
        let state = CalculatorState::seeded();
        let result = state.project(&ProjectionEngine::default()).unwrap();

        // 40000 x 80% x 20/54, 15% commuted at NPA
        assert_relative_eq!(result.base_annual_pension, 32_000.0 * 20.0 / 54.0, max_relative = 1e-12);
        assert_relative_eq!(
            result.annual_pension_after_commutation,
            result.adjusted_annual_pension * 0.85,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_percentages_become_fractions() {
        let inputs = CalculatorState::seeded().projection_inputs().unwrap();

        assert_relative_eq!(inputs.early_reduction_rate, 0.04);
        assert_relative_eq!(inputs.late_increase_rate, 0.03);
        assert_relative_eq!(inputs.commutation_proportion, 0.15);
        assert_relative_eq!(inputs.salary_growth_rate, 0.02);
        assert_relative_eq!(inputs.inflation_rate, 0.025);
        assert_eq!(inputs.care_salary_pct, 80.0);
        assert_eq!(inputs.commutation_factor, 12.0);
    }

    #[test]
    fn test_blank_state_is_not_computable() {
        let state = CalculatorState::blank();
        let err = state.project(&ProjectionEngine::default()).unwrap_err();

        assert_eq!(err.0.len(), 5);
        assert!(err.to_string().starts_with("missing required fields: Current salary"));
    }

    #[test]
    fn test_unset_npa_uses_scheme_default() {
        let mut state = CalculatorState::seeded();
        state.profile.scheme = Some(SchemeId::Section2008);
        state.profile.normal_pension_age = None;

        assert_eq!(state.projection_inputs().unwrap().normal_pension_age, 65);
    }

    #[test]
    fn test_get_and_set() {
        let mut state = CalculatorState::blank();
        assert_eq!(state.get(Field::CurrentSalary), None);

        assert!(state.set(Field::CurrentSalary, FieldValue::Number(55_000.0)));
        assert_eq!(state.get(Field::CurrentSalary), Some(FieldValue::Number(55_000.0)));

        assert!(state.set(Field::RetirementAge, FieldValue::Number(60.0)));
        assert_eq!(state.profile.retirement_age, Some(60));

        assert!(!state.set(Field::Scheme, FieldValue::Integer(2015)));
        assert!(!state.set(Field::CareSalaryPct, FieldValue::Number(72.5)));
        assert_eq!(state.assumptions.care_salary_pct, 80);
    }
}
