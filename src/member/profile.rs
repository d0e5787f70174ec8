//! Personal facts driving a pension projection

use serde::{Deserialize, Serialize};

use crate::calculator::Field;
use crate::scheme::SchemeId;

/// Mutable facts about a scheme member
///
/// Every field is optional so the same record serves both calculator
/// variants: a seeded profile that is always computable, and a blank one
/// where the member must supply the mandatory fields first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonalProfile {
    /// Current annual pensionable pay (GBP)
    #[serde(default)]
    pub current_salary: Option<f64>,

    /// Years of pensionable service at retirement
    #[serde(default)]
    pub years_of_service: Option<f64>,

    /// Scheme section
    #[serde(default)]
    pub scheme: Option<SchemeId>,

    /// Current age
    #[serde(default)]
    pub current_age: Option<u32>,

    /// Planned retirement age
    #[serde(default)]
    pub retirement_age: Option<u32>,

    /// Normal pension age; the scheme default applies when unset
    #[serde(default)]
    pub normal_pension_age: Option<u32>,
}

/// Declared input ranges of the calculator
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const YEARS_OF_SERVICE: RangeInclusive<f64> = 0.0..=50.0;
    pub const CURRENT_AGE: RangeInclusive<u32> = 18..=75;
    pub const RETIREMENT_AGE: RangeInclusive<u32> = 55..=75;
    pub const NORMAL_PENSION_AGE: RangeInclusive<u32> = 55..=75;
}

impl PersonalProfile {
    /// Fields that must be set before a projection can run
    pub const MANDATORY: [Field; 5] = [
        Field::CurrentSalary,
        Field::YearsOfService,
        Field::Scheme,
        Field::CurrentAge,
        Field::RetirementAge,
    ];

    /// Profile pre-seeded with the calculator defaults
    pub fn seeded() -> Self {
        Self {
            current_salary: Some(40_000.0),
            years_of_service: Some(20.0),
            scheme: Some(SchemeId::Scheme2015),
            current_age: Some(45),
            retirement_age: Some(67),
            normal_pension_age: Some(67),
        }
    }

    /// Profile with nothing filled in
    pub fn blank() -> Self {
        Self::default()
    }

    /// Mandatory fields still unset, in catalogue order
    pub fn missing_fields(&self) -> Vec<Field> {
        Self::MANDATORY
            .iter()
            .copied()
            .filter(|field| match field {
                Field::CurrentSalary => self.current_salary.is_none(),
                Field::YearsOfService => self.years_of_service.is_none(),
                Field::Scheme => self.scheme.is_none(),
                Field::CurrentAge => self.current_age.is_none(),
                Field::RetirementAge => self.retirement_age.is_none(),
                _ => false,
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Normal pension age, falling back to the scheme default
    pub fn effective_normal_pension_age(&self) -> Option<u32> {
        self.normal_pension_age
            .or_else(|| self.scheme.map(|s| s.definition().default_normal_pension_age))
    }

    /// Check set values against the declared calculator ranges
    ///
    /// Returns a description of each out-of-range value. The engine itself
    /// performs no validation.
    pub fn range_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(salary) = self.current_salary {
            if salary < 0.0 {
                problems.push(format!("current salary {} is negative", salary));
            }
        }
        if let Some(years) = self.years_of_service {
            if !ranges::YEARS_OF_SERVICE.contains(&years) {
                problems.push(format!("years of service {} outside 0-50", years));
            }
        }
        if let Some(age) = self.current_age {
            if !ranges::CURRENT_AGE.contains(&age) {
                problems.push(format!("current age {} outside 18-75", age));
            }
        }
        if let Some(age) = self.retirement_age {
            if !ranges::RETIREMENT_AGE.contains(&age) {
                problems.push(format!("retirement age {} outside 55-75", age));
            }
        }
        if let Some(age) = self.normal_pension_age {
            if !ranges::NORMAL_PENSION_AGE.contains(&age) {
                problems.push(format!("normal pension age {} outside 55-75", age));
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_profile_is_complete() {
        let profile = PersonalProfile::seeded();
        assert!(profile.is_complete());
        assert_eq!(profile.current_salary, Some(40_000.0));
        assert_eq!(profile.scheme, Some(SchemeId::Scheme2015));
        assert!(profile.range_violations().is_empty());
    }

    #[test]
    fn test_blank_profile_lists_all_mandatory_fields() {
        let profile = PersonalProfile::blank();
        assert_eq!(profile.missing_fields(), PersonalProfile::MANDATORY.to_vec());
    }

    #[test]
    fn test_missing_fields_shrink_as_filled() {
        let mut profile = PersonalProfile::blank();
        profile.current_salary = Some(30_000.0);
        profile.scheme = Some(SchemeId::Section2008);

        assert_eq!(
            profile.missing_fields(),
            vec![Field::YearsOfService, Field::CurrentAge, Field::RetirementAge]
        );
    }

    #[test]
    fn test_normal_pension_age_falls_back_to_scheme_default() {
        let mut profile = PersonalProfile::blank();
        assert_eq!(profile.effective_normal_pension_age(), None);

        profile.scheme = Some(SchemeId::Section1995);
        assert_eq!(profile.effective_normal_pension_age(), Some(60));

        profile.normal_pension_age = Some(62);
        assert_eq!(profile.effective_normal_pension_age(), Some(62));
    }

    #[test]
    fn test_range_violations() {
        let mut profile = PersonalProfile::seeded();
        profile.retirement_age = Some(50);
        profile.years_of_service = Some(60.0);

        let problems = profile.range_violations();
        assert_eq!(problems.len(), 2);
    }
}
