//! Catalogue of calculator fields the assistant may update

use serde::{Deserialize, Serialize};
use std::fmt;

use super::format::{format_currency, format_number};
use crate::scheme::SchemeId;

/// How a field value is rendered for people
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Currency,
    Percent,
    Plain,
}

/// Value type accepted by a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Integer,
    Scheme,
}

/// A recognised calculator field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CurrentSalary,
    YearsOfService,
    Scheme,
    CurrentAge,
    RetirementAge,
    NormalPensionAge,
    EarlyReductionPerYear,
    LateIncreasePerYear,
    CommutationProportion,
    CommutationFactor,
    CareSalaryPct,
    SalaryGrowthRate,
    InvestmentGrowthRate,
    InflationRate,
}

/// A typed field value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(u32),
    Number(f64),
    Scheme(SchemeId),
}

impl Field {
    /// Catalogue order
    pub const ALL: [Field; 14] = [
        Field::CurrentSalary,
        Field::YearsOfService,
        Field::Scheme,
        Field::CurrentAge,
        Field::RetirementAge,
        Field::NormalPensionAge,
        Field::EarlyReductionPerYear,
        Field::LateIncreasePerYear,
        Field::CommutationProportion,
        Field::CommutationFactor,
        Field::CareSalaryPct,
        Field::SalaryGrowthRate,
        Field::InvestmentGrowthRate,
        Field::InflationRate,
    ];

    /// Name used in tool-call arguments
    pub fn wire_name(&self) -> &'static str {
        match self {
            Field::CurrentSalary => "current_salary",
            Field::YearsOfService => "years_of_service",
            Field::Scheme => "scheme",
            Field::CurrentAge => "current_age",
            Field::RetirementAge => "retirement_age",
            Field::NormalPensionAge => "normal_pension_age",
            Field::EarlyReductionPerYear => "early_reduction_per_year",
            Field::LateIncreasePerYear => "late_increase_per_year",
            Field::CommutationProportion => "commutation_proportion",
            Field::CommutationFactor => "commutation_factor",
            Field::CareSalaryPct => "care_salary_pct",
            Field::SalaryGrowthRate => "salary_growth_rate",
            Field::InvestmentGrowthRate => "investment_growth_rate",
            Field::InflationRate => "inflation_rate",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Field::CurrentSalary => "Current salary",
            Field::YearsOfService => "Years of service",
            Field::Scheme => "Pension scheme",
            Field::CurrentAge => "Current age",
            Field::RetirementAge => "Retirement age",
            Field::NormalPensionAge => "Normal pension age",
            Field::EarlyReductionPerYear => "Early reduction %",
            Field::LateIncreasePerYear => "Late increase %",
            Field::CommutationProportion => "Commutation %",
            Field::CommutationFactor => "Commutation factor",
            Field::CareSalaryPct => "CARE salary %",
            Field::SalaryGrowthRate => "Salary growth %",
            Field::InvestmentGrowthRate => "Investment growth %",
            Field::InflationRate => "Inflation rate %",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.wire_name() == name)
    }

    pub fn display_kind(&self) -> DisplayKind {
        match self {
            Field::CurrentSalary => DisplayKind::Currency,
            Field::EarlyReductionPerYear
            | Field::LateIncreasePerYear
            | Field::CommutationProportion
            | Field::CareSalaryPct
            | Field::SalaryGrowthRate
            | Field::InvestmentGrowthRate
            | Field::InflationRate => DisplayKind::Percent,
            _ => DisplayKind::Plain,
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            Field::Scheme => ValueKind::Scheme,
            Field::CurrentAge
            | Field::RetirementAge
            | Field::NormalPensionAge
            | Field::CommutationProportion
            | Field::CareSalaryPct => ValueKind::Integer,
            _ => ValueKind::Number,
        }
    }

    /// Render a value (or its absence) the way this field is displayed
    pub fn render(&self, value: Option<FieldValue>) -> String {
        let Some(value) = value else {
            return "not set".to_string();
        };

        match (self.display_kind(), value) {
            (DisplayKind::Currency, v) => v.as_f64().map(format_currency).unwrap_or_else(|| v.to_string()),
            (DisplayKind::Percent, v) => format!("{}%", v),
            (DisplayKind::Plain, v) => v.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(n) => Some(*n),
            FieldValue::Scheme(_) => None,
        }
    }

    /// Whole, non-negative numbers only
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => {
                Some(*n as u32)
            }
            _ => None,
        }
    }

    pub fn as_scheme(&self) -> Option<SchemeId> {
        match self {
            FieldValue::Scheme(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::Scheme(s) => write!(f, "{}", s),
        }
    }
}
