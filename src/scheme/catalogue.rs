//! Fixed catalogue of NHS pension scheme sections

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How pensionable pay is derived for a scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayFamily {
    /// Pension based on (projected) salary at retirement
    FinalSalary,
    /// Career Average Revalued Earnings
    CareerAverage,
}

/// One of the three NHS pension scheme sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeId {
    /// 1995 Section (final salary)
    Section1995,
    /// 2008 Section (final salary)
    Section2008,
    /// 2015 Scheme (career average)
    Scheme2015,
}

/// Parameters of a scheme section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeDefinition {
    /// Fraction of pensionable pay credited per year of service
    pub accrual_rate: f64,

    /// Multiple of adjusted annual pension paid automatically as a lump sum
    pub automatic_lump_factor: f64,

    /// Age at which no early/late adjustment applies (UI default only)
    pub default_normal_pension_age: u32,

    /// Final salary or career average
    pub family: PayFamily,

    /// One-line description for display and prompts
    pub description: &'static str,
}

/// Error returned when a scheme label is not in the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pension scheme: {0:?}")]
pub struct SchemeError(pub String);

impl SchemeId {
    /// Catalogue order
    pub const ALL: [SchemeId; 3] = [SchemeId::Section1995, SchemeId::Section2008, SchemeId::Scheme2015];

    /// Canonical label, as used in the tool schema and prompts
    pub fn label(&self) -> &'static str {
        match self {
            SchemeId::Section1995 => "1995 Section (final salary)",
            SchemeId::Section2008 => "2008 Section (final salary)",
            SchemeId::Scheme2015 => "2015 Scheme (career average)",
        }
    }

    /// Short name without the family suffix
    pub fn short_name(&self) -> &'static str {
        match self {
            SchemeId::Section1995 => "1995 Section",
            SchemeId::Section2008 => "2008 Section",
            SchemeId::Scheme2015 => "2015 Scheme",
        }
    }

    /// Scheme parameters
    pub fn definition(&self) -> SchemeDefinition {
        match self {
            SchemeId::Section1995 => SchemeDefinition {
                accrual_rate: 1.0 / 80.0,
                automatic_lump_factor: 3.0,
                default_normal_pension_age: 60,
                family: PayFamily::FinalSalary,
                description: "Final salary, 1/80th pension plus 3x automatic lump sum.",
            },
            SchemeId::Section2008 => SchemeDefinition {
                accrual_rate: 1.0 / 60.0,
                automatic_lump_factor: 0.0,
                default_normal_pension_age: 65,
                family: PayFamily::FinalSalary,
                description: "Final salary, 1/60th pension, no automatic lump sum.",
            },
            SchemeId::Scheme2015 => SchemeDefinition {
                accrual_rate: 1.0 / 54.0,
                automatic_lump_factor: 0.0,
                default_normal_pension_age: 67,
                family: PayFamily::CareerAverage,
                description: "Career average (CARE), 1/54th of pensionable earnings each year.",
            },
        }
    }

    pub fn is_final_salary(&self) -> bool {
        self.definition().family == PayFamily::FinalSalary
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SchemeId {
    type Err = SchemeError;

    /// Accepts the canonical label or the short name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SchemeId::ALL
            .iter()
            .copied()
            .find(|id| {
                wanted.eq_ignore_ascii_case(id.label()) || wanted.eq_ignore_ascii_case(id.short_name())
            })
            .ok_or_else(|| SchemeError(s.to_string()))
    }
}

impl Serialize for SchemeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SchemeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
