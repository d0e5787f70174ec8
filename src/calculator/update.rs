//! Merging assistant-proposed field updates into calculator state

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::fields::{Field, FieldValue, ValueKind};
use super::state::CalculatorState;
use crate::scheme::SchemeId;

/// Result text returned to the model when nothing changed
pub const NO_CHANGES: &str = "No changes made to the calculator.";

/// Validated arguments of an `update_calculator` call
///
/// One optional slot per recognised field. Unknown keys never make it in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_service: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<SchemeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retirement_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_pension_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_reduction_per_year: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_increase_per_year: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commutation_proportion: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commutation_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_salary_pct: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_growth_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_growth_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,
}

impl CalculatorUpdate {
    /// Parse raw tool-call arguments leniently
    ///
    /// Malformed JSON, or anything that is not an object, is an empty
    /// update. Unknown keys and nulls are ignored. A recognised key with a
    /// value of the wrong type is dropped on its own.
    pub fn from_arguments(arguments: &str) -> Self {
        match serde_json::from_str::<Value>(arguments) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                log::warn!("Ignoring unparseable update_calculator arguments: {}", e);
                Self::default()
            }
        }
    }

    /// Build from an already-parsed JSON value
    pub fn from_value(value: &Value) -> Self {
        let mut update = Self::default();

        let Some(object) = value.as_object() else {
            log::warn!("Ignoring update_calculator arguments that are not an object");
            return update;
        };

        for (key, raw) in object {
            let Some(field) = Field::from_wire_name(key) else {
                log::debug!("Ignoring unknown update field {:?}", key);
                continue;
            };
            if raw.is_null() {
                continue;
            }
            match parse_value(field, raw) {
                Some(value) => update.set(field, value),
                None => log::warn!("Dropping {} with unusable value {}", field.wire_name(), raw),
            }
        }

        update
    }

    /// Proposed value for a field
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::CurrentSalary => self.current_salary.map(FieldValue::Number),
            Field::YearsOfService => self.years_of_service.map(FieldValue::Number),
            Field::Scheme => self.scheme.map(FieldValue::Scheme),
            Field::CurrentAge => self.current_age.map(FieldValue::Integer),
            Field::RetirementAge => self.retirement_age.map(FieldValue::Integer),
            Field::NormalPensionAge => self.normal_pension_age.map(FieldValue::Integer),
            Field::EarlyReductionPerYear => self.early_reduction_per_year.map(FieldValue::Number),
            Field::LateIncreasePerYear => self.late_increase_per_year.map(FieldValue::Number),
            Field::CommutationProportion => self.commutation_proportion.map(FieldValue::Integer),
            Field::CommutationFactor => self.commutation_factor.map(FieldValue::Number),
            Field::CareSalaryPct => self.care_salary_pct.map(FieldValue::Integer),
            Field::SalaryGrowthRate => self.salary_growth_rate.map(FieldValue::Number),
            Field::InvestmentGrowthRate => self.investment_growth_rate.map(FieldValue::Number),
            Field::InflationRate => self.inflation_rate.map(FieldValue::Number),
        }
    }

    fn set(&mut self, field: Field, value: FieldValue) {
        match field {
            Field::CurrentSalary => self.current_salary = value.as_f64(),
            Field::YearsOfService => self.years_of_service = value.as_f64(),
            Field::Scheme => self.scheme = value.as_scheme(),
            Field::CurrentAge => self.current_age = value.as_u32(),
            Field::RetirementAge => self.retirement_age = value.as_u32(),
            Field::NormalPensionAge => self.normal_pension_age = value.as_u32(),
            Field::EarlyReductionPerYear => self.early_reduction_per_year = value.as_f64(),
            Field::LateIncreasePerYear => self.late_increase_per_year = value.as_f64(),
            Field::CommutationProportion => self.commutation_proportion = value.as_u32(),
            Field::CommutationFactor => self.commutation_factor = value.as_f64(),
            Field::CareSalaryPct => self.care_salary_pct = value.as_u32(),
            Field::SalaryGrowthRate => self.salary_growth_rate = value.as_f64(),
            Field::InvestmentGrowthRate => self.investment_growth_rate = value.as_f64(),
            Field::InflationRate => self.inflation_rate = value.as_f64(),
        }
    }

    /// Fields present in this update, in catalogue order
    pub fn entries(&self) -> Vec<(Field, FieldValue)> {
        Field::ALL
            .iter()
            .filter_map(|&field| self.get(field).map(|value| (field, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Coerce a JSON value into the field's type
fn parse_value(field: Field, raw: &Value) -> Option<FieldValue> {
    match field.value_kind() {
        ValueKind::Scheme => raw.as_str()?.parse::<SchemeId>().ok().map(FieldValue::Scheme),
        ValueKind::Number => json_number(raw).map(FieldValue::Number),
        ValueKind::Integer => FieldValue::Number(json_number(raw)?).as_u32().map(FieldValue::Integer),
    }
}

/// Numbers, or strings that read as numbers once `£`, `%` and thousands
/// separators are removed
fn json_number(raw: &Value) -> Option<f64> {
    let number = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| !matches!(c, '£' | '%' | ' ')).collect();
            strip_thousands(&cleaned)?.parse::<f64>().ok()
        }
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Remove `,` only where it groups whole-number digits in threes
///
/// `"55,000"` reads as 55000; `"2,5"` is a decimal comma and is rejected
/// rather than read as 25.
fn strip_thousands(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }

    let (whole, fraction) = match s.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (s, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let mut groups = whole.split(',');
    let lead = groups.next()?.trim_start_matches(['-', '+']);
    if lead.is_empty() || lead.len() > 3 || !lead.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    Some(s.replace(',', ""))
}

/// One field that changed value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: Field,
    pub old: Option<FieldValue>,
    pub new: FieldValue,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "• {}: {} → {}",
            self.field.label(),
            self.field.render(self.old),
            self.field.render(Some(self.new))
        )
    }
}

/// Outcome of merging an update into a state
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Fields whose value actually changed, in catalogue order
    pub changes: Vec<FieldChange>,
    /// The merged state
    pub state: CalculatorState,
}

impl Reconciliation {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Human-readable diff, one line per change
    pub fn diff_text(&self) -> String {
        self.changes.iter().map(|c| c.to_string()).collect::<Vec<_>>().join("\n")
    }

    /// Text fed back to the model as the tool-call result
    pub fn summary(&self) -> String {
        if self.has_changes() {
            format!("Calculator updated:\n{}", self.diff_text())
        } else {
            NO_CHANGES.to_string()
        }
    }
}

/// Merge proposed fields into a copy of `current`
///
/// Only fields present in `update` are touched; values equal to the
/// current one are skipped without a diff line.
pub fn reconcile(current: &CalculatorState, update: &CalculatorUpdate) -> Reconciliation {
    let mut state = current.clone();
    let mut changes = Vec::new();

    for (field, new) in update.entries() {
        let old = current.get(field);
        if old == Some(new) {
            continue;
        }
        if state.set(field, new) {
            changes.push(FieldChange { field, old, new });
        }
    }

    Reconciliation { changes, state }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_is_a_no_op() {
        let current = CalculatorState::seeded();
        let result = reconcile(&current, &CalculatorUpdate::default());

        assert!(!result.has_changes());
        assert_eq!(result.state, current);
        assert_eq!(result.summary(), NO_CHANGES);
    }

    #[test]
    fn test_salary_change_touches_only_salary() {
        let current = CalculatorState::seeded();
        let update = CalculatorUpdate::from_arguments(r#"{"current_salary": 55000}"#);
        let result = reconcile(&current, &update);

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].field, Field::CurrentSalary);
        assert_eq!(result.summary(), "Calculator updated:\n• Current salary: £40,000 → £55,000");

        let mut expected = current.clone();
        expected.profile.current_salary = Some(55_000.0);
        assert_eq!(result.state, expected);
    }

    #[test]
    fn test_salary_from_unset() {
        let current = CalculatorState::blank();
        let update = CalculatorUpdate {
            current_salary: Some(55_000.0),
            ..Default::default()
        };
        let result = reconcile(&current, &update);

        assert_eq!(result.diff_text(), "• Current salary: not set → £55,000");
        assert_eq!(result.state.profile.years_of_service, None);
        assert_eq!(result.state.assumptions, current.assumptions);
    }

    #[test]
    fn test_unchanged_value_is_skipped() {
        let current = CalculatorState::seeded();
        let update = CalculatorUpdate {
            retirement_age: Some(67),
            inflation_rate: Some(3.0),
            ..Default::default()
        };
        let result = reconcile(&current, &update);

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].to_string(), "• Inflation rate %: 2.5% → 3%");
    }

    #[test]
    fn test_absent_fields_are_never_touched() {
        let mut current = CalculatorState::seeded();
        current.profile.normal_pension_age = Some(65);
        current.assumptions.investment_growth_rate = 6.5;

        let update = CalculatorUpdate {
            current_salary: Some(61_000.0),
            years_of_service: Some(25.0),
            scheme: Some(SchemeId::Section2008),
            current_age: Some(50),
            retirement_age: Some(62),
            early_reduction_per_year: Some(5.0),
            commutation_proportion: Some(25),
            commutation_factor: Some(12.0),
            inflation_rate: Some(3.5),
            ..Default::default()
        };
        let result = reconcile(&current, &update);

        // commutation_factor matches the current value
        assert_eq!(result.changes.len(), 8);
        assert_eq!(result.state.profile.normal_pension_age, Some(65));
        assert_eq!(result.state.assumptions.investment_growth_rate, 6.5);
        assert_eq!(result.state.assumptions.late_increase_per_year, 3.0);
        assert_eq!(result.state.assumptions.care_salary_pct, 80);
        assert_eq!(result.state.assumptions.salary_growth_rate, 2.0);
    }

    #[test]
    fn test_reconcile_does_not_mutate_input() {
        let current = CalculatorState::seeded();
        let snapshot = current.clone();
        let update = CalculatorUpdate {
            scheme: Some(SchemeId::Section1995),
            ..Default::default()
        };
        let result = reconcile(&current, &update);

        assert_eq!(current, snapshot);
        assert_eq!(
            result.diff_text(),
            "• Pension scheme: 2015 Scheme (career average) → 1995 Section (final salary)"
        );
    }

    #[test]
    fn test_unknown_and_null_keys_are_ignored() {
        let update = CalculatorUpdate::from_arguments(
            r#"{"current_age": 50, "favourite_colour": "green", "inflation_rate": null}"#,
        );
        assert_eq!(update.entries(), vec![(Field::CurrentAge, FieldValue::Integer(50))]);
    }

    #[test]
    fn test_malformed_arguments_are_an_empty_update() {
        assert!(CalculatorUpdate::from_arguments("{not json").is_empty());
        assert!(CalculatorUpdate::from_arguments("[1, 2, 3]").is_empty());
        assert!(CalculatorUpdate::from_arguments("\"55000\"").is_empty());
    }

    #[test]
    fn test_lenient_value_coercion() {
        let update = CalculatorUpdate::from_arguments(
            r#"{
                "retirement_age": 60.0,
                "current_age": 44.5,
                "current_salary": "£55,000",
                "scheme": "2008 Section",
                "care_salary_pct": "seventy"
            }"#,
        );

        assert_eq!(update.retirement_age, Some(60));
        assert_eq!(update.current_age, None);
        assert_eq!(update.current_salary, Some(55_000.0));
        assert_eq!(update.scheme, Some(SchemeId::Section2008));
        assert_eq!(update.care_salary_pct, None);
    }

    #[test]
    fn test_decimal_comma_is_not_a_thousands_separator() {
        let update = CalculatorUpdate::from_arguments(
            r#"{
                "inflation_rate": "2,5",
                "salary_growth_rate": "1,75%",
                "current_salary": "£1,234,567.50",
                "commutation_factor": "12,0"
            }"#,
        );

        assert_eq!(update.inflation_rate, None);
        assert_eq!(update.salary_growth_rate, None);
        assert_eq!(update.current_salary, Some(1_234_567.5));
        assert_eq!(update.commutation_factor, None);
    }

    #[test]
    fn test_unknown_scheme_is_dropped() {
        let update = CalculatorUpdate::from_arguments(r#"{"scheme": "2030 Scheme", "retirement_age": 66}"#);
        assert_eq!(update.scheme, None);
        assert_eq!(update.retirement_age, Some(66));
    }

    #[test]
    fn test_diff_lines_follow_catalogue_order() {
        let current = CalculatorState::seeded();
        let update = CalculatorUpdate::from_arguments(
            r#"{"inflation_rate": 3, "commutation_proportion": 20, "current_salary": 45000}"#,
        );
        let result = reconcile(&current, &update);

        let fields: Vec<Field> = result.changes.iter().map(|c| c.field).collect();
        assert_eq!(
            fields,
            vec![Field::CurrentSalary, Field::CommutationProportion, Field::InflationRate]
        );
        assert!(result.summary().contains("• Commutation %: 15% → 20%"));
    }
}
