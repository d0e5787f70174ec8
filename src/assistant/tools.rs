//! The `update_calculator` function declared to the model

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::calculator::Field;
use crate::scheme::SchemeId;

/// Name of the single function the model may call
pub const UPDATE_CALCULATOR: &str = "update_calculator";

/// Function tool definition in chat-completions form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Schema fragment for one field
fn field_schema(field: Field) -> Value {
    match field {
        Field::CurrentSalary => json!({
            "type": "number",
            "description": "Annual pensionable pay in GBP (e.g., 45000)"
        }),
        Field::YearsOfService => json!({
            "type": "number",
            "description": "Total years of NHS pensionable service (0-50)"
        }),
        Field::Scheme => json!({
            "type": "string",
            "enum": SchemeId::ALL.iter().map(|s| s.label()).collect::<Vec<_>>(),
            "description": "The NHS pension scheme section"
        }),
        Field::CurrentAge => json!({
            "type": "integer",
            "description": "Current age in years (18-75)"
        }),
        Field::RetirementAge => json!({
            "type": "integer",
            "description": "Planned retirement age (55-75)"
        }),
        Field::NormalPensionAge => json!({
            "type": "integer",
            "description": "Normal pension age for the scheme (55-75). Typical: 1995=60, 2008=65, 2015=67"
        }),
        Field::EarlyReductionPerYear => json!({
            "type": "number",
            "description": "Early retirement reduction percentage per year (0-10)"
        }),
        Field::LateIncreasePerYear => json!({
            "type": "number",
            "description": "Late retirement increase percentage per year (0-10)"
        }),
        Field::CommutationProportion => json!({
            "type": "integer",
            "description": "Percentage of pension to exchange for lump sum (0-30)"
        }),
        Field::CommutationFactor => json!({
            "type": "number",
            "description": "Lump sum received per £1 of pension given up (8-20)"
        }),
        Field::CareSalaryPct => json!({
            "type": "integer",
            "description": "For 2015 CARE scheme: career average earnings as % of current pay (50-110)"
        }),
        Field::SalaryGrowthRate => json!({
            "type": "number",
            "description": "Expected annual salary growth percentage (0-10)"
        }),
        Field::InvestmentGrowthRate => json!({
            "type": "number",
            "description": "Expected investment/pot growth percentage (0-10)"
        }),
        Field::InflationRate => json!({
            "type": "number",
            "description": "Assumed inflation rate percentage (0-10)"
        }),
    }
}

/// The `update_calculator` tool: every field optional
pub fn update_calculator_tool() -> ToolDefinition {
    let mut properties = Map::new();
    for field in Field::ALL {
        properties.insert(field.wire_name().to_string(), field_schema(field));
    }

    ToolDefinition {
        kind: "function".to_string(),
        function: FunctionDefinition {
            name: UPDATE_CALCULATOR.to_string(),
            description: "Update the pension calculator with new values. Use this when the user asks \
                          to change calculator settings, run scenarios, or explore different options. \
                          Only include the fields the user asked to change."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": Value::Object(properties),
                "required": []
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_exactly_the_catalogue() {
        let tool = update_calculator_tool();
        assert_eq!(tool.kind, "function");
        assert_eq!(tool.function.name, "update_calculator");

        let properties = tool.function.parameters["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 14);
        for field in Field::ALL {
            assert!(properties.contains_key(field.wire_name()), "{} missing", field.wire_name());
        }

        let required = tool.function.parameters["required"].as_array().unwrap();
        assert!(required.is_empty());
    }

    #[test]
    fn test_scheme_enum_matches_catalogue() {
        let tool = update_calculator_tool();
        let labels = tool.function.parameters["properties"]["scheme"]["enum"].as_array().unwrap();
        let labels: Vec<&str> = labels.iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "1995 Section (final salary)",
                "2008 Section (final salary)",
                "2015 Scheme (career average)"
            ]
        );
    }

    #[test]
    fn test_integer_fields_declared_as_integer() {
        let tool = update_calculator_tool();
        let properties = &tool.function.parameters["properties"];
        assert_eq!(properties["current_age"]["type"], "integer");
        assert_eq!(properties["commutation_proportion"]["type"], "integer");
        assert_eq!(properties["current_salary"]["type"], "number");
    }
}
