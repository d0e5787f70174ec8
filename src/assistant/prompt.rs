//! System prompt embedding the live calculator state

use std::fmt::{self, Write};

use crate::calculator::format::{format_currency, format_currency_pence};
use crate::calculator::{CalculatorState, Field};
use crate::projection::ProjectionEngine;
use crate::scheme::SchemeId;

/// Marker used when the mandatory fields are not all known yet
pub const NOT_YET_COMPUTABLE: &str = "NOT YET COMPUTABLE";

/// Build the system instruction for the next turn
pub fn system_prompt(state: &CalculatorState, engine: &ProjectionEngine) -> String {
    let mut prompt = String::new();
    if let Err(e) = write_prompt(&mut prompt, state, engine) {
        log::error!("Failed to format system prompt: {}", e);
    }
    prompt
}

fn write_prompt(prompt: &mut String, state: &CalculatorState, engine: &ProjectionEngine) -> fmt::Result {
    prompt.push_str(
        "You are an expert NHS pension advisor assistant integrated with an interactive pension calculator.\n\n",
    );

    prompt.push_str("CURRENT CALCULATOR STATE:\n");
    for field in Field::ALL {
        writeln!(prompt, "- {}: {}", field.label(), field.render(state.get(field)))?;
    }
    if state.profile.normal_pension_age.is_none() {
        if let Some(npa) = state.profile.effective_normal_pension_age() {
            writeln!(prompt, "  (normal pension age defaults to {} for this scheme)", npa)?;
        }
    }

    prompt.push_str("\nCURRENT CALCULATION RESULTS:\n");
    match state.project(engine) {
        Ok(r) => {
            writeln!(
                prompt,
                "- Annual pension (after commutation): {}",
                format_currency_pence(r.annual_pension_after_commutation)
            )?;
            writeln!(prompt, "- Monthly pension (before tax): {}", format_currency(r.monthly_pension()))?;
            writeln!(prompt, "- Total lump sum: {}", format_currency_pence(r.total_lump_sum))?;
            writeln!(prompt, "- Base annual pension: {}", format_currency_pence(r.base_annual_pension))?;
            writeln!(prompt, "- Early/late adjustment factor: {:.4}", r.early_late_adjustment_factor)?;
            if r.has_future_projection() {
                writeln!(
                    prompt,
                    "- Real-terms annual pension (today's money, {} years): {}",
                    r.years_to_retirement,
                    format_currency_pence(r.real_annual_pension)
                )?;
            }
        }
        Err(missing) => {
            writeln!(prompt, "- {}", NOT_YET_COMPUTABLE)?;
            let labels: Vec<&str> = missing.0.iter().map(|f| f.label()).collect();
            writeln!(prompt, "- Missing required fields: {}", labels.join(", "))?;
        }
    }

    prompt.push_str("\nNHS PENSION SCHEME INFORMATION:\n");
    for scheme in SchemeId::ALL {
        let def = scheme.definition();
        writeln!(
            prompt,
            "- {}: {} Normal Pension Age {}",
            scheme.short_name(),
            def.description,
            def.default_normal_pension_age
        )?;
    }

    prompt.push_str(
        "
KEY FORMULAS:
- Base Annual Pension = Pensionable Pay × Accrual Rate × Years of Service
- Early Retirement: Pension reduced by X% for each year before Normal Pension Age (compounded)
- Late Retirement: Pension increased by X% for each year after Normal Pension Age (compounded)
- Commutation: Trade pension income for lump sum (factor × annual pension given up)

YOUR CAPABILITIES:
1. Answer questions about NHS pensions and the calculations
2. Explain how different factors affect the pension
3. Use the update_calculator function to modify values when the user wants to change their details, \
explore scenarios, switch scheme, adjust commutation or change assumptions

RULES:
- If any required field is missing, ask the user for it before giving an estimate.
- When using update_calculator, ONLY include the specific fields the user mentioned.
- DO NOT include fields that weren't mentioned and DO NOT reset other values.
- If the user mentions several fields at once, put them all in a single update_calculator call.

Always explain the impact of changes and offer to explore further scenarios.
",
    );

    Ok(())
}
