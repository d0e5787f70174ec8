//! Scenario runner for what-if and batch projections
//!
//! Holds one engine configuration and projects the same member under
//! alternative schemes, retirement ages, or many members in parallel.

use rayon::prelude::*;
use serde::Serialize;

use crate::calculator::{CalculatorState, MissingFields};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionInputs, ProjectionResult};
use crate::scheme::SchemeId;

/// One labelled projection in a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub label: String,
    pub inputs: ProjectionInputs,
    pub result: ProjectionResult,
}

/// Projection runner sharing one engine configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::default();
/// for outcome in runner.compare_schemes(&state)? {
///     println!("{}: {:.2}", outcome.label, outcome.result.annual_pension_after_commutation);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Run a single projection
    pub fn run(&self, inputs: &ProjectionInputs) -> ProjectionResult {
        self.engine.project(inputs)
    }

    /// Project the same member under every scheme, each at its default NPA
    pub fn compare_schemes(&self, state: &CalculatorState) -> Result<Vec<ScenarioOutcome>, MissingFields> {
        let base = state.projection_inputs()?;

        Ok(SchemeId::ALL
            .iter()
            .map(|&scheme| {
                let inputs = base.with_scheme(scheme);
                ScenarioOutcome {
                    label: scheme.short_name().to_string(),
                    result: self.engine.project(&inputs),
                    inputs,
                }
            })
            .collect())
    }

    /// Project the member at each retirement age in `ages`
    pub fn retirement_age_sweep(
        &self,
        state: &CalculatorState,
        ages: &[u32],
    ) -> Result<Vec<ScenarioOutcome>, MissingFields> {
        let base = state.projection_inputs()?;

        Ok(ages
            .iter()
            .map(|&age| {
                let inputs = base.with_retirement_age(age);
                ScenarioOutcome {
                    label: format!("Retire at {}", age),
                    result: self.engine.project(&inputs),
                    inputs,
                }
            })
            .collect())
    }

    /// Project many inputs in parallel; results keep the input order
    pub fn run_batch(&self, inputs: &[ProjectionInputs]) -> Vec<ProjectionResult> {
        inputs.par_iter().map(|i| self.engine.project(i)).collect()
    }
}
