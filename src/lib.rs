//! Pension Assistant - NHS pension projection engine with a conversational calculator
//!
//! This library provides:
//! - Closed-form projections for the 1995, 2008 and 2015 NHS scheme sections
//! - A calculator state with a field catalogue and a diffing update protocol
//! - Chat turn orchestration where a language model edits the calculator
//!   through the `update_calculator` function
//! - Scheme comparison, retirement-age sweeps and parallel batch runs

pub mod scheme;
pub mod member;
pub mod assumptions;
pub mod projection;
pub mod calculator;
pub mod assistant;
pub mod scenario;

// Re-export commonly used types
pub use scheme::{SchemeDefinition, SchemeId};
pub use member::PersonalProfile;
pub use assumptions::Assumptions;
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionInputs, ProjectionResult};
pub use calculator::{CalculatorState, CalculatorUpdate, Field, FieldValue, MissingFields, Reconciliation};
pub use assistant::{take_turn, AssistantError, ChatClient, OpenAiClient, Session};
pub use scenario::{ScenarioOutcome, ScenarioRunner};
