//! Pension projection engine

mod inputs;
mod engine;
mod result;

pub use inputs::ProjectionInputs;
pub use engine::{project, CarePayMethod, ProjectionConfig, ProjectionEngine};
pub use result::ProjectionResult;
