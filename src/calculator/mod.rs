//! Calculator state, field catalogue and the update protocol

mod fields;
pub mod format;
mod state;
mod update;

pub use fields::{DisplayKind, Field, FieldValue, ValueKind};
pub use state::{CalculatorState, MissingFields};
pub use update::{reconcile, CalculatorUpdate, FieldChange, Reconciliation, NO_CHANGES};
