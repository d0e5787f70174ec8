//! NHS pension scheme sections

mod catalogue;

pub use catalogue::{PayFamily, SchemeDefinition, SchemeError, SchemeId};
