//! Member profiles and batch loading

mod profile;
pub mod loader;

pub use profile::{ranges, PersonalProfile};
pub use loader::{load_members, load_members_from_reader, LoadError, MemberRecord};
