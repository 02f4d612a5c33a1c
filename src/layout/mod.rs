//! Region selection and slot assignment
//!
//! Turns a page's candidate regions into the four slot-labeled photographs.

mod slot;
mod selector;
mod assigner;
#[cfg(test)]
mod tests;

pub use slot::Slot;
pub use selector::RegionSelector;
pub use assigner::{AssignmentMethod, FallbackReason, SlotAssigner, SlotAssignment};
