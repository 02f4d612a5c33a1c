//! The four photo slots of a maintenance report page

use std::fmt;
use serde::Serialize;

/// Position of a photograph in the activity sequence
///
/// On a clean 2x2 page the slots follow reading order: top-left, top-right,
/// bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Before,
    During1,
    During2,
    After,
}

impl Slot {
    /// All slots in reading order
    pub const ALL: [Slot; 4] = [Slot::Before, Slot::During1, Slot::During2, Slot::After];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Before => "before",
            Slot::During1 => "during1",
            Slot::During2 => "during2",
            Slot::After => "after",
        }
    }

    /// Name of the PNG a slot is saved as
    pub fn file_name(&self) -> String {
        format!("{}.png", self.as_str())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
