//! Slot assignment by 2x2 layout inference
//!
//! Four regions are split into an upper and a lower row at half the page
//! height. A clean two-and-two split is assigned in reading order by
//! horizontal center; anything else falls back to the area ranking.

use log::debug;
use serde::Serialize;

use crate::config::EXPECTED_REGIONS;
use crate::detector::Region;
use crate::errors::{PanelError, PanelResult};
use super::slot::Slot;

/// Why geometry could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// At least one region has no known placement
    UnknownPlacement,
    /// The rows did not split two and two
    NotTwoByTwo { upper: usize, lower: usize },
}

/// How slots were assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AssignmentMethod {
    Geometric,
    OrderFallback { reason: FallbackReason },
}

impl AssignmentMethod {
    pub fn is_fallback(&self) -> bool {
        matches!(self, AssignmentMethod::OrderFallback { .. })
    }
}

/// Four regions, one per slot
#[derive(Debug, Clone)]
pub struct SlotAssignment {
    entries: Vec<(Slot, Region)>,
    method: AssignmentMethod,
}

impl SlotAssignment {
    /// Entries in slot order
    pub fn entries(&self) -> &[(Slot, Region)] {
        &self.entries
    }

    pub fn method(&self) -> AssignmentMethod {
        self.method
    }

    /// Region assigned to a slot
    pub fn get(&self, slot: Slot) -> Option<&Region> {
        self.entries.iter().find(|(s, _)| *s == slot).map(|(_, r)| r)
    }
}

/// Assigns four selected regions to the before/during/after slots
#[derive(Debug, Default, Clone)]
pub struct SlotAssigner;

impl SlotAssigner {
    pub fn new() -> Self {
        SlotAssigner
    }

    /// Assign slots to exactly four regions
    ///
    /// # Arguments
    /// * `regions` - The selected regions, largest area first
    /// * `page_height` - Height of the page in the regions' unit
    ///
    /// # Returns
    /// A bijection between the regions and the four slots
    pub fn assign(&self, regions: Vec<Region>, page_height: f64) -> PanelResult<SlotAssignment> {
        if regions.len() < EXPECTED_REGIONS {
            return Err(PanelError::InsufficientRegions {
                found: regions.len(),
                required: EXPECTED_REGIONS,
            });
        }
        if regions.len() > EXPECTED_REGIONS {
            return Err(PanelError::GenericError(format!(
                "slot assignment takes {} regions, got {}", EXPECTED_REGIONS, regions.len())));
        }

        let (order, method) = match Self::grid_order(&regions, page_height) {
            Ok(order) => (order, AssignmentMethod::Geometric),
            Err(reason) => {
                debug!("Falling back to area order: {:?}", reason);
                ([0, 1, 2, 3], AssignmentMethod::OrderFallback { reason })
            }
        };

        let mut slots: Vec<Option<Region>> = regions.into_iter().map(Some).collect();
        let mut entries = Vec::with_capacity(EXPECTED_REGIONS);
        for (slot, index) in Slot::ALL.iter().zip(order) {
            let region = slots[index].take()
                .ok_or_else(|| PanelError::GenericError(format!("region {} assigned twice", index)))?;
            entries.push((*slot, region));
        }

        Ok(SlotAssignment { entries, method })
    }

    /// Reading-order indices for a clean 2x2 layout
    fn grid_order(regions: &[Region], page_height: f64) -> Result<[usize; 4], FallbackReason> {
        let mut centers = Vec::with_capacity(regions.len());
        for region in regions {
            centers.push(region.center().ok_or(FallbackReason::UnknownPlacement)?);
        }

        let mid = page_height / 2.0;
        let (mut upper, mut lower): (Vec<usize>, Vec<usize>) =
            (0..regions.len()).partition(|&i| centers[i].y < mid);

        if upper.len() != 2 || lower.len() != 2 {
            return Err(FallbackReason::NotTwoByTwo { upper: upper.len(), lower: lower.len() });
        }

        // Stable: equal centers keep area order, so the larger region goes left
        let by_x = |a: &usize, b: &usize| centers[*a].x.total_cmp(&centers[*b].x);
        upper.sort_by(by_x);
        lower.sort_by(by_x);

        Ok([upper[0], upper[1], lower[0], lower[1]])
    }
}
