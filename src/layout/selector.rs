//! Selection of the largest candidate regions

use log::debug;

use crate::detector::{sort_by_area, Region};
use crate::errors::{PanelError, PanelResult};

/// Keeps the largest regions of a page and drops the rest as decoration
#[derive(Debug, Clone)]
pub struct RegionSelector {
    required: usize,
}

impl RegionSelector {
    pub fn new(required: usize) -> Self {
        RegionSelector { required }
    }

    /// Take the `required` largest regions, largest first
    ///
    /// Equal areas keep their incoming order. Fewer candidates than required
    /// is `InsufficientRegions`.
    pub fn select(&self, mut candidates: Vec<Region>) -> PanelResult<Vec<Region>> {
        if candidates.len() < self.required {
            return Err(PanelError::InsufficientRegions {
                found: candidates.len(),
                required: self.required,
            });
        }

        sort_by_area(&mut candidates);
        if candidates.len() > self.required {
            debug!("Discarding {} smaller regions", candidates.len() - self.required);
        }
        candidates.truncate(self.required);
        Ok(candidates)
    }
}
