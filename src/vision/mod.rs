//! Image processing for locating photographs on a rendered page
//!
//! The pipeline is adaptive Gaussian thresholding (inverted), a
//! morphological close then open, and external contour tracing.

pub mod threshold;
pub mod contours;

pub use threshold::{adaptive_threshold_inv, clean_mask, gaussian_sigma};
pub use contours::{external_contours, polygon_area, ContourRegion};
