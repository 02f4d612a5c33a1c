//! Extraction configuration
//!
//! Heuristic constants used by detection, selection and screening live here
//! and are passed to components at construction. Values can be overridden
//! from a TOML file with `[extraction]`, `[render]` and `[screening]` tables.

use std::fs;
use std::path::Path;
use log::{debug, info};

use crate::errors::{PanelError, PanelResult};

/// Number of photographs on a report page
pub const EXPECTED_REGIONS: usize = 4;

/// Configuration consumed by the extraction pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Minimum contour area as a fraction of the page area
    pub min_area_fraction: f64,
    /// Rasterization resolution for the visual strategy
    pub dpi: u32,
    /// Number of regions retained per page (always 4)
    pub expected_regions: usize,
    /// Renderer executable used to rasterize pages
    pub renderer_command: String,
    /// Pixel count from which an embedded raster counts as a photograph when screening
    pub large_image_pixels: u64,
    /// Minimum large images for a page to pass screening
    pub screen_min_images: usize,
    /// Maximum large images for a page to pass screening (photos plus a logo)
    pub screen_max_images: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            min_area_fraction: 0.001,
            dpi: 300,
            expected_regions: EXPECTED_REGIONS,
            renderer_command: "pdftoppm".to_string(),
            large_image_pixels: 10_000,
            screen_min_images: 4,
            screen_max_images: 5,
        }
    }
}

impl ExtractionConfig {
    /// Load a configuration file, starting from the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> PanelResult<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from TOML text
    ///
    /// Missing keys keep their default value. Unknown keys are ignored.
    pub fn from_toml_str(content: &str) -> PanelResult<Self> {
        let toml_value: toml::Value = content.parse()
            .map_err(|e| PanelError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        let mut config = ExtractionConfig::default();

        if let Some(table) = toml_value.get("extraction").and_then(|v| v.as_table()) {
            if let Some(v) = table.get("min_area_fraction") {
                config.min_area_fraction = as_f64(v, "extraction.min_area_fraction")?;
            }
            if let Some(v) = table.get("expected_regions") {
                config.expected_regions = as_u64(v, "extraction.expected_regions")? as usize;
            }
        }

        if let Some(table) = toml_value.get("render").and_then(|v| v.as_table()) {
            if let Some(v) = table.get("dpi") {
                config.dpi = as_u64(v, "render.dpi")? as u32;
            }
            if let Some(v) = table.get("command").and_then(|v| v.as_str()) {
                config.renderer_command = v.to_string();
            }
        }

        if let Some(table) = toml_value.get("screening").and_then(|v| v.as_table()) {
            if let Some(v) = table.get("large_image_pixels") {
                config.large_image_pixels = as_u64(v, "screening.large_image_pixels")?;
            }
            if let Some(v) = table.get("min_images") {
                config.screen_min_images = as_u64(v, "screening.min_images")? as usize;
            }
            if let Some(v) = table.get("max_images") {
                config.screen_max_images = as_u64(v, "screening.max_images")? as usize;
            }
        }

        debug!("Parsed configuration: {:?}", config);
        config.validate()?;
        Ok(config)
    }

    /// Override the rasterization DPI
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Override the minimum area fraction
    pub fn with_min_area_fraction(mut self, fraction: f64) -> Self {
        self.min_area_fraction = fraction;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> PanelResult<()> {
        if self.expected_regions != EXPECTED_REGIONS {
            return Err(PanelError::ConfigError(format!(
                "expected_regions must be {}, got {}", EXPECTED_REGIONS, self.expected_regions)));
        }
        if self.dpi == 0 {
            return Err(PanelError::ConfigError("dpi must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&self.min_area_fraction) {
            return Err(PanelError::ConfigError(format!(
                "min_area_fraction must be in [0, 1), got {}", self.min_area_fraction)));
        }
        if self.screen_min_images > self.screen_max_images {
            return Err(PanelError::ConfigError(format!(
                "screening.min_images ({}) exceeds screening.max_images ({})",
                self.screen_min_images, self.screen_max_images)));
        }
        Ok(())
    }
}

fn as_f64(value: &toml::Value, key: &str) -> PanelResult<f64> {
    match value {
        toml::Value::Float(f) => Ok(*f),
        toml::Value::Integer(i) => Ok(*i as f64),
        _ => Err(PanelError::ConfigError(format!("{} must be a number", key))),
    }
}

fn as_u64(value: &toml::Value, key: &str) -> PanelResult<u64> {
    value.as_integer()
        .filter(|i| *i >= 0)
        .map(|i| i as u64)
        .ok_or_else(|| PanelError::ConfigError(format!("{} must be a non-negative integer", key)))
}
