//! Custom error types for panel extraction

use std::fmt;
use std::io;

/// Errors raised while reading PDFs, detecting regions and writing panels
#[derive(Debug)]
pub enum PanelError {
    /// I/O error
    IoError(io::Error),
    /// Image decoding or encoding error
    ImageError(image::ImageError),
    /// PDF structure could not be parsed
    PdfError(String),
    /// Page index outside the document
    PageOutOfRange(usize),
    /// Region with non-positive area or extent
    InvalidRegion(String),
    /// Fewer candidate regions than required
    InsufficientRegions { found: usize, required: usize },
    /// Embedded raster uses a color model that cannot be normalized to RGB
    UnsupportedColorModel(String),
    /// Embedded raster uses a stream filter we cannot decode
    UnsupportedFilter(String),
    /// Page rasterization failed
    RenderError(String),
    /// Invalid configuration value
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::IoError(e) => write!(f, "I/O error: {}", e),
            PanelError::ImageError(e) => write!(f, "Image error: {}", e),
            PanelError::PdfError(msg) => write!(f, "PDF error: {}", msg),
            PanelError::PageOutOfRange(idx) => write!(f, "Page index out of range: {}", idx),
            PanelError::InvalidRegion(msg) => write!(f, "Invalid region: {}", msg),
            PanelError::InsufficientRegions { found, required } =>
                write!(f, "Insufficient regions: found {}, need {}", found, required),
            PanelError::UnsupportedColorModel(cs) => write!(f, "Unsupported color model: {}", cs),
            PanelError::UnsupportedFilter(name) => write!(f, "Unsupported stream filter: {}", name),
            PanelError::RenderError(msg) => write!(f, "Render error: {}", msg),
            PanelError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            PanelError::GenericError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::IoError(e) => Some(e),
            PanelError::ImageError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PanelError {
    fn from(error: io::Error) -> Self {
        PanelError::IoError(error)
    }
}

impl From<image::ImageError> for PanelError {
    fn from(error: image::ImageError) -> Self {
        PanelError::ImageError(error)
    }
}

impl From<lopdf::Error> for PanelError {
    fn from(error: lopdf::Error) -> Self {
        PanelError::PdfError(error.to_string())
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(error: serde_json::Error) -> Self {
        PanelError::GenericError(format!("JSON error: {}", error))
    }
}

impl From<String> for PanelError {
    fn from(msg: String) -> Self {
        PanelError::GenericError(msg)
    }
}

/// Result type for panel operations
pub type PanelResult<T> = Result<T, PanelError>;
