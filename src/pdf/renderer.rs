//! Page rasterization through poppler's `pdftoppm`

use std::path::Path;
use std::process::Command;
use image::RgbImage;
use log::debug;

use crate::errors::{PanelError, PanelResult};

/// Renders single PDF pages to RGB bitmaps
#[derive(Debug, Clone)]
pub struct PageRenderer {
    command: String,
    dpi: u32,
}

impl PageRenderer {
    pub fn new(command: &str, dpi: u32) -> Self {
        PageRenderer {
            command: command.to_string(),
            dpi,
        }
    }

    /// Render one page (0-based index) at the configured resolution
    ///
    /// The PNG produced by the renderer lives in a scratch directory that is
    /// removed before this returns; only the decoded bitmap survives.
    pub fn render_page(&self, pdf_path: &Path, page_idx: usize) -> PanelResult<RgbImage> {
        let scratch = tempfile::tempdir()?;

        // pdftoppm uses 1-based page indices
        let page_number = (page_idx + 1).to_string();
        let prefix = scratch.path().join("page");

        debug!("Rendering page {} of {} at {} dpi", page_number, pdf_path.display(), self.dpi);

        let output = Command::new(&self.command)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(&page_number)
            .arg("-l")
            .arg(&page_number)
            .arg("-singlefile")
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|e| PanelError::RenderError(format!(
                "failed to invoke {}: {}; is poppler-utils installed?", self.command, e)))?;

        if !output.status.success() {
            return Err(PanelError::RenderError(format!(
                "{} failed with {}: {}",
                self.command, output.status, String::from_utf8_lossy(&output.stderr).trim())));
        }

        // -singlefile writes exactly `<prefix>.png`
        let image_path = prefix.with_extension("png");
        if !image_path.exists() {
            return Err(PanelError::RenderError(format!(
                "expected rendered image not found: {}", image_path.display())));
        }

        let image = image::open(&image_path)?.to_rgb8();
        debug!("Rendered page {} to {}x{}", page_number, image.width(), image.height());
        Ok(image)
    }
}
