//! Writing slot images to the output tree

use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info};

use crate::detector::Page;
use crate::errors::PanelResult;
use crate::layout::SlotAssignment;
use crate::utils::fs_utils::page_dir_name;
use super::report::TEXT_FILE;

/// Writes the four slot PNGs of a page into `<output>/page_<n>/`
#[derive(Debug, Clone)]
pub struct SlotWriter {
    output_dir: PathBuf,
}

/// A slot image that could not be produced
#[derive(Debug)]
pub struct WriteFailure {
    /// Images written before the failure
    pub written: usize,
    pub error: crate::errors::PanelError,
}

impl SlotWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        SlotWriter {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory for a 1-based page number
    pub fn page_dir(&self, page_number: usize) -> PathBuf {
        self.output_dir.join(page_dir_name(page_number))
    }

    /// Create the page directory
    pub fn prepare(&self, page_number: usize) -> PanelResult<PathBuf> {
        let dir = self.page_dir(page_number);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Save the page text as `text.md` in the page directory
    pub fn write_text(&self, page_number: usize, text: &str) -> PanelResult<PathBuf> {
        let path = self.page_dir(page_number).join(TEXT_FILE);
        fs::write(&path, text)?;
        debug!("Saved {} characters of text to {}", text.len(), path.display());
        Ok(path)
    }

    /// Crop and save each assigned region
    ///
    /// Stops at the first failure; images already written stay on disk.
    pub fn write(&self, page: &Page, assignment: &SlotAssignment) -> Result<usize, WriteFailure> {
        let dir = self.page_dir(page.number());
        let mut written = 0;

        for (slot, region) in assignment.entries() {
            let path = dir.join(slot.file_name());
            let saved = page.crop(region)
                .and_then(|image| image.save(&path).map_err(Into::into));

            if let Err(error) = saved {
                return Err(WriteFailure { written, error });
            }

            debug!("Saved {} for page {}", path.display(), page.number());
            written += 1;
        }

        info!("Page {}: saved {} images to {}", page.number(), written, dir.display());
        Ok(written)
    }
}
