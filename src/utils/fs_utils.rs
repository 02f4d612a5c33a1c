//! Output tree inspection
//!
//! Naming and listing of the `page_<n>` directories an extraction run leaves
//! behind.

use std::fs;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::PanelResult;

lazy_static! {
    static ref PAGE_DIR_PATTERN: Option<Regex> = Regex::new(r"^page_(\d+)$").ok();
}

/// Name of the directory holding a page's slot images
pub fn page_dir_name(page_number: usize) -> String {
    format!("page_{}", page_number)
}

/// Page number encoded in a `page_<n>` directory name
pub fn parse_page_dir(name: &str) -> Option<usize> {
    PAGE_DIR_PATTERN.as_ref()?.captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `page_<n>` subdirectories of a directory, sorted by page number
pub fn page_dirs(root: &Path) -> PanelResult<Vec<(usize, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if let Some(number) = name.to_str().and_then(parse_page_dir) {
            dirs.push((number, entry.path()));
        }
    }
    dirs.sort_by_key(|(number, _)| *number);
    Ok(dirs)
}
