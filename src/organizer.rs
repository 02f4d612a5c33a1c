//! Grouping classified pages by activity
//!
//! A classifier leaves an `analysis.json` with an activity label in each
//! `page_<n>` directory. Pages are copied into numbered sets under a folder
//! per activity, and a `summary.json` describes the result.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use serde::Serialize;

use crate::errors::{PanelError, PanelResult};
use crate::utils::fs_utils::page_dirs;

/// Classification file read from each page directory
pub const ANALYSIS_FILE: &str = "analysis.json";

/// Summary written to the target directory
pub const SUMMARY_FILE: &str = "summary.json";

const DEFAULT_UNRECOGNIZED_FOLDER: &str = "actividades_no_reconocidas";

lazy_static! {
    // Parse the embedded catalog once
    static ref ACTIVITY_CATALOG: ActivityCatalog = {
        let content = include_str!("../activities.toml");
        ActivityCatalog::from_toml_str(content).unwrap_or_else(|e| {
            warn!("Failed to parse activity catalog: {}", e);
            ActivityCatalog::default()
        })
    };
}

/// Known maintenance activities
#[derive(Debug, Clone)]
pub struct ActivityCatalog {
    /// Activity code to full label
    labels: BTreeMap<String, String>,
    unrecognized_folder: String,
}

impl Default for ActivityCatalog {
    fn default() -> Self {
        ActivityCatalog {
            labels: BTreeMap::new(),
            unrecognized_folder: DEFAULT_UNRECOGNIZED_FOLDER.to_string(),
        }
    }
}

impl ActivityCatalog {
    /// The catalog compiled into the crate
    pub fn builtin() -> &'static ActivityCatalog {
        &ACTIVITY_CATALOG
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> PanelResult<Self> {
        let value: toml::Value = content.parse()
            .map_err(|e| PanelError::ConfigError(format!("Failed to parse activity catalog: {}", e)))?;

        let mut catalog = ActivityCatalog::default();
        if let Some(folder) = value.get("unrecognized_folder").and_then(|v| v.as_str()) {
            catalog.unrecognized_folder = folder.to_string();
        }

        let table = value.get("activities").and_then(|v| v.as_table())
            .ok_or_else(|| PanelError::ConfigError("activity catalog has no [activities] table".to_string()))?;
        for (code, label) in table {
            let label = label.as_str()
                .ok_or_else(|| PanelError::ConfigError(format!("activity {} must be a string", code)))?;
            catalog.labels.insert(code.clone(), label.to_string());
        }

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether a label is one of the catalog's full labels
    pub fn is_known(&self, label: &str) -> bool {
        self.labels.values().any(|l| l == label)
    }

    /// Folder a label is filed under
    ///
    /// Full labels map to themselves and bare codes to their full label;
    /// anything else goes to the unrecognized folder.
    pub fn folder_for(&self, label: &str) -> &str {
        let label = label.trim();
        if let Some(known) = self.labels.values().find(|l| *l == label) {
            return known;
        }
        if let Some(full) = self.labels.get(label) {
            return full;
        }
        &self.unrecognized_folder
    }

    pub fn unrecognized_folder(&self) -> &str {
        &self.unrecognized_folder
    }
}

/// Folder and set counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganizationStats {
    pub total_activity_folders: usize,
    pub total_sets_organized: usize,
}

/// Contents of `summary.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganizationSummary {
    pub total_pages_processed: usize,
    /// Pages per activity folder
    pub activities_found: BTreeMap<String, usize>,
    pub organization_stats: OrganizationStats,
}

/// Copies classified page directories into per-activity sets
pub struct OutputOrganizer<'a> {
    source_dir: PathBuf,
    target_dir: PathBuf,
    catalog: &'a ActivityCatalog,
}

impl OutputOrganizer<'static> {
    /// Organizer using the built-in activity catalog
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source_dir: P, target_dir: Q) -> Self {
        OutputOrganizer::with_catalog(source_dir, target_dir, ActivityCatalog::builtin())
    }
}

impl<'a> OutputOrganizer<'a> {
    pub fn with_catalog<P: AsRef<Path>, Q: AsRef<Path>>(source_dir: P, target_dir: Q,
                                                        catalog: &'a ActivityCatalog) -> Self {
        OutputOrganizer {
            source_dir: source_dir.as_ref().to_path_buf(),
            target_dir: target_dir.as_ref().to_path_buf(),
            catalog,
        }
    }

    /// Group pages by activity and copy them into the target directory
    pub fn organize(&self) -> PanelResult<OrganizationSummary> {
        if !self.source_dir.is_dir() {
            return Err(PanelError::GenericError(format!(
                "Source directory not found: {}", self.source_dir.display())));
        }

        info!("Organizing {} into {}", self.source_dir.display(), self.target_dir.display());

        let mut summary = OrganizationSummary::default();
        let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for (number, page_dir) in page_dirs(&self.source_dir)? {
            let Some(label) = read_activity(&page_dir) else {
                warn!("No activity found for page {}", number);
                continue;
            };

            let folder = self.catalog.folder_for(&label).to_string();
            debug!("Page {} -> {}", number, folder);
            *summary.activities_found.entry(folder.clone()).or_insert(0) += 1;
            summary.total_pages_processed += 1;
            groups.entry(folder).or_default().push(page_dir);
        }

        if groups.is_empty() {
            return Err(PanelError::GenericError("No classified pages to organize".to_string()));
        }

        for (folder, pages) in &groups {
            let activity_dir = self.target_dir.join(folder);
            fs::create_dir_all(&activity_dir)?;

            for (set, page_dir) in pages.iter().enumerate() {
                let set_dir = activity_dir.join((set + 1).to_string());
                match copy_files(page_dir, &set_dir) {
                    Ok(count) => {
                        debug!("Copied {} files from {} to {}", count, page_dir.display(), set_dir.display());
                        summary.organization_stats.total_sets_organized += 1;
                    }
                    Err(e) => warn!("Failed to copy {}: {}", page_dir.display(), e),
                }
            }
            summary.organization_stats.total_activity_folders += 1;
        }

        let summary_path = self.target_dir.join(SUMMARY_FILE);
        fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
        info!("Organized {} pages into {} activity folders",
              summary.total_pages_processed, summary.organization_stats.total_activity_folders);

        Ok(summary)
    }
}

/// Activity label from a page's classification file
fn read_activity(page_dir: &Path) -> Option<String> {
    let path = page_dir.join(ANALYSIS_FILE);
    let content = fs::read_to_string(&path).ok()?;
    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Cannot parse {}: {}", path.display(), e);
            return None;
        }
    };

    value.get("actividad")
        .or_else(|| value.get("activity"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Copy the regular files of a directory
fn copy_files(from: &Path, to: &Path) -> PanelResult<usize> {
    fs::create_dir_all(to)?;
    let mut count = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::copy(entry.path(), to.join(entry.file_name()))?;
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_loaded() {
        let catalog = ActivityCatalog::builtin();
        assert_eq!(catalog.len(), 16);
        assert!(catalog.is_known("MR102-Bacheo"));
        assert_eq!(catalog.unrecognized_folder(), "actividades_no_reconocidas");
    }

    #[test]
    fn folders_for_labels() {
        let catalog = ActivityCatalog::builtin();
        assert_eq!(catalog.folder_for("MR301-Roce y limpieza"), "MR301-Roce y limpieza");
        assert_eq!(catalog.folder_for("MR301"), "MR301-Roce y limpieza");
        assert_eq!(catalog.folder_for("Pintura de barandas"), "actividades_no_reconocidas");
    }

    #[test]
    fn catalog_requires_activities_table() {
        assert!(ActivityCatalog::from_toml_str("unrecognized_folder = \"x\"").is_err());
        let catalog = ActivityCatalog::from_toml_str("[activities]\nA1 = \"A1-Test\"\n").unwrap();
        assert_eq!(catalog.folder_for("A1-Test"), "A1-Test");
        assert_eq!(catalog.folder_for("other"), DEFAULT_UNRECOGNIZED_FOLDER);
    }
}
