//! Output tree reconciliation.
//!
//! After an export the theme directory must contain exactly the files the
//! current mapping produces plus the descriptor. The expected set is
//! computed up front; everything else found on disk is deleted.

use crate::config::{BuildSettings, IconMapping};
use crate::error::{Error, Result};
use crate::theme::ThemeLayout;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Every output path the mapping produces, plus the descriptor.
///
/// Sections listed in the settings but absent from the mapping contribute
/// nothing.
pub fn expected_outputs(
    settings: &BuildSettings,
    mapping: &IconMapping,
    layout: &ThemeLayout,
) -> BTreeSet<PathBuf> {
    let mut expected = BTreeSet::new();
    expected.insert(layout.descriptor_path());

    for section in &settings.sections {
        let Some(icons) = mapping.icons(section) else {
            continue;
        };
        for size in settings.icon_sizes() {
            for icon in icons.keys() {
                expected.insert(layout.icon_path(section, size, icon));
            }
        }
    }

    expected
}

/// Delete every file or link under the theme root that is not in
/// `expected`, then remove directories left empty.
///
/// Returns the deleted files in walk order.
pub fn prune_stale(layout: &ThemeLayout, expected: &BTreeSet<PathBuf>) -> Result<Vec<PathBuf>> {
    let root = layout.root();
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut present = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::filesystem(path, e.into())
        })?;
        if !entry.file_type().is_dir() {
            present.push(entry.into_path());
        }
    }

    let stale: Vec<PathBuf> = present
        .into_iter()
        .filter(|path| !expected.contains(path))
        .collect();

    for path in &stale {
        debug!("Pruning stale output {}", path.display());
        fs::remove_file(path).map_err(|e| Error::filesystem(path, e))?;
    }

    remove_empty_dirs(layout)?;
    Ok(stale)
}

/// Remove directories below the theme root that no longer hold anything.
fn remove_empty_dirs(layout: &ThemeLayout) -> Result<()> {
    let root = layout.root();
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::filesystem(path, e.into())
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let is_empty = fs::read_dir(entry.path())
            .map_err(|e| Error::filesystem(entry.path(), e))?
            .next()
            .is_none();
        if is_empty {
            debug!("Removing empty directory {}", entry.path().display());
            if let Err(e) = fs::remove_dir(entry.path()) {
                warn!("Could not remove {}: {}", entry.path().display(), e);
            }
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
