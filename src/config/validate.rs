//! Mapping validation.
//!
//! Checks that every source file referenced by the mapping exists before
//! anything is written. All problems are collected in one pass so a broken
//! mapping can be fixed in a single edit.

use crate::config::IconMapping;
use crate::error::{Error, Result};
use log::{debug, error};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Outcome of validating a mapping against a source root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of mapping entries checked
    pub checked: usize,

    /// Every missing source file, joined with the source root
    pub missing: Vec<PathBuf>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }

    /// Turn a failed report into `Error::Validation`.
    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(Error::Validation {
                missing: self.missing,
            })
        }
    }
}

/// Check that every mapped source exists under `source_root`.
///
/// A source shared by several icons is reported once.
pub fn validate_mapping(mapping: &IconMapping, source_root: &Path) -> ValidationReport {
    let mut missing = BTreeSet::new();
    let mut checked = 0;

    for (category, icon, source) in mapping.entries() {
        checked += 1;
        let path = source_root.join(source);
        if !path.is_file() {
            error!("{}/{}: source '{}' not found", category, icon, path.display());
            missing.insert(path);
        }
    }

    debug!(
        "Validated {} mapping entries, {} missing",
        checked,
        missing.len()
    );

    ValidationReport {
        checked,
        missing: missing.into_iter().collect(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
