//! Build settings for the icon theme
//!
//! This module defines the `BuildSettings` struct that holds every
//! configurable knob of a build (theme identity, sizes, sections, paths and
//! the converter program), deserialized from TOML with graceful fallback
//! to defaults.

use super::mapping::is_single_component;
use crate::error::{Error, Result, ResultExt};
use crate::theme::IconSize;
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default settings file name, looked up in the working directory.
pub const SETTINGS_FILE_NAME: &str = "icon-theme.toml";

/// Suffix appended to the theme name to form the archive name.
const ARCHIVE_SUFFIX: &str = "-theme.tar.gz";

const DEFAULT_THEME_NAME: &str = "balmy-icons";

// ─────────────────────────────────────────────────────────────────────────────
// Build Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a build needs to know apart from the icon mapping itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Directory name of the theme inside `dist_dir`
    pub theme_name: String,

    /// Human-readable theme name written to `index.theme`
    pub display_name: String,

    /// Theme comment written to `index.theme`
    pub comment: String,

    /// Fixed raster sizes in pixels; the scalable size is always implied
    pub sizes: Vec<u32>,

    /// Icon categories, in descriptor order
    pub sections: Vec<String>,

    /// Path of the icon mapping file
    pub mapping_file: PathBuf,

    /// Directory that mapped source paths are relative to
    pub source_root: PathBuf,

    /// Output root holding the theme directory and the archive
    pub dist_dir: PathBuf,

    /// Vector-to-raster converter program
    pub converter: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            theme_name: DEFAULT_THEME_NAME.to_string(),
            display_name: "Balmy Icons".to_string(),
            comment: "Simple CC0 pastel icons".to_string(),
            sizes: vec![48, 64, 128, 256],
            sections: ["apps", "categories", "devices", "mimetypes", "places"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            mapping_file: PathBuf::from("fd-name-mapping.toml"),
            source_root: PathBuf::from("."),
            dist_dir: PathBuf::from("dist"),
            converter: "inkscape".to_string(),
        }
    }
}

impl BuildSettings {
    /// Parse settings from TOML and sanitize the result.
    ///
    /// The theme name and every section become directory names, so each
    /// must be a single plain path component.
    pub fn from_toml_sanitized(content: &str) -> Result<Self> {
        let settings: BuildSettings = toml::from_str(content)?;
        let settings = settings.sanitized();

        let names = std::iter::once(("theme_name", &settings.theme_name))
            .chain(settings.sections.iter().map(|s| ("sections", s)));
        for (field, name) in names {
            if !is_single_component(name) {
                return Err(Error::ConfigParse {
                    message: format!("{} entry '{}' must be a plain directory name", field, name),
                    source: None,
                });
            }
        }
        Ok(settings)
    }

    /// Normalise values that would otherwise produce a broken layout.
    ///
    /// Sizes are sorted and de-duplicated with zero removed, sections keep
    /// their first occurrence only, and a blank theme name is reset.
    pub fn sanitized(mut self) -> Self {
        self.sizes.retain(|&size| size > 0);
        self.sizes.sort_unstable();
        self.sizes.dedup();

        let mut seen = Vec::with_capacity(self.sections.len());
        for section in self.sections.drain(..) {
            let section = section.trim().to_string();
            if !section.is_empty() && !seen.contains(&section) {
                seen.push(section);
            }
        }
        self.sections = seen;

        if self.theme_name.trim().is_empty() {
            warn!("Empty theme_name in settings, using '{}'", DEFAULT_THEME_NAME);
            self.theme_name = DEFAULT_THEME_NAME.to_string();
        }
        self
    }

    /// Every size a category is exported at: fixed sizes, then scalable.
    pub fn icon_sizes(&self) -> Vec<IconSize> {
        self.sizes
            .iter()
            .map(|&px| IconSize::Fixed(px))
            .chain(std::iter::once(IconSize::Scalable))
            .collect()
    }

    /// Directory the theme is generated into.
    pub fn theme_dir(&self) -> PathBuf {
        self.dist_dir.join(&self.theme_name)
    }

    /// Path of the compressed theme archive.
    pub fn archive_path(&self) -> PathBuf {
        self.dist_dir
            .join(format!("{}{}", self.theme_name, ARCHIVE_SUFFIX))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Load build settings from `path`.
///
/// The settings file is optional: a missing or empty file yields the
/// defaults, and a corrupted one is reported as a warning before falling
/// back to the defaults.
pub fn load_settings(path: &Path) -> BuildSettings {
    load_settings_internal(path)
        .unwrap_or_warn_default(BuildSettings::default(), "Failed to load build settings")
}

fn load_settings_internal(path: &Path) -> Result<BuildSettings> {
    if !path.exists() {
        debug!("Settings file not found at {}, using defaults", path.display());
        return Ok(BuildSettings::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Settings file is empty, using defaults");
        return Ok(BuildSettings::default());
    }

    let settings = BuildSettings::from_toml_sanitized(&contents).map_err(|e| {
        warn!(
            "Settings file at {} contains invalid TOML: {}",
            path.display(),
            e
        );
        e
    })?;

    info!("Build settings loaded from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
