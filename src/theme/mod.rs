//! Theme layout for the icon theme builder
//!
//! This module knows where everything lives inside a generated theme:
//! icon sizes and their directory names, the canonical output path of every
//! icon, the descriptor location, and the display context of each category.
//!
//! # Layout
//!
//! ```text
//! <dist>/<theme>/index.theme
//! <dist>/<theme>/<category>/<size>/<icon>.png
//! <dist>/<theme>/<category>/scalable/<icon>.svg
//! ```

mod descriptor;

pub use descriptor::write_descriptor;

use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the theme descriptor.
pub const DESCRIPTOR_FILE_NAME: &str = "index.theme";

/// Size advertised for scalable directories, independent of the real
/// resolution of the vector sources.
pub const SCALABLE_NOMINAL_SIZE: u32 = 512;

// ─────────────────────────────────────────────────────────────────────────────
// Icon Size
// ─────────────────────────────────────────────────────────────────────────────

/// A size an icon is exported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IconSize {
    /// Raster output of the given pixel width
    Fixed(u32),
    /// Vector output, copied verbatim
    Scalable,
}

impl IconSize {
    /// Name of the size directory inside a category.
    pub fn dir_name(&self) -> String {
        match self {
            IconSize::Fixed(px) => px.to_string(),
            IconSize::Scalable => "scalable".to_string(),
        }
    }

    /// File extension of icons at this size.
    pub fn extension(&self) -> &'static str {
        match self {
            IconSize::Fixed(_) => "png",
            IconSize::Scalable => "svg",
        }
    }

    /// Size written to the descriptor for this directory.
    pub fn nominal_size(&self) -> u32 {
        match self {
            IconSize::Fixed(px) => *px,
            IconSize::Scalable => SCALABLE_NOMINAL_SIZE,
        }
    }

    /// Descriptor `Type=` value.
    pub fn kind(&self) -> &'static str {
        match self {
            IconSize::Fixed(_) => "Fixed",
            IconSize::Scalable => "Scalable",
        }
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context Table
// ─────────────────────────────────────────────────────────────────────────────

/// Display contexts for the standard freedesktop categories.
const CONTEXTS: &[(&str, &str)] = &[
    ("actions", "Actions"),
    ("animations", "Animations"),
    ("apps", "Applications"),
    ("categories", "Categories"),
    ("devices", "Devices"),
    ("emblems", "Emblems"),
    ("emotes", "Emotes"),
    ("intl", "International"),
    ("mimetypes", "MimeTypes"),
    ("places", "Places"),
    ("status", "Status"),
];

/// Human-readable context of a category.
///
/// Unknown categories use their own name with the first letter upper-cased.
pub fn category_context(category: &str) -> String {
    if let Some((_, context)) = CONTEXTS.iter().find(|(name, _)| *name == category) {
        return context.to_string();
    }

    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Path arithmetic for one theme directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeLayout {
    root: PathBuf,
}

impl ThemeLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The theme directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `index.theme`.
    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(DESCRIPTOR_FILE_NAME)
    }

    /// Directory holding a category's icons at one size.
    pub fn size_dir(&self, category: &str, size: IconSize) -> PathBuf {
        self.root.join(category).join(size.dir_name())
    }

    /// Canonical output path of one icon.
    pub fn icon_path(&self, category: &str, size: IconSize, icon: &str) -> PathBuf {
        self.size_dir(category, size)
            .join(format!("{}.{}", icon, size.extension()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
