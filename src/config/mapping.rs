//! Icon mapping loader
//!
//! The mapping file is a TOML document whose top-level tables are icon
//! categories. Each key inside a category is a destination icon name
//! (without extension) and each value a source file path relative to the
//! source root:
//!
//! ```toml
//! [apps]
//! firefox = "icons/browser.svg"
//! web-browser = "icons/browser.svg"
//! ```

use crate::error::{Error, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Destination icon name → source path, for a single category.
pub type CategoryMapping = BTreeMap<String, PathBuf>;

/// Two-level table of category → icon name → source path.
///
/// Iteration order is sorted by category and then by icon name, so every
/// stage that walks the mapping does so reproducibly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconMapping {
    categories: BTreeMap<String, CategoryMapping>,
}

impl IconMapping {
    /// Parse a mapping from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let mut categories = BTreeMap::new();

        for (category, value) in table {
            if !is_single_component(&category) {
                return Err(parse_error(format!(
                    "category '{}' must be a plain directory name",
                    category
                )));
            }
            let toml::Value::Table(entries) = value else {
                return Err(parse_error(format!(
                    "category '{}' must be a table of icon = \"source\" entries",
                    category
                )));
            };

            let mut icons = CategoryMapping::new();
            for (icon, source) in entries {
                if !is_single_component(&icon) {
                    return Err(parse_error(format!(
                        "icon name '{}' in '{}' must be a plain file name",
                        icon, category
                    )));
                }
                let toml::Value::String(source) = source else {
                    return Err(parse_error(format!(
                        "source for '{}.{}' must be a string",
                        category, icon
                    )));
                };
                let source = PathBuf::from(source);
                if !is_under_root(&source) {
                    return Err(parse_error(format!(
                        "source '{}' for '{}.{}' must be a relative path under the source \
                         root",
                        source.display(),
                        category,
                        icon
                    )));
                }
                icons.insert(icon, source);
            }
            categories.insert(category, icons);
        }

        Ok(Self { categories })
    }

    /// Names of all categories present in the mapping.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Icons mapped for a category, if the category exists.
    pub fn icons(&self, category: &str) -> Option<&CategoryMapping> {
        self.categories.get(category)
    }

    /// Every `(category, icon, source)` triple.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &Path)> {
        self.categories.iter().flat_map(|(category, icons)| {
            icons.iter().map(move |(icon, source)| {
                (category.as_str(), icon.as_str(), source.as_path())
            })
        })
    }

    /// Total number of mapped icons across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load the icon mapping from `path`.
///
/// # Errors
///
/// - `Error::ConfigLoad` if the file is missing or unreadable
/// - `Error::ConfigParse` if it is not valid TOML or not shaped as a mapping
pub fn load_mapping(path: &Path) -> Result<IconMapping> {
    debug!("Loading icon mapping from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mapping = IconMapping::from_toml(&contents)?;
    info!(
        "Loaded {} icon(s) in {} categories from {}",
        mapping.len(),
        mapping.categories.len(),
        path.display()
    );
    Ok(mapping)
}

fn parse_error(message: String) -> Error {
    Error::ConfigParse {
        message,
        source: None,
    }
}

/// A source path stays under the root when it is relative and never
/// climbs out with `..`.
fn is_under_root(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// A name that joins onto a directory as exactly one new entry.
pub(crate) fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
