//! `index.theme` generation.
//!
//! The descriptor is a flat key-value stanza file read by icon lookup
//! implementations. Its content depends only on the theme identity, the
//! section list and the size list, so identical settings always produce an
//! identical file.

use super::{category_context, IconSize, ThemeLayout};
use crate::config::BuildSettings;
use crate::error::{Error, Result};
use log::{debug, info};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

/// Directories in descriptor order: every fixed size of every section
/// (section-major), then the scalable directory of every section.
fn directories(settings: &BuildSettings) -> Vec<(&str, IconSize)> {
    let fixed = settings.sections.iter().flat_map(|section| {
        settings
            .sizes
            .iter()
            .map(move |&px| (section.as_str(), IconSize::Fixed(px)))
    });
    let scalable = settings
        .sections
        .iter()
        .map(|section| (section.as_str(), IconSize::Scalable));
    fixed.chain(scalable).collect()
}

/// Render the full `index.theme` text.
pub fn generate_descriptor(settings: &BuildSettings) -> String {
    let dirs = directories(settings);
    let listing = dirs
        .iter()
        .map(|(section, size)| format!("{}/{}", section, size))
        .collect::<Vec<_>>()
        .join(",");

    let mut text = String::new();
    // Writing to a String cannot fail
    let _ = write!(
        text,
        "[Icon Theme]\nName={}\nComment={}\nDirectories={}\n\n",
        settings.display_name, settings.comment, listing
    );

    for (section, size) in &dirs {
        let _ = write!(
            text,
            "[{}/{}]\nSize={}\nContext={}\nType={}\n\n",
            section,
            size,
            size.nominal_size(),
            category_context(section),
            size.kind()
        );
    }

    text
}

/// Replace the theme's `index.theme` with a freshly generated one.
///
/// Creates the theme directory when needed and returns the descriptor path.
pub fn write_descriptor(settings: &BuildSettings) -> Result<PathBuf> {
    info!("Generating {}...", super::DESCRIPTOR_FILE_NAME);

    let layout = ThemeLayout::new(settings.theme_dir());
    fs::create_dir_all(layout.root()).map_err(|e| Error::filesystem(layout.root(), e))?;

    let path = layout.descriptor_path();
    if path.symlink_metadata().is_ok() {
        debug!("Removing existing descriptor {}", path.display());
        fs::remove_file(&path).map_err(|e| Error::filesystem(&path, e))?;
    }

    fs::write(&path, generate_descriptor(settings)).map_err(|e| Error::filesystem(&path, e))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(sections: &[&str], sizes: &[u32]) -> BuildSettings {
        BuildSettings {
            sections: sections.iter().map(|s| s.to_string()).collect(),
            sizes: sizes.to_vec(),
            ..BuildSettings::default()
        }
    }

    fn stanza_headers(text: &str) -> Vec<&str> {
        text.lines()
            .filter(|line| line.starts_with('[') && *line != "[Icon Theme]")
            .collect()
    }

    fn directory_list(text: &str) -> Vec<&str> {
        text.lines()
            .find_map(|line| line.strip_prefix("Directories="))
            .map(|list| list.split(',').collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_exact_output_single_section() {
        let text = generate_descriptor(&settings(&["apps"], &[48]));
        assert_eq!(
            text,
            "[Icon Theme]\n\
             Name=Balmy Icons\n\
             Comment=Simple CC0 pastel icons\n\
             Directories=apps/48,apps/scalable\n\
             \n\
             [apps/48]\n\
             Size=48\n\
             Context=Applications\n\
             Type=Fixed\n\
             \n\
             [apps/scalable]\n\
             Size=512\n\
             Context=Applications\n\
             Type=Scalable\n\
             \n"
        );
    }

    #[test]
    fn test_directory_order_is_fixed_then_scalable() {
        let text = generate_descriptor(&settings(&["apps", "places"], &[48, 64]));
        assert_eq!(
            directory_list(&text),
            vec![
                "apps/48",
                "apps/64",
                "places/48",
                "places/64",
                "apps/scalable",
                "places/scalable",
            ]
        );
    }

    #[test]
    fn test_stanza_count_matches_directories() {
        let sections = ["apps", "categories", "devices", "mimetypes", "places"];
        let sizes = [48, 64, 128, 256];
        let text = generate_descriptor(&settings(&sections, &sizes));

        let expected = sections.len() * (sizes.len() + 1);
        let headers = stanza_headers(&text);
        assert_eq!(headers.len(), expected);
        assert_eq!(directory_list(&text).len(), expected);

        let listed: Vec<String> = directory_list(&text)
            .iter()
            .map(|d| format!("[{}]", d))
            .collect();
        assert_eq!(headers, listed);
    }

    #[test]
    fn test_scalable_uses_nominal_size() {
        let text = generate_descriptor(&settings(&["places"], &[1024]));
        assert!(text.contains("[places/scalable]\nSize=512\nContext=Places\nType=Scalable\n"));
        assert!(text.contains("[places/1024]\nSize=1024\n"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let s = settings(&["apps", "devices"], &[64, 128]);
        assert_eq!(generate_descriptor(&s), generate_descriptor(&s));
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let s = BuildSettings {
            dist_dir: temp.path().to_path_buf(),
            ..settings(&["apps"], &[48])
        };
        let theme_dir = s.theme_dir();
        fs::create_dir_all(&theme_dir).unwrap();
        fs::write(theme_dir.join("index.theme"), "stale contents that must vanish").unwrap();

        let path = write_descriptor(&s).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, generate_descriptor(&s));
        assert!(!written.contains("stale"));
    }

    #[test]
    fn test_write_creates_theme_dir() {
        let temp = TempDir::new().unwrap();
        let s = BuildSettings {
            dist_dir: temp.path().join("nested/dist"),
            ..settings(&["apps"], &[48])
        };
        let path = write_descriptor(&s).unwrap();
        assert!(path.is_file());
        assert_eq!(path, s.theme_dir().join("index.theme"));
    }
}
