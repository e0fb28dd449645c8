//! Build orchestration.
//!
//! `BuildApp` owns the settings and the converter for one invocation and
//! runs the stages an [`Action`] selects, in a single linear pass:
//!
//! ```text
//! load mapping → validate → [descriptor → export → archive]
//! ```
//!
//! Mapping load and validation only happen for actions that write the
//! descriptor or export icons; `compress` and `clean` work on the existing
//! output tree alone.

use crate::archive::create_theme_archive;
use crate::config::{load_mapping, validate_mapping, BuildSettings, IconMapping};
use crate::error::{Error, Result};
use crate::export::{export_icons, ExportReport, Rasterizer};
use crate::theme::write_descriptor;
use log::{info, warn};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Action
// ─────────────────────────────────────────────────────────────────────────────

/// What a single invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Validate and regenerate `index.theme` only
    BuildIndex,
    /// Validate, write the descriptor, export icons and archive
    #[default]
    BuildDist,
    /// Validate, write the descriptor and export icons
    Build,
    /// Archive the existing theme directory
    Compress,
    /// Delete the dist directory
    Clean,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::BuildIndex => "build-index",
            Action::BuildDist => "build-dist",
            Action::Build => "build",
            Action::Compress => "compress",
            Action::Clean => "clean",
        }
    }

    /// Get all available actions.
    pub fn all() -> &'static [Action] {
        &[
            Action::BuildIndex,
            Action::BuildDist,
            Action::Build,
            Action::Compress,
            Action::Clean,
        ]
    }

    pub fn writes_descriptor(&self) -> bool {
        matches!(self, Action::BuildIndex | Action::BuildDist | Action::Build)
    }

    pub fn exports_icons(&self) -> bool {
        matches!(self, Action::BuildDist | Action::Build)
    }

    pub fn archives(&self) -> bool {
        matches!(self, Action::BuildDist | Action::Compress)
    }

    /// Whether the mapping must be loaded and validated first.
    pub fn needs_mapping(&self) -> bool {
        self.writes_descriptor() || self.exports_icons()
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::all()
            .iter()
            .copied()
            .find(|action| action.name() == s.trim())
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Run Summary
// ─────────────────────────────────────────────────────────────────────────────

/// What a run produced, for reporting.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub descriptor: Option<PathBuf>,
    pub export: Option<ExportReport>,
    pub archive: Option<PathBuf>,
    pub cleaned: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Build App
// ─────────────────────────────────────────────────────────────────────────────

/// A configured builder.
pub struct BuildApp<R: Rasterizer> {
    settings: BuildSettings,
    converter: R,
}

impl<R: Rasterizer> BuildApp<R> {
    pub fn new(settings: BuildSettings, converter: R) -> Self {
        Self {
            settings,
            converter,
        }
    }

    /// Run the stages selected by `action`.
    pub fn run(&mut self, action: Action) -> Result<RunSummary> {
        info!("Running '{}' for theme '{}'", action, self.settings.theme_name);
        let mut summary = RunSummary::default();

        if action == Action::Clean {
            summary.cleaned = self.clean()?;
            return Ok(summary);
        }

        let mapping = if action.needs_mapping() {
            Some(self.load_and_validate()?)
        } else {
            None
        };

        if action.writes_descriptor() {
            summary.descriptor = Some(write_descriptor(&self.settings)?);
        }

        if let (true, Some(mapping)) = (action.exports_icons(), mapping.as_ref()) {
            summary.export = Some(export_icons(
                &self.settings,
                mapping,
                &mut self.converter,
            )?);
        }

        if action.archives() {
            summary.archive = Some(create_theme_archive(&self.settings)?);
        }

        info!("Done.");
        Ok(summary)
    }

    fn load_and_validate(&self) -> Result<IconMapping> {
        let mapping = load_mapping(&self.settings.mapping_file)?;
        if mapping.is_empty() {
            warn!("Mapping {} has no icons", self.settings.mapping_file.display());
        }
        let report = validate_mapping(&mapping, &self.settings.source_root);
        info!(
            "Validated {} mapping entries against {}",
            report.checked,
            self.settings.source_root.display()
        );
        report.into_result()?;
        Ok(mapping)
    }

    fn clean(&self) -> Result<Option<PathBuf>> {
        let dist = &self.settings.dist_dir;
        if !dist.exists() {
            info!("Nothing to clean at {}", dist.display());
            return Ok(None);
        }
        fs::remove_dir_all(dist).map_err(|e| Error::filesystem(dist, e))?;
        info!("Removed {}", dist.display());
        Ok(Some(dist.clone()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingRasterizer {
        calls: usize,
    }

    impl Rasterizer for CountingRasterizer {
        fn rasterize(&mut self, _source: &Path, dest: &Path, width: u32) -> Result<()> {
            self.calls += 1;
            fs::write(dest, format!("png {}", width))?;
            Ok(())
        }
    }

    fn project(mapping: &str, sources: &[&str]) -> (TempDir, BuildSettings) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("icons");
        fs::create_dir_all(&root).unwrap();
        for source in sources {
            fs::write(root.join(source), "<svg/>").unwrap();
        }
        let mapping_file = temp.path().join("fd-name-mapping.toml");
        fs::write(&mapping_file, mapping).unwrap();

        let settings = BuildSettings {
            sections: vec!["apps".to_string()],
            sizes: vec![48],
            mapping_file,
            source_root: root,
            dist_dir: temp.path().join("dist"),
            ..BuildSettings::default()
        };
        (temp, settings)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Action parsing
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_action_parsing() {
        assert_eq!("build-index".parse::<Action>().unwrap(), Action::BuildIndex);
        assert_eq!("build-dist".parse::<Action>().unwrap(), Action::BuildDist);
        assert_eq!("build".parse::<Action>().unwrap(), Action::Build);
        assert_eq!("compress".parse::<Action>().unwrap(), Action::Compress);
        assert_eq!("clean".parse::<Action>().unwrap(), Action::Clean);
        assert!(matches!(
            "deploy".parse::<Action>(),
            Err(Error::UnknownAction(a)) if a == "deploy"
        ));
    }

    #[test]
    fn test_default_action() {
        assert_eq!(Action::default(), Action::BuildDist);
    }

    #[test]
    fn test_action_stages() {
        assert!(Action::BuildIndex.writes_descriptor());
        assert!(!Action::BuildIndex.exports_icons());
        assert!(!Action::BuildIndex.archives());

        assert!(Action::Build.exports_icons());
        assert!(!Action::Build.archives());

        assert!(Action::BuildDist.archives());
        assert!(!Action::Compress.needs_mapping());
        assert!(!Action::Clean.needs_mapping());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Runs
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_build_dist_runs_every_stage() {
        let (_temp, settings) = project("[apps]\nfirefox = \"browser.svg\"\n", &["browser.svg"]);
        let mut app = BuildApp::new(settings.clone(), CountingRasterizer::default());

        let summary = app.run(Action::BuildDist).unwrap();

        assert!(summary.descriptor.unwrap().is_file());
        assert_eq!(summary.export.unwrap().rendered, 1);
        assert!(summary.archive.unwrap().is_file());
        assert!(settings.theme_dir().join("apps/48/firefox.png").is_file());
    }

    #[test]
    fn test_build_index_only_writes_descriptor() {
        let (_temp, settings) = project("[apps]\nfirefox = \"browser.svg\"\n", &["browser.svg"]);
        let mut app = BuildApp::new(settings.clone(), CountingRasterizer::default());

        let summary = app.run(Action::BuildIndex).unwrap();

        assert!(summary.descriptor.is_some());
        assert!(summary.export.is_none());
        assert!(summary.archive.is_none());
        assert!(!settings.theme_dir().join("apps").exists());
    }

    #[test]
    fn test_validation_failure_blocks_writes() {
        let (_temp, settings) = project(
            "[apps]\nfirefox = \"browser.svg\"\nterminal = \"term.svg\"\n",
            &[],
        );
        let mut app = BuildApp::new(settings.clone(), CountingRasterizer::default());

        let result = app.run(Action::BuildDist);

        match result {
            Err(Error::Validation { missing }) => assert_eq!(missing.len(), 2),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
        assert!(!settings.dist_dir.exists());
        assert_eq!(app.converter.calls, 0);
    }

    #[test]
    fn test_missing_mapping_file_is_config_error() {
        let (_temp, mut settings) = project("", &[]);
        settings.mapping_file = settings.dist_dir.join("nope.toml");
        let mut app = BuildApp::new(settings, CountingRasterizer::default());

        assert!(matches!(
            app.run(Action::Build),
            Err(Error::ConfigLoad { .. })
        ));
    }

    #[test]
    fn test_compress_skips_validation() {
        // The mapping references a missing source, but compress never reads it.
        let (_temp, settings) = project("[apps]\nfirefox = \"missing.svg\"\n", &[]);
        fs::create_dir_all(settings.theme_dir()).unwrap();
        fs::write(settings.theme_dir().join("index.theme"), "[Icon Theme]\n").unwrap();
        let mut app = BuildApp::new(settings, CountingRasterizer::default());

        let summary = app.run(Action::Compress).unwrap();
        assert!(summary.archive.unwrap().is_file());
        assert!(summary.descriptor.is_none());
    }

    #[test]
    fn test_rebuild_is_incremental() {
        let (_temp, settings) = project("[apps]\nfirefox = \"browser.svg\"\n", &["browser.svg"]);
        let mut app = BuildApp::new(settings, CountingRasterizer::default());

        app.run(Action::Build).unwrap();
        app.run(Action::Build).unwrap();
        assert_eq!(app.converter.calls, 1);
    }

    #[test]
    fn test_clean_removes_dist() {
        let (_temp, settings) = project("[apps]\nfirefox = \"browser.svg\"\n", &["browser.svg"]);
        let mut app = BuildApp::new(settings.clone(), CountingRasterizer::default());
        app.run(Action::Build).unwrap();
        assert!(settings.dist_dir.exists());

        let summary = app.run(Action::Clean).unwrap();
        assert_eq!(summary.cleaned, Some(settings.dist_dir.clone()));
        assert!(!settings.dist_dir.exists());

        let summary = app.run(Action::Clean).unwrap();
        assert!(summary.cleaned.is_none());
    }
}
