//! Icon export.
//!
//! Walks the full section × size × icon cross-product and produces each
//! output by one of four routes:
//!
//! 1. **Skip** when the output exists and the icon's scalable copy hashes
//!    equal to the current source.
//! 2. **Link** when the same source was already produced into the same
//!    directory during this run.
//! 3. **Copy** the source verbatim for the scalable size.
//! 4. **Render** through the [`Rasterizer`] for fixed sizes.
//!
//! Within a section, fixed sizes run before the scalable size. The scalable
//! copy is the skip reference for every size, so it is only refreshed once
//! all rasters of that section have been brought up to date.
//!
//! A link left by an earlier run is never trusted on its own: it is kept only
//! when it points at this run's output of the same source, otherwise it is
//! replaced.

use super::converter::Rasterizer;
use super::digest::{digest_file, FileDigest};
use super::prune::{expected_outputs, prune_stale};
use crate::config::{BuildSettings, IconMapping};
use crate::error::{Error, Result};
use crate::theme::{IconSize, ThemeLayout};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Export Record
// ─────────────────────────────────────────────────────────────────────────────

/// Outputs produced during one export run, keyed by destination directory
/// and source file.
///
/// Created fresh for every call to [`export_icons`] and dropped with it.
#[derive(Debug, Default)]
pub struct ExportRecord {
    produced: HashMap<(PathBuf, PathBuf), PathBuf>,
}

impl ExportRecord {
    /// Earlier output of `source` in `dir`, if any.
    pub fn lookup(&self, dir: &Path, source: &Path) -> Option<&Path> {
        self.produced
            .get(&(dir.to_path_buf(), source.to_path_buf()))
            .map(PathBuf::as_path)
    }

    /// Remember `output` as the product of `source`. The first output per
    /// directory wins.
    pub fn record(&mut self, source: &Path, output: &Path) {
        let dir = output.parent().unwrap_or(Path::new("")).to_path_buf();
        self.produced
            .entry((dir, source.to_path_buf()))
            .or_insert_with(|| output.to_path_buf());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Report
// ─────────────────────────────────────────────────────────────────────────────

/// How a single output was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Output already matched its source
    Skipped,
    /// Output points at a sibling made from the same source
    Linked,
    /// Source copied verbatim
    Copied,
    /// Source rasterized by the converter
    Rendered,
}

/// Summary of an export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub rendered: usize,
    pub copied: usize,
    pub linked: usize,
    pub skipped: usize,
    /// Files removed because the mapping no longer produces them
    pub pruned: Vec<PathBuf>,
}

impl ExportReport {
    fn count(&mut self, outcome: ExportOutcome) {
        match outcome {
            ExportOutcome::Skipped => self.skipped += 1,
            ExportOutcome::Linked => self.linked += 1,
            ExportOutcome::Copied => self.copied += 1,
            ExportOutcome::Rendered => self.rendered += 1,
        }
    }

    /// Number of outputs visited, whatever route they took.
    pub fn total(&self) -> usize {
        self.rendered + self.copied + self.linked + self.skipped
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Exporter
// ─────────────────────────────────────────────────────────────────────────────

struct Exporter<'a> {
    settings: &'a BuildSettings,
    layout: ThemeLayout,
    converter: &'a mut dyn Rasterizer,
    record: ExportRecord,
    /// Sources do not change during a run, so each is hashed once
    source_digests: HashMap<PathBuf, FileDigest>,
}

impl<'a> Exporter<'a> {
    fn source_digest(&mut self, source: &Path) -> Result<FileDigest> {
        if let Some(digest) = self.source_digests.get(source) {
            return Ok(*digest);
        }
        let digest = digest_file(source).map_err(|e| Error::filesystem(source, e))?;
        self.source_digests.insert(source.to_path_buf(), digest);
        Ok(digest)
    }

    fn is_up_to_date(
        &mut self,
        section: &str,
        icon: &str,
        dest: &Path,
        source: &Path,
    ) -> Result<bool> {
        let meta = match fs::symlink_metadata(dest) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(Error::filesystem(dest, e)),
        };
        // A link left by an earlier run only counts when it points at this
        // run's output of the same source.
        if meta.file_type().is_symlink() {
            return Ok(self.link_is_current(dest, source));
        }
        // The scalable copy stands in for every size of this icon.
        let reference = self.layout.icon_path(section, IconSize::Scalable, icon);
        let reference_digest =
            digest_file(&reference).map_err(|e| Error::filesystem(&reference, e))?;
        Ok(reference_digest == self.source_digest(source)?)
    }

    fn link_is_current(&self, dest: &Path, source: &Path) -> bool {
        let (Some(dir), Ok(target)) = (dest.parent(), fs::read_link(dest)) else {
            return false;
        };
        self.record.lookup(dir, source) == Some(dir.join(target).as_path())
    }

    fn export_one(
        &mut self,
        section: &str,
        size: IconSize,
        icon: &str,
        mapped_source: &Path,
    ) -> Result<ExportOutcome> {
        let dest = self.layout.icon_path(section, size, icon);
        let source = self.settings.source_root.join(mapped_source);

        if self.is_up_to_date(section, icon, &dest, &source)? {
            debug!("{} is up to date", dest.display());
            self.record.record(&source, &dest);
            return Ok(ExportOutcome::Skipped);
        }

        let dir = self.layout.size_dir(section, size);
        if let Some(earlier) = self.record.lookup(&dir, &source).map(Path::to_path_buf) {
            remove_existing(&dest)?;
            link_output(&earlier, &dest)?;
            debug!("{} -> {}", dest.display(), earlier.display());
            return Ok(ExportOutcome::Linked);
        }

        remove_existing(&dest)?;
        let outcome = match size {
            IconSize::Scalable => {
                fs::copy(&source, &dest).map_err(|e| Error::filesystem(&dest, e))?;
                debug!("Copied {} to {}", source.display(), dest.display());
                ExportOutcome::Copied
            }
            IconSize::Fixed(width) => {
                self.converter.rasterize(&source, &dest, width)?;
                debug!("Rendered {} at {}px", dest.display(), width);
                ExportOutcome::Rendered
            }
        };
        self.record.record(&source, &dest);
        Ok(outcome)
    }
}

/// Export every mapped icon into the theme directory and reconcile the tree
/// with the mapping.
///
/// Conversion failures stop the run immediately; re-running after fixing
/// the cause resumes cheaply thanks to the skip rule.
pub fn export_icons(
    settings: &BuildSettings,
    mapping: &IconMapping,
    converter: &mut dyn Rasterizer,
) -> Result<ExportReport> {
    info!("Exporting icons...");

    for category in mapping.categories() {
        if !settings.sections.iter().any(|s| s == category) {
            warn!(
                "Mapping category '{}' is not a configured section, ignoring",
                category
            );
        }
    }

    let layout = ThemeLayout::new(settings.theme_dir());
    let expected = expected_outputs(settings, mapping, &layout);
    let mut exporter = Exporter {
        settings,
        layout: layout.clone(),
        converter,
        record: ExportRecord::default(),
        source_digests: HashMap::new(),
    };
    let mut report = ExportReport::default();
    let progress = export_progress(settings, mapping);

    for section in &settings.sections {
        let Some(icons) = mapping.icons(section) else {
            warn!("Section '{}' has no icons in the mapping", section);
            continue;
        };

        for size in settings.icon_sizes() {
            let dir = layout.size_dir(section, size);
            fs::create_dir_all(&dir).map_err(|e| Error::filesystem(&dir, e))?;

            progress.set_message(format!("{}/{}", section, size));
            for (icon, source) in icons {
                let outcome = exporter.export_one(section, size, icon, source)?;
                report.count(outcome);
                progress.inc(1);
            }
        }
        progress.suspend(|| info!("Exported section '{}' ({} icons)", section, icons.len()));
    }
    progress.finish_and_clear();

    report.pruned = prune_stale(&layout, &expected)?;

    info!(
        "Export done: {} outputs ({} rendered, {} copied, {} linked, {} up to date), {} pruned",
        report.total(),
        report.rendered,
        report.copied,
        report.linked,
        report.skipped,
        report.pruned.len()
    );
    Ok(report)
}

/// Progress over every output the run will visit.
fn export_progress(settings: &BuildSettings, mapping: &IconMapping) -> ProgressBar {
    let sizes = settings.icon_sizes().len();
    let outputs: usize = settings
        .sections
        .iter()
        .filter_map(|section| mapping.icons(section))
        .map(|icons| icons.len() * sizes)
        .sum();

    let bar = ProgressBar::new(outputs as u64);
    let style = ProgressStyle::with_template("{msg:>16} [{bar:40}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("=> "));
    bar
}

/// Delete whatever sits at `path` (file or link) so a write cannot follow
/// an old link into another output.
fn remove_existing(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => fs::remove_file(path).map_err(|e| Error::filesystem(path, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::filesystem(path, e)),
    }
}

/// Point `dest` at `earlier`, which lives in the same directory.
#[cfg(unix)]
fn link_output(earlier: &Path, dest: &Path) -> Result<()> {
    let target = earlier.file_name().unwrap_or(earlier.as_os_str());
    std::os::unix::fs::symlink(target, dest).map_err(|e| Error::filesystem(dest, e))
}

#[cfg(not(unix))]
fn link_output(earlier: &Path, dest: &Path) -> Result<()> {
    fs::copy(earlier, dest)
        .map(|_| ())
        .map_err(|e| Error::filesystem(dest, e))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
