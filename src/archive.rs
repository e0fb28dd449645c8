//! Theme packaging.
//!
//! Packs the generated theme directory into `<dist>/<theme>-theme.tar.gz`.
//! Entry names are relative to the dist directory, so extracting the
//! archive anywhere recreates the theme directory as its single top-level
//! entry.

use crate::config::BuildSettings;
use crate::error::{Error, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Write the compressed archive of the theme directory.
///
/// Links inside the theme are stored as links. Returns the archive path.
pub fn create_theme_archive(settings: &BuildSettings) -> Result<PathBuf> {
    let theme_dir = settings.theme_dir();
    let archive_path = settings.archive_path();

    info!("Compressing theme...");
    if !theme_dir.is_dir() {
        return Err(Error::filesystem(
            &theme_dir,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "theme directory does not exist, run a build first",
            ),
        ));
    }

    write_tar_gz(&archive_path, Path::new(&settings.theme_name), &theme_dir)?;
    info!("Wrote {}", archive_path.display());
    Ok(archive_path)
}

fn write_tar_gz(archive_path: &Path, entry_name: &Path, dir: &Path) -> Result<()> {
    let archive_err = |e| Error::Archive {
        path: archive_path.to_path_buf(),
        source: e,
    };

    let file = File::create(archive_path).map_err(archive_err)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);

    builder.append_dir_all(entry_name, dir).map_err(archive_err)?;

    let encoder = builder.into_inner().map_err(archive_err)?;
    encoder.finish().map_err(archive_err)?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
