//! External vector-to-raster conversion.
//!
//! Raster icons are produced by a command-line converter (Inkscape by
//! default). Each call is a blocking subprocess; the exporter waits for it
//! to finish before moving on.

use crate::error::{Error, Result};
use log::debug;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Something that can turn a vector source into a raster file.
pub trait Rasterizer {
    /// Render `source` into `dest` at `width` pixels wide, cropped to the
    /// drawing's bounding box.
    fn rasterize(&mut self, source: &Path, dest: &Path, width: u32) -> Result<()>;
}

/// Inkscape-compatible command-line converter.
#[derive(Debug, Clone)]
pub struct InkscapeConverter {
    program: String,
}

impl InkscapeConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one conversion, in the order the converter expects.
    pub fn arguments(source: &Path, dest: &Path, width: u32) -> Vec<OsString> {
        let mut filename = OsString::from("--export-filename=");
        filename.push(dest.as_os_str());

        vec![
            OsString::from(format!("--export-width={}", width)),
            filename,
            OsString::from("--export-area-drawing"),
            source.as_os_str().to_os_string(),
        ]
    }
}

impl Rasterizer for InkscapeConverter {
    fn rasterize(&mut self, source: &Path, dest: &Path, width: u32) -> Result<()> {
        let args = Self::arguments(source, dest, width);
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| Error::ConverterSpawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(Error::ConverterFailed {
                program: self.program.clone(),
                source: source.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_argument_order() {
        let args = InkscapeConverter::arguments(
            Path::new("src/browser.svg"),
            Path::new("dist/t/apps/48/firefox.png"),
            48,
        );
        assert_eq!(
            args,
            vec![
                OsString::from("--export-width=48"),
                OsString::from("--export-filename=dist/t/apps/48/firefox.png"),
                OsString::from("--export-area-drawing"),
                OsString::from("src/browser.svg"),
            ]
        );
    }

    #[test]
    fn test_paths_with_spaces_stay_single_arguments() {
        let args = InkscapeConverter::arguments(
            Path::new("my icons/a b.svg"),
            Path::new("out dir/a b.png"),
            64,
        );
        assert_eq!(args.len(), 4);
        assert_eq!(args[3], OsString::from("my icons/a b.svg"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut converter = InkscapeConverter::new("definitely-not-a-real-converter-binary");
        let result = converter.rasterize(
            &PathBuf::from("a.svg"),
            &PathBuf::from("a.png"),
            48,
        );
        assert!(matches!(result, Err(Error::ConverterSpawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        // `false` ignores its arguments and exits with status 1
        let mut converter = InkscapeConverter::new("false");
        let result = converter.rasterize(Path::new("a.svg"), Path::new("a.png"), 48);
        assert!(matches!(result, Err(Error::ConverterFailed { .. })));
    }
}
