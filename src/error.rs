//! Centralized error handling for the icon theme builder
//!
//! This module provides a unified error type that covers every way a build
//! can stop: configuration, mapping validation, the external converter,
//! filesystem work in the output tree, and packaging.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the builder.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the builder.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Generic I/O
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to read a configuration file (mapping or settings)
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration could be read but its contents are invalid
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// One or more mapped source files do not exist
    Validation { missing: Vec<PathBuf> },

    // ─────────────────────────────────────────────────────────────────────────
    // Converter Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The converter program could not be started
    ConverterSpawn { program: String, source: io::Error },

    /// The converter ran but reported failure
    ConverterFailed {
        program: String,
        source: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Output Tree Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Copy, link, delete or mkdir failed inside the output tree
    Filesystem { path: PathBuf, source: io::Error },

    /// Writing the compressed archive failed
    Archive { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The requested action is not one the builder knows
    UnknownAction(String),
}

impl Error {
    /// Wrap an I/O error that happened while touching `path`.
    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse {
            message: err.message().to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::Validation { missing } => {
                write!(f, "{} mapped source file(s) not found:", missing.len())?;
                for path in missing {
                    write!(f, "\n  {}", path.display())?;
                }
                Ok(())
            }

            // Converter Errors
            Error::ConverterSpawn { program, source } => {
                write!(f, "Failed to start converter '{}': {}", program, source)
            }
            Error::ConverterFailed {
                program,
                source,
                status,
                stderr,
            } => {
                write!(
                    f,
                    "Converter '{}' failed on '{}' ({})",
                    program,
                    source.display(),
                    status
                )?;
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }

            // Output Tree Errors
            Error::Filesystem { path, source } => {
                write!(f, "Filesystem error at '{}': {}", path.display(), source)
            }
            Error::Archive { path, source } => {
                write!(f, "Failed to write archive '{}': {}", path.display(), source)
            }

            Error::UnknownAction(action) => write!(
                f,
                "Unknown action '{}'. Valid actions are: \
                 build-index, build, build-dist, compress, clean",
                action
            ),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::ConverterSpawn { source, .. } => Some(source),
            Error::Filesystem { source, .. } => Some(source),
            Error::Archive { source, .. } => Some(source),
            Error::Validation { .. } | Error::ConverterFailed { .. } | Error::UnknownAction(_) => {
                None
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
