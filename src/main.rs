//! Balmy Icons - Main Entry Point
//!
//! Builds a freedesktop icon theme from SVG sources: writes `index.theme`,
//! exports every mapped icon at every configured size, and packs the theme
//! into a tarball.

mod app;
mod archive;
mod config;
mod error;
mod export;
mod theme;

use app::{Action, BuildApp};
use argh::FromArgs;
use config::{load_settings, BuildSettings, SETTINGS_FILE_NAME};
use export::InkscapeConverter;
use log::{error, info};
use std::path::PathBuf;

/// Application name constant.
const APP_NAME: &str = "balmy-icons";

#[derive(FromArgs, Debug)]
/// Build the icon theme: build-index, build, build-dist (default), compress or clean
struct Cli {
    /// action to run [default: build-dist]
    #[argh(positional, default = "Action::default()")]
    action: Action,

    /// build settings file [default: icon-theme.toml]
    #[argh(option)]
    settings: Option<PathBuf>,

    /// icon mapping file, overrides the settings file
    #[argh(option)]
    mapping: Option<PathBuf>,

    /// directory mapped sources are relative to
    #[argh(option)]
    source_root: Option<PathBuf>,

    /// output directory for the theme and archive
    #[argh(option)]
    dist_dir: Option<PathBuf>,

    /// vector-to-raster converter program
    #[argh(option)]
    converter: Option<String>,
}

impl Cli {
    /// Load the settings file and apply command-line overrides on top.
    fn resolve_settings(&self) -> BuildSettings {
        let path = self
            .settings
            .clone()
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME));
        let mut settings = load_settings(&path);

        if let Some(mapping) = &self.mapping {
            settings.mapping_file = mapping.clone();
        }
        if let Some(root) = &self.source_root {
            settings.source_root = root.clone();
        }
        if let Some(dist) = &self.dist_dir {
            settings.dist_dir = dist.clone();
        }
        if let Some(converter) = &self.converter {
            settings.converter = converter.clone();
        }
        settings
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli: Cli = argh::from_env();
    info!("Starting {}", APP_NAME);

    let settings = cli.resolve_settings();
    let converter = InkscapeConverter::new(settings.converter.clone());
    info!("Using converter '{}'", converter.program());

    let mut app = BuildApp::new(settings, converter);
    let summary = match app.run(cli.action) {
        Ok(summary) => summary,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    if let Some(path) = &summary.descriptor {
        info!("Descriptor: {}", path.display());
    }
    if let Some(report) = &summary.export {
        info!(
            "Icons: {} exported, {} up to date, {} removed",
            report.total() - report.skipped,
            report.skipped,
            report.pruned.len()
        );
    }
    if let Some(path) = &summary.archive {
        info!("Archive: {}", path.display());
    }
    if let Some(path) = &summary.cleaned {
        info!("Cleaned: {}", path.display());
    }

    Ok(())
}
