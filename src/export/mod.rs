//! Icon Export Module
//!
//! This module turns the icon mapping into files inside the theme
//! directory.
//!
//! # Architecture
//!
//! - `exporter.rs` - Cross-product walk with skip, link, copy and render routes
//! - `converter.rs` - External vector-to-raster converter invocation
//! - `digest.rs` - Streaming content hashes for up-to-date checks
//! - `prune.rs` - Removal of outputs the mapping no longer produces

pub mod converter;
pub mod digest;
pub mod exporter;
pub mod prune;

pub use converter::{InkscapeConverter, Rasterizer};
pub use exporter::{export_icons, ExportReport};
