//! Configuration module for the icon theme builder
//!
//! This module handles the build settings (theme identity, sizes, paths),
//! the icon mapping that drives every stage, and validation of that mapping
//! against the source tree.

mod mapping;
mod settings;
mod validate;

pub use mapping::*;
pub use settings::*;
pub use validate::*;
