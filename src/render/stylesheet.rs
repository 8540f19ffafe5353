//! SCSS compilation

use crate::core::errors::{display_error, ForgeResult};
use anyhow::Context;
use std::path::Path;

/// Compile a written SCSS partial to expanded CSS
///
/// Imports resolve relative to the partial's directory.
pub fn compile_stylesheet(scss_path: &Path) -> ForgeResult<String> {
    let mut options = grass::Options::default().style(grass::OutputStyle::Expanded);
    if let Some(parent) = scss_path.parent() {
        options = options.load_path(parent);
    }
    grass::from_path(scss_path, &options)
        .map_err(display_error)
        .with_context(|| format!("failed to compile {}", scss_path.display()))
}
