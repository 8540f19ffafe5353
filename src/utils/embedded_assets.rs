//! Embedded default templates
//!
//! The stylesheet and gallery templates are compiled into the binary so the
//! pipeline works without an assets directory (e.g., after cargo install).
//! A configured template path always wins over the embedded copy.

use crate::core::errors::{FileContext, ForgeResult};
use std::path::Path;
use tracing::debug;

pub const STYLESHEET_TEMPLATE: &str =
    include_str!("../../assets/templates/icon-template.scss.tera");
pub const GALLERY_TEMPLATE: &str =
    include_str!("../../assets/templates/icon-gallery-template.html.tera");

/// Read a template override, falling back to the embedded default
pub fn load_template_with_fallback(
    custom: Option<&Path>,
    embedded: &'static str,
) -> ForgeResult<String> {
    match custom {
        Some(path) => {
            debug!("Loading template from {}", path.display());
            std::fs::read_to_string(path).with_file_context("read template", path)
        }
        None => Ok(embedded.to_string()),
    }
}
