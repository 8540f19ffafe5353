//! UFO source export

use crate::core::errors::FileContext;
use crate::data::conversions::to_norad_font;
use crate::data::manifest::FontGlyph;
use crate::font::FontSettings;
use anyhow::Result;
use norad::Font;
use std::path::Path;
use tracing::debug;

/// Write the normalized glyphs as a UFO 3 source, replacing any previous export
pub fn save_ufo(glyphs: &[FontGlyph], settings: &FontSettings, path: &Path) -> Result<()> {
    let font = to_norad_font(glyphs, settings);
    font.save(path).with_file_context("save", path)?;
    debug!("Exported {} glyphs to {:?}", glyphs.len(), path);
    Ok(())
}

/// Load a UFO font file from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> Result<Font> {
    let path = path.as_ref();
    let font = Font::load(path).with_file_context("load", path)?;
    Ok(font)
}
