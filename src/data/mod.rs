//! Glyph data: icon sources, the glyph manifest and the UFO export

pub mod codepoints;
pub mod conversions;
pub mod manifest;
pub mod ufo;

pub use codepoints::assign_codepoints;
pub use manifest::{FontGlyph, GlyphManifest, GlyphRecord, IconSource, ManifestError};
