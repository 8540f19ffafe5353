//! Icon sources and the glyph manifest
//!
//! The manifest is the one piece of data that flows from font generation
//! into template rendering. It is built once per run and shared read-only.

use crate::geometry::TtContour;
use kurbo::BezPath;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("cannot derive a glyph name from {0}")]
    EmptyName(PathBuf),
    #[error("glyph name '{name}' from {file} contains whitespace or control characters")]
    UnusableName { name: String, file: PathBuf },
    #[error("glyph name '{name}' is used by both {first} and {second}")]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("codepoint U+{codepoint:04X} is claimed by both {first} and {second}")]
    DuplicateCodepoint {
        codepoint: u32,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("{file}: U+{value:04X} is not a valid Unicode scalar value")]
    InvalidCodepoint { file: PathBuf, value: u32 },
    #[error("ran out of codepoints to assign")]
    CodepointsExhausted,
}

/// An SVG file and what its name says about the glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSource {
    pub name: String,
    /// Codepoint pinned by a `uXXXX-` file name prefix
    pub codepoint: Option<char>,
    pub path: PathBuf,
}

impl IconSource {
    /// Derive the glyph name and optional pinned codepoint from a file name
    ///
    /// `star.svg` gives glyph `star`; `uE001-star.svg` gives glyph `star` at
    /// U+E001.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (name, codepoint) = match split_codepoint_prefix(&stem) {
            Some((value, rest)) => {
                let codepoint = char::from_u32(value).ok_or(ManifestError::InvalidCodepoint {
                    file: path.to_path_buf(),
                    value,
                })?;
                (rest.to_string(), Some(codepoint))
            }
            None => (stem, None),
        };

        if name.trim().is_empty() {
            return Err(ManifestError::EmptyName(path.to_path_buf()));
        }
        // class attributes split on whitespace, so such a name can never be a class
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ManifestError::UnusableName {
                name,
                file: path.to_path_buf(),
            });
        }

        Ok(Self {
            name,
            codepoint,
            path: path.to_path_buf(),
        })
    }
}

/// Split `uE001-star` into (0xE001, "star")
fn split_codepoint_prefix(stem: &str) -> Option<(u32, &str)> {
    let rest = stem.strip_prefix('u').or_else(|| stem.strip_prefix('U'))?;
    let (hex, name) = rest.split_once('-')?;
    if !(4..=6).contains(&hex.len()) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some((value, name))
}

/// One entry of the glyph manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRecord {
    pub name: String,
    pub codepoint: char,
    pub source: PathBuf,
}

impl GlyphRecord {
    /// Uppercase hex digits of the codepoint, e.g. "EA01"
    pub fn hex(&self) -> String {
        format!("{:04X}", self.codepoint as u32)
    }

    /// The codepoint as a CSS string escape, e.g. `\ea01`
    pub fn css_escape(&self) -> String {
        format!("\\{:x}", self.codepoint as u32)
    }

    /// The glyph name escaped for use after a class prefix in a CSS selector
    ///
    /// `arrow.left` gives `arrow\.left`. Non-ASCII characters are valid
    /// identifier characters and pass through.
    pub fn class_suffix(&self) -> String {
        let mut escaped = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    /// The codepoint as an HTML character reference, e.g. `&#xea01;`
    pub fn html_entity(&self) -> String {
        format!("&#x{:x};", self.codepoint as u32)
    }
}

/// Ordered glyph records produced by one run of font generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphManifest {
    records: Vec<GlyphRecord>,
}

impl GlyphManifest {
    pub fn new(records: Vec<GlyphRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[GlyphRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name.as_str())
    }
}

/// A glyph ready for the font writers
#[derive(Debug, Clone)]
pub struct FontGlyph {
    pub record: GlyphRecord,
    /// Outline in font units, before quantization
    pub outline: BezPath,
    pub contours: Vec<TtContour>,
    pub advance_width: u16,
}
