//! Font container writers
//!
//! One glyph table is compiled into a TrueType font and every other container
//! format is derived from that font's bytes.

pub mod eot;
pub mod svg_font;
pub mod tables;
pub mod ttf;
pub mod woff;

use crate::core::config_file::PipelineConfig;
use crate::core::errors::ForgeResult;
use crate::data::FontGlyph;
use serde::{Deserialize, Serialize};

pub use ttf::{build_ttf, NOTDEF};

/// Output container formats
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Ttf,
    Eot,
    Woff,
    Svg,
}

impl FontFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FontFormat::Ttf => "ttf",
            FontFormat::Eot => "eot",
            FontFormat::Woff => "woff",
            FontFormat::Svg => "svg",
        }
    }

    /// Formats written when none are configured
    pub fn defaults() -> Vec<FontFormat> {
        vec![FontFormat::Ttf, FontFormat::Eot, FontFormat::Woff]
    }
}

impl std::fmt::Display for FontFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Font-wide naming and metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSettings {
    pub family_name: String,
    pub style_name: String,
    pub version_major: u16,
    pub version_minor: u16,
    pub units_per_em: u16,
    pub ascent: i16,
    /// Distance below the baseline, positive
    pub descent: i16,
    /// Unix seconds written to `head.created` and `head.modified`
    pub timestamp: i64,
}

impl FontSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        let metrics = &config.metrics;
        Self {
            family_name: config.font_name.clone(),
            style_name: "Regular".to_string(),
            version_major: 1,
            version_minor: 0,
            units_per_em: metrics.font_height.round() as u16,
            ascent: metrics.ascent().round() as i16,
            descent: metrics.descent.round() as i16,
            timestamp: config
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().timestamp()),
        }
    }

    pub fn version_string(&self) -> String {
        format!("Version {}.{}", self.version_major, self.version_minor)
    }

    pub fn full_name(&self) -> String {
        if self.style_name == "Regular" {
            self.family_name.clone()
        } else {
            format!("{} {}", self.family_name, self.style_name)
        }
    }

    pub fn postscript_name(&self) -> String {
        format!("{}-{}", self.family_name, self.style_name)
            .chars()
            .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
            .take(63)
            .collect()
    }

    pub fn unique_id(&self) -> String {
        format!("iconforge:{}:{}", self.full_name(), self.timestamp)
    }
}

/// A TrueType font plus the glyphs it was compiled from
#[derive(Debug, Clone)]
pub struct CompiledFont {
    pub ttf: Vec<u8>,
    pub settings: FontSettings,
}

impl CompiledFont {
    pub fn compile(glyphs: &[FontGlyph], settings: FontSettings) -> ForgeResult<Self> {
        let ttf = build_ttf(glyphs, &settings)?;
        Ok(Self { ttf, settings })
    }

    /// Encode one container format
    ///
    /// The SVG font is the only format rendered from outlines rather than
    /// from the TrueType bytes.
    pub fn encode(&self, format: FontFormat, glyphs: &[FontGlyph]) -> ForgeResult<Vec<u8>> {
        let bytes = match format {
            FontFormat::Ttf => self.ttf.clone(),
            FontFormat::Eot => eot::wrap_eot(&self.ttf)?,
            FontFormat::Woff => woff::wrap_woff(
                &self.ttf,
                (self.settings.version_major, self.settings.version_minor),
            )?,
            FontFormat::Svg => svg_font::render_svg_font(glyphs, &self.settings).into_bytes(),
        };
        Ok(bytes)
    }
}
