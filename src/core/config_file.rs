//! Project configuration
//!
//! Settings come from three places, later ones winning:
//! 1. Built-in defaults
//! 2. The project file (`--config FILE`, else `./iconforge.json` when present)
//! 3. Command line flags
//!
//! [`ConfigFile`] is the serialized, partially filled form. It is resolved into
//! a [`PipelineConfig`] with every field set and validated.

use crate::core::errors::{ConfigError, FileContext, ForgeResult};
use crate::font::FontFormat;
use crate::geometry::normalize::GlyphMetrics;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const PROJECT_FILE_NAME: &str = "iconforge.json";

pub const DEFAULT_SOURCE_PATTERN: &str = "icons/*.svg";
pub const DEFAULT_FONT_NAME: &str = "icons";
pub const DEFAULT_OUTPUT_DIR: &str = "dist/icon-font";
pub const DEFAULT_FONT_HEIGHT: f64 = 150.0;
/// The font height becomes units-per-em, which the `head` table bounds
pub const FONT_HEIGHT_RANGE: std::ops::RangeInclusive<f64> = 16.0..=16384.0;
pub const DEFAULT_START_CODEPOINT: u32 = 0xEA01;
pub const DEFAULT_CLASS_NAME: &str = "icon";
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Project configuration as stored in `iconforge.json`
///
/// Every field is optional so that a file only needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Glob matching the SVG sources, e.g. "src/icon-font/icon-src/*.svg"
    pub source_pattern: Option<String>,
    /// Font family name and output file stem
    pub font_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub formats: Option<Vec<FontFormat>>,
    /// Height every icon is scaled to, in font units
    pub font_height: Option<f64>,
    pub descent: Option<f64>,
    pub normalize: Option<bool>,
    pub center_horizontally: Option<bool>,
    pub start_codepoint: Option<u32>,
    /// CSS class prefix used by the templates ("icon" gives `.icon-star`)
    pub class_name: Option<String>,
    /// URL prefix of the font files as seen from the stylesheet
    pub font_path: Option<String>,
    /// URL prefix of the compiled CSS as seen from the gallery page
    pub target_path: Option<String>,
    pub stylesheet_template: Option<PathBuf>,
    pub gallery_template: Option<PathBuf>,
    /// Seconds since the Unix epoch written into the font headers
    pub timestamp: Option<i64>,
    pub autohint: Option<bool>,
    pub export_ufo: Option<bool>,
    pub debounce_ms: Option<u64>,
}

impl ConfigFile {
    /// Load a configuration file from an explicit path
    pub fn load_from(path: &Path) -> ForgeResult<Self> {
        let contents = fs::read_to_string(path).with_file_context("read", path)?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        debug!("Loaded project configuration from {:?}", path);
        Ok(config)
    }

    /// Find the project configuration
    ///
    /// An explicit path must exist. Without one, `./iconforge.json` is used
    /// when present and built-in defaults otherwise.
    pub fn discover(explicit: Option<&Path>) -> ForgeResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let project_file = PathBuf::from(PROJECT_FILE_NAME);
        if project_file.is_file() {
            Self::load_from(&project_file)
        } else {
            debug!("No {} found, using built-in defaults", PROJECT_FILE_NAME);
            Ok(Self::default())
        }
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to(&self, path: &Path) -> ForgeResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_file_context("create", parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).with_file_context("write", path)?;

        debug!("Saved project configuration to {:?}", path);
        Ok(())
    }

    /// A file listing every setting with its default value
    pub fn example() -> Self {
        Self {
            source_pattern: Some(DEFAULT_SOURCE_PATTERN.to_string()),
            font_name: Some(DEFAULT_FONT_NAME.to_string()),
            output_dir: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
            formats: Some(FontFormat::defaults()),
            font_height: Some(DEFAULT_FONT_HEIGHT),
            descent: Some(0.0),
            normalize: Some(true),
            center_horizontally: Some(true),
            start_codepoint: Some(DEFAULT_START_CODEPOINT),
            class_name: Some(DEFAULT_CLASS_NAME.to_string()),
            font_path: Some("./".to_string()),
            target_path: Some("./".to_string()),
            stylesheet_template: None,
            gallery_template: None,
            timestamp: None,
            autohint: Some(true),
            export_ufo: Some(false),
            debounce_ms: Some(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Write the example configuration unless the file already exists
    ///
    /// Returns whether a file was written.
    pub fn initialize_project(path: &Path) -> ForgeResult<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::example().save_to(path)?;
        Ok(true)
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: ConfigFile) -> ConfigFile {
        ConfigFile {
            source_pattern: other.source_pattern.or(self.source_pattern),
            font_name: other.font_name.or(self.font_name),
            output_dir: other.output_dir.or(self.output_dir),
            formats: other.formats.or(self.formats),
            font_height: other.font_height.or(self.font_height),
            descent: other.descent.or(self.descent),
            normalize: other.normalize.or(self.normalize),
            center_horizontally: other.center_horizontally.or(self.center_horizontally),
            start_codepoint: other.start_codepoint.or(self.start_codepoint),
            class_name: other.class_name.or(self.class_name),
            font_path: other.font_path.or(self.font_path),
            target_path: other.target_path.or(self.target_path),
            stylesheet_template: other.stylesheet_template.or(self.stylesheet_template),
            gallery_template: other.gallery_template.or(self.gallery_template),
            timestamp: other.timestamp.or(self.timestamp),
            autohint: other.autohint.or(self.autohint),
            export_ufo: other.export_ufo.or(self.export_ufo),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
        }
    }

    /// Fill in defaults and validate
    pub fn resolve(self) -> Result<PipelineConfig, ConfigError> {
        let config = PipelineConfig {
            source_pattern: self
                .source_pattern
                .unwrap_or_else(|| DEFAULT_SOURCE_PATTERN.to_string()),
            font_name: self
                .font_name
                .unwrap_or_else(|| DEFAULT_FONT_NAME.to_string()),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            formats: self.formats.unwrap_or_else(FontFormat::defaults),
            metrics: GlyphMetrics {
                font_height: self.font_height.unwrap_or(DEFAULT_FONT_HEIGHT),
                descent: self.descent.unwrap_or(0.0),
                normalize: self.normalize.unwrap_or(true),
                center_horizontally: self.center_horizontally.unwrap_or(true),
            },
            start_codepoint: self.start_codepoint.unwrap_or(DEFAULT_START_CODEPOINT),
            class_name: self
                .class_name
                .unwrap_or_else(|| DEFAULT_CLASS_NAME.to_string()),
            font_path: self.font_path.unwrap_or_else(|| "./".to_string()),
            target_path: self.target_path.unwrap_or_else(|| "./".to_string()),
            stylesheet_template: self.stylesheet_template,
            gallery_template: self.gallery_template,
            timestamp: self.timestamp,
            autohint: self.autohint.unwrap_or(true),
            export_ufo: self.export_ufo.unwrap_or(false),
            debounce: Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Fully resolved settings for one pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub source_pattern: String,
    pub font_name: String,
    pub output_dir: PathBuf,
    pub formats: Vec<FontFormat>,
    pub metrics: GlyphMetrics,
    pub start_codepoint: u32,
    pub class_name: String,
    pub font_path: String,
    pub target_path: String,
    pub stylesheet_template: Option<PathBuf>,
    pub gallery_template: Option<PathBuf>,
    pub timestamp: Option<i64>,
    pub autohint: bool,
    pub export_ufo: bool,
    pub debounce: Duration,
}

impl PipelineConfig {
    /// Defaults for the three required inputs, everything else built in
    pub fn new(
        source_pattern: impl Into<String>,
        font_name: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        ConfigFile {
            source_pattern: Some(source_pattern.into()),
            font_name: Some(font_name.into()),
            output_dir: Some(output_dir.into()),
            ..ConfigFile::default()
        }
        .resolve()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_name.is_empty() {
            return Err(ConfigError::EmptyFontName);
        }
        if !self
            .font_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidFontName(self.font_name.clone()));
        }
        if self.source_pattern.trim().is_empty() {
            return Err(ConfigError::EmptySourcePattern);
        }
        if !FONT_HEIGHT_RANGE.contains(&self.metrics.font_height) {
            return Err(ConfigError::InvalidFontHeight(self.metrics.font_height));
        }
        if self.metrics.descent < 0.0 || self.metrics.descent >= self.metrics.font_height {
            return Err(ConfigError::InvalidDescent(self.metrics.descent));
        }
        if self.formats.is_empty() {
            return Err(ConfigError::NoFormats);
        }
        if char::from_u32(self.start_codepoint).is_none() {
            return Err(ConfigError::InvalidStartCodepoint(self.start_codepoint));
        }
        Ok(())
    }

    pub fn font_file(&self, format: FontFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.font_name, format.extension()))
    }

    /// The rendered SCSS partial
    pub fn stylesheet_file(&self) -> PathBuf {
        self.output_dir.join(format!("{}.scss", self.font_name))
    }

    /// The compiled CSS used by the gallery page
    pub fn css_file(&self) -> PathBuf {
        self.output_dir.join(format!("{}-gallery.css", self.font_name))
    }

    pub fn gallery_file(&self) -> PathBuf {
        self.output_dir.join(format!("{}.html", self.font_name))
    }

    pub fn ufo_dir(&self) -> PathBuf {
        self.output_dir.join(format!("{}.ufo", self.font_name))
    }
}
