//! Stylesheet and gallery templates
//!
//! Both templates see the same context built from the glyph manifest. The
//! gallery is registered with an `.html` name so Tera escapes its output;
//! the stylesheet is rendered verbatim.

use crate::core::config_file::PipelineConfig;
use crate::core::errors::ForgeResult;
use crate::data::{GlyphManifest, GlyphRecord};
use crate::font::FontFormat;
use crate::utils::embedded_assets::{
    load_template_with_fallback, GALLERY_TEMPLATE, STYLESHEET_TEMPLATE,
};
use anyhow::Context;
use serde::Serialize;
use tera::{Context as TeraContext, Tera};

const STYLESHEET_NAME: &str = "stylesheet.scss";
const GALLERY_NAME: &str = "gallery.html";

/// One glyph as the templates see it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GlyphContext {
    pub name: String,
    /// The name escaped for CSS selectors
    pub class_suffix: String,
    /// Uppercase hex without prefix, e.g. `EA01`
    pub codepoint: String,
    pub css_escape: String,
    pub html_entity: String,
    pub source: String,
}

impl From<&GlyphRecord> for GlyphContext {
    fn from(record: &GlyphRecord) -> Self {
        Self {
            name: record.name.clone(),
            class_suffix: record.class_suffix(),
            codepoint: record.hex(),
            css_escape: record.css_escape(),
            html_entity: record.html_entity(),
            source: record.source.display().to_string(),
        }
    }
}

/// A font file referenced from `@font-face`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FontFileContext {
    pub url: String,
    /// CSS `format()` hint
    pub format: &'static str,
}

fn css_format(format: FontFormat) -> &'static str {
    match format {
        FontFormat::Ttf => "truetype",
        FontFormat::Eot => "embedded-opentype",
        FontFormat::Woff => "woff",
        FontFormat::Svg => "svg",
    }
}

/// Values shared by both templates
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub glyphs: Vec<GlyphContext>,
    pub font_name: String,
    pub font_path: String,
    pub class_name: String,
    pub target_path: String,
    pub font_files: Vec<FontFileContext>,
}

impl RenderContext {
    pub fn new(config: &PipelineConfig, manifest: &GlyphManifest) -> Self {
        let font_files = config
            .formats
            .iter()
            .map(|format| FontFileContext {
                url: format!(
                    "{}{}.{}",
                    config.font_path,
                    config.font_name,
                    format.extension()
                ),
                format: css_format(*format),
            })
            .collect();

        Self {
            glyphs: manifest.records().iter().map(GlyphContext::from).collect(),
            font_name: config.font_name.clone(),
            font_path: config.font_path.clone(),
            class_name: config.class_name.clone(),
            target_path: config.target_path.clone(),
            font_files,
        }
    }

    fn to_tera(&self) -> ForgeResult<TeraContext> {
        TeraContext::from_serialize(self).context("failed to build template context")
    }
}

/// The two parsed templates
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Parse the configured templates, or the embedded defaults
    pub fn load(config: &PipelineConfig) -> ForgeResult<Self> {
        let stylesheet = load_template_with_fallback(
            config.stylesheet_template.as_deref(),
            STYLESHEET_TEMPLATE,
        )?;
        let gallery =
            load_template_with_fallback(config.gallery_template.as_deref(), GALLERY_TEMPLATE)?;
        Self::from_sources(&stylesheet, &gallery)
    }

    pub fn from_sources(stylesheet: &str, gallery: &str) -> ForgeResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(STYLESHEET_NAME, stylesheet)
            .context("failed to parse stylesheet template")?;
        tera.add_raw_template(GALLERY_NAME, gallery)
            .context("failed to parse gallery template")?;
        Ok(Self { tera })
    }

    pub fn render_stylesheet(&self, context: &RenderContext) -> ForgeResult<String> {
        self.tera
            .render(STYLESHEET_NAME, &context.to_tera()?)
            .context("failed to render stylesheet template")
    }

    pub fn render_gallery(&self, context: &RenderContext) -> ForgeResult<String> {
        self.tera
            .render(GALLERY_NAME, &context.to_tera()?)
            .context("failed to render gallery template")
    }
}
