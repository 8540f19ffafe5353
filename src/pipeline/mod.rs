//! The icon font pipeline
//!
//! `generate` is the whole build as one explicit composition of steps:
//! discover sources, load and normalize outlines, assign codepoints, compile
//! the font, write every requested container, then render the stylesheet and
//! the gallery concurrently from the finished glyph manifest.

pub mod hinting;
pub mod sources;
pub mod watch;

use crate::core::config_file::PipelineConfig;
use crate::core::errors::{error_chain, FileContext, ForgeResult};
use crate::data::ufo::save_ufo;
use crate::data::{assign_codepoints, FontGlyph, GlyphManifest, GlyphRecord, IconSource};
use crate::font::{CompiledFont, FontFormat, FontSettings};
use crate::geometry::{normalize, parse_svg, to_truetype_contours, GlyphMetrics, QUAD_TOLERANCE};
use crate::render::{compile_stylesheet, RenderContext, Templates};
use anyhow::Context;
use hinting::Autohinter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{debug, info, warn};

pub use watch::watch;

/// Result of the best-effort SCSS compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssStatus {
    Compiled(PathBuf),
    Failed(String),
}

/// What one run produced
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub manifest: Arc<GlyphManifest>,
    pub fonts: Vec<(FontFormat, PathBuf)>,
    pub stylesheet: PathBuf,
    pub css: CssStatus,
    pub gallery: PathBuf,
    pub ufo: Option<PathBuf>,
    pub elapsed: Duration,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        let formats: Vec<&str> = self
            .fonts
            .iter()
            .map(|(format, _)| format.extension())
            .collect();
        let css = match &self.css {
            CssStatus::Compiled(_) => "css compiled",
            CssStatus::Failed(_) => "css FAILED",
        };
        format!(
            "Generated {} glyphs ({}, {}) in {:.0?}",
            self.manifest.len(),
            formats.join(", "),
            css,
            self.elapsed
        )
    }
}

/// Run the full pipeline once
pub async fn generate(config: &PipelineConfig) -> ForgeResult<GenerationReport> {
    let started = Instant::now();
    config.validate()?;

    // parse templates up front so a broken template fails before any output
    let templates = Templates::load(config)?;

    let paths = sources::discover(&config.source_pattern)?;
    if paths.is_empty() {
        warn!(
            "No SVG files match '{}'; writing a font with no icons",
            config.source_pattern
        );
    } else {
        info!("Found {} icons matching '{}'", paths.len(), config.source_pattern);
    }

    let icons = paths
        .iter()
        .map(|path| IconSource::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;
    let records = assign_codepoints(&icons, config.start_codepoint)?;
    let glyphs = load_glyphs(&records, &config.metrics).await?;
    let manifest = Arc::new(GlyphManifest::new(records));
    for record in manifest.records() {
        debug!(
            "Glyph {} -> U+{} ({})",
            record.name,
            record.hex(),
            record.source.display()
        );
    }

    let settings = FontSettings::from_config(config);
    let mut font = CompiledFont::compile(&glyphs, settings)?;
    if config.autohint {
        font.ttf = Autohinter::default().hint_or_keep(font.ttf).await;
    }

    fs::create_dir_all(&config.output_dir)
        .await
        .with_file_context("create output directory", &config.output_dir)?;

    let mut fonts = Vec::with_capacity(config.formats.len());
    for &format in &config.formats {
        let bytes = font
            .encode(format, &glyphs)
            .with_context(|| format!("failed to encode {format} font"))?;
        let path = config.font_file(format);
        write_artifact(&path, bytes).await?;
        fonts.push((format, path));
    }

    let ufo = if config.export_ufo {
        let path = config.ufo_dir();
        let settings = font.settings.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || save_ufo(&glyphs, &settings, &target))
            .await
            .context("UFO export task panicked")??;
        info!("Wrote {}", path.display());
        Some(path)
    } else {
        None
    };

    let context = RenderContext::new(config, &manifest);
    let (stylesheet, gallery) = tokio::join!(
        stylesheet_branch(config, &templates, &context),
        gallery_branch(config, &templates, &context),
    );
    let (stylesheet, css) = stylesheet?;
    let gallery = gallery?;

    Ok(GenerationReport {
        manifest,
        fonts,
        stylesheet,
        css,
        gallery,
        ufo,
        elapsed: started.elapsed(),
    })
}

/// Read, parse and quantize every source in manifest order
async fn load_glyphs(records: &[GlyphRecord], metrics: &GlyphMetrics) -> ForgeResult<Vec<FontGlyph>> {
    let mut glyphs = Vec::with_capacity(records.len());
    for record in records {
        let text = fs::read_to_string(&record.source)
            .await
            .with_file_context("read", &record.source)?;
        let icon = parse_svg(&text).with_file_context("parse", &record.source)?;
        let normalized = normalize(&icon, metrics);
        let contours = to_truetype_contours(&normalized.outline, QUAD_TOLERANCE);
        debug!(
            "Loaded {}: {} contours, advance {}",
            record.name,
            contours.len(),
            normalized.advance_width
        );

        glyphs.push(FontGlyph {
            record: record.clone(),
            outline: normalized.outline,
            contours,
            advance_width: normalized.advance_width.clamp(0.0, u16::MAX as f64) as u16,
        });
    }
    Ok(glyphs)
}

async fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> ForgeResult<()> {
    fs::write(path, contents)
        .await
        .with_file_context("write", path)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Render the SCSS partial, then compile it; compilation failures are reported, not raised
async fn stylesheet_branch(
    config: &PipelineConfig,
    templates: &Templates,
    context: &RenderContext,
) -> ForgeResult<(PathBuf, CssStatus)> {
    let scss = templates.render_stylesheet(context)?;
    let scss_path = config.stylesheet_file();
    write_artifact(&scss_path, scss).await?;

    let source = scss_path.clone();
    let compiled = tokio::task::spawn_blocking(move || compile_stylesheet(&source))
        .await
        .context("stylesheet compilation task panicked")?;

    let css = match compiled {
        Ok(css) => {
            let css_path = config.css_file();
            write_artifact(&css_path, css).await?;
            CssStatus::Compiled(css_path)
        }
        Err(e) => {
            let message = error_chain(&e);
            warn!("Stylesheet compilation failed, continuing: {}", message);
            CssStatus::Failed(message)
        }
    };
    Ok((scss_path, css))
}

async fn gallery_branch(
    config: &PipelineConfig,
    templates: &Templates,
    context: &RenderContext,
) -> ForgeResult<PathBuf> {
    let html = templates.render_gallery(context)?;
    let path = config.gallery_file();
    write_artifact(&path, html).await?;
    Ok(path)
}
