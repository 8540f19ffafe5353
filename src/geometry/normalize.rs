//! Mapping SVG icons onto the font's glyph grid
//!
//! SVG user space is y-down with the origin at the top-left of the viewBox.
//! Font space is y-up with the baseline at 0. Every icon is scaled so that its
//! viewport is exactly `font_height` units tall, the viewport's top edge lands
//! on the ascender and its bottom edge on the descender.

use crate::geometry::svg::SvgIcon;
use kurbo::{Affine, BezPath, Shape};

/// Vertical metrics shared by every glyph in the font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Height of every glyph box, also used as units-per-em
    pub font_height: f64,
    /// Distance from the baseline down to the bottom of the glyph box
    pub descent: f64,
    /// Scale icons to `font_height`; otherwise SVG units are font units
    pub normalize: bool,
    /// Center each outline inside its advance width
    pub center_horizontally: bool,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            font_height: 150.0,
            descent: 0.0,
            normalize: true,
            center_horizontally: true,
        }
    }
}

impl GlyphMetrics {
    pub fn ascent(&self) -> f64 {
        self.font_height - self.descent
    }
}

/// An outline in font units, ready to be quantized
#[derive(Debug, Clone)]
pub struct NormalizedGlyph {
    pub outline: BezPath,
    pub advance_width: f64,
}

pub fn normalize(icon: &SvgIcon, metrics: &GlyphMetrics) -> NormalizedGlyph {
    let viewport = icon.viewport;
    let scale = if metrics.normalize {
        metrics.font_height / viewport.height()
    } else {
        1.0
    };

    let flip = Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, metrics.ascent()]);
    let to_font = flip * Affine::scale(scale) * Affine::translate(-viewport.origin().to_vec2());

    let mut outline = to_font * icon.outline.clone();
    let advance_width = (viewport.width() * scale).round().max(0.0);

    if metrics.center_horizontally && !outline.elements().is_empty() {
        let bounds = outline.bounding_box();
        let dx = (advance_width - bounds.width()) / 2.0 - bounds.x0;
        outline.apply_affine(Affine::translate((dx, 0.0)));
    }

    NormalizedGlyph {
        outline,
        advance_width,
    }
}
