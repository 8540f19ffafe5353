//! UFO format conversion utilities
//!
//! Conversion from the quantized glyphs the font writers use into norad's UFO
//! data model. This is pure data transformation, no I/O.

use crate::data::manifest::FontGlyph;
use crate::font::FontSettings;
use crate::geometry::{TtContour, TtPoint};
use norad::Font;

/// Point role in a UFO contour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointTypeData {
    Line,
    OffCurve,
    QCurve,
}

impl PointTypeData {
    pub fn to_norad_point_type(self) -> norad::PointType {
        match self {
            PointTypeData::Line => norad::PointType::Line,
            PointTypeData::OffCurve => norad::PointType::OffCurve,
            PointTypeData::QCurve => norad::PointType::QCurve,
        }
    }
}

/// Classify every point of a closed TrueType contour
///
/// An on-curve point reached through an off-curve point ends a quadratic
/// segment. The check wraps around, so the first point looks at the last one.
pub fn point_types(contour: &TtContour) -> Vec<PointTypeData> {
    let len = contour.len();
    (0..len)
        .map(|idx| {
            let point = contour[idx];
            let previous = contour[(idx + len - 1) % len];
            match (point.on_curve, previous.on_curve) {
                (false, _) => PointTypeData::OffCurve,
                (true, false) => PointTypeData::QCurve,
                (true, true) => PointTypeData::Line,
            }
        })
        .collect()
}

pub fn to_norad_point(point: TtPoint, point_type: PointTypeData) -> norad::ContourPoint {
    norad::ContourPoint::new(
        point.x as f64,
        point.y as f64,
        point_type.to_norad_point_type(),
        false, // smooth
        None,  // name
        None,  // identifier
    )
}

pub fn to_norad_contour(contour: &TtContour) -> norad::Contour {
    let points = contour
        .iter()
        .zip(point_types(contour))
        .map(|(point, point_type)| to_norad_point(*point, point_type))
        .collect();

    norad::Contour::new(points, None)
}

impl FontGlyph {
    /// Convert to a norad glyph
    pub fn to_norad_glyph(&self) -> norad::Glyph {
        let mut glyph = norad::Glyph::new(&self.record.name);
        glyph.width = self.advance_width as f64;
        glyph.codepoints.insert(self.record.codepoint);
        glyph.contours = self.contours.iter().map(to_norad_contour).collect();
        glyph
    }
}

impl FontSettings {
    /// Convert to norad FontInfo
    pub fn to_norad_font_info(&self) -> norad::FontInfo {
        let mut info = norad::FontInfo::default();

        info.family_name = Some(self.family_name.clone());
        info.style_name = Some(self.style_name.clone());
        info.version_major = Some(self.version_major as i32);
        info.version_minor = Some(self.version_minor as u32);

        if let Some(units_per_em) =
            norad::fontinfo::NonNegativeIntegerOrFloat::new(self.units_per_em as f64)
        {
            info.units_per_em = Some(units_per_em);
        }
        info.ascender = Some(self.ascent as f64);
        info.descender = Some(-(self.descent as f64));
        info
    }
}

/// Build a complete norad Font from compiled glyphs
pub fn to_norad_font(glyphs: &[FontGlyph], settings: &FontSettings) -> Font {
    let mut font = Font::new();
    font.font_info = settings.to_norad_font_info();

    let layer = font.default_layer_mut();
    for glyph in glyphs {
        layer.insert_glyph(glyph.to_norad_glyph());
    }

    font
}
