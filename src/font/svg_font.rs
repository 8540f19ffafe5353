//! SVG 1.1 font document

use std::fmt::Write;

use crate::data::FontGlyph;
use crate::font::FontSettings;
use crate::geometry::{TtContour, TtPoint};

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn midpoint(a: TtPoint, b: TtPoint) -> (f64, f64) {
    ((a.x as f64 + b.x as f64) / 2.0, (a.y as f64 + b.y as f64) / 2.0)
}

/// Path data for one closed quadratic contour
///
/// Two consecutive off-curve points imply an on-curve point halfway between
/// them.
fn contour_path(contour: &TtContour, out: &mut String) {
    let len = contour.len();
    if len == 0 {
        return;
    }

    // walk every point once, ending back at the start
    let (first, start) = match contour.iter().position(|point| point.on_curve) {
        Some(idx) => (idx + 1, (contour[idx].x as f64, contour[idx].y as f64)),
        None => (0, midpoint(contour[len - 1], contour[0])),
    };
    let _ = write!(out, "M{} {}", start.0, start.1);

    let mut pending: Option<TtPoint> = None;
    for step in 0..len {
        let point = contour[(first + step) % len];
        match (pending, point.on_curve) {
            (None, true) => {
                let _ = write!(out, "L{} {}", point.x, point.y);
            }
            (None, false) => pending = Some(point),
            (Some(control), true) => {
                let _ = write!(out, "Q{} {} {} {}", control.x, control.y, point.x, point.y);
                pending = None;
            }
            (Some(control), false) => {
                let (x, y) = midpoint(control, point);
                let _ = write!(out, "Q{} {} {} {}", control.x, control.y, x, y);
                pending = Some(point);
            }
        }
    }
    if let Some(control) = pending {
        let _ = write!(out, "Q{} {} {} {}", control.x, control.y, start.0, start.1);
    }
    out.push('Z');
}

pub fn glyph_path(contours: &[TtContour]) -> String {
    let mut out = String::new();
    for contour in contours {
        contour_path(contour, &mut out);
    }
    out
}

/// Render the SVG font for the compiled glyphs
pub fn render_svg_font(glyphs: &[FontGlyph], settings: &FontSettings) -> String {
    let family = escape_xml(&settings.family_name);
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\n");
    out.push_str(
        "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
         \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
    );
    out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\">\n<defs>\n");
    let _ = writeln!(
        out,
        "  <font id=\"{family}\" horiz-adv-x=\"{}\">",
        settings.units_per_em
    );
    let _ = writeln!(
        out,
        "    <font-face font-family=\"{family}\" font-weight=\"400\" font-stretch=\"normal\" \
         units-per-em=\"{}\" ascent=\"{}\" descent=\"{}\" />",
        settings.units_per_em, settings.ascent, -settings.descent
    );
    let _ = writeln!(
        out,
        "    <missing-glyph horiz-adv-x=\"{}\" />",
        settings.units_per_em / 2
    );

    for glyph in glyphs {
        let _ = writeln!(
            out,
            "    <glyph glyph-name=\"{}\" unicode=\"{}\" horiz-adv-x=\"{}\" d=\"{}\" />",
            escape_xml(&glyph.record.name),
            glyph.record.html_entity(),
            glyph.advance_width,
            glyph_path(&glyph.contours)
        );
    }

    out.push_str("  </font>\n</defs>\n</svg>\n");
    out
}
