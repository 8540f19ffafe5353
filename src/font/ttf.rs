//! TrueType font assembly

use write_fonts::read::tables::glyf::CurvePoint;
use write_fonts::tables::cmap::Cmap;
use write_fonts::tables::glyf::{Contour, GlyfLocaBuilder, Glyph, SimpleGlyph};
use write_fonts::types::GlyphId;
use write_fonts::FontBuilder;

use crate::core::errors::ForgeResult;
use crate::data::FontGlyph;
use crate::font::tables::{
    build_head, build_hhea, build_hmtx, build_maxp, build_name, build_os2, build_post,
    FontStats, GlyphEntry,
};
use crate::font::FontSettings;
use crate::geometry::TtContour;

pub const NOTDEF: &str = ".notdef";

/// Build a complete TrueType font; glyph 0 is an empty `.notdef`
pub fn build_ttf(glyphs: &[FontGlyph], settings: &FontSettings) -> ForgeResult<Vec<u8>> {
    let entries = glyph_entries(glyphs, settings);
    let stats = FontStats::collect(&entries);

    let mut glyf_loca = GlyfLocaBuilder::new();
    for entry in &entries {
        glyf_loca.add_glyph(&outline_glyph(entry.contours))?;
    }
    let (glyf, loca, loca_format) = glyf_loca.build();

    let mappings = entries
        .iter()
        .enumerate()
        .filter_map(|(gid, entry)| {
            entry
                .codepoint
                .map(|codepoint| (codepoint, GlyphId::new(gid as u32)))
        });
    let cmap = Cmap::from_mappings(mappings)?;

    let mut font = FontBuilder::new();
    font.add_table(&build_head(settings, &stats, loca_format))?
        .add_table(&build_hhea(settings, &stats))?
        .add_table(&build_maxp(&stats))?
        .add_table(&build_os2(settings, &stats))?
        .add_table(&build_hmtx(&entries))?
        .add_table(&cmap)?
        .add_table(&loca)?
        .add_table(&glyf)?
        .add_table(&build_name(settings))?
        .add_table(&build_post(settings, &entries))?;
    Ok(font.build())
}

/// A glyph record for quantized contours; glyphs without outlines stay empty
fn outline_glyph(contours: &[TtContour]) -> Glyph {
    if contours.is_empty() {
        return Glyph::Empty;
    }
    let mut glyph = SimpleGlyph {
        contours: contours
            .iter()
            .map(|contour| {
                contour
                    .iter()
                    .map(|point| CurvePoint::new(point.x, point.y, point.on_curve))
                    .collect::<Vec<_>>()
                    .into()
            })
            .collect::<Vec<Contour>>(),
        ..Default::default()
    };
    glyph.recompute_bounding_box();
    Glyph::Simple(glyph)
}

fn glyph_entries<'a>(glyphs: &'a [FontGlyph], settings: &FontSettings) -> Vec<GlyphEntry<'a>> {
    let notdef = GlyphEntry {
        name: NOTDEF,
        codepoint: None,
        advance_width: settings.units_per_em / 2,
        contours: &[],
    };

    std::iter::once(notdef)
        .chain(glyphs.iter().map(|glyph| GlyphEntry {
            name: &glyph.record.name,
            codepoint: Some(glyph.record.codepoint),
            advance_width: glyph.advance_width,
            contours: &glyph.contours,
        }))
        .collect()
}
