//! Metric and naming tables: `head`, `hhea`, `maxp`, `OS/2`, `hmtx`, `name`, `post`

use write_fonts::tables::head::{Flags, Head};
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::maxp::Maxp;
use write_fonts::tables::name::{Name, NameRecord};
use write_fonts::tables::os2::{Os2, SelectionFlags};
use write_fonts::tables::post::Post;
use write_fonts::types::{FWord, Fixed, LongDateTime, NameId, Tag, UfWord};

use crate::font::FontSettings;
use crate::geometry::quadratic::{contour_bounds, TtContour};

/// Seconds between 1904-01-01 (the sfnt epoch) and 1970-01-01
const SFNT_EPOCH_OFFSET: i64 = 2_082_844_800;
/// Windows, Unicode BMP, US English
const WINDOWS_NAME_RECORD: (u16, u16, u16) = (3, 1, 0x0409);
/// Macintosh, Roman, English
const MAC_NAME_RECORD: (u16, u16, u16) = (1, 0, 0);
const MAX_GLYPH_NAME_LEN: usize = 63;

/// A glyph as the metric tables see it
#[derive(Debug, Clone, Copy)]
pub struct GlyphEntry<'a> {
    pub name: &'a str,
    pub codepoint: Option<char>,
    pub advance_width: u16,
    pub contours: &'a [TtContour],
}

impl GlyphEntry<'_> {
    fn bounds(&self) -> Option<(i16, i16, i16, i16)> {
        contour_bounds(self.contours)
    }

    fn left_side_bearing(&self) -> i16 {
        self.bounds().map(|(x_min, ..)| x_min).unwrap_or(0)
    }
}

/// Font-wide numbers derived from all glyphs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontStats {
    pub num_glyphs: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub max_points: u16,
    pub max_contours: u16,
    pub avg_char_width: i16,
    pub first_char: u16,
    pub last_char: u16,
    pub unicode_ranges: [u32; 4],
}

impl FontStats {
    pub fn collect(glyphs: &[GlyphEntry]) -> Self {
        let mut stats = FontStats {
            num_glyphs: glyphs.len() as u16,
            ..FontStats::default()
        };

        let mut bounds_seen = false;
        for glyph in glyphs {
            stats.advance_width_max = stats.advance_width_max.max(glyph.advance_width);
            stats.max_contours = stats.max_contours.max(glyph.contours.len() as u16);
            let points: usize = glyph.contours.iter().map(Vec::len).sum();
            stats.max_points = stats.max_points.max(points as u16);

            let Some((x_min, y_min, x_max, y_max)) = glyph.bounds() else {
                continue;
            };
            let right_side_bearing = glyph.advance_width as i32 - x_max as i32;
            if bounds_seen {
                stats.x_min = stats.x_min.min(x_min);
                stats.y_min = stats.y_min.min(y_min);
                stats.x_max = stats.x_max.max(x_max);
                stats.y_max = stats.y_max.max(y_max);
                stats.min_left_side_bearing = stats.min_left_side_bearing.min(x_min);
                stats.min_right_side_bearing =
                    stats.min_right_side_bearing.min(clamp_i16(right_side_bearing));
                stats.x_max_extent = stats.x_max_extent.max(x_max);
            } else {
                bounds_seen = true;
                stats.x_min = x_min;
                stats.y_min = y_min;
                stats.x_max = x_max;
                stats.y_max = y_max;
                stats.min_left_side_bearing = x_min;
                stats.min_right_side_bearing = clamp_i16(right_side_bearing);
                stats.x_max_extent = x_max;
            }
        }

        let widths: Vec<u32> = glyphs
            .iter()
            .map(|glyph| glyph.advance_width as u32)
            .filter(|width| *width > 0)
            .collect();
        if !widths.is_empty() {
            stats.avg_char_width = (widths.iter().sum::<u32>() / widths.len() as u32) as i16;
        }

        let codepoints: Vec<u32> = glyphs
            .iter()
            .filter_map(|glyph| glyph.codepoint)
            .map(|codepoint| codepoint as u32)
            .collect();
        if let (Some(first), Some(last)) = (codepoints.iter().min(), codepoints.iter().max()) {
            stats.first_char = (*first).min(0xFFFF) as u16;
            stats.last_char = (*last).min(0xFFFF) as u16;
        }
        for codepoint in codepoints {
            if (0xE000..=0xF8FF).contains(&codepoint) {
                // bit 60: Private Use Area
                stats.unicode_ranges[1] |= 1 << 28;
            } else if codepoint > 0xFFFF {
                // bit 57: non-plane 0
                stats.unicode_ranges[1] |= 1 << 25;
            }
        }

        stats
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

fn scaled(settings: &FontSettings, ratio: f64) -> i16 {
    (settings.units_per_em as f64 * ratio).round() as i16
}

pub fn build_head(settings: &FontSettings, stats: &FontStats, loca_format: LocaFormat) -> Head {
    let revision = settings.version_major as f64 + settings.version_minor as f64 / 1000.0;
    let sfnt_time = LongDateTime::new(settings.timestamp + SFNT_EPOCH_OFFSET);

    Head {
        font_revision: Fixed::from_f64(revision),
        flags: Flags::BASELINE_AT_Y_0 | Flags::LSB_AT_X_0 | Flags::FORCE_INTEGER_PPEM,
        units_per_em: settings.units_per_em,
        created: sfnt_time,
        modified: sfnt_time,
        x_min: stats.x_min,
        y_min: stats.y_min,
        x_max: stats.x_max,
        y_max: stats.y_max,
        lowest_rec_ppem: 8,
        index_to_loc_format: loca_format as i16,
        ..Default::default()
    }
}

pub fn build_hhea(settings: &FontSettings, stats: &FontStats) -> Hhea {
    Hhea {
        ascender: FWord::new(settings.ascent),
        descender: FWord::new(-settings.descent),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(stats.advance_width_max),
        min_left_side_bearing: FWord::new(stats.min_left_side_bearing),
        min_right_side_bearing: FWord::new(stats.min_right_side_bearing),
        x_max_extent: FWord::new(stats.x_max_extent),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: stats.num_glyphs,
    }
}

/// `maxp` version 1.0, as TrueType outlines require
pub fn build_maxp(stats: &FontStats) -> Maxp {
    Maxp {
        num_glyphs: stats.num_glyphs,
        max_points: Some(stats.max_points),
        max_contours: Some(stats.max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(2),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    }
}

/// `OS/2` version 4
pub fn build_os2(settings: &FontSettings, stats: &FontStats) -> Os2 {
    let win_ascent = settings.ascent.max(stats.y_max).max(0) as u16;
    let win_descent = settings.descent.max(-stats.y_min).max(0) as u16;

    Os2 {
        x_avg_char_width: stats.avg_char_width,
        // fsType 0: installable embedding
        fs_type: 0,
        y_subscript_x_size: scaled(settings, 0.65),
        y_subscript_y_size: scaled(settings, 0.6),
        y_subscript_y_offset: scaled(settings, 0.075),
        y_superscript_x_size: scaled(settings, 0.65),
        y_superscript_y_size: scaled(settings, 0.6),
        y_superscript_y_offset: scaled(settings, 0.35),
        y_strikeout_size: scaled(settings, 0.05),
        y_strikeout_position: scaled(settings, 0.26),
        ul_unicode_range_1: stats.unicode_ranges[0],
        ul_unicode_range_2: stats.unicode_ranges[1],
        ul_unicode_range_3: stats.unicode_ranges[2],
        ul_unicode_range_4: stats.unicode_ranges[3],
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: stats.first_char,
        us_last_char_index: stats.last_char,
        s_typo_ascender: settings.ascent,
        s_typo_descender: -settings.descent,
        s_typo_line_gap: 0,
        us_win_ascent: win_ascent,
        us_win_descent: win_descent,
        // Latin 1
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(0),
        s_cap_height: Some(0),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        ..Default::default()
    }
}

pub fn build_hmtx(glyphs: &[GlyphEntry]) -> Hmtx {
    let h_metrics = glyphs
        .iter()
        .map(|glyph| LongMetric {
            advance: glyph.advance_width,
            side_bearing: glyph.left_side_bearing(),
        })
        .collect();
    Hmtx {
        h_metrics,
        left_side_bearings: Vec::new(),
    }
}

/// `name` table with Macintosh and Windows records, sorted by platform
pub fn build_name(settings: &FontSettings) -> Name {
    let names = [
        (NameId::FAMILY_NAME, settings.family_name.clone()),
        (NameId::SUBFAMILY_NAME, settings.style_name.clone()),
        (NameId::UNIQUE_ID, settings.unique_id()),
        (NameId::FULL_NAME, settings.full_name()),
        (NameId::VERSION_STRING, settings.version_string()),
        (NameId::POSTSCRIPT_NAME, settings.postscript_name()),
    ];

    let record = |(platform, encoding, language): (u16, u16, u16), id: NameId, value: &str| {
        NameRecord::new(platform, encoding, language, id, value.to_string().into())
    };

    // Macintosh Roman only carries names it can encode
    let mac = names
        .iter()
        .filter(|(_, value)| value.is_ascii())
        .map(|(id, value)| record(MAC_NAME_RECORD, *id, value));
    let windows = names
        .iter()
        .map(|(id, value)| record(WINDOWS_NAME_RECORD, *id, value));

    Name::new(mac.chain(windows).collect())
}

/// Restrict a glyph name to characters PostScript tools accept
pub fn postscript_glyph_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    sanitized.truncate(MAX_GLYPH_NAME_LEN);
    sanitized
}

/// `post` version 2 carrying glyph names; glyph 0 must be `.notdef`
pub fn build_post(settings: &FontSettings, glyphs: &[GlyphEntry]) -> Post {
    let names: Vec<String> = glyphs
        .iter()
        .map(|glyph| postscript_glyph_name(glyph.name))
        .collect();
    Post {
        underline_position: FWord::new(-scaled(settings, 0.1)),
        underline_thickness: FWord::new(scaled(settings, 0.05)),
        ..Post::new_v2(names.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TtPoint;

    fn settings() -> FontSettings {
        FontSettings {
            family_name: "demo-icons".to_string(),
            style_name: "Regular".to_string(),
            version_major: 1,
            version_minor: 0,
            units_per_em: 150,
            ascent: 150,
            descent: 0,
            timestamp: 0,
        }
    }

    fn square(x0: i16, x1: i16) -> Vec<TtContour> {
        let on = |x, y| TtPoint {
            x,
            y,
            on_curve: true,
        };
        vec![vec![on(x0, 0), on(x1, 0), on(x1, 100), on(x0, 100)]]
    }

    fn notdef() -> GlyphEntry<'static> {
        GlyphEntry {
            name: ".notdef",
            codepoint: None,
            advance_width: 75,
            contours: &[],
        }
    }

    #[test]
    fn test_stats() {
        let a = square(10, 90);
        let b = square(-5, 120);
        let glyphs = [
            notdef(),
            GlyphEntry {
                name: "a",
                codepoint: Some('\u{EA01}'),
                advance_width: 100,
                contours: &a,
            },
            GlyphEntry {
                name: "b",
                codepoint: Some('\u{EA02}'),
                advance_width: 150,
                contours: &b,
            },
        ];

        let stats = FontStats::collect(&glyphs);
        assert_eq!(stats.num_glyphs, 3);
        assert_eq!((stats.x_min, stats.x_max), (-5, 120));
        assert_eq!(stats.advance_width_max, 150);
        assert_eq!(stats.min_left_side_bearing, -5);
        assert_eq!(stats.min_right_side_bearing, 10);
        assert_eq!(stats.max_points, 4);
        assert_eq!(stats.max_contours, 1);
        assert_eq!(stats.avg_char_width, 108);
        assert_eq!((stats.first_char, stats.last_char), (0xEA01, 0xEA02));
        assert_eq!(stats.unicode_ranges[1], 1 << 28);
    }

    #[test]
    fn test_fixed_table_sizes() {
        let stats = FontStats::default();
        let head = build_head(&settings(), &stats, LocaFormat::Long);
        assert_eq!(write_fonts::dump_table(&head).unwrap().len(), 54);
        let hhea = write_fonts::dump_table(&build_hhea(&settings(), &stats)).unwrap();
        assert_eq!(hhea.len(), 36);
        assert_eq!(write_fonts::dump_table(&build_maxp(&stats)).unwrap().len(), 32);
        let os2 = write_fonts::dump_table(&build_os2(&settings(), &stats)).unwrap();
        assert_eq!(os2.len(), 96);
        assert_eq!(u16::from_be_bytes([os2[0], os2[1]]), 4);
    }

    #[test]
    fn test_head_dates_use_sfnt_epoch() {
        let head = build_head(&settings(), &FontStats::default(), LocaFormat::Short);
        assert_eq!(head.created.as_secs(), SFNT_EPOCH_OFFSET);
        assert_eq!(head.index_to_loc_format, 0);
    }

    #[test]
    fn test_postscript_glyph_names() {
        assert_eq!(postscript_glyph_name("arrow-left"), "arrow-left");
        assert_eq!(postscript_glyph_name("café au lait"), "caf__au_lait");
        assert_eq!(postscript_glyph_name(&"x".repeat(100)).len(), 63);
    }

    #[test]
    fn test_name_table_has_both_platforms() {
        let name = build_name(&settings());
        assert_eq!(name.name_record.len(), 12);
        assert_eq!(name.name_record[0].platform_id, 1);
        assert_eq!(name.name_record[11].platform_id, 3);
        assert_eq!(name.name_record[11].name_id, NameId::POSTSCRIPT_NAME);
    }

    #[test]
    fn test_post_names_every_glyph() {
        let glyphs = [
            notdef(),
            GlyphEntry {
                name: "arrow left",
                codepoint: Some('\u{EA01}'),
                advance_width: 150,
                contours: &[],
            },
        ];
        let post = build_post(&settings(), &glyphs);
        assert_eq!(post.num_glyphs, Some(2));
        let names = post.string_data.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0], "arrow_left");
    }
}
