//! Geometry: from SVG documents to TrueType contours
//!
//! - `svg` reads outlines and viewports out of icon files
//! - `normalize` maps icons onto the shared glyph grid
//! - `quadratic` quantizes outlines into TrueType contours

pub mod normalize;
pub mod quadratic;
pub mod svg;

pub use normalize::{normalize, GlyphMetrics, NormalizedGlyph};
pub use quadratic::{to_truetype_contours, TtContour, TtPoint, QUAD_TOLERANCE};
pub use svg::{parse_svg, SvgError, SvgIcon};
