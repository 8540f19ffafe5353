//! Reading icon outlines from SVG documents
//!
//! Documents are resolved by usvg, which takes care of CSS, `use` references,
//! shapes, units and nested transforms. What comes back is a flat list of
//! paths; only filled, visible ones make it into the glyph. Strokes,
//! gradients, masks and clip paths do not survive the trip into a font.

use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape};
use thiserror::Error;
use usvg::tiny_skia_path::PathSegment;
use usvg::{FillRule, Options, Tree};

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("malformed XML: {0}")]
    Xml(usvg::roxmltree::Error),
    #[error("icon has no usable size: set a viewBox or a positive width/height")]
    MissingDimensions,
    #[error("unreadable SVG: {0}")]
    Parse(usvg::Error),
}

impl From<usvg::Error> for SvgError {
    fn from(error: usvg::Error) -> Self {
        match error {
            usvg::Error::ParsingFailed(e) => SvgError::Xml(e),
            usvg::Error::InvalidSize => SvgError::MissingDimensions,
            other => SvgError::Parse(other),
        }
    }
}

/// One icon as read from its SVG file, in viewport units
#[derive(Debug, Clone)]
pub struct SvgIcon {
    /// The area of user space that maps onto the glyph box
    pub viewport: Rect,
    /// Every filled outline, transforms applied
    pub outline: BezPath,
}

/// Parse an SVG document into an [`SvgIcon`]
///
/// The `viewBox` mapping is part of each path's absolute transform, so the
/// viewport always starts at the origin. A document without any size gets the
/// extent of its content.
pub fn parse_svg(text: &str) -> Result<SvgIcon, SvgError> {
    let tree = Tree::from_str(text, &Options::default())?;
    let size = tree.size();
    let viewport = Rect::new(0.0, 0.0, size.width() as f64, size.height() as f64);

    let mut outline = BezPath::new();
    collect_fills(tree.root(), &mut outline);
    Ok(SvgIcon { viewport, outline })
}

fn collect_fills(group: &usvg::Group, outline: &mut BezPath) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => collect_fills(g, outline),
            usvg::Node::Path(p) => {
                if !p.is_visible() {
                    continue;
                }
                let Some(fill) = p.fill() else {
                    continue;
                };
                let mut path = to_bez_path(p.data());
                path.apply_affine(to_affine(p.abs_transform()));
                if fill.rule() == FillRule::EvenOdd {
                    path = even_odd_as_nonzero(&path);
                }
                outline.extend(path.elements().iter().copied());
            }
            // text needs a font database, images have no outline
            usvg::Node::Image(_) | usvg::Node::Text(_) => {}
        }
    }
}

fn to_bez_path(data: &usvg::tiny_skia_path::Path) -> BezPath {
    let pt = |p: usvg::tiny_skia_path::Point| Point::new(p.x as f64, p.y as f64);
    let mut path = BezPath::new();
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => path.move_to(pt(p)),
            PathSegment::LineTo(p) => path.line_to(pt(p)),
            PathSegment::QuadTo(c, e) => path.quad_to(pt(c), pt(e)),
            PathSegment::CubicTo(c1, c2, e) => path.curve_to(pt(c1), pt(c2), pt(e)),
            PathSegment::Close => path.close_path(),
        }
    }
    path
}

fn to_affine(t: usvg::Transform) -> Affine {
    Affine::new([
        t.sx as f64,
        t.ky as f64,
        t.kx as f64,
        t.sy as f64,
        t.tx as f64,
        t.ty as f64,
    ])
}

/// Reorient subpaths so the nonzero rule paints what even-odd would
///
/// A subpath nested inside an odd number of others is a hole and must run
/// against the outermost contours. Crossing subpaths are left as they are.
fn even_odd_as_nonzero(path: &BezPath) -> BezPath {
    let subpaths = split_subpaths(path);
    if subpaths.len() < 2 {
        return path.clone();
    }

    let mut result = BezPath::new();
    for (idx, subpath) in subpaths.iter().enumerate() {
        let Some(PathEl::MoveTo(start)) = subpath.elements().first().copied() else {
            continue;
        };
        let depth = subpaths
            .iter()
            .enumerate()
            .filter(|(other, candidate)| *other != idx && candidate.winding(start) != 0)
            .count();
        let is_hole = depth % 2 == 1;
        let runs_backwards = subpath.area() < 0.0;
        let reoriented = if is_hole != runs_backwards {
            subpath.reverse_subpaths()
        } else {
            subpath.clone()
        };
        result.extend(reoriented.elements().iter().copied());
    }
    result
}

fn split_subpaths(path: &BezPath) -> Vec<BezPath> {
    let mut subpaths: Vec<BezPath> = Vec::new();
    for el in path.elements() {
        match subpaths.last_mut() {
            Some(current) if !matches!(el, PathEl::MoveTo(_)) => current.push(*el),
            _ => subpaths.push(BezPath::from_vec(vec![*el])),
        }
    }
    subpaths
}
