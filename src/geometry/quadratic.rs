//! Quantizing outlines into TrueType contours
//!
//! TrueType glyphs are made of quadratic splines on an integer grid. Cubic
//! segments are approximated by runs of quadratics within a tolerance, then
//! every point is rounded to whole font units.

use kurbo::{BezPath, CubicBez, PathEl, Point};

/// Maximum distance, in font units, between a cubic and its quadratic approximation
pub const QUAD_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtPoint {
    pub x: i16,
    pub y: i16,
    pub on_curve: bool,
}

impl TtPoint {
    fn new(point: Point, on_curve: bool) -> Self {
        Self {
            x: quantize(point.x),
            y: quantize(point.y),
            on_curve,
        }
    }
}

fn quantize(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

pub type TtContour = Vec<TtPoint>;

/// Convert a font-space outline into closed TrueType contours
pub fn to_truetype_contours(path: &BezPath, tolerance: f64) -> Vec<TtContour> {
    let mut contours = Vec::new();
    let mut current = TtContour::new();
    let mut last = Point::ZERO;

    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => {
                finish_contour(&mut contours, &mut current);
                push_point(&mut current, TtPoint::new(p, true));
                last = p;
            }
            PathEl::LineTo(p) => {
                push_point(&mut current, TtPoint::new(p, true));
                last = p;
            }
            PathEl::QuadTo(control, p) => {
                push_point(&mut current, TtPoint::new(control, false));
                push_point(&mut current, TtPoint::new(p, true));
                last = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                let cubic = CubicBez::new(last, c1, c2, p);
                for (_, _, quad) in cubic.to_quads(tolerance) {
                    push_point(&mut current, TtPoint::new(quad.p1, false));
                    push_point(&mut current, TtPoint::new(quad.p2, true));
                }
                last = p;
            }
            PathEl::ClosePath => finish_contour(&mut contours, &mut current),
        }
    }
    finish_contour(&mut contours, &mut current);

    contours
}

/// Append a point, collapsing on-curve points that rounded onto their predecessor
fn push_point(contour: &mut TtContour, point: TtPoint) {
    if point.on_curve {
        if let Some(previous) = contour.last() {
            if previous.on_curve && previous.x == point.x && previous.y == point.y {
                return;
            }
        }
    }
    contour.push(point);
}

fn finish_contour(contours: &mut Vec<TtContour>, current: &mut TtContour) {
    // an explicit closing point duplicates the start point
    if current.len() > 1 && current.first() == current.last() {
        current.pop();
    }
    let contour = std::mem::take(current);
    if contour.len() >= 2 {
        contours.push(contour);
    }
}

/// Bounding box of a set of contours as (x_min, y_min, x_max, y_max)
pub fn contour_bounds(contours: &[TtContour]) -> Option<(i16, i16, i16, i16)> {
    let mut points = contours.iter().flatten();
    let first = points.next()?;
    let initial = (first.x, first.y, first.x, first.y);
    Some(points.fold(initial, |(x0, y0, x1, y1), p| {
        (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape};

    #[test]
    fn test_rectangle_becomes_four_on_curve_points() {
        let path = Rect::new(0.0, 0.0, 10.0, 20.0).to_path(0.1);
        let contours = to_truetype_contours(&path, QUAD_TOLERANCE);

        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
        assert!(contours[0].iter().all(|p| p.on_curve));
        assert_eq!(contour_bounds(&contours), Some((0, 0, 10, 20)));
    }

    #[test]
    fn test_cubics_become_alternating_quadratics() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        path.close_path();

        let contours = to_truetype_contours(&path, QUAD_TOLERANCE);
        assert_eq!(contours.len(), 1);
        let contour = &contours[0];

        assert!(contour[0].on_curve);
        assert!(contour.iter().any(|p| !p.on_curve));
        // no two off-curve points in a row: every quad gets its own on-curve end
        for pair in contour.windows(2) {
            assert!(pair[0].on_curve || pair[1].on_curve);
        }
        let last = contour.last().unwrap();
        assert_eq!((last.x, last.y, last.on_curve), (100, 0, true));
    }

    #[test]
    fn test_degenerate_points_are_collapsed() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((0.2, 0.1));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.line_to((0.0, 0.0));
        path.close_path();

        let contours = to_truetype_contours(&path, QUAD_TOLERANCE);
        assert_eq!(contours[0].len(), 3);
    }

    #[test]
    fn test_multiple_subpaths_and_empty_path() {
        let mut path = Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1);
        path.extend(Rect::new(20.0, 20.0, 30.0, 30.0).path_elements(0.1));
        assert_eq!(to_truetype_contours(&path, QUAD_TOLERANCE).len(), 2);

        assert!(to_truetype_contours(&BezPath::new(), QUAD_TOLERANCE).is_empty());
        assert_eq!(contour_bounds(&[]), None);
    }
}
