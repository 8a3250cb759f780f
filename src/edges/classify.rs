//! Edge shape classification on normalized contours.

use kurbo::Point;

use super::EdgeKind;
use crate::geom::{arc_length, chord_length};

/// An edge whose arc length stays below this multiple of its endpoint
/// distance is flat.
pub const LINE_RATIO: f64 = 1.3;

/// Classify a normalized contour as flat, protruding or indented.
///
/// Bulbs bulge to the exterior, which normalization puts on the negative x
/// side; holes dip into the piece on the positive x side.
pub fn classify(normalized: &[Point]) -> EdgeKind {
    if arc_length(normalized) < LINE_RATIO * chord_length(normalized) {
        return EdgeKind::Line;
    }
    let (min_x, max_x) = normalized
        .iter()
        .fold((0.0f64, 0.0f64), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    if min_x.abs() > max_x.abs() {
        EdgeKind::Bulb
    } else {
        EdgeKind::Hole
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(depth: f64) -> Vec<Point> {
        // Flat shoulders, then a tab of `depth` toward +x (or -x if negative).
        let mut pts = Vec::new();
        for i in 0..=10 {
            pts.push(Point::new(0.0, i as f64 * 3.0));
        }
        for i in 0..=10 {
            pts.push(Point::new(depth * (i as f64 / 10.0), 30.0));
        }
        for i in 0..=10 {
            pts.push(Point::new(depth, 30.0 + i as f64 * 3.0));
        }
        for i in 0..=10 {
            pts.push(Point::new(depth * (1.0 - i as f64 / 10.0), 60.0));
        }
        for i in 1..=10 {
            pts.push(Point::new(0.0, 60.0 + i as f64 * 3.0));
        }
        pts
    }

    #[test]
    fn straight_edge_is_line() {
        let pts: Vec<Point> = (0..50).map(|i| Point::new((i % 2) as f64 * 0.5, i as f64)).collect();
        assert_eq!(classify(&pts), EdgeKind::Line);
    }

    #[test]
    fn outward_tab_is_bulb() {
        assert_eq!(classify(&bump(-30.0)), EdgeKind::Bulb);
    }

    #[test]
    fn inward_tab_is_hole() {
        assert_eq!(classify(&bump(30.0)), EdgeKind::Hole);
    }

    #[test]
    fn classification_is_pure() {
        let pts = bump(-25.0);
        let first = classify(&pts);
        for _ in 0..5 {
            assert_eq!(classify(&pts), first);
        }
    }
}
