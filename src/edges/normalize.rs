//! Pose normalization of edge contours.
//!
//! A normalized edge starts at the origin and ends on the positive y axis,
//! so two edges can be compared by shape alone.

use kurbo::{Affine, Point};

/// Translate `points` so the first point is (0,0), then rotate about the
/// origin so the last point lies on the positive y axis.
///
/// The first output point is exactly (0,0). A contour whose endpoints
/// coincide is only translated.
pub fn normalize(points: &[Point]) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let d = last - first;
    // Angle from +y toward +x: arccos(dy/|d|), negative when dx < 0.
    let theta = if d.hypot2() > 0.0 { d.x.atan2(d.y) } else { 0.0 };
    let transform = Affine::rotate(theta) * Affine::translate(-first.to_vec2());
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| if i == 0 { Point::ZERO } else { transform * p })
        .collect()
}

/// Normalization of the contour walked backwards.
pub fn reverse_normalize(points: &[Point]) -> Vec<Point> {
    let reversed: Vec<Point> = points.iter().rev().copied().collect();
    normalize(&reversed)
}
