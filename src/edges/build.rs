//! Slice a piece outline into its four edges.

use kurbo::Point;

use crate::error::PieceError;
use crate::geom::{nearest_index, signed_area};

/// Reorder a closed contour so it runs counter-clockwise on screen
/// (image y axis pointing down), which keeps the piece interior on the left.
pub fn orient_ccw(mut contour: Vec<Point>) -> Vec<Point> {
    if signed_area(&contour) > 0.0 {
        contour.reverse();
    }
    contour
}

/// Split a closed, counter-clockwise contour at the four corners.
///
/// Each corner snaps to its nearest contour point. Corners are taken in
/// contour order, starting from the one nearest the image origin, so edge 0
/// runs from the top-left corner down the left side. Consecutive edges share
/// their corner point.
pub fn split_at_corners(
    contour: &[Point],
    corners: &[Point],
    piece: usize,
) -> Result<[Vec<Point>; 4], PieceError> {
    if corners.len() != 4 {
        return Err(PieceError::CornerCount { piece, found: corners.len() });
    }
    let n = contour.len();
    let mut idx = Vec::with_capacity(4);
    for &c in corners {
        let i = nearest_index(contour, c).ok_or(PieceError::NoContour { piece })?;
        idx.push(i);
    }
    idx.sort_unstable();
    idx.dedup();
    if idx.len() != 4 {
        return Err(PieceError::DegenerateCorners { piece });
    }

    let start = (0..4)
        .min_by(|&a, &b| {
            let da = contour[idx[a]].to_vec2().hypot2();
            let db = contour[idx[b]].to_vec2().hypot2();
            da.total_cmp(&db)
        })
        .unwrap_or(0);
    idx.rotate_left(start);

    let slice = |from: usize, to: usize| -> Vec<Point> {
        let len = (to + n - from) % n;
        (0..=len).map(|k| contour[(from + k) % n]).collect()
    };
    Ok([
        slice(idx[0], idx[1]),
        slice(idx[1], idx[2]),
        slice(idx[2], idx[3]),
        slice(idx[3], idx[0]),
    ])
}
