use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use kurbo::Point;

use crate::edges::build::orient_ccw;
use crate::geom::signed_area;

/// Outline of the largest foreground blob in a mask, walked
/// counter-clockwise on screen. `None` if the mask is empty.
pub fn largest_outer(mask: &GrayImage) -> Option<Vec<Point>> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.points.len() >= 3)
        .map(|c| {
            c.points
                .iter()
                .map(|p| Point::new(p.x as f64, p.y as f64))
                .collect::<Vec<_>>()
        })
        .max_by(|a, b| signed_area(a).abs().total_cmp(&signed_area(b).abs()))
        .map(orient_ccw)
}
