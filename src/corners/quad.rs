use geo::{Area, LineString, Polygon};
use image::{GrayImage, RgbImage};
use kurbo::Point;

use super::{candidates, Candidate, CornerLocator};
use crate::geom::angle_between;

/// Two quadrilaterals whose angle deviations differ by less than this
/// (degrees) are ranked by area instead.
const QUAD_ANGLE_TIE: f64 = 0.5;

/// Most rectangular quadrilateral with one candidate near each image corner.
#[derive(Debug, Clone)]
pub struct MaxQuad {
    /// Coarse turning-angle window, as a fraction of the contour length.
    pub window: f64,
    /// Minimum candidate sharpness, degrees.
    pub threshold: f64,
    pub per_quadrant: usize,
}

impl CornerLocator for MaxQuad {
    fn name(&self) -> &'static str {
        "max-quad"
    }

    fn find_corners(&self, mask: &GrayImage, _image: &RgbImage) -> Vec<Point> {
        let sharp: Vec<Candidate> = candidates(mask, self.window)
            .into_iter()
            .filter(|c| c.sharpness >= self.threshold)
            .collect();
        let buckets = quadrants(mask, sharp, self.per_quadrant);
        if buckets.iter().any(|b| b.is_empty()) {
            return buckets.iter().filter_map(|b| b.first().copied()).collect();
        }
        let mut best: Option<([Point; 4], f64, f64)> = None;
        for &a in &buckets[0] {
            for &b in &buckets[1] {
                for &c in &buckets[2] {
                    for &d in &buckets[3] {
                        let quad = [a, b, c, d];
                        let area = quad_area(&quad);
                        if area <= 0.0 {
                            continue;
                        }
                        let dev = angle_deviation(&quad);
                        let better = match best {
                            None => true,
                            Some((_, best_dev, best_area)) => {
                                dev < best_dev - QUAD_ANGLE_TIE
                                    || ((dev - best_dev).abs() <= QUAD_ANGLE_TIE && area > best_area)
                            }
                        };
                        if better {
                            best = Some((quad, dev, area));
                        }
                    }
                }
            }
        }
        match best {
            Some((quad, dev, area)) => {
                log::debug!("max-quad: deviation {:.1} deg, area {:.0}", dev, area);
                quad.to_vec()
            }
            None => Vec::new(),
        }
    }
}

/// Candidates grouped by nearest image corner, in screen counter-clockwise
/// order (top-left, bottom-left, bottom-right, top-right), sharpest first.
fn quadrants(mask: &GrayImage, found: Vec<Candidate>, keep: usize) -> [Vec<Point>; 4] {
    let (w, h) = mask.dimensions();
    let (w, h) = (w as f64, h as f64);
    let anchors = [
        Point::new(0.0, 0.0),
        Point::new(0.0, h),
        Point::new(w, h),
        Point::new(w, 0.0),
    ];
    let mut buckets: [Vec<Candidate>; 4] = Default::default();
    for c in found {
        let p = c.point;
        let q = (0..4)
            .min_by(|&i, &j| p.distance(anchors[i]).total_cmp(&p.distance(anchors[j])))
            .unwrap_or(0);
        buckets[q].push(c);
    }
    buckets.map(|mut b| {
        b.sort_by(|x, y| y.sharpness.total_cmp(&x.sharpness));
        b.into_iter().take(keep.max(1)).map(|c| c.point).collect()
    })
}

/// Sum over the four vertices of |interior angle - 90| in degrees.
pub(crate) fn angle_deviation(quad: &[Point; 4]) -> f64 {
    (0..4)
        .map(|i| {
            let prev = quad[(i + 3) % 4];
            let next = quad[(i + 1) % 4];
            let angle = angle_between(prev - quad[i], next - quad[i]).to_degrees();
            (angle - 90.0).abs()
        })
        .sum()
}

fn quad_area(quad: &[Point; 4]) -> f64 {
    let ring: Vec<(f64, f64)> = quad.iter().map(|p| (p.x, p.y)).collect();
    Polygon::new(LineString::from(ring), vec![]).unsigned_area()
}
