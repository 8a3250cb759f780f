//! Corner location strategies.
//!
//! Every strategy consumes the same piece mask and returns the piece's four
//! corners in mask coordinates. A strategy that cannot settle on exactly four
//! returns whatever it has; the caller treats that as a per-piece failure.

mod features;
mod polar;
mod quad;

pub use features::FeatureSearch;
pub use polar::PolarPeaks;
pub use quad::MaxQuad;

use image::{GrayImage, RgbImage};
use kurbo::{Point, Vec2};

use crate::config::{CornerMethod, SolverConfig};
use crate::contour::largest_outer;

pub trait CornerLocator: Send + Sync {
    fn name(&self) -> &'static str;

    fn find_corners(&self, mask: &GrayImage, image: &RgbImage) -> Vec<Point>;
}

/// Build the locator selected in the configuration.
pub fn locator(config: &SolverConfig) -> Box<dyn CornerLocator> {
    match config.corners {
        CornerMethod::Features => Box::new(FeatureSearch {
            window: config.corner_window,
            min_spacing: config.min_corner_spacing,
        }),
        CornerMethod::MaxQuad => Box::new(MaxQuad {
            window: config.corner_window,
            threshold: config.quad_candidate_threshold,
            per_quadrant: config.quad_candidates_per_quadrant,
        }),
        CornerMethod::Polar => Box::new(PolarPeaks {
            window: config.polar_peak_window,
            prominence: config.polar_peak_prominence,
        }),
    }
}

/// A convex outline point and how sharply the outline turns there.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    point: Point,
    /// Degrees.
    sharpness: f64,
}

/// Corner candidates along the piece outline.
///
/// Sharpness is the turning angle measured over a coarse window
/// (`window` × contour length) and a fine one (a third of that), whichever
/// is smaller. A square corner turns about 90° at both scales, a tab tip
/// only at the coarse one and a tab neck only at the fine one. Concave
/// points never qualify, and only local maxima within the fine window are
/// kept.
fn candidates(mask: &GrayImage, window: f64) -> Vec<Candidate> {
    let Some(contour) = largest_outer(mask) else {
        return Vec::new();
    };
    let n = contour.len();
    if n < 6 {
        return Vec::new();
    }
    let coarse = ((window * n as f64) as usize).min(n / 3).max(1);
    let fine = (coarse / 3).max(1);
    let sharpness: Vec<f64> = (0..n)
        .map(|i| turning(&contour, i, fine).min(turning(&contour, i, coarse)))
        .collect();

    let mut found = Vec::new();
    for i in 0..n {
        let s = sharpness[i];
        if s <= 0.0 {
            continue;
        }
        // Plateaus report their first point only.
        let is_max = (1..=fine).all(|k| sharpness[(i + n - k) % n] < s && sharpness[(i + k) % n] <= s);
        if is_max {
            found.push(Candidate {
                point: contour[i],
                sharpness: s,
            });
        }
    }
    log::debug!("{} corner candidates (windows {}/{})", found.len(), fine, coarse);
    found
}

/// Signed turn (degrees) of a counter-clockwise outline at point `i`, seen
/// through neighbors `w` steps away. Positive where the outline is convex.
fn turning(contour: &[Point], i: usize, w: usize) -> f64 {
    let n = contour.len();
    let p = contour[i];
    let v_in: Vec2 = p - contour[(i + n - w) % n];
    let v_out: Vec2 = contour[(i + w) % n] - p;
    // Screen y points down, so a convex turn has a negative cross product.
    -v_in.cross(v_out).atan2(v_in.dot(v_out)).to_degrees()
}

/// Keep the sharpest candidates that are at least `spacing` apart.
fn spaced(mut found: Vec<Candidate>, spacing: f64) -> Vec<Point> {
    found.sort_by(|a, b| b.sharpness.total_cmp(&a.sharpness));
    let mut kept: Vec<Point> = Vec::new();
    for c in found {
        if kept.iter().all(|k| k.distance(c.point) >= spacing) {
            kept.push(c.point);
        }
    }
    kept
}

fn diagonal(mask: &GrayImage) -> f64 {
    let (w, h) = mask.dimensions();
    (w as f64).hypot(h as f64)
}


#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use test_masks::square_with_tab;

    fn candidate(x: f64, y: f64, sharpness: f64) -> Candidate {
        Candidate {
            point: Point::new(x, y),
            sharpness,
        }
    }

    fn plain_square() -> GrayImage {
        GrayImage::from_fn(100, 100, |x, y| {
            let inside = (20..80).contains(&x) && (20..80).contains(&y);
            Luma([if inside { 255 } else { 0 }])
        })
    }

    #[test]
    fn spacing_keeps_the_sharpest() {
        let found = vec![
            candidate(0.0, 0.0, 10.0),
            candidate(1.0, 1.0, 50.0),
            candidate(20.0, 20.0, 20.0),
        ];
        let kept = spaced(found, 5.0);
        assert_eq!(kept, vec![Point::new(1.0, 1.0), Point::new(20.0, 20.0)]);
    }

    #[test]
    fn every_corner_of_a_square_is_a_candidate() {
        let found = candidates(&plain_square(), 0.06);
        let mut points: Vec<(f64, f64)> = found.iter().map(|c| (c.point.x, c.point.y)).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        assert_eq!(points, vec![(20.0, 20.0), (20.0, 79.0), (79.0, 20.0), (79.0, 79.0)]);
        for c in &found {
            assert!((c.sharpness - 90.0).abs() < 1e-6, "{:?}", c);
        }
    }

    #[test]
    fn tab_tip_is_duller_than_the_corners() {
        let mut found = candidates(&square_with_tab(60, 20), 0.06);
        found.sort_by(|a, b| b.sharpness.total_cmp(&a.sharpness));
        assert!(found.len() >= 4);
        for c in &found[..4] {
            assert!(c.point.x <= 79.0, "tab point ranked as a corner: {:?}", c);
            assert!(c.sharpness > 85.0);
        }
        for c in &found[4..] {
            assert!(c.sharpness < 70.0, "{:?}", c);
        }
    }

    #[test]
    fn factory_honours_the_config() {
        let config = SolverConfig {
            corners: CornerMethod::MaxQuad,
            ..SolverConfig::default()
        };
        assert_eq!(locator(&config).name(), "max-quad");
    }
}
