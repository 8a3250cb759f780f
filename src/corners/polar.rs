use image::{GrayImage, RgbImage};
use kurbo::Point;

use super::CornerLocator;
use crate::contour::largest_outer;
use crate::geom::{centroid, wrap_degrees};

/// Peaks beyond this count are dropped (weakest first) before the
/// combination search.
const MAX_PEAKS: usize = 16;

/// Radius peaks of the outline around its centroid, picked so their
/// bearings best match a rotated square.
#[derive(Debug, Clone)]
pub struct PolarPeaks {
    /// Local-maximum half-window as a fraction of the contour length.
    pub window: f64,
    /// Required rise over the window minimum, as a fraction of the mean radius.
    pub prominence: f64,
}

#[derive(Debug, Clone, Copy)]
struct Peak {
    index: usize,
    angle: f64,
    radius: f64,
}

impl CornerLocator for PolarPeaks {
    fn name(&self) -> &'static str {
        "polar"
    }

    fn find_corners(&self, mask: &GrayImage, _image: &RgbImage) -> Vec<Point> {
        let Some(contour) = largest_outer(mask) else {
            return Vec::new();
        };
        let peaks = self.peaks(&contour);
        log::debug!("polar: {} radius peaks", peaks.len());
        if peaks.len() < 4 {
            return peaks.iter().map(|p| contour[p.index]).collect();
        }
        let mut chosen = best_square(&peaks);
        chosen.sort_by_key(|p| p.index);
        chosen.iter().map(|p| contour[p.index]).collect()
    }
}

impl PolarPeaks {
    fn peaks(&self, contour: &[Point]) -> Vec<Peak> {
        let n = contour.len();
        if n < 8 {
            return Vec::new();
        }
        let c = centroid(contour);
        let polar: Vec<(f64, f64)> = contour
            .iter()
            .map(|p| {
                let d = *p - c;
                (d.y.atan2(d.x).to_degrees(), d.hypot())
            })
            .collect();
        let mean_r = polar.iter().map(|(_, r)| r).sum::<f64>() / n as f64;
        let w = ((self.window * n as f64) as usize).clamp(1, n / 2 - 1);
        let min_rise = self.prominence * mean_r;

        let mut peaks = Vec::new();
        for i in 0..n {
            let r = polar[i].1;
            let mut is_max = true;
            let mut low = r;
            for k in 1..=w {
                let before = polar[(i + n - k) % n].1;
                let after = polar[(i + k) % n].1;
                // Plateaus report their first point only.
                if before >= r || after > r {
                    is_max = false;
                    break;
                }
                low = low.min(before).min(after);
            }
            if is_max && r - low > min_rise {
                peaks.push(Peak {
                    index: i,
                    angle: polar[i].0,
                    radius: r,
                });
            }
        }
        if peaks.len() > MAX_PEAKS {
            peaks.sort_by(|a, b| b.radius.total_cmp(&a.radius));
            peaks.truncate(MAX_PEAKS);
        }
        peaks
    }
}

/// Total absolute deviation (degrees) of four bearings from an ideal square
/// at its best-fitting rotation.
fn square_deviation(angles: &mut [f64; 4]) -> f64 {
    angles.sort_by(|a, b| a.total_cmp(b));
    let residuals: Vec<f64> = (0..4).map(|k| angles[k] - 90.0 * k as f64).collect();
    // The L1-optimal offset is one of the residuals.
    residuals
        .iter()
        .map(|&offset| {
            residuals
                .iter()
                .map(|&r| wrap_degrees(r - offset).abs())
                .sum::<f64>()
        })
        .fold(f64::INFINITY, f64::min)
}

fn best_square(peaks: &[Peak]) -> Vec<Peak> {
    let m = peaks.len();
    let mut best: Option<([usize; 4], f64, f64)> = None;
    for a in 0..m {
        for b in a + 1..m {
            for c in b + 1..m {
                for d in c + 1..m {
                    let set = [a, b, c, d];
                    let mut angles = set.map(|i| peaks[i].angle);
                    let dev = square_deviation(&mut angles);
                    let reach: f64 = set.iter().map(|&i| peaks[i].radius).sum();
                    let better = match best {
                        None => true,
                        Some((_, best_dev, best_reach)) => {
                            dev < best_dev - 1e-9 || (dev <= best_dev + 1e-9 && reach > best_reach)
                        }
                    };
                    if better {
                        best = Some((set, dev, reach));
                    }
                }
            }
        }
    }
    best.map(|(set, _, _)| set.iter().map(|&i| peaks[i]).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corners::test_masks::square_with_tab;

    #[test]
    fn rotated_square_bearings_fit_exactly() {
        let mut angles = [-150.0, 30.0, 120.0, -60.0];
        assert!(square_deviation(&mut angles) < 1e-9);
    }

    #[test]
    fn uneven_bearings_deviate() {
        let mut angles = [0.0, 45.0, 180.0, 270.0];
        assert!((square_deviation(&mut angles) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn finds_square_corners_and_skips_the_tab() {
        let mask = square_with_tab(60, 20);
        let image = RgbImage::new(mask.width(), mask.height());
        let locator = PolarPeaks {
            window: 0.05,
            prominence: 0.02,
        };
        let corners = locator.find_corners(&mask, &image);
        assert_eq!(corners.len(), 4, "corners: {:?}", corners);
        for (ex, ey) in [(20.0, 20.0), (20.0, 79.0), (79.0, 79.0), (79.0, 20.0)] {
            let target = Point::new(ex, ey);
            assert!(
                corners.iter().any(|c| c.distance(target) < 3.0),
                "no corner near ({}, {}): {:?}",
                ex,
                ey,
                corners
            );
        }
    }
}
