use image::{GrayImage, RgbImage};
use kurbo::Point;

use super::{candidates, diagonal, spaced, CornerLocator};

/// Binary search over the sharpness threshold until exactly four
/// well-separated corners remain.
#[derive(Debug, Clone)]
pub struct FeatureSearch {
    /// Coarse turning-angle window, as a fraction of the contour length.
    pub window: f64,
    /// Minimum spacing as a fraction of the mask diagonal.
    pub min_spacing: f64,
}

impl CornerLocator for FeatureSearch {
    fn name(&self) -> &'static str {
        "features"
    }

    fn find_corners(&self, mask: &GrayImage, _image: &RgbImage) -> Vec<Point> {
        let spacing = self.min_spacing * diagonal(mask);
        let all = candidates(mask, self.window);
        let mut lo = 1i32;
        let mut hi = 179i32;
        let mut best: Vec<Point> = Vec::new();
        while lo <= hi {
            let mid = (lo + hi) / 2;
            let sharp = all.iter().filter(|c| c.sharpness >= mid as f64).copied().collect();
            let found = spaced(sharp, spacing);
            let count = found.len();
            log::debug!("features: threshold {} -> {} corners", mid, count);
            if count == 4 {
                return found;
            }
            if best.is_empty() || count.abs_diff(4) < best.len().abs_diff(4) {
                best = found;
            }
            // A higher threshold keeps fewer candidates.
            if count > 4 {
                lo = mid + 1;
            } else {
                hi = mid - 1;
            }
        }
        best
    }
}
