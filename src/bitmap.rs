use std::path::Path;

use image::imageops::FilterType;
use image::{GrayImage, ImageReader, Luma, RgbImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

use crate::config::{MaskMethod, SolverConfig};
use crate::error::SolveError;

/// Quantization levels per channel for the background-color histogram.
const COLOR_BINS: usize = 16;

/// Load a photograph as RGB, downscaling it if it is larger than
/// `max_image_dimension` on its longer side.
pub fn load_photo(path: &Path, config: &SolverConfig) -> Result<RgbImage, SolveError> {
    let img = ImageReader::open(path)
        .map_err(|e| SolveError::ImageLoad(format!("{}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| SolveError::ImageLoad(format!("{}: {e}", path.display())))?
        .decode()
        .map_err(|e| SolveError::ImageLoad(format!("{}: {e}", path.display())))?
        .into_rgb8();
    Ok(prescale(img, config.max_image_dimension))
}

/// Downscale so the longer side is at most `max_dim`, preserving aspect.
pub fn prescale(img: RgbImage, max_dim: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    let longest = w.max(h);
    if max_dim == 0 || longest <= max_dim {
        return img;
    }
    let scale = max_dim as f64 / longest as f64;
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);
    log::debug!("prescale {}x{} -> {}x{}", w, h, nw, nh);
    image::imageops::resize(&img, nw, nh, FilterType::Triangle)
}

/// Binary foreground mask: pieces are 255, background is 0.
pub fn foreground_mask(img: &RgbImage, config: &SolverConfig) -> GrayImage {
    let mask = match config.mask {
        MaskMethod::BackgroundColor { tolerance } => color_distance_mask(img, tolerance),
        MaskMethod::Otsu => otsu_mask(img),
    };
    let r = config.mask_cleanup_radius;
    if r == 0 {
        return mask;
    }
    close(&open(&mask, Norm::LInf, r), Norm::LInf, r)
}

/// Mean color of the most populous cell of a coarse RGB histogram.
pub fn dominant_color(img: &RgbImage) -> [f64; 3] {
    let step = 256 / COLOR_BINS;
    let mut counts = vec![0u64; COLOR_BINS * COLOR_BINS * COLOR_BINS];
    let mut sums = vec![[0u64; 3]; counts.len()];
    for px in img.pixels() {
        let [r, g, b] = px.0;
        let bin = (r as usize / step) * COLOR_BINS * COLOR_BINS
            + (g as usize / step) * COLOR_BINS
            + b as usize / step;
        counts[bin] += 1;
        sums[bin][0] += r as u64;
        sums[bin][1] += g as u64;
        sums[bin][2] += b as u64;
    }
    let best = counts
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| **c)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let n = counts[best].max(1) as f64;
    [
        sums[best][0] as f64 / n,
        sums[best][1] as f64 / n,
        sums[best][2] as f64 / n,
    ]
}

fn color_distance_mask(img: &RgbImage, tolerance: f64) -> GrayImage {
    let bg = dominant_color(img);
    let tol2 = tolerance * tolerance;
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        let d2 = (r as f64 - bg[0]).powi(2) + (g as f64 - bg[1]).powi(2) + (b as f64 - bg[2]).powi(2);
        Luma([if d2 > tol2 { 255 } else { 0 }])
    })
}

fn otsu_mask(img: &RgbImage) -> GrayImage {
    let gray = image::imageops::grayscale(img);
    let level = otsu_level(&gray);
    // Whichever side of the threshold the image border sits on is background.
    let border_bright = border_mean(&gray) > level as f64;
    let kind = if border_bright {
        ThresholdType::BinaryInverted
    } else {
        ThresholdType::Binary
    };
    log::debug!("otsu level {} (background {})", level, if border_bright { "light" } else { "dark" });
    threshold(&gray, level, kind)
}

fn border_mean(gray: &GrayImage) -> f64 {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }
    let mut sum = 0u64;
    let mut n = 0u64;
    for (x, y, px) in gray.enumerate_pixels() {
        if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
            sum += px.0[0] as u64;
            n += 1;
        }
    }
    sum as f64 / n as f64
}
