//! Cut individual pieces out of a photograph.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::bitmap::foreground_mask;
use crate::config::SolverConfig;
use crate::context::RunContext;
use crate::error::SolveError;
use crate::piece::Piece;

/// Pixel bounds and size of one labelled blob.
#[derive(Debug, Clone, Copy)]
struct Blob {
    label: u32,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    area: u32,
}

/// Segment `photo` into pieces. `source` is the photograph's index in the
/// run's input list. Blobs below `min_piece_size` are dropped silently.
pub fn extract_pieces(
    photo: &RgbImage,
    source: usize,
    config: &SolverConfig,
    ctx: &RunContext,
) -> Result<Vec<Piece>, SolveError> {
    let mask = foreground_mask(photo, config);
    if config.debug_images {
        ctx.image(&format!("mask_{source}"), &DynamicImage::ImageLuma8(mask.clone()));
    }
    let labels = connected_components(&mask, Connectivity::Eight, Luma([0u8]));
    let blobs = blobs(&labels, config.min_piece_size);
    log::debug!("image {}: {} blobs above {} px", source, blobs.len(), config.min_piece_size);

    let mut pieces = Vec::with_capacity(blobs.len());
    for blob in blobs {
        ctx.cancel.check()?;
        pieces.push(cut_out(photo, &labels, &blob, source, config, ctx));
    }
    Ok(pieces)
}

fn blobs(labels: &image::ImageBuffer<Luma<u32>, Vec<u32>>, min_area: u32) -> Vec<Blob> {
    let mut blobs: Vec<Blob> = Vec::new();
    for (x, y, px) in labels.enumerate_pixels() {
        let label = px.0[0];
        if label == 0 {
            continue;
        }
        let i = label as usize - 1;
        if i >= blobs.len() {
            blobs.resize(
                i + 1,
                Blob {
                    label: 0,
                    min_x: u32::MAX,
                    min_y: u32::MAX,
                    max_x: 0,
                    max_y: 0,
                    area: 0,
                },
            );
        }
        let b = &mut blobs[i];
        b.label = label;
        b.min_x = b.min_x.min(x);
        b.min_y = b.min_y.min(y);
        b.max_x = b.max_x.max(x);
        b.max_y = b.max_y.max(y);
        b.area += 1;
    }
    blobs.retain(|b| b.area > 0 && b.area >= min_area);
    blobs
}

fn cut_out(
    photo: &RgbImage,
    labels: &image::ImageBuffer<Luma<u32>, Vec<u32>>,
    blob: &Blob,
    source: usize,
    config: &SolverConfig,
    ctx: &RunContext,
) -> Piece {
    let pad = config.piece_padding;
    let (pw, ph) = photo.dimensions();
    let x0 = blob.min_x.saturating_sub(pad);
    let y0 = blob.min_y.saturating_sub(pad);
    let x1 = (blob.max_x + pad).min(pw - 1);
    let y1 = (blob.max_y + pad).min(ph - 1);
    let (w, h) = (x1 - x0 + 1, y1 - y0 + 1);

    let fill = Rgb(config.fill_color);
    let mut image = RgbImage::new(w, h);
    let mut mask = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let (sx, sy) = (x0 + x, y0 + y);
            if labels.get_pixel(sx, sy).0[0] == blob.label {
                image.put_pixel(x, y, *photo.get_pixel(sx, sy));
                mask.put_pixel(x, y, Luma([255]));
            } else {
                image.put_pixel(x, y, fill);
            }
        }
    }
    Piece::new(ctx.ids.next(), source, (x0, y0), image, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> RgbImage {
        // Two 20×20 pieces and one 3×3 speck on a green table.
        RgbImage::from_fn(80, 50, |x, y| {
            let a = (5..25).contains(&x) && (5..25).contains(&y);
            let b = (40..60).contains(&x) && (20..40).contains(&y);
            let speck = (70..73).contains(&x) && (5..8).contains(&y);
            if a || b || speck {
                Rgb([220, 200, 150])
            } else {
                Rgb([30, 140, 40])
            }
        })
    }

    fn config() -> SolverConfig {
        SolverConfig {
            min_piece_size: 50,
            mask_cleanup_radius: 0,
            piece_padding: 2,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn finds_each_piece_and_drops_specks() {
        let ctx = RunContext::default();
        let pieces = extract_pieces(&photo(), 3, &config(), &ctx).unwrap();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].offset, (3, 3));
        assert_eq!(pieces[0].size(), (24, 24));
        assert_eq!(pieces[1].offset, (38, 18));
        assert!(pieces.iter().all(|p| p.source == 3));
        assert_eq!((pieces[0].id, pieces[1].id), (0, 1));
    }

    #[test]
    fn background_is_painted_with_the_fill_color() {
        let ctx = RunContext::default();
        let pieces = extract_pieces(&photo(), 0, &config(), &ctx).unwrap();
        let p = &pieces[0];
        assert_eq!(*p.image.get_pixel(0, 0), Rgb([128, 128, 128]));
        assert_eq!(p.mask.get_pixel(0, 0).0[0], 0);
        assert_eq!(*p.image.get_pixel(10, 10), Rgb([220, 200, 150]));
        assert_eq!(p.mask.get_pixel(10, 10).0[0], 255);
    }

    #[test]
    fn empty_photo_yields_no_pieces() {
        let ctx = RunContext::default();
        let blank = RgbImage::from_pixel(30, 30, Rgb([10, 10, 10]));
        assert!(extract_pieces(&blank, 0, &config(), &ctx).unwrap().is_empty());
    }

    #[test]
    fn cancellation_is_checked_per_piece() {
        let ctx = RunContext::default();
        ctx.cancel.cancel();
        let err = extract_pieces(&photo(), 0, &config(), &ctx).unwrap_err();
        assert!(err.is_cancelled());
    }
}
