//! Diagnostic overlays and solution previews.
//!
//! Edge overlays go through tiny-skia so contours are drawn anti-aliased;
//! previews are plain image compositing.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::imageops;
use image::{Rgb, RgbImage, RgbaImage};
use kurbo::{BezPath, PathEl, Point};

use crate::assemble::Solution;
use crate::edges::EdgeKind;
use crate::error::SolveError;
use crate::piece::Piece;

const LINE_COLOR: [u8; 3] = [40, 110, 255];
const BULB_COLOR: [u8; 3] = [235, 60, 50];
const HOLE_COLOR: [u8; 3] = [40, 200, 90];
const CORNER_COLOR: [u8; 3] = [255, 210, 0];

/// Open polyline through `points`.
fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    for (i, &p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`.
fn kurbo_to_tinyskia(bezpath: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in bezpath.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn paint(color: [u8; 3]) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], 255);
    paint.anti_alias = true;
    paint
}

fn kind_color(kind: EdgeKind) -> [u8; 3] {
    match kind {
        EdgeKind::Line => LINE_COLOR,
        EdgeKind::Bulb => BULB_COLOR,
        EdgeKind::Hole => HOLE_COLOR,
    }
}

/// The piece image with its edges colored by kind and its corners marked.
/// `None` for an empty image.
pub fn edge_overlay(piece: &Piece) -> Option<RgbaImage> {
    let (w, h) = piece.size();
    let rgba = image::DynamicImage::ImageRgb8(piece.image.clone()).into_rgba8();
    let size = tiny_skia::IntSize::from_wh(w, h)?;
    // Opaque pixels are identical premultiplied or not.
    let mut pixmap = tiny_skia::Pixmap::from_vec(rgba.into_raw(), size)?;

    let stroke = tiny_skia::Stroke {
        width: 2.0,
        ..Default::default()
    };
    for edge in &piece.edges {
        if let Some(path) = kurbo_to_tinyskia(&polyline(&edge.contour)) {
            pixmap.stroke_path(&path, &paint(kind_color(edge.kind)), &stroke, tiny_skia::Transform::identity(), None);
        }
    }
    for c in &piece.corners {
        if let Some(dot) = tiny_skia::PathBuilder::from_circle(c.x as f32, c.y as f32, 3.0) {
            pixmap.fill_path(
                &dot,
                &paint(CORNER_COLOR),
                tiny_skia::FillRule::Winding,
                tiny_skia::Transform::identity(),
                None,
            );
        }
    }
    RgbaImage::from_raw(w, h, pixmap.take())
}

/// Compose one solution: every piece rotated into place and centered in its
/// cell. Cells are as large as the largest piece.
pub fn solution_preview(pieces: &[Piece], solution: &Solution, background: [u8; 3]) -> RgbImage {
    let cell = pieces
        .iter()
        .map(|p| p.image.width().max(p.image.height()))
        .max()
        .unwrap_or(1);
    let grid = &solution.grid;
    let mut canvas = RgbImage::from_pixel(
        grid.cols() as u32 * cell,
        grid.rows() as u32 * cell,
        Rgb(background),
    );
    for (row, col, index, rotation) in grid.occupied() {
        let Some(piece) = pieces.get(index) else {
            continue;
        };
        let mut img = piece.image.clone();
        for _ in 0..rotation {
            // 270° clockwise is one counter-clockwise quarter turn.
            img = imageops::rotate270(&img);
        }
        let x = col as u32 * cell + (cell - img.width()) / 2;
        let y = row as u32 * cell + (cell - img.height()) / 2;
        imageops::overlay(&mut canvas, &img, x as i64, y as i64);
    }
    canvas
}

/// Write an image as an 8-bit RGBA PNG.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<(), SolveError> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| SolveError::ImageWrite(format!("{}: {e}", path.display())))?;
    writer
        .write_image_data(image.as_raw())
        .map_err(|e| SolveError::ImageWrite(format!("{}: {e}", path.display())))?;
    Ok(())
}
