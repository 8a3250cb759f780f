use image::{GrayImage, Rgb, RgbImage};
use jigsaw_solver::edges::Edge;
use jigsaw_solver::kurbo::{Point, Vec2};
use jigsaw_solver::{Piece, PieceKind};

/// One side of a synthetic square piece. Tabs carry `(amplitude, half_width)`.
#[derive(Debug, Clone, Copy)]
pub enum Side {
    Flat,
    Bulb(f64, f64),
    Hole(f64, f64),
}

/// Bell-shaped bump centered on the side, zero at both ends.
fn bump(t: f64, size: f64, amplitude: f64, half_width: f64) -> f64 {
    let u = (t - size / 2.0) / half_width;
    if u.abs() >= 1.0 {
        0.0
    } else {
        amplitude * (1.0 - u * u).powi(2)
    }
}

/// Outline of one side, walked counter-clockwise on screen.
///
/// Sides go W, S, E, N starting from the top-left corner, so mating sides of
/// neighboring pieces trace the same curve in opposite directions.
pub fn side_points(size: f64, index: usize, side: Side) -> Vec<Point> {
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(0.0, size),
        Point::new(size, size),
        Point::new(size, 0.0),
    ];
    let outward = [
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, -1.0),
    ];
    let start = corners[index];
    let dir = (corners[(index + 1) % 4] - start) / size;
    let steps = size as usize;
    (0..=steps)
        .map(|i| {
            let t = i as f64;
            let offset = match side {
                Side::Flat => 0.0,
                Side::Bulb(a, w) => bump(t, size, a, w),
                Side::Hole(a, w) => -bump(t, size, a, w),
            };
            start + dir * t + outward[index] * offset
        })
        .collect()
}

/// A piece whose four edges are built straight from `sides`, bypassing
/// segmentation and corner detection.
pub fn piece(id: usize, size: f64, sides: [Side; 4]) -> Piece {
    let mut piece = Piece::new(
        id,
        0,
        (0, 0),
        RgbImage::from_pixel(1, 1, Rgb([200, 180, 150])),
        GrayImage::new(1, 1),
    );
    piece.edges = sides
        .iter()
        .enumerate()
        .map(|(index, &side)| Edge::new(id, index, side_points(size, index, side)))
        .collect();
    piece.kind = PieceKind::from_edges(id, &piece.edge_kinds()).ok();
    piece
}

/// Photo of puzzle-like pieces: squares with a round tab on the east side
/// and a round notch in the south side, on a flat green background.
pub fn photo(count: u32, size: u32, gap: u32) -> RgbImage {
    let background = Rgb([30, 140, 60]);
    let body = Rgb([225, 200, 160]);
    let width = gap + count * (size + gap);
    let height = size + 2 * gap;
    let mut img = RgbImage::from_pixel(width, height, background);
    let s = size as f64;
    for n in 0..count {
        let x0 = (gap + n * (size + gap)) as f64;
        let y0 = gap as f64;
        let tab = (x0 + s + 6.0, y0 + s / 2.0, 10.0);
        let notch = (x0 + s / 2.0, y0 + s - 6.0, 12.0);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let (fx, fy) = (x as f64, y as f64);
            let inside = |c: (f64, f64, f64)| (fx - c.0).powi(2) + (fy - c.1).powi(2) <= c.2 * c.2;
            let square = fx >= x0 && fx < x0 + s && fy >= y0 && fy < y0 + s;
            if (square || inside(tab)) && !inside(notch) {
                *px = body;
            }
        }
    }
    img
}
