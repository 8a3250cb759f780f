//! jigsaw-solver: photographs of scattered pieces → assembled puzzle layout.
//!
//! Segments pieces out of photographs, finds each piece's four corners,
//! splits its outline into four classified edges, scores every edge pair and
//! greedily assembles the pieces into one or more grids.
//!
//! # Example
//!
//! ```no_run
//! use jigsaw_solver::{solve, RunContext, SolverConfig};
//! use std::path::Path;
//!
//! let config = SolverConfig::default();
//! let ctx = RunContext::default();
//! let puzzle = solve(Path::new("photos/"), &config, &ctx)?;
//! for piece in &puzzle.pieces {
//!     println!("{} -> {:?}", piece.id, piece.placement);
//! }
//! # Ok::<(), jigsaw_solver::SolveError>(())
//! ```

#![forbid(unsafe_code)]

mod bitmap;
mod contour;
mod geom;
mod input;

pub mod assemble;
pub mod config;
pub mod context;
pub mod corners;
pub mod edges;
pub mod error;
pub mod matching;
pub mod piece;
pub mod render;
pub mod segment;

// Re-export kurbo so callers use the same `Point` type as `Edge` contours.
pub use kurbo;

pub use assemble::{Assembly, Solution};
pub use config::{CornerMethod, MaskMethod, SolverConfig};
pub use context::{CancelToken, Level, LogSink, ProgressSink, RunContext, Stage};
pub use error::{PieceError, SolveError};
pub use input::collect_photos;
pub use matching::{EdgeComparer, MatchScore, WindowedNearestPoint};
pub use piece::{Piece, PieceKind, Placement};

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::DynamicImage;
use rayon::prelude::*;

use corners::CornerLocator;
use edges::Edge;

/// The solved puzzle: every piece with its placement, plus the groups.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub pieces: Vec<Piece>,
    pub assembly: Assembly,
    /// Number of edge pairs considered by the assembler.
    pub match_count: usize,
}

impl Puzzle {
    /// More than one solution means some pieces could not be connected.
    pub fn solution_count(&self) -> usize {
        self.assembly.solutions.len()
    }
}

/// Full pipeline: a photo or folder of photos → assembled puzzle.
pub fn solve(input: &Path, config: &SolverConfig, ctx: &RunContext) -> Result<Puzzle, SolveError> {
    let t_start = Instant::now();
    let photos = collect_photos(input)?;
    ctx.info(&format!("Load        {} photo(s) from {}", photos.len(), input.display()));

    let pieces = extract(&photos, config, ctx)?;
    if pieces.is_empty() {
        return Err(SolveError::NoPieces);
    }
    let puzzle = solve_pieces(pieces, config, ctx)?;
    ctx.info(&format!(
        "Result      {} piece(s) in {} solution(s)  ({}ms)",
        puzzle.pieces.len(),
        puzzle.solution_count(),
        t_start.elapsed().as_millis()
    ));
    Ok(puzzle)
}

/// Segment every photo and derive each piece's corners, edges and kind.
///
/// Unreadable photos and pieces whose edges cannot be built are reported
/// and skipped; they never fail the run.
pub fn extract(photos: &[PathBuf], config: &SolverConfig, ctx: &RunContext) -> Result<Vec<Piece>, SolveError> {
    let mut pieces = Vec::new();
    for (source, path) in photos.iter().enumerate() {
        ctx.cancel.check()?;
        let photo = match bitmap::load_photo(path, config) {
            Ok(photo) => photo,
            Err(e) => {
                ctx.warn(&e.to_string());
                continue;
            }
        };
        pieces.extend(segment::extract_pieces(&photo, source, config, ctx)?);
        ctx.progress(Stage::Extract, source + 1, photos.len() * 2);
    }

    let locator = corners::locator(config);
    let total = pieces.len();
    let pieces: Vec<Piece> = if config.parallel {
        pieces
            .into_par_iter()
            .map(|p| process_piece(p, locator.as_ref(), config, ctx))
            .collect::<Result<_, _>>()?
    } else {
        let mut done = Vec::with_capacity(total);
        for (i, p) in pieces.into_iter().enumerate() {
            done.push(process_piece(p, locator.as_ref(), config, ctx)?);
            ctx.progress(Stage::Extract, total + i + 1, total * 2);
        }
        done
    };
    ctx.progress(Stage::Extract, 1, 1);

    let count = |kind| pieces.iter().filter(|p| p.kind == Some(kind)).count();
    ctx.info(&format!(
        "Extract     {} piece(s) ({} corner, {} border, {} inner) via {} corners",
        pieces.len(),
        count(PieceKind::Corner),
        count(PieceKind::Border),
        count(PieceKind::Inner),
        locator.name()
    ));
    Ok(pieces)
}

/// Score all edge pairs of already-extracted pieces and assemble them.
pub fn solve_pieces(mut pieces: Vec<Piece>, config: &SolverConfig, ctx: &RunContext) -> Result<Puzzle, SolveError> {
    if pieces.is_empty() {
        return Err(SolveError::NoPieces);
    }
    let comparer = WindowedNearestPoint::from_config(config);
    let scores = matching::score_all(&pieces, &comparer, config, ctx)?;
    ctx.info(&format!("Match       {} candidate edge pair(s)", scores.len()));

    let assembly = assemble::assemble_pieces(&mut pieces, &scores, ctx)?;
    ctx.info(&format!(
        "Assemble    {} join(s), {} solution(s)",
        assembly.joins,
        assembly.solutions.len()
    ));
    Ok(Puzzle {
        pieces,
        assembly,
        match_count: scores.len(),
    })
}

fn process_piece(
    mut piece: Piece,
    locator: &dyn CornerLocator,
    config: &SolverConfig,
    ctx: &RunContext,
) -> Result<Piece, SolveError> {
    ctx.cancel.check()?;
    match build_edges(&mut piece, locator) {
        Ok(()) => {}
        Err(e @ PieceError::TooManyFlatEdges { .. }) => ctx.error(&e.to_string()),
        Err(e) => ctx.warn(&e.to_string()),
    }
    if config.debug_images {
        if let Some(overlay) = render::edge_overlay(&piece) {
            ctx.image(&format!("edges_{}", piece.id), &DynamicImage::ImageRgba8(overlay));
        }
    }
    Ok(piece)
}

/// Locate corners, cut the outline into four edges and classify the piece.
///
/// On a corner or contour failure the piece is left without edges. With more
/// than two flat edges the edges are kept but the kind stays unset.
pub fn build_edges(piece: &mut Piece, locator: &dyn CornerLocator) -> Result<(), PieceError> {
    piece.edges.clear();
    piece.kind = None;
    let outline = contour::largest_outer(&piece.mask).ok_or(PieceError::NoContour { piece: piece.id })?;
    piece.corners = locator.find_corners(&piece.mask, &piece.image);
    let sides = edges::build::split_at_corners(&outline, &piece.corners, piece.id)?;
    piece.edges = sides
        .into_iter()
        .enumerate()
        .map(|(index, side)| Edge::new(piece.id, index, side))
        .collect();
    piece.kind = Some(PieceKind::from_edges(piece.id, &piece.edge_kinds())?);
    Ok(())
}
