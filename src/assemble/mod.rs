//! Greedy assembly of pieces into grids.
//!
//! Matches are consumed best-first; each one tries to join the two pieces'
//! groups. Joins that would overlap are skipped. Whatever groups remain at
//! the end are the solutions.

pub mod forest;
pub mod grid;

pub use forest::Forests;
pub use grid::Grid;

use crate::context::{CancelToken, RunContext, Stage};
use crate::error::SolveError;
use crate::matching::MatchScore;
use crate::piece::{Piece, Placement};

/// One connected group of pieces.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Forest id of the group's root.
    pub root: usize,
    /// Layout by piece index.
    pub grid: Grid,
}

/// Result of assembly: the solutions, largest first.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub solutions: Vec<Solution>,
    /// Number of matches that produced a join.
    pub joins: usize,
}

impl Assembly {
    /// Placement of every piece index, `None` if it is in no grid.
    pub fn placements(&self, count: usize) -> Vec<Option<Placement>> {
        let mut out = vec![None; count];
        for (group, solution) in self.solutions.iter().enumerate() {
            for (row, col, piece, rotation) in solution.grid.occupied() {
                if piece < count {
                    out[piece] = Some(Placement {
                        group,
                        row,
                        col,
                        rotation,
                    });
                }
            }
        }
        out
    }
}

/// Consume `scores` (already sorted best-first) until one group remains or
/// the list runs out. Cancellation is honoured between joins only.
pub fn assemble(count: usize, scores: &[MatchScore], cancel: &CancelToken) -> Result<Assembly, SolveError> {
    let mut forests = Forests::new(count);
    let mut joins = 0;
    for s in scores {
        if forests.live() <= 1 {
            break;
        }
        cancel.check()?;
        if forests.join_sets(s.piece_a, s.edge_a, s.piece_b, s.edge_b) {
            joins += 1;
            log::debug!(
                "joined {}:{} + {}:{} (score {:.4}), {} groups left",
                s.piece_a,
                s.edge_a,
                s.piece_b,
                s.edge_b,
                s.score,
                forests.live()
            );
        }
    }

    let mut solutions: Vec<Solution> = forests
        .roots()
        .filter_map(|root| {
            forests.grid(root).map(|grid| Solution {
                root,
                grid: grid.clone(),
            })
        })
        .collect();
    solutions.sort_by(|a, b| {
        b.grid
            .piece_count()
            .cmp(&a.grid.piece_count())
            .then(a.root.cmp(&b.root))
    });
    Ok(Assembly { solutions, joins })
}

/// Run assembly over `pieces` and record each piece's placement.
pub fn assemble_pieces(
    pieces: &mut [Piece],
    scores: &[MatchScore],
    ctx: &RunContext,
) -> Result<Assembly, SolveError> {
    ctx.progress(Stage::Assemble, 0, 1);
    let assembly = assemble(pieces.len(), scores, &ctx.cancel)?;
    let placements = assembly.placements(pieces.len());
    for (piece, placement) in pieces.iter_mut().zip(placements) {
        piece.placement = placement;
    }
    ctx.progress(Stage::Assemble, 1, 1);
    Ok(assembly)
}
