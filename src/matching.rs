//! Pairwise edge compatibility scoring.
//!
//! Every edge of every piece is compared against every edge of every other
//! piece. The result is one globally sorted list, best match first, which
//! the assembler consumes greedily.

use kurbo::Point;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::context::{CancelToken, RunContext, Stage};
use crate::edges::{Edge, EdgeKind};
use crate::error::SolveError;
use crate::geom::{arc_length, chord_length};
use crate::piece::Piece;

/// Score of a pair that cannot possibly fit together.
pub const NO_MATCH: f64 = f64::MAX;

/// Compatibility of two edges on two different pieces.
/// Pieces are referred to by their position in the piece list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub piece_a: usize,
    pub edge_a: usize,
    pub piece_b: usize,
    pub edge_b: usize,
    /// Lower is better.
    pub score: f64,
}

pub trait EdgeComparer: Send + Sync {
    /// Dissimilarity of two edges, `NO_MATCH` for impossible pairs.
    fn compare(&self, a: &Edge, b: &Edge) -> f64;
}

/// Sliding-window nearest-point distance between one edge and the other
/// edge walked backwards, plus the mismatch in edge spans.
#[derive(Debug, Clone)]
pub struct WindowedNearestPoint {
    pub window_percent: f64,
    pub endpoint_ignore_threshold: f64,
}

impl WindowedNearestPoint {
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            window_percent: config.window_percent,
            endpoint_ignore_threshold: config.endpoint_ignore_threshold,
        }
    }

    /// Shape cost of `a` against `b`, both already normalized.
    pub fn contour_cost(&self, a: &[Point], b: &[Point]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return NO_MATCH;
        }
        let longest = a.len().max(b.len());
        let window = ((longest as f64 * self.window_percent / 100.0) as usize).max(1);
        let last = b.len() - 1;

        let mut total = 0.0;
        for (i, p) in a.iter().enumerate() {
            let lo = i.saturating_sub(window).min(last);
            let hi = (i + window).min(last);
            let nearest = b[lo..=hi]
                .iter()
                .map(|q| p.distance(*q))
                .fold(f64::INFINITY, f64::min);
            total += nearest;
        }

        let span = arc_length(a) + arc_length(b);
        if span <= 0.0 {
            return NO_MATCH;
        }
        let mut cost = total / span;
        let chord_diff = (chord_length(a) - chord_length(b)).abs();
        if chord_diff >= self.endpoint_ignore_threshold {
            cost += chord_diff;
        }
        cost
    }
}

impl EdgeComparer for WindowedNearestPoint {
    fn compare(&self, a: &Edge, b: &Edge) -> f64 {
        if a.piece == b.piece
            || a.kind == EdgeKind::Line
            || b.kind == EdgeKind::Line
            || a.kind == b.kind
            || a.normalized.is_empty()
            || b.normalized.is_empty()
        {
            return NO_MATCH;
        }
        let forward = self.contour_cost(&a.normalized, &b.reverse_normalized);
        let backward = self.contour_cost(&b.normalized, &a.reverse_normalized);
        if forward >= NO_MATCH || backward >= NO_MATCH {
            return NO_MATCH;
        }
        // Mean of both walks, so swapping the arguments gives the same score.
        (forward + backward) / 2.0
    }
}

/// Score every edge pair across pieces and sort ascending.
///
/// Pieces without four edges are skipped. Pairs scoring at or above
/// `match_keep_threshold` are dropped. The cancellation token is checked
/// before each pair.
pub fn score_all(
    pieces: &[Piece],
    comparer: &dyn EdgeComparer,
    config: &SolverConfig,
    ctx: &RunContext,
) -> Result<Vec<MatchScore>, SolveError> {
    let usable: Vec<usize> = (0..pieces.len()).filter(|&i| pieces[i].has_edges()).collect();
    let mut pairs = Vec::new();
    for (k, &i) in usable.iter().enumerate() {
        for &j in &usable[k + 1..] {
            pairs.push((i, j));
        }
    }
    log::debug!("matching {} piece pairs", pairs.len());

    let score_pair = |&(i, j): &(usize, usize), cancel: &CancelToken| -> Result<Vec<MatchScore>, SolveError> {
        cancel.check()?;
        let mut out = Vec::new();
        for a in &pieces[i].edges {
            for b in &pieces[j].edges {
                let score = comparer.compare(a, b);
                if score < config.match_keep_threshold {
                    out.push(MatchScore {
                        piece_a: i,
                        edge_a: a.index,
                        piece_b: j,
                        edge_b: b.index,
                        score,
                    });
                }
            }
        }
        Ok(out)
    };

    let per_pair: Vec<Vec<MatchScore>> = if config.parallel {
        pairs
            .par_iter()
            .map(|pair| score_pair(pair, &ctx.cancel))
            .collect::<Result<_, _>>()?
    } else {
        let mut acc = Vec::with_capacity(pairs.len());
        for (n, pair) in pairs.iter().enumerate() {
            acc.push(score_pair(pair, &ctx.cancel)?);
            if n % 64 == 0 {
                ctx.progress(Stage::Match, n, pairs.len());
            }
        }
        acc
    };
    ctx.progress(Stage::Match, pairs.len(), pairs.len());

    let mut scores: Vec<MatchScore> = per_pair.into_iter().flatten().collect();
    sort_scores(&mut scores);
    Ok(scores)
}

/// Best first; ties broken by indices so the order is reproducible.
pub fn sort_scores(scores: &mut [MatchScore]) {
    scores.sort_by(|x, y| {
        x.score
            .total_cmp(&y.score)
            .then(x.piece_a.cmp(&y.piece_a))
            .then(x.edge_a.cmp(&y.edge_a))
            .then(x.piece_b.cmp(&y.piece_b))
            .then(x.edge_b.cmp(&y.edge_b))
    });
}
