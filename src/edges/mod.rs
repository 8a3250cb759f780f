//! Piece edges: slicing, pose normalization and shape classification.
//!
//! 1. Split the outline at the four corners (`build`)
//! 2. Normalize each side forwards and backwards (`normalize`)
//! 3. Classify the normalized side as flat, bulb or hole (`classify`)

pub mod build;
pub mod classify;
pub mod normalize;

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Shape of one side of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Flat puzzle border.
    Line,
    /// Tab protruding out of the piece.
    Bulb,
    /// Socket cut into the piece.
    Hole,
}

/// One side of a piece, between two consecutive corners.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Id of the owning piece.
    pub piece: usize,
    /// Position 0..4 in counter-clockwise order, 0 = left side as photographed.
    pub index: usize,
    /// Contour points in piece-image coordinates, interior on the left.
    pub contour: Vec<Point>,
    pub normalized: Vec<Point>,
    /// Normalization of `contour` walked backwards; used when this edge is
    /// the candidate neighbor in a comparison.
    pub reverse_normalized: Vec<Point>,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(piece: usize, index: usize, contour: Vec<Point>) -> Self {
        let normalized = normalize::normalize(&contour);
        let reverse_normalized = normalize::reverse_normalize(&contour);
        let kind = classify::classify(&normalized);
        Edge {
            piece,
            index,
            contour,
            normalized,
            reverse_normalized,
            kind,
        }
    }
}
