use image::{GrayImage, RgbImage};
use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::edges::{Edge, EdgeKind};
use crate::error::PieceError;

/// Structural role of a piece, derived from its count of flat edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Corner,
    Border,
    Inner,
}

impl PieceKind {
    /// 0 flat edges = inner, 1 = border, 2 = corner; anything more is an error.
    pub fn from_edges(piece: usize, kinds: &[EdgeKind]) -> Result<PieceKind, PieceError> {
        let count = kinds.iter().filter(|k| **k == EdgeKind::Line).count();
        match count {
            0 => Ok(PieceKind::Inner),
            1 => Ok(PieceKind::Border),
            2 => Ok(PieceKind::Corner),
            _ => Err(PieceError::TooManyFlatEdges { piece, count }),
        }
    }
}

/// Where the assembler put a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Index of the solution (connected group) the piece belongs to.
    pub group: usize,
    pub row: usize,
    pub col: usize,
    /// Counter-clockwise quarter turns to apply to the piece image.
    pub rotation: u8,
}

/// One segmented puzzle piece.
#[derive(Debug, Clone)]
pub struct Piece {
    pub id: usize,
    /// Index of the photograph the piece was cut from.
    pub source: usize,
    /// Top-left of the cut-out in source-image pixels.
    pub offset: (u32, u32),
    /// Cut-out with background painted in the fill color.
    pub image: RgbImage,
    /// 255 inside the piece, 0 elsewhere. Same size as `image`.
    pub mask: GrayImage,
    /// Corner points as located in `mask` coordinates.
    pub corners: Vec<Point>,
    /// Four edges in counter-clockwise order, or empty if edge extraction failed.
    pub edges: Vec<Edge>,
    pub kind: Option<PieceKind>,
    pub placement: Option<Placement>,
}

impl Piece {
    pub fn new(id: usize, source: usize, offset: (u32, u32), image: RgbImage, mask: GrayImage) -> Self {
        Piece {
            id,
            source,
            offset,
            image,
            mask,
            corners: Vec::new(),
            edges: Vec::new(),
            kind: None,
            placement: None,
        }
    }

    /// Pixel size of the cut-out.
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// True once the piece has its four edges and can take part in matching.
    pub fn has_edges(&self) -> bool {
        self.edges.len() == 4
    }

    pub fn edge_kinds(&self) -> Vec<EdgeKind> {
        self.edges.iter().map(|e| e.kind).collect()
    }
}
