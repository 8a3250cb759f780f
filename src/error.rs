use std::path::PathBuf;

use thiserror::Error;

/// Terminal outcomes of a solve run.
///
/// `Cancelled` is the only non-fatal variant: it means the caller asked the
/// run to stop and nothing after the last checkpoint was committed.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SolveError {
    #[error("run cancelled")]
    Cancelled,

    #[error("no input images found at {}", .0.display())]
    NoImages(PathBuf),

    #[error("no puzzle pieces were extracted from the input images")]
    NoPieces,

    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("failed to write image: {0}")]
    ImageWrite(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SolveError {
    /// True for the cancellation outcome, false for every real failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SolveError::Cancelled)
    }
}

/// Per-piece anomalies. These never abort a run; the pipeline reports them
/// through the progress sink and carries on without the affected piece's edges.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PieceError {
    #[error("piece {piece}: expected 4 corners, found {found}")]
    CornerCount { piece: usize, found: usize },

    #[error("piece {piece}: two corners snapped to the same contour point")]
    DegenerateCorners { piece: usize },

    #[error("piece {piece}: mask has no outer contour")]
    NoContour { piece: usize },

    #[error("piece {piece}: {count} flat edges, a piece has at most 2")]
    TooManyFlatEdges { piece: usize, count: usize },
}
