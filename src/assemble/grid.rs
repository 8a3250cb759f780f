//! Dense 2D layout of piece indices with per-cell rotation.
//!
//! All transforms return new grids; nothing here mutates in place, so a
//! rejected merge never disturbs the grids it was built from.

/// Rows grow downward, columns to the right, as on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<usize>>,
    /// Counter-clockwise quarter turns per cell, always 0 for empty cells.
    rotations: Vec<u8>,
}

impl Grid {
    pub fn empty(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![None; rows * cols],
            rotations: vec![0; rows * cols],
        }
    }

    /// 1×1 grid holding one unrotated piece.
    pub fn single(piece: usize) -> Self {
        Grid {
            rows: 1,
            cols: 1,
            cells: vec![Some(piece)],
            rotations: vec![0],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        self.cells[row * self.cols + col]
    }

    pub fn rotation(&self, row: usize, col: usize) -> u8 {
        self.rotations[row * self.cols + col]
    }

    fn put(&mut self, row: usize, col: usize, piece: Option<usize>, rotation: u8) {
        let i = row * self.cols + col;
        self.cells[i] = piece;
        self.rotations[i] = if piece.is_some() { rotation % 4 } else { 0 };
    }

    /// Cell holding `piece`, if any.
    pub fn find(&self, piece: usize) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|c| *c == Some(piece))
            .map(|i| (i / self.cols, i % self.cols))
    }

    /// `(row, col, piece, rotation)` for every occupied cell, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, usize, u8)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|piece| (i / self.cols, i % self.cols, piece, self.rotations[i]))
        })
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// The grid turned 90° counter-clockwise; every piece turns with it.
    pub fn rotated_ccw(&self) -> Grid {
        let mut out = Grid::empty(self.cols, self.rows);
        for (r, c, piece, rot) in self.occupied() {
            out.put(self.cols - 1 - c, r, Some(piece), rot + 1);
        }
        out
    }

    /// `turns` counter-clockwise quarter turns (taken mod 4).
    pub fn rotated(&self, turns: u8) -> Grid {
        let mut out = self.clone();
        for _ in 0..turns % 4 {
            out = out.rotated_ccw();
        }
        out
    }

    /// Copy into a larger `rows × cols` canvas with the top-left at
    /// `(row_offset, col_offset)`.
    pub fn embedded(&self, rows: usize, cols: usize, row_offset: usize, col_offset: usize) -> Grid {
        let mut out = Grid::empty(rows, cols);
        for (r, c, piece, rot) in self.occupied() {
            out.put(r + row_offset, c + col_offset, Some(piece), rot);
        }
        out
    }

    /// Cell-wise union of two same-sized grids, `None` if any cell is
    /// occupied in both.
    pub fn overlay(&self, other: &Grid) -> Option<Grid> {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        let mut out = self.clone();
        for (r, c, piece, rot) in other.occupied() {
            if out.get(r, c).is_some() {
                return None;
            }
            out.put(r, c, Some(piece), rot);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// [[0, 1, _],
    ///  [2, _, 3]]
    fn sample() -> Grid {
        let mut g = Grid::empty(2, 3);
        g.put(0, 0, Some(0), 0);
        g.put(0, 1, Some(1), 1);
        g.put(1, 0, Some(2), 2);
        g.put(1, 2, Some(3), 3);
        g
    }

    #[test]
    fn ccw_turn_moves_the_top_right_to_the_top_left() {
        let g = sample().rotated_ccw();
        assert_eq!((g.rows(), g.cols()), (3, 2));
        // [[_, 3],
        //  [1, _],
        //  [0, 2]]
        assert_eq!(g.get(0, 0), None);
        assert_eq!(g.get(0, 1), Some(3));
        assert_eq!(g.get(1, 0), Some(1));
        assert_eq!(g.get(2, 0), Some(0));
        assert_eq!(g.get(2, 1), Some(2));
        assert_eq!(g.rotation(0, 1), 0);
        assert_eq!(g.rotation(1, 0), 2);
        assert_eq!(g.rotation(2, 0), 1);
    }

    #[test]
    fn four_turns_are_the_identity() {
        assert_eq!(sample().rotated(4), sample());
        assert_eq!(sample().rotated(2).rotated(2), sample());
    }

    #[test]
    fn empty_cells_keep_zero_rotation() {
        let g = sample().rotated(3);
        for r in 0..g.rows() {
            for c in 0..g.cols() {
                if g.get(r, c).is_none() {
                    assert_eq!(g.rotation(r, c), 0);
                }
            }
        }
    }

    #[test]
    fn overlay_rejects_collisions() {
        let a = Grid::single(5).embedded(1, 2, 0, 0);
        let b = Grid::single(6).embedded(1, 2, 0, 1);
        let merged = a.overlay(&b).unwrap();
        assert_eq!(merged.get(0, 0), Some(5));
        assert_eq!(merged.get(0, 1), Some(6));
        let clash = Grid::single(7).embedded(1, 2, 0, 0);
        assert!(a.overlay(&clash).is_none());
    }

    #[test]
    fn find_reports_row_and_column() {
        assert_eq!(sample().find(3), Some((1, 2)));
        assert_eq!(sample().find(9), None);
    }
}
