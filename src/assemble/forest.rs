use super::grid::Grid;

/// Global directions, numbered so that one counter-clockwise quarter turn
/// adds 1. At rotation 0 edge `i` of a piece faces direction `i`.
pub const WEST: usize = 0;
pub const EAST: usize = 2;

/// One disjoint-set node.
#[derive(Debug, Clone)]
pub struct Forest {
    pub id: usize,
    /// `None` for a root, otherwise the forest this one was merged into.
    pub representative: Option<usize>,
    /// Layout of the group; only roots keep one.
    pub grid: Option<Grid>,
}

/// Disjoint sets of pieces, each set carrying its 2D layout.
#[derive(Debug, Clone)]
pub struct Forests {
    nodes: Vec<Forest>,
    live: usize,
}

impl Forests {
    /// One singleton forest per piece index `0..count`.
    pub fn new(count: usize) -> Self {
        Forests {
            nodes: (0..count)
                .map(|id| Forest {
                    id,
                    representative: None,
                    grid: Some(Grid::single(id)),
                })
                .collect(),
            live: count,
        }
    }

    /// Number of roots.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root forest of `piece`.
    pub fn find(&self, piece: usize) -> usize {
        let mut id = piece;
        while let Some(next) = self.nodes[id].representative {
            id = next;
        }
        id
    }

    pub fn grid(&self, root: usize) -> Option<&Grid> {
        self.nodes[root].grid.as_ref()
    }

    /// Root ids in ascending order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .filter(|f| f.representative.is_none())
            .map(|f| f.id)
    }

    /// Join the groups of `piece_a` and `piece_b` so that `edge_a` of A
    /// touches `edge_b` of B, with B directly east of A.
    ///
    /// Returns `false`, leaving every forest untouched, when both pieces are
    /// already in one group or the combined layout would put two pieces in
    /// one cell.
    pub fn join_sets(&mut self, piece_a: usize, edge_a: usize, piece_b: usize, edge_b: usize) -> bool {
        let root_a = self.find(piece_a);
        let root_b = self.find(piece_b);
        if root_a == root_b {
            return false;
        }
        let (Some(grid_a), Some(grid_b)) = (self.grid(root_a), self.grid(root_b)) else {
            return false;
        };
        let Some(grid_a) = face(grid_a, piece_a, edge_a, EAST) else {
            return false;
        };
        let Some(grid_b) = face(grid_b, piece_b, edge_b, WEST) else {
            return false;
        };
        let (Some((ar, ac)), Some((br, bc))) = (grid_a.find(piece_a), grid_b.find(piece_b)) else {
            return false;
        };

        // B's cell goes to (ar, ac + 1) in A's frame.
        let target_c = ac + 1;
        let a_row_off = br.saturating_sub(ar);
        let b_row_off = ar.saturating_sub(br);
        let a_col_off = bc.saturating_sub(target_c);
        let b_col_off = target_c.saturating_sub(bc);
        let rows = (a_row_off + grid_a.rows()).max(b_row_off + grid_b.rows());
        let cols = (a_col_off + grid_a.cols()).max(b_col_off + grid_b.cols());

        let canvas_a = grid_a.embedded(rows, cols, a_row_off, a_col_off);
        let canvas_b = grid_b.embedded(rows, cols, b_row_off, b_col_off);
        let Some(merged) = canvas_a.overlay(&canvas_b) else {
            log::debug!("join {}:{} + {}:{} rejected, layouts overlap", piece_a, edge_a, piece_b, edge_b);
            return false;
        };

        self.nodes[root_a].grid = Some(merged);
        self.nodes[root_b].grid = None;
        self.nodes[root_b].representative = Some(root_a);
        self.live -= 1;
        true
    }
}

/// `grid` turned so that `edge` of `piece` faces `direction`.
fn face(grid: &Grid, piece: usize, edge: usize, direction: usize) -> Option<Grid> {
    let (r, c) = grid.find(piece)?;
    let facing = (edge + grid.rotation(r, c) as usize) % 4;
    let turns = (direction + 4 - facing) % 4;
    Some(grid.rotated(turns as u8))
}
