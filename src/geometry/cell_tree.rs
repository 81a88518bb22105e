use rand::Rng;

use crate::error::{CrError, CrResult};

use super::{Cell, CellId, CellStatus, Pt};

/// The adaptive 2-D subdivision that backs the localiser's symbolic image.
///
/// Created per localiser run and mutated only by the localiser. Holds the root [`Cell`]; every
/// other cell is reached by descending `root.children`.
#[derive(Debug, Clone)]
pub struct CellTree {
    root: Cell,
}

impl CellTree {
    /// Create a tree with a single ACTIVE root leaf spanning `bounds = (sw_x, sw_y, ne_x, ne_y)`.
    pub fn new(bounds: (f64, f64, f64, f64)) -> CrResult<Self> {
        let (sw_x, sw_y, ne_x, ne_y) = bounds;
        if !(ne_x > sw_x) || !(ne_y > sw_y) {
            return Err(CrError::InvalidBounds {
                sw: (sw_x, sw_y),
                ne: (ne_x, ne_y),
            });
        }
        Ok(Self {
            root: Cell::new_leaf(CellId::root(), Pt::new(sw_x, sw_y), Pt::new(ne_x, ne_y)),
        })
    }

    pub fn bounds(&self) -> (Pt, Pt) {
        (self.root.sw, self.root.ne)
    }

    /// Subdivide the root once into `nx * ny` equal children. The root must still be a leaf.
    pub fn initial_fragment(&mut self, nx: u32, ny: u32) {
        self.root.fragment(nx, ny);
    }

    /// For every ACTIVE leaf, replace its (1,1) subdivision with (2,2), spawning four children.
    /// DISCARDED leaves are left untouched and remain terminal.
    ///
    /// Recursion depth here is bounded by the tree's current depth (one level per call), not by
    /// the number of leaves, so a small recursive traversal is safe; the leaf *enumeration* used
    /// elsewhere (potentially 10^7 nodes) goes through the explicit-stack [`Self::leaves_active`]
    /// iterator instead.
    pub fn refine(&mut self) {
        fn refine_node(cell: &mut Cell) {
            if cell.is_leaf() {
                if cell.status == CellStatus::Active {
                    cell.fragment(2, 2);
                }
            } else {
                for child in &mut cell.children {
                    refine_node(child);
                }
            }
        }
        refine_node(&mut self.root);
    }

    /// Enumerate all ACTIVE leaves in depth-first order, without recursion (a depth-8 grid can
    /// hold on the order of 10^7 leaves).
    pub fn leaves_active(&self) -> ActiveLeaves<'_> {
        ActiveLeaves {
            stack: vec![&self.root],
        }
    }

    /// Enumerate all leaves (ACTIVE and DISCARDED) in depth-first order.
    pub fn leaves_all(&self) -> AllLeaves<'_> {
        AllLeaves {
            stack: vec![&self.root],
        }
    }

    pub fn count_active(&self) -> usize {
        self.leaves_active().count()
    }

    /// Descend the tree following `id`. If `id` runs off the leaf boundary, returns the deepest
    /// reachable ancestor and signals `IdTooDeep` (non-fatal; callers may treat it as the leaf).
    pub fn cell_by_id(&self, id: &CellId) -> (&Cell, CrResult<()>) {
        let mut current = &self.root;
        for &index in id.as_slice() {
            if current.children.is_empty() {
                return (current, Err(CrError::IdTooDeep));
            }
            match current.children.get(index as usize) {
                Some(child) => current = child,
                None => return (current, Err(CrError::IdTooDeep)),
            }
        }
        (current, Ok(()))
    }

    fn cell_by_id_mut(&mut self, id: &CellId) -> Option<&mut Cell> {
        let mut current = &mut self.root;
        for &index in id.as_slice() {
            if current.children.is_empty() {
                return None;
            }
            current = current.children.get_mut(index as usize)?;
        }
        Some(current)
    }

    /// Descend using the cell-number formula at every level; strict inequality on all four sides
    /// means points on a boundary (including the region's own edge) are `OutOfBounds`.
    pub fn cell_by_point(&self, x: f64, y: f64) -> CrResult<&Cell> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CrError::NonFiniteMapping);
        }
        let mut current = &self.root;
        loop {
            if !current.contains_open(x, y) {
                return Err(CrError::OutOfBounds { x, y });
            }
            if current.is_leaf() {
                return Ok(current);
            }
            let i = ((x - current.sw.x) / current.width()).floor();
            let j = ((y - current.sw.y) / current.height()).floor();
            if i < 0.0 || j < 0.0 || i >= current.cells_by_x as f64 || j >= current.cells_by_y as f64
            {
                return Err(CrError::OutOfBounds { x, y });
            }
            let i = i as u32;
            let j = j as u32;
            let cell_number = (current.cells_by_y - 1 - j) * current.cells_by_x + i;
            current = &current.children[cell_number as usize];
        }
    }

    /// Draw `n` independent uniform points from `cell`'s open rectangle.
    pub fn sample_uniform(cell: &Cell, n: usize, rng: &mut impl Rng) -> Vec<Pt> {
        (0..n)
            .map(|_| {
                Pt::new(
                    rng.gen_range(cell.sw.x..cell.ne.x),
                    rng.gen_range(cell.sw.y..cell.ne.y),
                )
            })
            .collect()
    }

    /// Mark every listed leaf as DISCARDED. No-op for ids that don't resolve to a leaf.
    pub fn mark_discarded(&mut self, ids: &[CellId]) {
        for id in ids {
            if let Some(cell) = self.cell_by_id_mut(id) {
                if cell.is_leaf() {
                    cell.status = CellStatus::Discarded;
                }
            }
        }
    }

    /// Set the cluster label of a single leaf.
    pub fn set_cluster(&mut self, id: &CellId, cluster: i64) {
        if let Some(cell) = self.cell_by_id_mut(id) {
            if cell.is_leaf() {
                cell.cluster = cluster;
            }
        }
    }

    /// Total area covered by ACTIVE and DISCARDED leaves (used by the tiling property test).
    pub fn total_leaf_area(&self) -> f64 {
        self.leaves_all()
            .map(|c| (c.ne.x - c.sw.x) * (c.ne.y - c.sw.y))
            .sum()
    }

    pub fn root_area(&self) -> f64 {
        (self.root.ne.x - self.root.sw.x) * (self.root.ne.y - self.root.sw.y)
    }
}

/// Depth-first, explicit-stack iterator over ACTIVE leaves.
pub struct ActiveLeaves<'a> {
    stack: Vec<&'a Cell>,
}

impl<'a> Iterator for ActiveLeaves<'a> {
    type Item = &'a Cell;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cell) = self.stack.pop() {
            if cell.is_leaf() {
                if cell.status == CellStatus::Active {
                    return Some(cell);
                }
                continue;
            }
            for child in cell.children.iter().rev() {
                self.stack.push(child);
            }
        }
        None
    }
}

/// Depth-first, explicit-stack iterator over every leaf regardless of status.
pub struct AllLeaves<'a> {
    stack: Vec<&'a Cell>,
}

impl<'a> Iterator for AllLeaves<'a> {
    type Item = &'a Cell;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cell) = self.stack.pop() {
            if cell.is_leaf() {
                return Some(cell);
            }
            for child in cell.children.iter().rev() {
                self.stack.push(child);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(CellTree::new((1.0, 0.0, 0.0, 1.0)).is_err());
        assert!(CellTree::new((0.0, 0.0, 1.0, 1.0)).is_ok());
    }

    #[test]
    fn initial_fragment_tiles_exactly() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(4, 4);
        assert_eq!(tree.count_active(), 16);
        assert!((tree.total_leaf_area() - tree.root_area()).abs() < 1e-12);
    }

    #[test]
    fn row_numbering_is_top_down() {
        let mut tree = CellTree::new((0.0, 0.0, 2.0, 2.0)).unwrap();
        tree.initial_fragment(2, 2);
        // cell id 0 is the top-left (northernmost row, leftmost column) cell.
        let (cell, res) = tree.cell_by_id(&CellId::root().child(0));
        assert!(res.is_ok());
        assert!(cell.sw.y > 0.9 && cell.ne.y > 1.9);
        assert!(cell.sw.x < 0.1);
    }

    #[test]
    fn refine_only_splits_active_leaves() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(2, 2);
        let discarded_id = CellId::root().child(0);
        tree.mark_discarded(&[discarded_id.clone()]);
        tree.refine();

        let (discarded_cell, _) = tree.cell_by_id(&discarded_id);
        assert!(discarded_cell.is_leaf());
        assert_eq!(discarded_cell.status, CellStatus::Discarded);
        assert_eq!(tree.count_active(), 3 * 4);
    }

    #[test]
    fn cell_by_point_respects_open_boundary() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(2, 2);
        assert!(tree.cell_by_point(0.0, 0.5).is_err());
        assert!(tree.cell_by_point(1.0, 0.5).is_err());
        assert!(tree.cell_by_point(0.5, 0.5001).is_ok());
    }

    #[test]
    fn cell_by_id_round_trips() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(4, 4);
        for leaf in tree.leaves_active() {
            let (found, res) = tree.cell_by_id(&leaf.id);
            assert!(res.is_ok());
            assert_eq!(found.id, leaf.id);
        }
    }

    #[test]
    fn sample_uniform_stays_inside_open_rect() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(2, 2);
        let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
        let leaf = tree.leaves_active().next().unwrap();
        for p in CellTree::sample_uniform(leaf, 200, &mut rng) {
            assert!(p.x >= leaf.sw.x && p.x <= leaf.ne.x);
            assert!(p.y >= leaf.sw.y && p.y <= leaf.ne.y);
        }
    }

    #[test]
    fn monotone_pruning_survives_multiple_refines() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(2, 2);
        let id = CellId::root().child(1);
        tree.mark_discarded(&[id.clone()]);
        for _ in 0..3 {
            tree.refine();
            let (cell, _) = tree.cell_by_id(&id);
            assert!(cell.is_leaf());
            assert_eq!(cell.status, CellStatus::Discarded);
        }
    }
}
