use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::{CrError, CrResult};
use crate::geometry::{Cell, CellId, CellStatus, CellTree};
use crate::mapping::Mapping2D;

use super::SymbolicImageGraph;

/// Builds a [`SymbolicImageGraph`] over the tree's current active leaves.
///
/// Sampling is embarrassingly parallel over leaves: each leaf's local edge list is computed
/// independently on `rayon`'s pool, seeded deterministically from `seed` and the leaf's position
/// in traversal order so the result is reproducible for a fixed seed regardless of how the pool
/// schedules work; the per-leaf results are then merged single-threadedly, matching the
/// dense-field `par_iter_mut`-then-merge idiom this crate's Monte-Carlo sampling follows.
pub fn build(
    tree: &CellTree,
    mapping: &dyn Mapping2D,
    samples_per_cell: usize,
    seed: u64,
) -> CrResult<SymbolicImageGraph> {
    if samples_per_cell < 1 {
        return Err(CrError::InvalidConfig(
            "samples_per_cell must be >= 1".to_string(),
        ));
    }

    let leaves: Vec<&Cell> = tree.leaves_active().collect();

    let mut graph = SymbolicImageGraph::new();
    for leaf in &leaves {
        graph.ensure_node(&leaf.id);
    }

    let per_leaf_edges: Vec<(CellId, Vec<CellId>)> = leaves
        .par_iter()
        .enumerate()
        .map(|(index, leaf)| {
            let mut rng = rand::rngs::SmallRng::seed_from_u64(seed.wrapping_add(index as u64));
            let samples = CellTree::sample_uniform(leaf, samples_per_cell, &mut rng);

            let mut destinations = Vec::new();
            for p in samples {
                let (qx, qy) = mapping.eval(p.x, p.y);

                // A non-finite mapping result is treated identically to out-of-bounds.
                if !qx.is_finite() || !qy.is_finite() {
                    break;
                }

                let destination = match tree.cell_by_point(qx, qy) {
                    Ok(cell) => cell,
                    // Out of the root bounds: abort sampling the rest of this leaf.
                    Err(_) => break,
                };

                if destination.status == CellStatus::Discarded {
                    break;
                }

                destinations.push(destination.id.clone());
            }

            (leaf.id.clone(), destinations)
        })
        .collect();

    for (from_id, destinations) in per_leaf_edges {
        let from = graph.node_id(&from_id).expect("leaf registered above");
        for to_id in destinations {
            let to = graph.node_id(&to_id).expect("destination is an active leaf");
            graph.add_edge(from, to);
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{IdentityX, IdentityY, PairMapping};

    #[test]
    fn identity_mapping_gives_every_leaf_a_self_loop() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(4, 4);
        let mapping = PairMapping::new(IdentityX, IdentityY);

        let graph = build(&tree, &mapping, 20, 7).unwrap();
        assert_eq!(graph.node_count(), 16);
        for node in 0..graph.node_count() {
            assert!(graph.has_self_loop(node), "node {node} missing self-loop");
        }
    }

    #[test]
    fn rejects_zero_samples_per_cell() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(2, 2);
        let mapping = PairMapping::new(IdentityX, IdentityY);
        assert!(matches!(
            build(&tree, &mapping, 0, 1),
            Err(CrError::InvalidConfig(_))
        ));
    }

    #[test]
    fn out_of_bounds_mapping_produces_no_edges() {
        let mut tree = CellTree::new((0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.initial_fragment(2, 2);
        let mapping = PairMapping::new(
            |x: f64, _y: f64| x + 10.0,
            |_x: f64, y: f64| y,
        );

        let graph = build(&tree, &mapping, 10, 3).unwrap();
        for node in 0..graph.node_count() {
            assert!(graph.out_neighbors(node).is_empty());
        }
    }
}
