use std::collections::HashMap;

use crate::geometry::CellId;

/// The directed graph over active cell ids induced by mapping sampled points between cells.
///
/// Nodes are dense `usize` indices assigned in insertion order (the order leaves were visited
/// while building the image); [`SymbolicImageGraph::node_id`] maps a [`CellId`] back to that
/// index. Edge multiplicity is not recorded, and self-loops are kept rather than discarded.
#[derive(Debug, Clone, Default)]
pub struct SymbolicImageGraph {
    node_ids: Vec<CellId>,
    index_of: HashMap<CellId, usize>,
    out_edges: Vec<Vec<usize>>,
}

impl SymbolicImageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` as a node if it isn't already one, returning its dense index.
    pub fn ensure_node(&mut self, id: &CellId) -> usize {
        if let Some(&index) = self.index_of.get(id) {
            return index;
        }
        let index = self.node_ids.len();
        self.node_ids.push(id.clone());
        self.out_edges.push(Vec::new());
        self.index_of.insert(id.clone(), index);
        index
    }

    pub fn node_id(&self, id: &CellId) -> Option<usize> {
        self.index_of.get(id).copied()
    }

    pub fn cell_id(&self, node: usize) -> &CellId {
        &self.node_ids[node]
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Add a deduplicated directed edge `from -> to`. Both endpoints must already be nodes.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        let edges = &mut self.out_edges[from];
        if !edges.contains(&to) {
            edges.push(to);
        }
    }

    pub fn out_neighbors(&self, node: usize) -> &[usize] {
        &self.out_edges[node]
    }

    pub fn has_self_loop(&self, node: usize) -> bool {
        self.out_edges[node].contains(&node)
    }

    pub fn iter_node_ids(&self) -> impl Iterator<Item = &CellId> {
        self.node_ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_parallel_edges_and_keeps_self_loops() {
        let mut graph = SymbolicImageGraph::new();
        let a = graph.ensure_node(&CellId::root().child(0));
        let b = graph.ensure_node(&CellId::root().child(1));

        graph.add_edge(a, b);
        graph.add_edge(a, b);
        graph.add_edge(a, a);

        assert_eq!(graph.out_neighbors(a), &[b, a]);
        assert!(graph.has_self_loop(a));
        assert!(!graph.has_self_loop(b));
    }
}
