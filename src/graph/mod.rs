//! Weighted document graph: construction policies, symmetrization and
//! Pajek output.

use std::collections::BTreeMap;

pub mod builder;
pub mod pajek;
pub mod symmetrize;

pub use builder::{knn_graph, threshold_graph, GraphPolicy};
pub use pajek::{write_matrix_pajek, write_pajek, write_pajek_file};
pub use symmetrize::reduce_to_undirected;

/// Sparse adjacency over nodes `0..node_count`
///
/// source -> neighbors sorted by destination, so iteration and
/// serialization order are deterministic. Weights are similarities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    node_count: usize,
    adjacency: BTreeMap<usize, Vec<(usize, f64)>>,
}

impl Graph {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            adjacency: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Insert or overwrite the directed edge `src -> dst`
    ///
    /// Self-loops and out-of-range nodes are rejected and return `false`.
    pub fn add_edge(&mut self, src: usize, dst: usize, weight: f64) -> bool {
        if src == dst || src >= self.node_count || dst >= self.node_count {
            return false;
        }
        let neighbors = self.adjacency.entry(src).or_default();
        match neighbors.binary_search_by_key(&dst, |&(n, _)| n) {
            Ok(pos) => neighbors[pos].1 = weight,
            Err(pos) => neighbors.insert(pos, (dst, weight)),
        }
        true
    }

    /// Remove `src -> dst`, returning its weight
    pub fn remove_edge(&mut self, src: usize, dst: usize) -> Option<f64> {
        let neighbors = self.adjacency.get_mut(&src)?;
        let pos = neighbors.binary_search_by_key(&dst, |&(n, _)| n).ok()?;
        let (_, weight) = neighbors.remove(pos);
        if neighbors.is_empty() {
            self.adjacency.remove(&src);
        }
        Some(weight)
    }

    pub fn weight(&self, src: usize, dst: usize) -> Option<f64> {
        let neighbors = self.adjacency.get(&src)?;
        neighbors
            .binary_search_by_key(&dst, |&(n, _)| n)
            .ok()
            .map(|pos| neighbors[pos].1)
    }

    #[inline]
    pub fn contains_edge(&self, src: usize, dst: usize) -> bool {
        self.weight(src, dst).is_some()
    }

    /// (destination, weight) pairs of `src`, by destination
    pub fn neighbors(&self, src: usize) -> &[(usize, f64)] {
        self.adjacency.get(&src).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn out_degree(&self, src: usize) -> usize {
        self.neighbors(src).len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Every edge as (source, destination, weight), by source then destination
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&src, neighbors)| neighbors.iter().map(move |&(dst, w)| (src, dst, w)))
    }
}
