use ndarray::ArrayView2;
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::utils::rank::Ranking;

/// Graph construction policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphPolicy {
    /// keep `i -> j` when `similarity[i, j] > threshold`
    Threshold(f64),
    /// keep the `k` most similar nodes of every node
    Knn(usize),
}

impl GraphPolicy {
    pub fn build<L>(&self, labels: &[L], similarity: ArrayView2<f64>) -> Result<Graph> {
        match *self {
            GraphPolicy::Threshold(thresh) => threshold_graph(labels, similarity, thresh),
            GraphPolicy::Knn(k) => knn_graph(labels, similarity, k),
        }
    }

    /// Fails early when the policy cannot be applied to `node_count` nodes
    pub fn check(&self, node_count: usize) -> Result<()> {
        match *self {
            GraphPolicy::Threshold(thresh) if !thresh.is_finite() => Err(GraphError::InvalidParameter(format!(
                "threshold must be finite, got {thresh}"
            ))),
            GraphPolicy::Threshold(_) => Ok(()),
            GraphPolicy::Knn(k) => check_knn(k, node_count),
        }
    }

    /// Suffix used in output file names, `thresh0.75` or `knn5`
    pub fn file_suffix(&self) -> String {
        match self {
            GraphPolicy::Threshold(thresh) => format!("thresh{thresh}"),
            GraphPolicy::Knn(k) => format!("knn{k}"),
        }
    }
}

fn check_shape<L>(labels: &[L], similarity: &ArrayView2<f64>) -> Result<usize> {
    let n = labels.len();
    let (rows, cols) = similarity.dim();
    if rows != n {
        return Err(GraphError::DimensionMismatch { expected: n, found: rows });
    }
    if cols != n {
        return Err(GraphError::DimensionMismatch { expected: n, found: cols });
    }
    Ok(n)
}

fn check_knn(k: usize, node_count: usize) -> Result<()> {
    if k == 0 || k >= node_count.saturating_sub(1) {
        return Err(GraphError::InvalidParameter(format!(
            "k-NN needs 0 < k < N - 1, got k = {k} with N = {node_count}"
        )));
    }
    Ok(())
}

/// Directed edge `i -> j` for every `i != j` with `similarity[i, j] > thresh`
pub fn threshold_graph<L>(labels: &[L], similarity: ArrayView2<f64>, thresh: f64) -> Result<Graph> {
    let n = check_shape(labels, &similarity)?;
    let mut graph = Graph::new(n);
    for ((i, j), &sim) in similarity.indexed_iter() {
        if i != j && sim > thresh {
            graph.add_edge(i, j, sim);
        }
    }
    debug!(nodes = n, edges = graph.edge_count(), thresh, "threshold graph built");
    Ok(graph)
}

/// Directed edges from every node to its `k` most similar other nodes
///
/// Candidates are ranked by descending similarity, ties by ascending index.
pub fn knn_graph<L>(labels: &[L], similarity: ArrayView2<f64>, k: usize) -> Result<Graph> {
    let n = check_shape(labels, &similarity)?;
    check_knn(k, n)?;

    let mut graph = Graph::new(n);
    for (i, row) in similarity.outer_iter().enumerate() {
        let mut ranking = Ranking::new(
            row.iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, &sim)| (j, sim))
                .collect(),
        );
        ranking.sort_by_score_desc().truncate(k);
        for &(j, sim) in ranking.list.iter() {
            graph.add_edge(i, j, sim);
        }
    }
    debug!(nodes = n, edges = graph.edge_count(), k, "k-NN graph built");
    Ok(graph)
}
