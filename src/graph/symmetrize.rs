use crate::graph::Graph;

/// Collapse reciprocal directed pairs into one edge
///
/// When both `i -> j` and `j -> i` exist, the edge whose source is the
/// lower index survives with its own weight. One-way edges are kept as
/// they are. Edges are only ever removed.
pub fn reduce_to_undirected(mut graph: Graph) -> Graph {
    // collect first, then mutate
    let reciprocal: Vec<(usize, usize)> = graph
        .edges()
        .filter(|&(src, dst, _)| src > dst && graph.contains_edge(dst, src))
        .map(|(src, dst, _)| (src, dst))
        .collect();

    for (src, dst) in reciprocal {
        graph.remove_edge(src, dst);
    }
    graph
}
