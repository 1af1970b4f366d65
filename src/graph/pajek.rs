//! Pajek `.net` output.
//!
//! ```text
//! *Vertices 3
//! 1 "a"
//! 2 "b"
//! 3 "c"
//! *Edges
//! 1 2 0.5
//! ```
//!
//! Node ids are 1-based in the file.

use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::ArrayView2;
use tempfile::NamedTempFile;

use crate::error::{GraphError, Result};
use crate::graph::Graph;

fn write_vertices<W: Write, L: AsRef<str>>(out: &mut W, labels: &[L]) -> Result<()> {
    writeln!(out, "*Vertices {}", labels.len())?;
    for (id, label) in labels.iter().enumerate() {
        writeln!(out, "{} \"{}\"", id + 1, label.as_ref())?;
    }
    Ok(())
}

/// Write `graph` with one vertex line per label
pub fn write_pajek<W: Write, L: AsRef<str>>(mut out: W, labels: &[L], graph: &Graph) -> Result<()> {
    check_labels(labels, graph)?;
    write_vertices(&mut out, labels)?;
    writeln!(out, "*Edges")?;
    for (src, dst, weight) in graph.edges() {
        writeln!(out, "{} {} {}", src + 1, dst + 1, weight)?;
    }
    out.flush()?;
    Ok(())
}

fn check_labels<L>(labels: &[L], graph: &Graph) -> Result<()> {
    if labels.len() != graph.node_count() {
        return Err(GraphError::DimensionMismatch {
            expected: graph.node_count(),
            found: labels.len(),
        });
    }
    Ok(())
}

/// [`write_pajek`] into a file at `path`
///
/// Written to a temporary file in the same directory and renamed into
/// place, so `path` is either the complete graph or untouched.
pub fn write_pajek_file<P: AsRef<Path>, L: AsRef<str>>(path: P, labels: &[L], graph: &Graph) -> Result<()> {
    let path = path.as_ref();
    check_labels(labels, graph)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        write_pajek(&mut out, labels, graph)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| GraphError::Io(err.error))?;
    Ok(())
}

/// Write a symmetric weight matrix directly
///
/// Only the upper triangle is read; a pair becomes an edge when its
/// weight exceeds `thresh`.
pub fn write_matrix_pajek<W: Write, L: AsRef<str>>(
    mut out: W,
    labels: &[L],
    weights: ArrayView2<f64>,
    thresh: f64,
) -> Result<()> {
    let n = labels.len();
    if weights.dim() != (n, n) {
        return Err(GraphError::DimensionMismatch {
            expected: n,
            found: weights.nrows(),
        });
    }
    write_vertices(&mut out, labels)?;
    writeln!(out, "*Edges")?;
    for i in 0..n {
        for j in (i + 1)..n {
            let w = weights[[i, j]];
            if w > thresh {
                writeln!(out, "{} {} {}", i + 1, j + 1, w)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn three_node_graph_exact_output() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 0.5);
        let mut buf = Vec::new();
        write_pajek(&mut buf, &["a", "b", "c"], &g).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "*Vertices 3\n1 \"a\"\n2 \"b\"\n3 \"c\"\n*Edges\n1 2 0.5\n"
        );
    }

    #[test]
    fn empty_edge_list() {
        let g = Graph::new(1);
        let mut buf = Vec::new();
        write_pajek(&mut buf, &["only"], &g).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "*Vertices 1\n1 \"only\"\n*Edges\n");
    }

    #[test]
    fn label_count_must_match() {
        let g = Graph::new(2);
        let err = write_pajek(Vec::new(), &["a"], &g).unwrap_err();
        assert!(matches!(err, GraphError::DimensionMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn matrix_writer_uses_upper_triangle() {
        let w = arr2(&[[1.0, 0.8, 0.1], [0.8, 1.0, 0.25], [0.1, 0.25, 1.0]]);
        let mut buf = Vec::new();
        write_matrix_pajek(&mut buf, &["x", "y", "z"], w.view(), 0.2).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "*Vertices 3\n1 \"x\"\n2 \"y\"\n3 \"z\"\n*Edges\n1 2 0.8\n2 3 0.25\n"
        );
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.net");
        let mut g = Graph::new(2);
        g.add_edge(0, 1, 0.75);
        write_pajek_file(&path, &["p.pdf".to_string(), "q.pdf".to_string()], &g).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("*Edges\n1 2 0.75\n"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn mismatched_labels_leave_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.net");
        let err = write_pajek_file(&path, &["a"], &Graph::new(2)).unwrap_err();
        assert!(matches!(err, GraphError::DimensionMismatch { expected: 2, found: 1 }));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_rewrite_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.net");
        let mut g = Graph::new(2);
        g.add_edge(0, 1, 0.9);
        write_pajek_file(&path, &["a", "b"], &g).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(write_pajek_file(&path, &["a", "b", "c"], &g).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
