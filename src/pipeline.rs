//! Stage orchestration: features -> TF-IDF -> SVD -> distances -> graph.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::Array2;
use tracing::info;

use crate::compute::{pairwise_cosine_distance, pairwise_cosine_distance_sparse, DistanceMatrix};
use crate::config::PipelineConfig;
use crate::corpus::Corpus;
use crate::error::{GraphError, Result};
use crate::graph::{reduce_to_undirected, write_pajek_file, Graph, GraphPolicy};
use crate::vectorizer::compute_tfidf;

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub graph: Graph,
    pub distances: DistanceMatrix,
    /// documents × k, absent when SVD is disabled
    pub embedding: Option<Array2<f64>>,
}

/// One configured pipeline, reusable across corpora
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    policy: GraphPolicy,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.graph_policy();
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn policy(&self) -> GraphPolicy {
        self.policy
    }

    /// `<stem>_thresh<t>.net` or `<stem>_knn<k>.net`
    pub fn output_path<P: AsRef<Path>>(&self, stem: P) -> PathBuf {
        let stem = stem.as_ref();
        let name = format!(
            "{}_{}.net",
            stem.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default(),
            self.policy.file_suffix()
        );
        stem.with_file_name(name)
    }

    /// Run every stage over `corpus`
    ///
    /// Size-dependent parameters are checked before any matrix is built.
    pub fn run(&self, corpus: &Corpus) -> Result<PipelineOutput> {
        let n = corpus.len();
        if n == 0 {
            return Err(GraphError::InvalidParameter("corpus has no usable documents".to_string()));
        }
        self.policy.check(n)?;
        let svd = self.config.truncated_svd();
        if let Some(svd) = &svd {
            if svd.rank >= n {
                return Err(GraphError::InvalidDimension { rank: svd.rank, documents: n });
            }
        }

        let start = Instant::now();
        let tf = corpus.feature_matrix(self.config.features.normalization)?;
        info!(
            documents = n,
            terms = tf.cols(),
            nnz = tf.nnz(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "features extracted"
        );

        let start = Instant::now();
        let tfidf = compute_tfidf(&tf, &corpus.vocabulary)?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "tf-idf weighted");

        let start = Instant::now();
        let (embedding, distances) = match svd {
            Some(svd) => {
                let embedding = svd.reduce(&tfidf)?;
                info!(
                    rank = svd.rank,
                    embedding = ?svd.embedding,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "svd reduced"
                );
                let distances = pairwise_cosine_distance(embedding.view());
                (Some(embedding), distances)
            }
            None => (None, pairwise_cosine_distance_sparse(&tfidf)),
        };
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "distances computed");

        let start = Instant::now();
        let similarity = distances.similarity();
        let mut graph = self.policy.build(&corpus.labels, similarity.view())?;
        let directed = graph.edge_count();
        if self.config.graph.symmetrize {
            graph = reduce_to_undirected(graph);
        }
        info!(
            policy = %self.policy.file_suffix(),
            directed_edges = directed,
            edges = graph.edge_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "graph built"
        );

        Ok(PipelineOutput {
            graph,
            distances,
            embedding,
        })
    }

    /// Pajek file for a finished run
    pub fn write<P, L>(&self, output: &PipelineOutput, labels: &[L], path: P) -> Result<()>
    where
        P: AsRef<Path>,
        L: AsRef<str>,
    {
        let path = path.as_ref();
        write_pajek_file(path, labels, &output.graph)?;
        info!(path = %path.display(), edges = output.graph.edge_count(), "graph written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyKind;
    use crate::corpus::CorpusBuilder;

    fn corpus() -> Corpus {
        CorpusBuilder::from_tokens(vec![
            ("rust.pdf", vec!["rust", "borrow", "checker", "rust", "lifetime"]),
            ("ownership.pdf", vec!["rust", "borrow", "ownership", "lifetime"]),
            ("graph.pdf", vec!["graph", "edge", "node", "pajek"]),
            ("network.pdf", vec!["graph", "network", "node", "edge", "edge"]),
            ("blank.pdf", vec![]),
            ("svd.pdf", vec!["matrix", "singular", "value", "rank"]),
        ])
    }

    fn config(policy: PolicyKind, dims: Option<usize>) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.graph.policy = policy;
        config.graph.knn_k = 2;
        config.graph.weight_threshold = 0.5;
        match dims {
            Some(k) => config.svd.reduced_dimensions = k,
            None => config.svd.enabled = false,
        }
        config
    }

    #[test]
    fn end_to_end_knn_with_svd() {
        let corpus = corpus();
        assert_eq!(corpus.len(), 5);
        let mut cfg = config(PolicyKind::Knn, Some(3));
        cfg.graph.symmetrize = false;
        let output = Pipeline::new(cfg).unwrap().run(&corpus).unwrap();

        assert_eq!(output.embedding.as_ref().map(|e| e.dim()), Some((5, 3)));
        assert_eq!(output.graph.node_count(), 5);
        for node in 0..5 {
            assert_eq!(output.graph.out_degree(node), 2);
            assert!(!output.graph.contains_edge(node, node));
        }
        for i in 0..5 {
            assert_eq!(output.distances.get(i, i), 0.0);
            for j in 0..5 {
                assert_eq!(output.distances.get(i, j), output.distances.get(j, i));
            }
        }
    }

    #[test]
    fn threshold_without_svd_links_related_documents() {
        let corpus = corpus();
        let output = Pipeline::new(config(PolicyKind::Threshold, None)).unwrap().run(&corpus).unwrap();
        assert!(output.embedding.is_none());

        let rust = corpus.labels.iter().position(|l| l == "rust.pdf").unwrap();
        let ownership = corpus.labels.iter().position(|l| l == "ownership.pdf").unwrap();
        let svd = corpus.labels.iter().position(|l| l == "svd.pdf").unwrap();
        assert!(output.graph.contains_edge(rust, ownership));
        assert!(!output.graph.contains_edge(ownership, rust));
        assert_eq!(output.graph.out_degree(svd), 0);
        for (src, dst, weight) in output.graph.edges() {
            assert!(src < dst);
            assert!(weight > 0.5);
        }
    }

    #[test]
    fn invalid_sizes_abort_before_writing() {
        let corpus = corpus();
        let dir = tempfile::tempdir().unwrap();

        let mut cfg = config(PolicyKind::Knn, None);
        cfg.graph.knn_k = 4;
        let pipeline = Pipeline::new(cfg).unwrap();
        let path = pipeline.output_path(dir.path().join("docs"));
        let err = pipeline.run(&corpus).unwrap_err();
        assert!(matches!(err, GraphError::InvalidParameter(_)));
        assert!(!path.exists());

        let err = Pipeline::new(config(PolicyKind::Threshold, Some(5))).unwrap().run(&corpus).unwrap_err();
        assert!(matches!(err, GraphError::InvalidDimension { rank: 5, documents: 5 }));
    }

    #[test]
    fn writes_named_pajek_file() {
        let corpus = corpus();
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config(PolicyKind::Knn, Some(2))).unwrap();
        let path = pipeline.output_path(dir.path().join("docs"));
        assert_eq!(path.file_name().unwrap(), "docs_knn2.net");

        let output = pipeline.run(&corpus).unwrap();
        pipeline.write(&output, &corpus.labels, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("*Vertices 5\n1 \"rust.pdf\"\n"));
        assert_eq!(text.lines().filter(|l| !l.starts_with('*')).count(), 5 + output.graph.edge_count());
    }

    #[test]
    fn threshold_file_name() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.output_path("out/corpus"), PathBuf::from("out/corpus_thresh0.75.net"));
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = Pipeline::new(PipelineConfig::default()).unwrap().run(&Corpus::default()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidParameter(_)));
    }
}
