use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use tfidf_doc_graph::compute::{pairwise_cosine_distance, TruncatedSvd};
use tfidf_doc_graph::vectorizer::compute_tfidf;
use tfidf_doc_graph::{Corpus, CorpusBuilder, Normalization, Pipeline, PipelineConfig, PolicyKind};

/// Zipf-ish synthetic corpus, fixed seed
fn synthetic_corpus(documents: usize, vocabulary: usize, length: usize) -> Corpus {
    let mut rng = StdRng::seed_from_u64(42);
    let docs: Vec<(String, Vec<String>)> = (0..documents)
        .map(|i| {
            let tokens = (0..length)
                .map(|_| {
                    let u: f64 = rng.random();
                    let rank = ((vocabulary as f64).powf(u) as usize).min(vocabulary - 1);
                    format!("term{rank}")
                })
                .collect();
            (format!("doc{i}.pdf"), tokens)
        })
        .collect();
    CorpusBuilder::from_tokens(docs)
}

fn pipeline_benchmark(c: &mut Criterion) {
    let corpus = synthetic_corpus(400, 5_000, 800);

    c.bench_function("build_corpus", |b| {
        b.iter(|| synthetic_corpus(100, 5_000, 800));
    });

    let tf = corpus.feature_matrix(Normalization::Max).expect("features");
    c.bench_function("compute_tfidf", |b| {
        b.iter(|| compute_tfidf(&tf, &corpus.vocabulary).expect("tfidf"));
    });

    let tfidf = compute_tfidf(&tf, &corpus.vocabulary).expect("tfidf");
    c.bench_function("truncated_svd_k50", |b| {
        b.iter(|| TruncatedSvd::new(50).reduce(&tfidf).expect("svd"));
    });

    let embedding = TruncatedSvd::new(50).reduce(&tfidf).expect("svd");
    c.bench_function("pairwise_cosine_distance", |b| {
        b.iter(|| pairwise_cosine_distance(embedding.view()));
    });

    let mut config = PipelineConfig::default();
    config.graph.policy = PolicyKind::Knn;
    config.svd.reduced_dimensions = 50;
    let pipeline = Pipeline::new(config).expect("config");
    c.bench_function("pipeline_knn", |b| {
        b.iter(|| pipeline.run(&corpus).expect("run"));
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
