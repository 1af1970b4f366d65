//! tfidf-doc-graph CLI
//!
//! Commands:
//! - build: extract a document tree and write its similarity graph

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tfidf_doc_graph::corpus::{find_documents, write_flat_text};
use tfidf_doc_graph::{
    ConfigOverrides, Corpus, CorpusBuilder, Embedding, FeatureCache, PdfToText, Pipeline, PipelineConfig, PlainText, PolicyKind,
    Stoplist, TextExtractor,
};

#[derive(Parser, Debug)]
#[command(name = "tfidf-doc-graph")]
#[command(about = "Build a weighted document similarity graph from a text corpus")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract documents and write the graph
    Build(BuildArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Directory searched recursively for documents
    #[arg(long, required_unless_present = "load_cache")]
    root: Option<PathBuf>,

    /// File extension to collect; `pdf` runs pdftotext, anything else is read as text
    #[arg(long, default_value = "pdf")]
    extension: String,

    /// Whitespace separated stopword file
    #[arg(long)]
    stoplist: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feature cache path, written after extraction unless --load-cache
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Read features from --cache instead of extracting
    #[arg(long, requires = "cache")]
    load_cache: bool,

    /// Output path without suffix; `_thresh<t>.net` or `_knn<k>.net` is appended
    #[arg(long, default_value = "graph")]
    output_stem: PathBuf,

    /// Also write the document list (one label per line)
    #[arg(long)]
    doc_list: Option<PathBuf>,

    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Similarity threshold for the threshold policy
    #[arg(long)]
    threshold: Option<f64>,

    /// Neighbors per node for the k-NN policy
    #[arg(long)]
    k: Option<usize>,

    /// SVD rank
    #[arg(long)]
    dims: Option<usize>,

    /// Skip SVD, measure distances on sparse TF-IDF rows
    #[arg(long)]
    no_svd: bool,

    /// Embed documents as U·Σ instead of U
    #[arg(long)]
    scores: bool,

    /// pdftotext binary
    #[arg(long, default_value = "pdftotext")]
    pdftotext: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Threshold,
    Knn,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Threshold => PolicyKind::Threshold,
            PolicyArg::Knn => PolicyKind::Knn,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Build(args) => build(args),
    }
}

fn load_config(args: &BuildArgs) -> Result<PipelineConfig> {
    let overrides = ConfigOverrides {
        policy: args.policy.map(PolicyKind::from),
        weight_threshold: args.threshold,
        knn_k: args.k,
        reduced_dimensions: args.dims,
        disable_svd: args.no_svd,
        embedding: args.scores.then_some(Embedding::Scores),
    };
    PipelineConfig::resolve(args.config.as_deref(), &overrides).context("Failed to load configuration")
}

fn extractor(args: &BuildArgs) -> Result<Box<dyn TextExtractor>> {
    let stoplist = match &args.stoplist {
        Some(path) => Stoplist::load(path).with_context(|| format!("Failed to read stoplist {}", path.display()))?,
        None => Stoplist::new(),
    };
    info!(words = stoplist.len(), "stoplist loaded");
    Ok(if args.extension.eq_ignore_ascii_case("pdf") {
        Box::new(PdfToText::new(args.pdftotext.clone(), stoplist))
    } else {
        Box::new(PlainText::new(stoplist))
    })
}

fn load_corpus(args: &BuildArgs) -> Result<Corpus> {
    if args.load_cache {
        let path = cache_path(args)?;
        let cache = FeatureCache::load(path).with_context(|| format!("Failed to load cache {}", path.display()))?;
        return cache.into_corpus().context("Feature cache is inconsistent");
    }

    let root = args.root.as_deref().context("--root is required without --load-cache")?;
    let paths = find_documents(root, &args.extension)
        .with_context(|| format!("Failed to walk {}", root.display()))?;
    info!(root = %root.display(), files = paths.len(), "documents found");

    let extractor = extractor(args)?;
    let corpus = CorpusBuilder::from_paths(&paths, extractor.as_ref()).context("Failed to extract corpus")?;

    if let Some(path) = &args.cache {
        FeatureCache::from_corpus(&corpus)
            .save(path)
            .with_context(|| format!("Failed to write cache {}", path.display()))?;
    }
    Ok(corpus)
}

fn cache_path(args: &BuildArgs) -> Result<&Path> {
    args.cache.as_deref().context("--load-cache needs --cache")
}

fn build(args: BuildArgs) -> Result<()> {
    let start = Instant::now();
    let config = load_config(&args)?;
    let pipeline = Pipeline::new(config).context("Invalid configuration")?;

    let corpus = load_corpus(&args)?;
    if let Some(path) = &args.doc_list {
        write_flat_text(path, &corpus.labels)
            .with_context(|| format!("Failed to write document list {}", path.display()))?;
    }

    let output = pipeline.run(&corpus).context("Pipeline failed")?;
    let path = pipeline.output_path(&args.output_stem);
    pipeline
        .write(&output, &corpus.labels, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        documents = corpus.len(),
        excluded = corpus.excluded.len(),
        edges = output.graph.edge_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "done"
    );
    println!("{}", path.display());
    Ok(())
}
