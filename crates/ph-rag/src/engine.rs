//! RAG engine composing chunker, embedder, store, generator and metrics

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, info};

use ph_core::{
    Answer, Chunk, Context, Document, Embedder, EngineConfig, Error, Fragments, Generator,
    IngestReport, MetricsSnapshot, Result, StreamMetadata, VectorStore, citations_for,
};

use crate::chunker::Chunker;
use crate::embedder::HashingEmbedder;
use crate::generator::StubGenerator;
use crate::metrics::{MetricsTracker, elapsed_ms};
use crate::stream::AskStream;
use crate::vector_store::InMemoryVectorStore;

/// Local RAG engine.
///
/// Owns its store and metrics, so several engines can coexist in one process.
/// All operations take `&self`; share the engine between request handlers with
/// an `Arc`.
pub struct RagEngine<E = HashingEmbedder, G = StubGenerator, V = InMemoryVectorStore> {
    config: EngineConfig,
    chunker: Chunker,
    embedder: E,
    generator: G,
    store: V,
    metrics: MetricsTracker,
}

impl RagEngine {
    /// Create an engine with the hashing embedder, stub generator and in-memory store
    pub fn new(config: EngineConfig) -> Result<Self> {
        let embedder = HashingEmbedder::new(config.embedding_dim);
        let store = InMemoryVectorStore::new(config.embedding_dim);
        Self::with_components(config, embedder, StubGenerator::new(), store)
    }
}

impl<E: Embedder, G: Generator, V: VectorStore> RagEngine<E, G, V> {
    /// Create an engine from explicit components
    pub fn with_components(
        config: EngineConfig,
        embedder: E,
        generator: G,
        store: V,
    ) -> Result<Self> {
        config.validate()?;

        if embedder.dim() != store.dim() {
            return Err(Error::Configuration(format!(
                "embedder produces {}-dimensional vectors but the store holds {}",
                embedder.dim(),
                store.dim()
            )));
        }

        Ok(Self {
            chunker: Chunker::from_config(&config)?,
            config,
            embedder,
            generator,
            store,
            metrics: MetricsTracker::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Chunk documents with the configured window and index the chunks
    pub fn ingest(&self, documents: &[Document]) -> Result<IngestReport> {
        let chunks = self.chunker.chunk_all(documents);
        debug!(documents = documents.len(), chunks = chunks.len(), "Chunked documents");
        self.ingest_chunks(chunks)
    }

    /// Embed and upsert chunks, counting only what was newly stored.
    ///
    /// `indexed_docs` is the number of distinct titles among the chunks this
    /// call inserted.
    pub fn ingest_chunks(&self, chunks: Vec<Chunk>) -> Result<IngestReport> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts);

        let titles: Vec<String> = chunks.iter().map(|c| c.title.clone()).collect();
        let inserted = self.store.upsert_tracked(vectors, chunks)?;

        let new_titles: BTreeSet<&str> = inserted.iter().map(|&i| titles[i].as_str()).collect();
        let report = IngestReport {
            indexed_docs: new_titles.len(),
            indexed_chunks: inserted.len(),
        };

        info!(
            indexed_docs = report.indexed_docs,
            indexed_chunks = report.indexed_chunks,
            skipped = titles.len() - inserted.len(),
            "Ingested chunks"
        );
        Ok(report)
    }

    /// Return the `k` contexts most similar to `query`, best first.
    ///
    /// Empty or whitespace-only queries fail with `EmptyQuery`.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Context>> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        let vector = self.embedder.embed(query);

        let start = Instant::now();
        let contexts = self.store.search(&vector, k)?;
        let latency_ms = elapsed_ms(start);
        self.metrics.record_retrieval(latency_ms);

        debug!(k, hits = contexts.len(), latency_ms, "Retrieved contexts");
        Ok(contexts)
    }

    /// Generate a full answer and record its latency
    pub fn generate(&self, query: &str, contexts: &[Chunk]) -> String {
        let start = Instant::now();
        let answer = self.generator.generate(query, contexts);
        let latency_ms = elapsed_ms(start);
        self.metrics.record_generation(latency_ms);

        debug!(contexts = contexts.len(), latency_ms, "Generated answer");
        answer
    }

    /// Generate an answer as fragments.
    ///
    /// The recorded latency is the time until the first fragment is available.
    pub fn generate_stream(&self, query: &str, contexts: &[Chunk]) -> Fragments {
        let start = Instant::now();
        let fragments = self.generator.generate_stream(query, contexts);
        let latency_ms = elapsed_ms(start);
        self.metrics.record_generation(latency_ms);

        debug!(contexts = contexts.len(), latency_ms, "Started answer stream");
        fragments
    }

    /// Retrieve and answer in one call, with citations and current averages
    pub fn ask(&self, query: &str, k: usize) -> Result<Answer> {
        let contexts = self.retrieve(query, k)?;
        let chunks = to_chunks(&contexts);
        let answer = self.generate(query, &chunks);

        Ok(Answer {
            query: query.to_string(),
            answer,
            citations: citations_for(&contexts),
            chunks: contexts,
            metrics: self.stats().into(),
        })
    }

    /// Retrieve, then stream the answer as events
    pub fn ask_stream(&self, query: &str, k: usize) -> Result<AskStream<'_>> {
        let contexts = self.retrieve(query, k)?;
        let chunks = to_chunks(&contexts);
        let fragments = self.generate_stream(query, &chunks);

        let metadata = StreamMetadata {
            query: query.to_string(),
            citations: citations_for(&contexts),
            chunks: contexts,
        };
        Ok(AskStream::new(metadata, fragments, &self.metrics))
    }

    pub fn stats(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Number of chunks currently indexed
    pub fn index_size(&self) -> Result<usize> {
        self.store.len()
    }

    /// Drop every indexed chunk and zero the metrics
    pub fn reset(&self) -> Result<()> {
        self.store.clear()?;
        self.metrics.reset();
        info!("Engine reset");
        Ok(())
    }
}

fn to_chunks(contexts: &[Context]) -> Vec<Chunk> {
    contexts.iter().map(|c| c.chunk.clone()).collect()
}
