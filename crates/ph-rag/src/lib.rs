//! Retrieval-augmented generation engine for Policy Helper
//!
//! This crate provides the chunker, the hashing embedder, the in-memory vector
//! store, the template generator, latency metrics and the engine composing them.

mod chunker;
mod embedder;
mod engine;
mod generator;
mod metrics;
mod stream;
mod vector_store;

#[cfg(test)]
mod tests;

pub use chunker::{Chunker, chunk_document};
pub use embedder::{HashingEmbedder, dot, l2_norm};
pub use engine::RagEngine;
pub use generator::StubGenerator;
pub use metrics::MetricsTracker;
pub use stream::AskStream;
pub use vector_store::InMemoryVectorStore;

// Re-export core types for convenience
pub use ph_core::{
    Answer, AnswerMetrics, AskEvent, Chunk, Citation, Context, Document, Embedder,
    EngineConfig, Error, Fragments, Generator, IngestReport, MetricsSnapshot, Result,
    StreamMetadata, VectorStore,
};
