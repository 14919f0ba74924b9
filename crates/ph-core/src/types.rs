//! Common types used across Policy Helper

use serde::{Deserialize, Serialize};

/// A contiguous slice of a source document plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    pub title: String,
    pub section: String,
    pub text: String,
}

impl Chunk {
    pub fn new(
        title: impl Into<String>,
        section: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            section: section.into(),
            text: text.into(),
        }
    }

    /// Content hash over `(title, section, text)`, used as the dedup key.
    ///
    /// Each field is prefixed with its byte length, so two chunks hash equal
    /// only when all three fields are equal.
    pub fn content_hash(&self) -> String {
        let mut ctx = md5::Context::new();
        for field in [&self.title, &self.section, &self.text] {
            ctx.consume((field.len() as u64).to_le_bytes());
            ctx.consume(field.as_bytes());
        }
        format!("{:x}", ctx.compute())
    }

    pub fn citation(&self) -> Citation {
        Citation {
            title: self.title.clone(),
            section: self.section.clone(),
        }
    }
}

/// A chunk retrieved for a query, with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub score: f32,
}

impl Context {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }

    pub fn title(&self) -> &str {
        &self.chunk.title
    }

    pub fn section(&self) -> &str {
        &self.chunk.section
    }

    pub fn text(&self) -> &str {
        &self.chunk.text
    }

    pub fn into_chunk(self) -> Chunk {
        self.chunk
    }
}

/// Source reference attached to an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub section: String,
}

/// Outcome of an ingestion call, counting only what was newly stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Distinct titles among the chunks inserted by this call
    pub indexed_docs: usize,
    /// Chunks inserted by this call, after deduplication
    pub indexed_chunks: usize,
}

/// Running latency averages since the engine was created or last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub avg_retrieval_latency_ms: f64,
    pub avg_generation_latency_ms: f64,
    pub retrieval_count: u64,
    pub generation_count: u64,
}

/// Latency figures attached to an answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerMetrics {
    pub retrieval_ms: f64,
    pub generation_ms: f64,
}

impl From<MetricsSnapshot> for AnswerMetrics {
    fn from(snapshot: MetricsSnapshot) -> Self {
        Self {
            retrieval_ms: snapshot.avg_retrieval_latency_ms,
            generation_ms: snapshot.avg_generation_latency_ms,
        }
    }
}

/// A complete answer to a question, with the sources that informed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub query: String,
    pub answer: String,
    pub citations: Vec<Citation>,
    pub chunks: Vec<Context>,
    pub metrics: AnswerMetrics,
}

/// Header of a streamed answer, sent before any fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamMetadata {
    pub query: String,
    pub citations: Vec<Citation>,
    pub chunks: Vec<Context>,
}

/// One event of a streamed answer.
///
/// Serializes as `{"type": "metadata" | "chunk" | "metrics", "data": ...}` so a
/// transport can forward each event as one server-sent event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AskEvent {
    Metadata(StreamMetadata),
    Chunk(String),
    Metrics(AnswerMetrics),
}

/// Collect citations for a list of contexts, preserving rank order
pub fn citations_for(contexts: &[Context]) -> Vec<Citation> {
    contexts.iter().map(|c| c.chunk.citation()).collect()
}
