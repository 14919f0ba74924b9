//! Vector store trait

use crate::{Chunk, Context, Result};

/// Trait for vector stores holding chunk embeddings
///
/// Stores deduplicate by chunk content hash: inserting a chunk whose
/// `(title, section, text)` is already present is a silent no-op.
/// Implementations must be safe to share between threads; an upsert is
/// observed by concurrent searches either entirely or not at all.
pub trait VectorStore: Send + Sync {
    /// Dimension every stored vector must have
    fn dim(&self) -> usize;

    /// Insert parallel vectors and chunks, skipping duplicates.
    ///
    /// Returns the input positions that were actually inserted, in input order.
    fn upsert_tracked(&self, vectors: Vec<Vec<f32>>, metas: Vec<Chunk>) -> Result<Vec<usize>>;

    /// Insert parallel vectors and chunks, returning how many were new
    fn upsert(&self, vectors: Vec<Vec<f32>>, metas: Vec<Chunk>) -> Result<usize> {
        Ok(self.upsert_tracked(vectors, metas)?.len())
    }

    /// Return up to `k` stored chunks ranked by similarity to `query`
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Context>>;

    /// Number of stored records
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Drop every record and forget every seen hash
    fn clear(&self) -> Result<()>;
}
