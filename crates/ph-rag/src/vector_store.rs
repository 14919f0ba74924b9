//! In-memory vector store with hash-based deduplication

use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ph_core::{Chunk, Context, Error, Result, VectorStore};

use crate::embedder::dot;

/// A stored embedding with the chunk it came from and that chunk's content hash
#[derive(Debug, Clone)]
struct EmbeddingRecord {
    vector: Vec<f32>,
    meta: Chunk,
    hash: String,
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<EmbeddingRecord>,
    seen: HashSet<String>,
}

/// Local in-memory vector store.
///
/// Search is a full linear scan, O(records * dim) per query, which is fine for
/// corpora up to the low tens of thousands of chunks. Vectors are expected to be
/// unit length so that the dot product is the cosine similarity.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    dim: usize,
    state: RwLock<StoreState>,
}

impl InMemoryVectorStore {
    /// Create an empty store for `dim`-component vectors
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            state: RwLock::new(StoreState::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))
    }

    fn check_dim(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Stored chunks in insertion order
    pub fn chunks(&self) -> Result<Vec<Chunk>> {
        Ok(self.read()?.records.iter().map(|r| r.meta.clone()).collect())
    }

    /// Content hashes of the stored chunks in insertion order
    pub fn content_hashes(&self) -> Result<Vec<String>> {
        Ok(self.read()?.records.iter().map(|r| r.hash.clone()).collect())
    }

    /// Whether a chunk with the same content hash is already stored
    pub fn contains(&self, chunk: &Chunk) -> Result<bool> {
        Ok(self.read()?.seen.contains(&chunk.content_hash()))
    }
}

impl VectorStore for InMemoryVectorStore {
    fn dim(&self) -> usize {
        self.dim
    }

    fn upsert_tracked(&self, vectors: Vec<Vec<f32>>, metas: Vec<Chunk>) -> Result<Vec<usize>> {
        if vectors.len() != metas.len() {
            return Err(Error::ShapeMismatch {
                vectors: vectors.len(),
                metas: metas.len(),
            });
        }
        // Validate everything before taking the lock so a bad batch leaves no trace
        for vector in &vectors {
            self.check_dim(vector)?;
        }
        let hashes: Vec<String> = metas.iter().map(Chunk::content_hash).collect();

        let mut state = self.write()?;
        let mut inserted = Vec::new();

        for (i, ((vector, meta), hash)) in vectors.into_iter().zip(metas).zip(hashes).enumerate() {
            if state.seen.contains(&hash) {
                continue;
            }
            state.seen.insert(hash.clone());
            state.records.push(EmbeddingRecord { vector, meta, hash });
            inserted.push(i);
        }

        Ok(inserted)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Context>> {
        self.check_dim(query)?;

        let state = self.read()?;
        let mut scored: Vec<(usize, f32)> = state
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (i, dot(query, &record.vector)))
            .collect();

        // Highest score first; earlier insertion wins ties
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| Context::new(state.records[i].meta.clone(), score))
            .collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read()?.records.len())
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.write()?;
        state.records.clear();
        state.seen.clear();
        Ok(())
    }
}
