//! Splits documents into overlapping fixed-size windows
//!
//! Sizes and offsets are counted in Unicode scalar values (`char`s), never bytes,
//! so a window boundary can not split a multi-byte character.

use ph_core::config::validate_chunking;
use ph_core::{Chunk, Document, EngineConfig, Result};

/// Fixed-window chunker with overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    /// Create a chunker, failing with `InvalidConfig` unless `0 <= overlap < size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_chunking(chunk_size, chunk_overlap)?;
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split one document. Text no longer than the window yields exactly one chunk.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let section = document.section.clone().unwrap_or_default();
        split_windows(&document.text, self.chunk_size, self.chunk_overlap)
            .into_iter()
            .map(|text| Chunk {
                title: document.title.clone(),
                section: section.clone(),
                text,
            })
            .collect()
    }

    /// Split a sequence of documents, preserving document order
    pub fn chunk_all(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|doc| self.chunk(doc)).collect()
    }
}

/// Chunk a single document with explicit parameters
pub fn chunk_document(document: &Document, size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    Ok(Chunker::new(size, overlap)?.chunk(document))
}

fn split_windows(text: &str, size: usize, overlap: usize) -> Vec<String> {
    // Byte offset of every char, plus the end of the string
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    if char_count <= size {
        return vec![text.to_string()];
    }

    let mut windows = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + size).min(char_count);
        windows.push(text[bounds[start]..bounds[end]].to_string());

        if end >= char_count {
            break;
        }

        start = end - overlap;
    }

    windows
}
