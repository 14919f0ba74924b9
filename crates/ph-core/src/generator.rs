//! Answer generator trait and the fragment iterator used for streaming

use std::iter::FusedIterator;

use crate::Chunk;

/// Trait for answer generators (the deterministic template stub today,
/// a model-backed generator later).
///
/// `generate` must return a non-empty answer even without contexts, and when
/// contexts are present the answer must name the titles/sections it drew on.
pub trait Generator: Send + Sync {
    /// Produce the full answer for `query` given ranked contexts
    fn generate(&self, query: &str, contexts: &[Chunk]) -> String;

    /// Produce the same answer as an ordered sequence of fragments.
    ///
    /// Concatenating every fragment reproduces `generate(query, contexts)` exactly.
    fn generate_stream(&self, query: &str, contexts: &[Chunk]) -> Fragments {
        Fragments::new(self.generate(query, contexts))
    }
}

/// Word-granular fragments of an answer.
///
/// Each fragment is one word plus the single whitespace character that follows
/// it, so runs of whitespace come out as their own one-character fragments.
/// Fragments are never empty and the iterator is finite and single-pass.
#[derive(Debug)]
pub struct Fragments {
    answer: String,
    pos: usize,
}

impl Fragments {
    pub fn new(answer: String) -> Self {
        Self { answer, pos: 0 }
    }

    /// Text not yet yielded
    pub fn remaining(&self) -> &str {
        &self.answer[self.pos..]
    }
}

impl Iterator for Fragments {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let rest = self.remaining();
        if rest.is_empty() {
            return None;
        }

        let len = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(rest.len());

        let fragment = rest[..len].to_string();
        self.pos += len;
        Some(fragment)
    }
}

impl FusedIterator for Fragments {}
