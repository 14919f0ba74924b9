//! Deterministic hashing embedder
//!
//! Text is lowercased and split into word tokens. Every token, and every
//! character trigram of the padded token, is hashed with MD5 into one of `dim`
//! buckets; a second digest byte picks the sign so that collisions tend to cancel
//! out instead of piling up. The result is L2-normalized. MD5 keeps the mapping
//! identical across processes and toolchains, which `DefaultHasher` does not promise.

use regex::Regex;
use std::sync::LazyLock;

use ph_core::Embedder;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("token pattern is valid"));

const TOKEN_WEIGHT: f64 = 1.0;
const TRIGRAM_WEIGHT: f64 = 0.25;

/// Bag-of-tokens embedder using signed feature hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing `dim`-component vectors.
    ///
    /// A zero dimension is bumped to one; `EngineConfig::validate` rejects it earlier.
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn add_feature(&self, features: &mut [f64], feature: &str, weight: f64) {
        let digest = md5::compute(feature.as_bytes()).0;
        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dim as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        features[bucket] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut features = vec![0.0f64; self.dim];
        let lowered = text.to_lowercase();

        for token in TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()) {
            self.add_feature(&mut features, token, TOKEN_WEIGHT);

            let padded: Vec<char> = std::iter::once('#')
                .chain(token.chars())
                .chain(std::iter::once('#'))
                .collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut features, &format!("3:{}", trigram), TRIGRAM_WEIGHT);
            }
        }

        let norm = features.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            // No tokens: fall back to the first basis vector
            let mut fallback = vec![0.0f32; self.dim];
            fallback[0] = 1.0;
            return fallback;
        }

        features.iter().map(|x| (x / norm) as f32).collect()
    }
}

/// Dot product; equals cosine similarity on unit vectors
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_returns_correct_dimension() {
        let embedder = HashingEmbedder::new(384);
        assert_eq!(embedder.embed("test text").len(), 384);
        assert_eq!(HashingEmbedder::new(16).embed("test text").len(), 16);
    }

    #[test]
    fn test_embed_deterministic() {
        let text = "What is the warranty policy?";
        let first = HashingEmbedder::new(384).embed(text);
        let second = HashingEmbedder::new(384).embed(text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_embed_l2_normalized() {
        let embedder = HashingEmbedder::default();
        let texts = [
            "Test document",
            "a",
            "Returns accepted within 30 days",
            "Ünïcödé text 42",
        ];
        for text in texts {
            let norm = l2_norm(&embedder.embed(text));
            assert!((norm - 1.0).abs() < 1e-6, "norm of {:?} was {}", text, norm);
        }
    }

    #[test]
    fn test_empty_text_uses_fallback() {
        let embedder = HashingEmbedder::new(8);
        let expected = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(embedder.embed(""), expected);
        assert_eq!(embedder.embed("  ?! "), expected);
    }

    #[test]
    fn test_case_insensitive() {
        let embedder = HashingEmbedder::default();
        assert_eq!(embedder.embed("Warranty"), embedder.embed("warranty"));
    }

    #[test]
    fn test_lexical_overlap_scores_higher() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed("warranty");
        let related = embedder.embed("Warranty covers defects for 1 year");
        let unrelated = embedder.embed("Returns accepted within 30 days");

        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[test]
    fn test_embed_batch_matches_single() {
        let embedder = HashingEmbedder::new(32);
        let batch = embedder.embed_batch(&["one", "two"]);
        assert_eq!(batch, vec![embedder.embed("one"), embedder.embed("two")]);
    }
}
