//! Embedder trait

/// Trait for text embedders
///
/// Implementations must be pure functions of their input: the same text always
/// maps to the same vector, with exactly `dim()` components and unit L2 norm.
pub trait Embedder: Send + Sync {
    /// Number of components in every produced vector
    fn dim(&self) -> usize;

    /// Embed a single piece of text
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Embed several texts, preserving order
    fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
