//! Engine configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

/// Configuration for the retrieval engine and the document loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Window length in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive windows
    pub chunk_overlap: usize,
    pub embedding_dim: usize,
    /// Default number of contexts retrieved per question
    pub top_k: usize,
    pub data_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 700,
            chunk_overlap: 80,
            embedding_dim: 384,
            top_k: 4,
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables (and a `.env` file if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            chunk_size: parse_or(&lookup, "PH_CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_or(&lookup, "PH_CHUNK_OVERLAP", defaults.chunk_overlap)?,
            embedding_dim: parse_or(&lookup, "PH_EMBEDDING_DIM", defaults.embedding_dim)?,
            top_k: parse_or(&lookup, "PH_TOP_K", defaults.top_k)?,
            data_dir: lookup("PH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        };

        config.validate()?;
        Ok(config)
    }

    /// Set the chunk window and overlap
    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        validate_chunking(self.chunk_size, self.chunk_overlap)?;

        if self.embedding_dim == 0 {
            return Err(Error::Configuration(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(Error::Configuration(
                "top_k must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Reject window sizes the chunker cannot make progress with
pub fn validate_chunking(chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::InvalidConfig(
            "chunk size must be greater than zero".to_string(),
        ));
    }
    if chunk_overlap >= chunk_size {
        return Err(Error::InvalidConfig(format!(
            "chunk overlap ({}) must be smaller than chunk size ({})",
            chunk_overlap, chunk_size
        )));
    }
    Ok(())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            Error::Configuration(format!("{} has an invalid value: {:?}", key, raw))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 700);
        assert_eq!(config.chunk_overlap, 80);
        assert_eq!(config.embedding_dim, 384);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("PH_CHUNK_SIZE", "200"),
            ("PH_CHUNK_OVERLAP", " 20 "),
            ("PH_DATA_DIR", "/srv/docs"),
        ]))
        .unwrap();

        assert_eq!(config.chunk_size, 200);
        assert_eq!(config.chunk_overlap, 20);
        assert_eq!(config.embedding_dim, 384);
        assert_eq!(config.data_dir, PathBuf::from("/srv/docs"));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = EngineConfig::from_lookup(lookup_from(&[("PH_TOP_K", "four")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let err = EngineConfig::default().with_chunking(100, 100).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = validate_chunking(0, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut config = EngineConfig::default();
        config.embedding_dim = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }
}
