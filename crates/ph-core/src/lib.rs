//! Core traits and types for Policy Helper
//!
//! This crate defines the data model shared by the retrieval engine and its callers,
//! plus the capability traits at the seams: embedding, answer generation, vector
//! storage and document supply. Concrete implementations live in `ph-rag` and `ph-cli`.

pub mod config;
pub mod document;
pub mod embedder;
pub mod error;
pub mod generator;
pub mod types;
pub mod vector_store;


pub use config::EngineConfig;
pub use document::{Document, DocumentSource};
pub use embedder::Embedder;
pub use error::{Error, Result};
pub use generator::{Fragments, Generator};
pub use types::*;
pub use vector_store::VectorStore;
