//! Source documents and the trait for whatever supplies them

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A raw document handed to the engine for chunking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub text: String,
}

impl Document {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            section: None,
            text: text.into(),
        }
    }

    /// Attach a section name
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

/// Trait for document suppliers (a directory loader, a fixture list, ...)
///
/// The engine treats the returned documents as an ordered sequence and places no
/// other constraint on enumeration order.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load every document the source currently holds
    async fn load(&self) -> Result<Vec<Document>>;
}
