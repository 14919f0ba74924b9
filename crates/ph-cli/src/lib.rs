//! Document loading and terminal interface for Policy Helper

mod loader;
mod ui;


pub use loader::{DirectoryLoader, split_markdown};
pub use ui::{
    display_banner, print_answer, print_citations, print_help, print_ingest_report, print_stats,
    read_query,
};

// Re-export core types
pub use ph_core::{Error, Result};
