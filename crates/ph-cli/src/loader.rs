//! Directory-backed document source

use async_trait::async_trait;
use futures::future::try_join_all;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use ph_core::{Document, DocumentSource, Error, Result};

/// Loads `*.md` and `*.txt` files from one directory (non-recursive).
///
/// Files are read in file-name order. Markdown files become one document per
/// heading section; text files become a single document. The file name is the title.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
}

impl DirectoryLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            Error::DocumentSource(format!("Cannot read {}: {}", self.dir.display(), e))
        })?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("md") | Some("markdown") | Some("txt") => files.push(path),
                _ => debug!(path = %path.display(), "Skipping unsupported file"),
            }
        }

        files.sort();
        Ok(files)
    }
}

async fn load_file(path: PathBuf) -> Result<Vec<Document>> {
    let content = tokio::fs::read_to_string(&path).await?;
    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let is_markdown = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("md") | Some("markdown")
    );

    if is_markdown {
        return Ok(split_markdown(&title, &content));
    }

    let text = content.trim();
    if text.is_empty() {
        warn!(path = %path.display(), "Skipping empty file");
        return Ok(Vec::new());
    }
    Ok(vec![Document::new(title, text)])
}

#[async_trait]
impl DocumentSource for DirectoryLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        let files = self.list_files().await?;
        let per_file = try_join_all(files.into_iter().map(load_file)).await?;
        let documents: Vec<Document> = per_file.into_iter().flatten().collect();

        debug!(dir = %self.dir.display(), documents = documents.len(), "Loaded documents");
        Ok(documents)
    }
}

/// Split markdown into one document per heading section.
///
/// The heading text becomes the section; text before the first heading has no
/// section. Sections without body text are dropped.
pub fn split_markdown(title: &str, source: &str) -> Vec<Document> {
    let mut documents = Vec::new();
    let mut section: Option<String> = None;
    let mut heading: Option<String> = None;
    let mut body_start = 0;

    for (event, range) in Parser::new(source).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                let body = &source[body_start..range.start];
                push_section(&mut documents, title, section.take(), body);
                heading = Some(String::new());
            }
            Event::End(TagEnd::Heading(_)) => {
                section = heading.take().map(|h| h.trim().to_string());
                body_start = range.end;
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = heading.as_mut() {
                    heading.push_str(&text);
                }
            }
            _ => {}
        }
    }

    push_section(&mut documents, title, section, &source[body_start..]);
    documents
}

fn push_section(documents: &mut Vec<Document>, title: &str, section: Option<String>, body: &str) {
    let text = body.trim();
    if text.is_empty() {
        return;
    }

    documents.push(Document {
        title: title.to_string(),
        section,
        text: text.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_markdown_sections() {
        let source = "Intro line.\n\n\
                      # Coverage\n\nWarranty covers defects for 1 year.\n\n\
                      ## Exclusions\n\nWater damage is `not` covered.\n";
        let docs = split_markdown("Warranty_Policy.md", source);

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].section, None);
        assert_eq!(docs[0].text, "Intro line.");
        assert_eq!(docs[1].section.as_deref(), Some("Coverage"));
        assert_eq!(docs[1].text, "Warranty covers defects for 1 year.");
        assert_eq!(docs[2].section.as_deref(), Some("Exclusions"));
        assert_eq!(docs[2].text, "Water damage is `not` covered.");
        assert!(docs.iter().all(|d| d.title == "Warranty_Policy.md"));
    }

    #[test]
    fn test_heading_with_inline_code() {
        let docs = split_markdown("Api.md", "# The `ask` call\n\nBody");
        assert_eq!(docs[0].section.as_deref(), Some("The ask call"));
    }

    #[test]
    fn test_empty_sections_dropped() {
        let docs = split_markdown("Empty.md", "# One\n\n# Two\n\ncontent\n");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].section.as_deref(), Some("Two"));
    }

    #[test]
    fn test_setext_heading() {
        let source = "Timeline\n========\n\nReturns accepted within 30 days\n";
        let docs = split_markdown("Setext.md", source);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].section.as_deref(), Some("Timeline"));
        assert_eq!(docs[0].text, "Returns accepted within 30 days");
    }
}
