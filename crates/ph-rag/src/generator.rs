//! Template-based stub generator

use ph_core::{Chunk, Generator};

const DEFAULT_SNIPPET_CHARS: usize = 200;

/// Deterministic generator that answers by quoting the retrieved contexts.
///
/// Every context contributes one cited line, and the answer ends with a
/// `Sources:` line listing `title (section)` for each of them, so a reader can
/// see which documents informed the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubGenerator {
    snippet_chars: usize,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self {
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }

    /// Limit how many characters of each context are quoted
    pub fn with_snippet_chars(snippet_chars: usize) -> Self {
        Self {
            snippet_chars: snippet_chars.max(1),
        }
    }

    fn snippet(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        match collapsed.char_indices().nth(self.snippet_chars) {
            Some((cut, _)) => format!("{}...", collapsed[..cut].trim_end()),
            None => collapsed,
        }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn source_label(chunk: &Chunk) -> String {
    if chunk.section.is_empty() {
        chunk.title.clone()
    } else {
        format!("{} ({})", chunk.title, chunk.section)
    }
}

impl Generator for StubGenerator {
    fn generate(&self, query: &str, contexts: &[Chunk]) -> String {
        let query = query.trim();

        if contexts.is_empty() {
            return format!(
                "I could not find relevant context in the indexed documents for \"{}\". \
                 Try rephrasing the question or ingesting more documents.",
                query
            );
        }

        let mut answer = format!(
            "Based on {} retrieved passage{} for \"{}\":\n",
            contexts.len(),
            if contexts.len() == 1 { "" } else { "s" },
            query
        );

        for (i, chunk) in contexts.iter().enumerate() {
            answer.push_str(&format!(
                "{}. [{}] {}\n",
                i + 1,
                source_label(chunk),
                self.snippet(&chunk.text)
            ));
        }

        let sources: Vec<String> = contexts.iter().map(source_label).collect();
        answer.push_str(&format!("Sources: {}", sources.join("; ")));

        answer
    }
}
