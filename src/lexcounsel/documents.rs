//! Document loading and the lexical citation ranker.
//!
//! [`select_sources`] is a deliberately naive term-overlap ranker: it scores
//! each document by the total case-insensitive substring count of the query's
//! word tokens, then extracts one bounded snippet per selected document. It is
//! fully deterministic for identical inputs, which the discussion tests rely
//! on.

use std::fs;
use std::path::Path;

use crate::lexcounsel::schema::{Document, Source};

/// File extensions ingested by [`load_documents`].
const TEXT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Default number of citations produced per discussion.
pub const DEFAULT_MAX_SOURCES: usize = 3;

/// Default snippet window in characters.
pub const DEFAULT_SNIPPET_LEN: usize = 220;

/// Load `.txt` and `.md` files from `data_dir` in sorted filename order.
///
/// A missing directory is not an error: it logs a warning and yields an empty
/// set, matching the intake flow where users may not upload anything.
pub fn load_documents(data_dir: &Path) -> Vec<Document> {
    if !data_dir.exists() {
        log::warn!("Data directory not found: {}", data_dir.display());
        return Vec::new();
    }

    let mut paths: Vec<_> = match fs::read_dir(data_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect(),
        Err(err) => {
            log::warn!("Could not read {}: {}", data_dir.display(), err);
            return Vec::new();
        }
    };
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());
        match ext.as_deref() {
            Some(ext) if TEXT_EXTENSIONS.contains(&ext) => {}
            _ => continue,
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("Skipping unreadable file {}: {}", path.display(), err);
                continue;
            }
        };
        documents.push(Document {
            doc_id: format!("doc-{}", documents.len() + 1),
            path: path.to_string_lossy().into_owned(),
            content,
        });
    }

    documents
}

/// Rank `documents` against `query` and return up to `max_sources` citations.
///
/// Scoring is total substring count of the lowercase query tokens (length > 2)
/// in the lowercase content; ties keep input order. Documents with empty
/// content are skipped. Each citation carries a snippet window starting 40
/// characters before the first token hit, or the head of the document when no
/// token occurs.
pub fn select_sources(
    documents: &[Document],
    query: &str,
    max_sources: usize,
    snippet_len: usize,
) -> Vec<Source> {
    let terms = query_terms(query);

    let mut scored: Vec<(usize, &Document)> = documents
        .iter()
        .map(|doc| {
            let content_lower = doc.content.to_lowercase();
            let score = terms
                .iter()
                .map(|term| content_lower.matches(term.as_str()).count())
                .sum();
            (score, doc)
        })
        .collect();
    // Stable sort keeps input order on ties.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut sources = Vec::new();
    for (_, doc) in scored {
        if doc.content.trim().is_empty() {
            continue;
        }
        let snippet = find_snippet(&doc.content, &terms, snippet_len);
        sources.push(Source {
            filename: file_name(&doc.path),
            snippet,
        });
        if sources.len() >= max_sources {
            break;
        }
    }

    sources
}

/// Lowercase word tokens of length > 2 extracted from the query.
fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| token.chars().count() > 2)
        .map(|token| token.to_string())
        .collect()
}

/// Snippet window around the first query-term hit, falling back to the head
/// of the document.
fn find_snippet(content: &str, terms: &[String], snippet_len: usize) -> String {
    let content_lower = content.to_lowercase();
    for term in terms {
        if let Some(idx) = content_lower.find(term.as_str()) {
            let start = floor_char_boundary(content, idx.saturating_sub(40));
            let end = floor_char_boundary(content, (start + snippet_len).min(content.len()));
            return clean_snippet(content[start..end].trim());
        }
    }

    let end = floor_char_boundary(content, snippet_len.min(content.len()));
    clean_snippet(&content[..end])
}

/// Collapse all runs of whitespace into single spaces.
fn clean_snippet(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
