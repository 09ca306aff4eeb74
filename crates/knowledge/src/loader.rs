//! PDF loading into page-level documents.

use crate::document::SearchDocument;
use lexlink_core::{AppError, AppResult};
use serde_json::json;
use std::path::Path;

/// Parse PDF bytes into one document per page that has text.
///
/// Each document carries `source`, `loc.pageNumber` (1-based) and
/// `pdf.totalPages` metadata.
pub fn load_pdf_bytes(bytes: &[u8], source: &str) -> AppResult<Vec<SearchDocument>> {
    let pdf = lopdf::Document::load_mem(bytes)
        .map_err(|e| AppError::Knowledge(format!("Failed to parse PDF '{}': {}", source, e)))?;

    let pages = pdf.get_pages();
    let total_pages = pages.len();

    let mut texts = Vec::with_capacity(total_pages);
    for page_number in pages.keys() {
        match pdf.extract_text(&[*page_number]) {
            Ok(text) => texts.push((*page_number, text)),
            Err(e) => {
                tracing::warn!(source, page = page_number, "Skipping page without extractable text: {}", e);
            }
        }
    }

    let documents = page_documents(texts, total_pages, source);
    tracing::debug!(
        source,
        total_pages,
        documents = documents.len(),
        "Loaded PDF"
    );

    Ok(documents)
}

/// Read and parse a PDF file; the path becomes the document source.
pub fn load_pdf_file(path: &Path) -> AppResult<Vec<SearchDocument>> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Knowledge(format!("Failed to read PDF {:?}: {}", path, e)))?;
    load_pdf_bytes(&bytes, &path.display().to_string())
}

fn page_documents(
    pages: impl IntoIterator<Item = (u32, String)>,
    total_pages: usize,
    source: &str,
) -> Vec<SearchDocument> {
    pages
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(page_number, text)| {
            SearchDocument::new(text, source)
                .with_meta("pdf", json!({ "totalPages": total_pages }))
                .with_meta("loc", json!({ "pageNumber": page_number }))
        })
        .collect()
}
