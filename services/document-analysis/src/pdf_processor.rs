//! PDF Processor
//!
//! Extracts text from PDF documents page by page.

use doc_analyzer_utils::{AnalyzerError, AnalyzerResult};
use lopdf::Document;
use tracing::{debug, warn};

/// PDF processing result
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Page texts joined with newlines, one segment per page.
    pub text: String,
    pub pages: Vec<PageContent>,
}

/// Single page content
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub page_number: u32,
    pub text: String,
}

impl PdfContent {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// PDF processor
#[derive(Debug, Default)]
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract content from PDF bytes.
    ///
    /// Only an unreadable document is an error. A page whose text cannot be
    /// extracted contributes an empty segment so the page count is preserved.
    pub fn extract(&self, data: &[u8]) -> AnalyzerResult<PdfContent> {
        let document = Document::load_mem(data)
            .map_err(|e| AnalyzerError::decode(format!("Failed to parse PDF: {}", e)))?;

        let pages: Vec<PageContent> = document
            .get_pages()
            .into_keys()
            .map(|page_number| PageContent {
                page_number,
                text: extract_page_text(&document, page_number),
            })
            .collect();

        let text = pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(pages = pages.len(), chars = text.len(), "Extracted PDF text");

        Ok(PdfContent { text, pages })
    }
}

fn extract_page_text(document: &Document, page_number: u32) -> String {
    match document.extract_text(&[page_number]) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(page = page_number, error = %e, "No extractable text on page");
            String::new()
        }
    }
}
