//! PDF text-layer extraction.

mod extractor;

pub use extractor::PdfExtractor;
#[cfg(test)]
pub(crate) use extractor::tests::single_page_pdf;

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for direct (non-OCR) text extraction.
pub trait PdfProcessor {
    /// Extract the text layer of each page, in page order.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// Number of characters on a page, as used for yield reporting.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}
