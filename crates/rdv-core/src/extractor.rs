//! Document-to-amount facade used by callers.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::amount::ValueResolver;
use crate::error::Result;
use crate::models::config::RdvConfig;
use crate::models::document::{Category, Document, ExtractedText, ExtractionResult};
use crate::models::report::FileOutcome;
use crate::ocr::{OcrFallback, OcrSource};
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::text::HybridTextResolver;

/// Extracts one amount per document: hybrid text resolution followed by
/// category-specific value resolution.
pub struct AmountExtractor<P = PdfExtractor, O = OcrFallback> {
    text: HybridTextResolver<P, O>,
}

impl AmountExtractor {
    /// Build the default pipeline (text layer + configured OCR backend).
    pub fn from_config(config: &RdvConfig) -> Result<Self> {
        let ocr = OcrFallback::from_config(config)?;
        let text = HybridTextResolver::new(PdfExtractor::new(), ocr)
            .with_min_text_length(config.pdf.min_text_length);
        Ok(Self { text })
    }
}

impl<P: PdfProcessor, O: OcrSource> AmountExtractor<P, O> {
    pub fn new(text: HybridTextResolver<P, O>) -> Self {
        Self { text }
    }

    /// Resolved text of a document, for diagnostics.
    pub fn extract_text(&self, document: &Document) -> ExtractedText {
        self.extract_text_at(document.path())
    }

    /// Resolved text of the PDF at `path`. Text resolution does not depend
    /// on the category.
    pub fn extract_text_at(&self, path: &Path) -> ExtractedText {
        self.text.resolve_text(path)
    }

    /// Extract the amount of `document` according to its category.
    pub fn extract_amount(&self, document: &Document) -> ExtractionResult {
        let text = self.extract_text(document);
        debug!(
            "{}: {} characters from {} text",
            document.name(),
            text.text.chars().count(),
            text.source
        );

        let result = ValueResolver::new(document.category()).resolve(&text.text);
        match result {
            ExtractionResult::Found(amount) => {
                info!("{} ({}): {}", document.name(), document.category(), amount)
            }
            ExtractionResult::NotFound => {
                info!("{} ({}): no amount found", document.name(), document.category())
            }
        }
        result
    }

    /// Extract and wrap the result as a reportable outcome.
    pub fn process(&self, document: &Document) -> FileOutcome {
        let amount = self.extract_amount(document).amount();
        FileOutcome::success(document.category(), document.name(), amount)
    }

    /// Open `path` with a declared category string and process it.
    ///
    /// Unknown categories and unreadable paths become failed outcomes.
    pub fn process_path(&self, path: &Path, category: &str) -> FileOutcome {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let category = match category.parse::<Category>() {
            Ok(category) => category,
            Err(e) => {
                warn!("{}: {}", name, e);
                return FileOutcome::failure(None, name, e);
            }
        };

        match Document::open(path, category) {
            Ok(document) => self.process(&document),
            Err(e) => {
                warn!("{}: {}", name, e);
                FileOutcome::failure(Some(category), name, e)
            }
        }
    }
}
