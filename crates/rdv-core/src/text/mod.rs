//! Hybrid text resolution: text layer first, OCR when it is too thin.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::models::document::ExtractedText;
use crate::ocr::OcrSource;
use crate::pdf::{char_count, PdfProcessor};

/// Chooses between the PDF text layer and OCR for one document.
pub struct HybridTextResolver<P, O> {
    pdf: P,
    ocr: O,
    min_text_length: usize,
}

impl<P: PdfProcessor, O: OcrSource> HybridTextResolver<P, O> {
    pub fn new(pdf: P, ocr: O) -> Self {
        Self {
            pdf,
            ocr,
            min_text_length: 50,
        }
    }

    /// Direct text must be longer than this (trimmed) to be trusted.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    /// Resolve the text of `path`. Never fails; both stages degrade to empty text.
    pub fn resolve_text(&self, path: &Path) -> ExtractedText {
        let pages = self.pdf.extract_pages(path).unwrap_or_else(|e| {
            warn!("Text layer unavailable for {}: {}", path.display(), e);
            Vec::new()
        });

        let direct = pages.join("\n");
        let trimmed = char_count(direct.trim());
        if trimmed > self.min_text_length {
            debug!("Using text layer: {} characters", trimmed);
            return ExtractedText::direct(direct, pages.iter().map(|p| char_count(p)).collect());
        }

        info!(
            "Text layer too short ({} <= {} characters), falling back to OCR",
            trimmed, self.min_text_length
        );
        let pages = self.ocr.ocr_pages(path);
        let page_chars = pages.iter().map(|p| char_count(p)).collect();
        ExtractedText::ocr(pages.join("\n"), page_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::models::document::TextSource;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct FakePdf(Option<Vec<String>>);

    impl FakePdf {
        fn pages(pages: &[&str]) -> Self {
            Self(Some(pages.iter().map(|p| p.to_string()).collect()))
        }

        fn broken() -> Self {
            Self(None)
        }
    }

    impl PdfProcessor for FakePdf {
        fn extract_pages(&self, _path: &Path) -> crate::pdf::Result<Vec<String>> {
            self.0
                .clone()
                .ok_or_else(|| PdfError::Parse("not a PDF".to_string()))
        }
    }

    struct CountingOcr {
        calls: Cell<usize>,
        pages: Vec<&'static str>,
    }

    impl CountingOcr {
        fn new(pages: Vec<&'static str>) -> Self {
            Self {
                calls: Cell::new(0),
                pages,
            }
        }
    }

    impl OcrSource for CountingOcr {
        fn ocr_pages(&self, _pdf: &Path) -> Vec<String> {
            self.calls.set(self.calls.get() + 1);
            self.pages.iter().map(|p| p.to_string()).collect()
        }
    }

    const LONG_PAGE: &str = "CONECTCAR EXTRATO DE UTILIZACAO\nPraca Jacarei 11,00\nTOTAL 22,00";

    #[test]
    fn test_rich_text_layer_skips_ocr() {
        let resolver = HybridTextResolver::new(
            FakePdf::pages(&[LONG_PAGE, "second page"]),
            CountingOcr::new(vec!["ocr"]),
        );

        let text = resolver.resolve_text(Path::new("a.pdf"));
        assert_eq!(text.source, TextSource::Direct);
        assert_eq!(text.text, format!("{}\nsecond page", LONG_PAGE));
        assert_eq!(text.page_chars, vec![LONG_PAGE.chars().count(), 11]);
        assert_eq!(resolver.ocr.calls.get(), 0);
    }

    #[test]
    fn test_thin_text_layer_falls_back_once() {
        let resolver = HybridTextResolver::new(
            FakePdf::pages(&["  Total  "]),
            CountingOcr::new(vec!["Total: R$ 75,23", "page two"]),
        );

        let text = resolver.resolve_text(Path::new("scan.pdf"));
        assert_eq!(text.source, TextSource::Ocr);
        assert_eq!(text.text, "Total: R$ 75,23\npage two");
        assert_eq!(resolver.ocr.calls.get(), 1);
    }

    #[test]
    fn test_exactly_threshold_is_not_enough() {
        let fifty = "x".repeat(50);
        let resolver = HybridTextResolver::new(
            FakePdf::pages(&[&fifty]),
            CountingOcr::new(vec![]),
        );

        let text = resolver.resolve_text(Path::new("a.pdf"));
        assert_eq!(text.source, TextSource::Ocr);
        assert_eq!(resolver.ocr.calls.get(), 1);
    }

    #[test]
    fn test_zero_pages_falls_back() {
        let resolver = HybridTextResolver::new(FakePdf::pages(&[]), CountingOcr::new(vec![]));

        let text = resolver.resolve_text(Path::new("empty.pdf"));
        assert_eq!(text.source, TextSource::Ocr);
        assert_eq!(resolver.ocr.calls.get(), 1);
    }

    #[test]
    fn test_both_stages_failing_yields_empty_ocr_text() {
        let resolver = HybridTextResolver::new(FakePdf::broken(), CountingOcr::new(vec![]));

        let text = resolver.resolve_text(Path::new("broken.pdf"));
        assert_eq!(text, ExtractedText::ocr(String::new(), vec![]));
        assert_eq!(resolver.ocr.calls.get(), 1);
    }

    #[test]
    fn test_real_text_layer_resolves_without_ocr() {
        use crate::amount::resolve_amount;
        use crate::models::document::{Category, ExtractionResult};
        use crate::pdf::{single_page_pdf, PdfExtractor};
        use rust_decimal::Decimal;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Extrato_Conectcar.pdf");
        std::fs::write(
            &path,
            single_page_pdf("CONECTCAR EXTRATO DE UTILIZACAO PRACA JACAREI TOTAL 22,00"),
        )
        .unwrap();

        let resolver = HybridTextResolver::new(PdfExtractor::new(), CountingOcr::new(vec!["TOTAL 99,00"]));
        let text = resolver.resolve_text(&path);

        assert_eq!(text.source, TextSource::Direct);
        assert_eq!(text.page_chars.len(), 1);
        assert_eq!(resolver.ocr.calls.get(), 0);
        assert_eq!(
            resolve_amount(&text.text, Category::Toll),
            ExtractionResult::Found(Decimal::new(2200, 2))
        );
    }

    #[test]
    fn test_custom_threshold() {
        let resolver = HybridTextResolver::new(
            FakePdf::pages(&["TOTAL 22,00"]),
            CountingOcr::new(vec![]),
        )
        .with_min_text_length(5);

        assert_eq!(
            resolver.resolve_text(Path::new("a.pdf")).source,
            TextSource::Direct
        );
    }
}
