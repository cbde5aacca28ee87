//! PDF text extraction using lopdf and pdf-extract.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use lopdf::Document;
use tracing::debug;

use super::{char_count, PdfProcessor, Result};
use crate::error::PdfError;

/// Text-layer extractor. Holds no per-document state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Parse the container and return bytes suitable for text extraction.
    ///
    /// Encrypted files are decrypted with the empty password and re-serialized,
    /// since pdf-extract cannot read them otherwise.
    pub fn load(&self, data: &[u8]) -> Result<(Document, Vec<u8>)> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok((doc, raw_data))
    }

    /// Extract per-page text from in-memory PDF bytes.
    pub fn extract_pages_from_mem(&self, data: &[u8]) -> Result<Vec<String>> {
        let (_doc, raw_data) = self.load(data)?;

        let pages = catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&raw_data)
        }))
        .map_err(|panic| PdfError::Panicked(panic_message(panic.as_ref())))?
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let mut total = 0;
        for (i, page) in pages.iter().enumerate() {
            let chars = char_count(page);
            total += chars;
            debug!("Page {}: {} characters", i + 1, chars);
        }
        debug!("Text layer: {} pages, {} characters", pages.len(), total);

        Ok(pages)
    }
}

impl PdfProcessor for PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let data = std::fs::read(path)
            .map_err(|e| PdfError::Parse(format!("{}: {}", path.display(), e)))?;
        self.extract_pages_from_mem(&data)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a one-page PDF showing `text` in Courier.
    pub(crate) fn single_page_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract_pages_from_mem(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let extractor = PdfExtractor::new();
        assert!(extractor.extract_pages_from_mem(&[]).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract_pages(Path::new("/nonexistent/receipt.pdf"));
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_generated_pdf() {
        let data = single_page_pdf("TOTAL 22,00");
        let (doc, raw) = PdfExtractor::new().load(&data).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(raw, data);
    }

    #[test]
    fn test_extract_pages_returns_page_text() {
        let data = single_page_pdf("TOTAL 22,00 CONECTCAR EXTRATO");
        let pages = PdfExtractor::new().extract_pages_from_mem(&data).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("TOTAL 22,00 CONECTCAR EXTRATO"), "{:?}", pages[0]);
        assert!(char_count(pages[0].trim()) >= 29);
    }

    #[test]
    fn test_extract_pages_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extrato.pdf");
        std::fs::write(&path, single_page_pdf("Valor total 18,40")).unwrap();

        let pages = PdfExtractor::new().extract_pages(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Valor total 18,40"));
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
    }
}
