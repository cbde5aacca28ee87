//! Whole-document OCR with per-page isolation.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::{OcrSource, PageRasterizer, PageRecognizer, PdftoppmRasterizer, Result, TesseractRecognizer};
use crate::error::OcrError;
use crate::models::config::{OcrBackendKind, RdvConfig};

/// OCR over the first `max_pages` pages of a document.
pub struct OcrFallback {
    rasterizer: Box<dyn PageRasterizer>,
    recognizer: Box<dyn PageRecognizer>,
    max_pages: u32,
}

impl OcrFallback {
    pub fn new(
        rasterizer: Box<dyn PageRasterizer>,
        recognizer: Box<dyn PageRecognizer>,
        max_pages: u32,
    ) -> Self {
        Self {
            rasterizer,
            recognizer,
            max_pages,
        }
    }

    /// Build the rasterizer and the configured recognizer backend.
    pub fn from_config(config: &RdvConfig) -> Result<Self> {
        let rasterizer = Box::new(PdftoppmRasterizer::from_config(&config.ocr));
        let recognizer: Box<dyn PageRecognizer> = match config.ocr.backend {
            OcrBackendKind::Tesseract => Box::new(TesseractRecognizer::from_config(&config.ocr)),
            #[cfg(feature = "onnx")]
            OcrBackendKind::Onnx => Box::new(super::OnnxRecognizer::from_config(config)?),
            #[cfg(not(feature = "onnx"))]
            OcrBackendKind::Onnx => {
                return Err(OcrError::EngineUnavailable(
                    "the onnx backend requires building with the `onnx` feature".to_string(),
                ));
            }
        };

        Ok(Self::new(rasterizer, recognizer, config.ocr.max_pages))
    }

    fn recognize_pages(&self, pdf: &Path, work_dir: &Path) -> Result<Vec<String>> {
        let mut pages = self.rasterizer.rasterize(pdf, work_dir, self.max_pages)?;
        pages.truncate(self.max_pages as usize);
        info!("Running OCR on {} page(s)", pages.len());

        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            match self.recognizer.recognize(&page.path) {
                Ok(text) => {
                    debug!("Page {} OCR: {} characters", page.number, text.chars().count());
                    texts.push(text);
                }
                Err(e) => warn!("OCR failed on page {}: {}", page.number, e),
            }
        }

        Ok(texts)
    }
}

impl OcrSource for OcrFallback {
    fn ocr_pages(&self, pdf: &Path) -> Vec<String> {
        let start = Instant::now();

        let work_dir = match tempfile::Builder::new().prefix("rdv-ocr-").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Cannot create OCR work directory: {}", e);
                return Vec::new();
            }
        };

        let pages = self
            .recognize_pages(pdf, work_dir.path())
            .unwrap_or_else(|e: OcrError| {
                warn!("OCR failed for {}: {}", pdf.display(), e);
                Vec::new()
            });

        if let Err(e) = work_dir.close() {
            warn!("Failed to remove OCR work directory: {}", e);
        }

        debug!(
            "OCR finished: {} page(s) in {}ms",
            pages.len(),
            start.elapsed().as_millis()
        );
        pages
    }
}
