//! OCR fallback for scanned documents.
//!
//! Pages are rendered to images by a [`PageRasterizer`] into a temporary
//! directory owned by [`OcrFallback`], then each image is handed to a
//! [`PageRecognizer`]. The directory is removed before `OcrFallback` returns.

mod fallback;
mod rasterizer;
mod tesseract;
#[cfg(feature = "onnx")]
mod onnx;

pub use fallback::OcrFallback;
pub use rasterizer::PdftoppmRasterizer;
pub use tesseract::TesseractRecognizer;
#[cfg(feature = "onnx")]
pub use onnx::OnnxRecognizer;

use std::path::{Path, PathBuf};

use crate::error::OcrError;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// A page image written by a rasterizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Image file inside the rasterizer's output directory.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Renders the leading pages of a PDF to image files.
pub trait PageRasterizer {
    /// Render at most `max_pages` pages of `pdf` into `out_dir`, in page order.
    ///
    /// An error means nothing usable was rendered. Pages that rendered but
    /// cannot be decoded are left out of the returned list.
    fn rasterize(&self, pdf: &Path, out_dir: &Path, max_pages: u32) -> Result<Vec<RenderedPage>>;
}

/// Recognizes the text on a single page image.
pub trait PageRecognizer {
    fn recognize(&self, image: &Path) -> Result<String>;
}

/// A stage producing OCR text for a whole document.
///
/// Implementations never fail: errors degrade to fewer (or no) pages.
pub trait OcrSource {
    /// Recognized text per page, skipping pages that failed.
    fn ocr_pages(&self, pdf: &Path) -> Vec<String>;

    /// Recognized text of all pages joined by newlines.
    fn ocr_text(&self, pdf: &Path) -> String {
        self.ocr_pages(pdf).join("\n")
    }
}
