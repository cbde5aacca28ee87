//! Error types for the rdv-core library.

use thiserror::Error;

/// Main error type for the rdv library.
#[derive(Error, Debug)]
pub enum RdvError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The declared document category is not one we have patterns for.
    #[error("unknown document category: {0}")]
    UnknownCategory(String),
}

/// Errors raised while reading the text layer of a PDF.
///
/// These never leave the hybrid text resolver: a document that fails here
/// is treated as having produced no direct text.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The text layer library panicked on this file.
    #[error("text extraction aborted: {0}")]
    Panicked(String),
}

/// Errors related to rasterization and recognition.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Rendering pages to images failed for the whole document.
    #[error("rasterization failed: {0}")]
    Rasterize(String),

    /// The recognition engine could not be started.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),
}

/// Result type for the rdv library.
pub type Result<T> = std::result::Result<T, RdvError>;
