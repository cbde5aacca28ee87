//! Core library for travel-expense (RDV) receipt processing.
//!
//! This crate provides:
//! - PDF text-layer extraction with per-page yield
//! - OCR fallback for scanned receipts (rasterize, then recognize)
//! - Hybrid text resolution choosing exactly one of the two
//! - Category pattern banks (toll, meal, lodging) and amount selection
//! - Per-file outcomes aggregated into a batch summary

pub mod amount;
pub mod error;
pub mod extractor;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod text;

pub use amount::{format_brl, parse_amount, resolve_amount, Candidate, PatternBank, ValueResolver};
pub use error::{OcrError, PdfError, RdvError, Result};
pub use extractor::AmountExtractor;
pub use models::{
    BatchSummary, Category, Document, ExtractedText, ExtractionResult, FileOutcome, RdvConfig,
    TextSource,
};
pub use ocr::{OcrFallback, OcrSource, PageRasterizer, PageRecognizer};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use text::HybridTextResolver;
