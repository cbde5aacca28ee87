//! Data models: configuration, documents and reports.

pub mod config;
pub mod document;
pub mod report;

pub use config::{OcrBackendKind, RdvConfig};
pub use document::{Category, Document, ExtractedText, ExtractionResult, TextSource};
pub use report::{BatchSummary, FileOutcome};
