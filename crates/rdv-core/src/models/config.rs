//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::RdvError;

/// Main configuration for the rdv pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RdvConfig {
    /// PDF text-layer configuration.
    pub pdf: PdfConfig,

    /// OCR fallback configuration.
    pub ocr: OcrConfig,

    /// Model configuration for the ONNX backend.
    pub models: ModelConfig,
}

/// PDF text-layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Direct text must be longer than this (after trimming) to skip OCR.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 50 }
    }
}

/// Which recognizer runs on rasterized pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackendKind {
    /// The `tesseract` executable.
    Tesseract,
    /// `pure-onnx-ocr` models (requires the `onnx` feature).
    Onnx,
}

/// OCR fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognizer used for rasterized pages.
    pub backend: OcrBackendKind,

    /// DPI for rendering PDF pages to images.
    pub render_dpi: u32,

    /// Only the first `max_pages` pages are rasterized.
    pub max_pages: u32,

    /// Tesseract language code.
    pub language: String,

    /// Tesseract page segmentation mode (6 = single uniform block, works for receipts).
    pub page_segmentation_mode: u8,

    /// Tesseract OCR engine mode.
    pub engine_mode: u8,

    /// Executable used to rasterize PDF pages.
    pub rasterizer_command: String,

    /// Tesseract executable.
    pub tesseract_command: String,

    /// Keep `[UNK]` tokens emitted by the ONNX recognizer.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::Tesseract,
            render_dpi: 300,
            max_pages: 3,
            language: "por".to_string(),
            page_segmentation_mode: 6,
            engine_mode: 3,
            rasterizer_command: "pdftoppm".to_string(),
            tesseract_command: "tesseract".to_string(),
            keep_unk: false,
        }
    }
}

/// Model file paths for the ONNX backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl RdvConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RdvError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}
