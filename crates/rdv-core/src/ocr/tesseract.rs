//! Recognition through the `tesseract` executable.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{PageRecognizer, Result};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs `tesseract <image> stdout -l <lang> --oem <oem> --psm <psm>`.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    command: String,
    language: String,
    engine_mode: u8,
    page_segmentation_mode: u8,
}

impl TesseractRecognizer {
    /// Portuguese, default engine, single-block page segmentation.
    pub fn new(command: impl Into<String>) -> Self {
        let defaults = OcrConfig::default();
        Self {
            command: command.into(),
            language: defaults.language,
            engine_mode: defaults.engine_mode,
            page_segmentation_mode: defaults.page_segmentation_mode,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            command: config.tesseract_command.clone(),
            language: config.language.clone(),
            engine_mode: config.engine_mode,
            page_segmentation_mode: config.page_segmentation_mode,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_page_segmentation_mode(mut self, psm: u8) -> Self {
        self.page_segmentation_mode = psm;
        self
    }

    /// Arguments passed after the executable name.
    fn args(&self, image: &Path) -> Vec<String> {
        vec![
            image.display().to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--oem".to_string(),
            self.engine_mode.to_string(),
            "--psm".to_string(),
            self.page_segmentation_mode.to_string(),
        ]
    }
}

impl PageRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.command)
            .args(self.args(image))
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::EngineUnavailable(format!(
                    "{} not found; is tesseract installed?",
                    self.command
                )),
                _ => OcrError::Recognition(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).replace('\x0c', "");
        debug!("tesseract recognized {} characters", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_arguments() {
        let recognizer = TesseractRecognizer::new("tesseract");
        assert_eq!(
            recognizer.args(Path::new("page-1.png")),
            vec!["page-1.png", "stdout", "-l", "por", "--oem", "3", "--psm", "6"]
        );
    }

    #[test]
    fn test_builder_overrides() {
        let recognizer = TesseractRecognizer::new("tesseract")
            .with_language("por+eng")
            .with_page_segmentation_mode(4);
        let args = recognizer.args(Path::new("p.png"));
        assert_eq!(args[3], "por+eng");
        assert_eq!(args[7], "4");
    }

    #[test]
    fn test_missing_engine_is_unavailable() {
        let recognizer = TesseractRecognizer::new("rdv-no-such-tesseract");
        let result = recognizer.recognize(Path::new("page-1.png"));
        assert!(matches!(result, Err(OcrError::EngineUnavailable(_))));
    }
}
