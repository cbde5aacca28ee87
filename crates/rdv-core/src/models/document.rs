//! Documents, categories and extraction outcomes.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RdvError, Result};

/// Expense category declared for an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Toll statements.
    Toll,
    /// Food receipts (NFC-e and similar).
    Meal,
    /// Lodging invoices.
    Lodging,
}

impl Category {
    /// All categories in reporting order.
    pub const ALL: [Category; 3] = [Category::Toll, Category::Meal, Category::Lodging];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Toll => "toll",
            Category::Meal => "meal",
            Category::Lodging => "lodging",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RdvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "toll" | "pedagio" | "pedágio" => Ok(Category::Toll),
            "meal" | "alimentacao" | "alimentação" => Ok(Category::Meal),
            "lodging" | "hospedagem" => Ok(Category::Lodging),
            _ => Err(RdvError::UnknownCategory(s.to_string())),
        }
    }
}

/// A document on disk with its declared category.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    category: Category,
}

impl Document {
    /// Open a document, checking that the path is a readable file.
    pub fn open(path: impl Into<PathBuf>, category: Category) -> Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(RdvError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )));
        }
        File::open(&path)?;
        Ok(Self { path, category })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// File name used when reporting on this document.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Where a text blob came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    /// The PDF text layer.
    Direct,
    /// Optical character recognition of rasterized pages.
    Ocr,
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSource::Direct => f.write_str("direct"),
            TextSource::Ocr => f.write_str("ocr"),
        }
    }
}

/// Text resolved for one document. Exactly one source contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Page texts joined by newlines, in page order.
    pub text: String,
    /// Which stage produced `text`.
    pub source: TextSource,
    /// Character count per page for the chosen source.
    pub page_chars: Vec<usize>,
}

impl ExtractedText {
    pub fn direct(text: String, page_chars: Vec<usize>) -> Self {
        Self {
            text,
            source: TextSource::Direct,
            page_chars,
        }
    }

    pub fn ocr(text: String, page_chars: Vec<usize>) -> Self {
        Self {
            text,
            source: TextSource::Ocr,
            page_chars,
        }
    }
}

/// Outcome of resolving a single amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum ExtractionResult {
    /// A positive amount was selected.
    Found(Decimal),
    /// No candidate survived.
    NotFound,
}

impl ExtractionResult {
    /// The amount, with `NotFound` surfaced as zero.
    pub fn amount(&self) -> Decimal {
        match self {
            ExtractionResult::Found(amount) => *amount,
            ExtractionResult::NotFound => Decimal::ZERO,
        }
    }
}

impl From<Option<Decimal>> for ExtractionResult {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(ExtractionResult::NotFound, ExtractionResult::Found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_category_from_str() {
        assert_eq!("toll".parse::<Category>().unwrap(), Category::Toll);
        assert_eq!(" Meal ".parse::<Category>().unwrap(), Category::Meal);
        assert_eq!("hospedagem".parse::<Category>().unwrap(), Category::Lodging);
        assert_eq!("pedagio".parse::<Category>().unwrap(), Category::Toll);
        assert_eq!("alimentacao".parse::<Category>().unwrap(), Category::Meal);
        assert!(matches!(
            "fuel".parse::<Category>(),
            Err(RdvError::UnknownCategory(c)) if c == "fuel"
        ));
    }

    #[test]
    fn test_category_display_round_trips() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_not_found_surfaces_as_zero() {
        assert_eq!(ExtractionResult::NotFound.amount(), Decimal::ZERO);
        assert_eq!(
            ExtractionResult::Found(Decimal::new(2200, 2)).amount(),
            Decimal::new(2200, 2)
        );
        assert_eq!(ExtractionResult::from(None), ExtractionResult::NotFound);
    }

    #[test]
    fn test_document_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");
        assert!(matches!(
            Document::open(&missing, Category::Meal),
            Err(RdvError::Io(_))
        ));
        assert!(matches!(
            Document::open(dir.path(), Category::Meal),
            Err(RdvError::Io(_))
        ));
    }

    #[test]
    fn test_document_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20240101_120000_recibo.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let doc = Document::open(&path, Category::Lodging).unwrap();
        assert_eq!(doc.name(), "20240101_120000_recibo.pdf");
        assert_eq!(doc.category(), Category::Lodging);
    }
}
