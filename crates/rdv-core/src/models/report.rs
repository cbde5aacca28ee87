//! Per-file outcomes aggregated for the calling layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::Category;

/// Processing outcome of one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Declared category, if it could be parsed.
    pub category: Option<Category>,
    /// Original file name.
    pub name: String,
    /// Extracted amount (zero when nothing was found or on error).
    pub amount: Decimal,
    /// Error message when the file could not be processed at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn success(category: Category, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            category: Some(category),
            name: name.into(),
            amount,
            error: None,
        }
    }

    pub fn failure(
        category: Option<Category>,
        name: impl Into<String>,
        error: impl ToString,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            amount: Decimal::ZERO,
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Per-category subtotals plus the list of processed files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub toll: Decimal,
    pub meal: Decimal,
    pub lodging: Decimal,
    pub files: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome and add its amount to the category subtotal.
    pub fn record(&mut self, outcome: FileOutcome) {
        if let Some(category) = outcome.category {
            *self.subtotal_mut(category) += outcome.amount;
        }
        self.files.push(outcome);
    }

    pub fn subtotal(&self, category: Category) -> Decimal {
        match category {
            Category::Toll => self.toll,
            Category::Meal => self.meal,
            Category::Lodging => self.lodging,
        }
    }

    fn subtotal_mut(&mut self, category: Category) -> &mut Decimal {
        match category {
            Category::Toll => &mut self.toll,
            Category::Meal => &mut self.meal,
            Category::Lodging => &mut self.lodging,
        }
    }

    /// Sum of all category subtotals.
    pub fn total(&self) -> Decimal {
        self.toll + self.meal + self.lodging
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.is_error())
    }
}

impl Extend<FileOutcome> for BatchSummary {
    fn extend<I: IntoIterator<Item = FileOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.record(outcome);
        }
    }
}
