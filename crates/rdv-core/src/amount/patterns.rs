//! Pattern banks: per-category tiers of amount-capturing regexes.
//!
//! Every pattern captures exactly one group holding `\d+[,.]\d{2}`. Adding a
//! pattern or a tier only means editing these tables; the resolver is
//! generic over them.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::document::Category;

/// How a tier turns its candidates into one amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Patterns are tried in order; the first capture of the first matching
    /// pattern wins.
    FirstMatch,
    /// All captures of all patterns are collected; the largest wins.
    Maximum,
    /// All in-range captures are deduplicated and sorted descending; the
    /// first wins.
    LargestDistinct,
}

/// One labelled regex.
#[derive(Debug)]
pub struct AmountPattern {
    /// Short description used in logs.
    pub label: &'static str,
    pub regex: Regex,
}

impl AmountPattern {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            regex: Regex::new(pattern).unwrap(),
        }
    }
}

/// An ordered group of patterns resolved together.
#[derive(Debug)]
pub struct Tier {
    pub name: &'static str,
    pub selection: Selection,
    /// Inclusive range a candidate must fall in, if any.
    pub range: Option<(Decimal, Decimal)>,
    pub patterns: Vec<AmountPattern>,
}

impl Tier {
    /// Whether `amount` is acceptable for this tier. Zero and negative
    /// amounts never are.
    pub fn accepts(&self, amount: Decimal) -> bool {
        if amount <= Decimal::ZERO {
            return false;
        }
        match self.range {
            Some((min, max)) => amount >= min && amount <= max,
            None => true,
        }
    }
}

/// Ordered tiers for one category.
#[derive(Debug)]
pub struct PatternBank {
    pub category: Category,
    pub tiers: Vec<Tier>,
}

impl PatternBank {
    /// The built-in bank for `category`.
    pub fn for_category(category: Category) -> &'static PatternBank {
        match category {
            Category::Toll => &TOLL_BANK,
            Category::Meal => &MEAL_BANK,
            Category::Lodging => &LODGING_BANK,
        }
    }

    /// Number of patterns across all tiers.
    pub fn pattern_count(&self) -> usize {
        self.tiers.iter().map(|t| t.patterns.len()).sum()
    }
}

lazy_static! {
    /// Conectcar-style toll statements.
    pub static ref TOLL_BANK: PatternBank = PatternBank {
        category: Category::Toll,
        tiers: vec![Tier {
            name: "toll",
            selection: Selection::Maximum,
            range: None,
            patterns: vec![
                // TOTAL 22,00
                AmountPattern::new("TOTAL <amount>", r"(?im)TOTAL\s+(\d+[,.]\d{2})"),
                // Total R$ 22,00
                AmountPattern::new("Total ... R$ <amount>", r"(?im)Total.*?R?\$?\s*(\d+[,.]\d{2})"),
                // Valor total 22,00
                AmountPattern::new("Valor ... total ... <amount>", r"(?im)Valor.*?total.*?(\d+[,.]\d{2})"),
            ],
        }],
    };

    /// NFC-e and similar food receipts.
    pub static ref MEAL_BANK: PatternBank = PatternBank {
        category: Category::Meal,
        tiers: vec![
            Tier {
                name: "meal-total",
                selection: Selection::FirstMatch,
                range: None,
                patterns: vec![
                    // Total: R$ 75,23
                    AmountPattern::new("Total: R$ <amount>", r"(?im)Total\s*:\s*R?\$?\s*(\d+[,.]\d{2})"),
                    // Valor total R$ 75,23
                    AmountPattern::new("Valor total R$ <amount>", r"(?im)Valor\s+total\s+R\$\s*(\d+[,.]\d{2})"),
                    // Total 75,23 at the start of a line
                    AmountPattern::new("^Total <amount>", r"(?im)^Total\s+R?\$?\s*(\d+[,.]\d{2})"),
                    // TOTAL R$ 75,23
                    AmountPattern::new("TOTAL R$ <amount>", r"(?im)TOTAL\s*R?\$?\s*(\d+[,.]\d{2})"),
                    // Vl Total 75,23
                    AmountPattern::new("Vl Total <amount>", r"(?im)Vl\s+Total\s+(\d+[,.]\d{2})"),
                    // Total : R $ 75,23 (OCR spacing)
                    AmountPattern::new("Total : R $ <amount>", r"(?im)Total\s*[:.]?\s*R?\s*\$?\s*(\d+[,.]\d{2})"),
                    // OCR reads "Total" as "fotal"
                    AmountPattern::new("fotal <amount>", r"(?im)(?:fotal|total)\s*[:.]?\s*R?\s*\$?\s*(\d+[,.]\d{2})"),
                ],
            },
            Tier {
                name: "meal-loose",
                selection: Selection::LargestDistinct,
                range: Some((Decimal::new(500, 2), Decimal::new(50000, 2))),
                patterns: vec![
                    // R$ 75,23 at the end of a line
                    AmountPattern::new("R$ <amount> at end of line", r"(?im)R\s*\$\s*(\d+[,.]\d{2})[ \t\r]*$"),
                    // 75,23 at the end of a line or before "reais"
                    AmountPattern::new(
                        "<amount> at end of line or before reais",
                        r"(?im)(?:^|[^\d.,])(\d{2,3}[,.]\d{2})(?:[ \t\r]*$|\s*reais?)",
                    ),
                ],
            },
        ],
    };

    /// Hotel and lodging invoices.
    pub static ref LODGING_BANK: PatternBank = PatternBank {
        category: Category::Lodging,
        tiers: vec![Tier {
            name: "lodging",
            selection: Selection::Maximum,
            range: None,
            patterns: vec![
                AmountPattern::new("Total ... R$ <amount>", r"(?i)Total.*?R\$\s*(\d+[,.]\d{2})"),
                AmountPattern::new("Valor ... R$ <amount>", r"(?i)Valor.*?R\$\s*(\d+[,.]\d{2})"),
                AmountPattern::new("TOTAL ... <amount>", r"(?i)TOTAL.*?(\d+[,.]\d{2})"),
                AmountPattern::new("Subtotal ... <amount>", r"(?i)Subtotal.*?(\d+[,.]\d{2})"),
                AmountPattern::new("<amount> reais|R$", r"(?i)(\d+[,.]\d{2})\s*(?:reais?|R\$)"),
            ],
        }],
    };
}
