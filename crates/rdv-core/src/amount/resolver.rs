//! Value resolution: run a category's pattern bank over text and select one amount.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::parse::parse_amount;
use super::patterns::{PatternBank, Selection, Tier};
use crate::models::document::{Category, ExtractionResult};

/// A numeric capture before selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub amount: Decimal,
    /// Index of the tier the capture came from.
    pub tier: usize,
    /// Index of the pattern within its tier (lower is more specific).
    pub rank: usize,
}

/// Resolves amounts for one category.
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver {
    bank: &'static PatternBank,
}

impl ValueResolver {
    /// Resolver using the built-in bank for `category`.
    pub fn new(category: Category) -> Self {
        Self {
            bank: PatternBank::for_category(category),
        }
    }

    /// Every acceptable capture of every pattern, tier by tier.
    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        self.bank
            .tiers
            .iter()
            .enumerate()
            .flat_map(|(tier_idx, tier)| tier_candidates(tier, tier_idx, text))
            .collect()
    }

    /// Pick a single amount from `text`.
    pub fn resolve(&self, text: &str) -> ExtractionResult {
        for (tier_idx, tier) in self.bank.tiers.iter().enumerate() {
            debug!("{}: trying tier '{}'", self.bank.category, tier.name);

            let selected = match tier.selection {
                Selection::FirstMatch => first_match(tier, text),
                Selection::Maximum => tier_candidates(tier, tier_idx, text)
                    .into_iter()
                    .map(|c| c.amount)
                    .max(),
                Selection::LargestDistinct => {
                    let mut amounts: Vec<Decimal> = tier_candidates(tier, tier_idx, text)
                        .into_iter()
                        .map(|c| c.amount)
                        .collect();
                    amounts.sort_by(|a, b| b.cmp(a));
                    amounts.dedup();
                    debug!("Candidate values: {:?}", amounts);
                    amounts.first().copied()
                }
            };

            if let Some(amount) = selected {
                debug!(
                    "{}: selected {} from tier '{}'",
                    self.bank.category, amount, tier.name
                );
                return ExtractionResult::Found(amount);
            }
        }

        debug!("{}: no amount found", self.bank.category);
        ExtractionResult::NotFound
    }
}

/// Resolve the amount of `text` using the built-in bank for `category`.
pub fn resolve_amount(text: &str, category: Category) -> ExtractionResult {
    ValueResolver::new(category).resolve(text)
}

fn tier_candidates(tier: &Tier, tier_idx: usize, text: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (rank, pattern) in tier.patterns.iter().enumerate() {
        let captures: Vec<&str> = pattern
            .regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();

        if captures.is_empty() {
            continue;
        }
        trace!("Pattern '{}' matched {:?}", pattern.label, captures);

        candidates.extend(
            captures
                .into_iter()
                .filter_map(parse_amount)
                .filter(|amount| tier.accepts(*amount))
                .map(|amount| Candidate {
                    amount,
                    tier: tier_idx,
                    rank,
                }),
        );
    }

    candidates
}

/// The first capture of the first pattern that matches, if it parses to an
/// acceptable amount. Otherwise the next pattern is tried.
fn first_match(tier: &Tier, text: &str) -> Option<Decimal> {
    for pattern in &tier.patterns {
        let Some(capture) = pattern
            .regex
            .captures(text)
            .and_then(|caps| caps.get(1))
        else {
            continue;
        };

        trace!("Pattern '{}' matched {:?}", pattern.label, capture.as_str());
        match parse_amount(capture.as_str()) {
            Some(amount) if tier.accepts(amount) => return Some(amount),
            _ => trace!("Discarding capture {:?}", capture.as_str()),
        }
    }
    None
}
