//! Amount extraction from resolved document text.

pub mod parse;
pub mod patterns;
mod resolver;

pub use parse::{format_brl, parse_amount};
pub use patterns::{AmountPattern, PatternBank, Selection, Tier};
pub use resolver::{resolve_amount, Candidate, ValueResolver};
