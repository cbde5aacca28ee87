//! Parsing and formatting of Brazilian-style monetary amounts.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount such as "75,23", "1234.56" or "1.234,56".
///
/// The last `,` or `.` is the decimal separator; any earlier separators are
/// treated as digit grouping and dropped. Characters other than digits and
/// separators are ignored.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let Some(pos) = cleaned.rfind(|c| c == ',' || c == '.') else {
        return Decimal::from_str(&cleaned).ok();
    };

    let integer_part: String = cleaned[..pos].chars().filter(|c| c.is_ascii_digit()).collect();
    let decimal_part = &cleaned[pos + 1..];

    if integer_part.is_empty() || decimal_part.is_empty() {
        return None;
    }

    Decimal::from_str(&format!("{}.{}", integer_part, decimal_part)).ok()
}

/// Format an amount as "R$ 1.234,56".
pub fn format_brl(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs().round_dp(2));
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}R$ {},{}", sign, formatted, decimal_part)
}
