//! pt-BR number handling.
//!
//! Source documents write amounts as `1.234,56`: `.` groups thousands and
//! `,` separates the two fraction digits.

use std::str::FromStr as _;

use rust_decimal::{Decimal, RoundingStrategy};

/// Parses a pt-BR formatted amount.
///
/// Every `.` is dropped and the first `,` becomes the decimal point. Returns
/// `None` when what is left is not a number.
#[must_use]
pub fn parse_br(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let canonical = trimmed.replace('.', "").replacen(',', ".", 1);
    Decimal::from_str(&canonical).ok()
}

/// Renders `value` with exactly two fraction digits and no grouping
/// (`1300.00`).
#[must_use]
pub fn format_fixed(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Renders `value` in pt-BR formatting with two fraction digits
/// (`1.300,00`).
#[must_use]
pub fn format_br(value: Decimal) -> String {
    let fixed = format_fixed(value);
    let (sign, unsigned) = fixed
        .strip_prefix('-')
        .map_or(("", fixed.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped},{frac_part}")
}
