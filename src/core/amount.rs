//! Parsing of user-entered amounts.

use anyhow::{Context, Result, bail};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Ten integer digits, the point and two fraction digits.
pub const MAX_AMOUNT_LENGTH: usize = 13;
pub const DIGITS_AFTER_POINT: u32 = 2;

fn is_point(c: char) -> bool {
    c == '.' || c == ','
}

/// Parses an amount typed by the user. Blank input means "no amount".
///
/// Either `.` or `,` may be used as the decimal point, and a leading point
/// is read as `0.`. Leading zeroes are rejected and extra fraction digits
/// are rounded half-down to two.
pub fn parse_amount(input: &str) -> Result<Option<Decimal>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || (trimmed.len() == 1 && trimmed.starts_with(is_point)) {
        return Ok(None);
    }

    let mut text = trimmed.replace(',', ".");
    if text.starts_with('.') {
        text.insert(0, '0');
    }

    let mut chars = text.chars();
    if let (Some('0'), Some(second)) = (chars.next(), chars.next()) {
        if !is_point(second) {
            bail!("Amount must not start with a zero: {}", input);
        }
    }

    let integer_digits = text.find('.').unwrap_or(text.len());
    if integer_digits + 1 + DIGITS_AFTER_POINT as usize > MAX_AMOUNT_LENGTH {
        bail!("Amount is too long: {}", input);
    }

    if !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        bail!("Invalid amount: {}", input);
    }

    let amount =
        Decimal::from_str(&text).with_context(|| format!("Invalid amount: {input}"))?;
    Ok(Some(amount.round_dp_with_strategy(
        DIGITS_AFTER_POINT,
        RoundingStrategy::MidpointTowardZero,
    )))
}
