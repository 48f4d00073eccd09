//! Monetary amount formatting and parsing for the Brazilian locale.
//!
//! Amounts travel in two representations:
//!
//! | Representation | Example      | Used for                          |
//! |----------------|--------------|-----------------------------------|
//! | display        | `1.500,00`   | visible text fields               |
//! | edit           | `1500,5`     | a focused field, no grouping      |
//! | canonical      | `1500.50`    | hidden fields sent to the server  |
//!
//! Every value is held as a [`Decimal`] rounded to two places, so
//! `parse_amount(&format_amount(x)) == x` for any `x` with at most two
//! fraction digits.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use doc_core::calculations::amount::{format_amount, parse_amount};
//!
//! assert_eq!(format_amount(dec!(1234567.891)), "1.234.567,89");
//! assert_eq!(parse_amount("1.234.567,89").unwrap(), dec!(1234567.89));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Text shown for an empty or zero amount.
pub const ZERO_DISPLAY: &str = "0,00";

/// Largest amount a field accepts: `999.999.999.999,99`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

/// Error returned when text cannot be read as an amount.
#[derive(Debug, Error)]
pub enum AmountParseError {
    #[error("invalid amount '{input}': {source}")]
    Malformed {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{input}' is negative")]
    Negative { input: String },

    #[error("amount '{input}' exceeds the maximum of 999.999.999.999,99")]
    TooLarge { input: String },
}

impl AmountParseError {
    pub fn input(&self) -> &str {
        match self {
            Self::Malformed { input, .. } | Self::Negative { input } | Self::TooLarge { input } => {
                input
            }
        }
    }
}

/// Whether `value` lies in `0..=MAX_AMOUNT`.
pub fn is_valid_amount(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= MAX_AMOUNT
}

fn checked_amount(
    input: &str,
    parsed: Result<Decimal, rust_decimal::Error>,
) -> Result<Decimal, AmountParseError> {
    let value = parsed
        .map(round_half_up)
        .map_err(|source| AmountParseError::Malformed {
            input: input.to_string(),
            source,
        })?;
    if value < Decimal::ZERO {
        return Err(AmountParseError::Negative {
            input: input.to_string(),
        });
    }
    if value > MAX_AMOUNT {
        return Err(AmountParseError::TooLarge {
            input: input.to_string(),
        });
    }
    Ok(value)
}

/// Rounds to two decimal places, midpoint away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use doc_core::calculations::amount::round_half_up;
///
/// assert_eq!(round_half_up(dec!(10.005)), dec!(10.01));
/// assert_eq!(round_half_up(dec!(-10.005)), dec!(-10.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for display: `.` groups thousands, `,` separates cents.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    if rounded.is_zero() {
        return ZERO_DISPLAY.to_string();
    }
    rounded.rescale(2);

    let negative = rounded.is_sign_negative();
    let plain = rounded.abs().to_string();
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut out = String::with_capacity(plain.len() + plain.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    out.push(',');
    out.push_str(frac_part);
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Parses a display string such as `"1.500,00"`.
///
/// Blank input is zero. Every `.` is treated as a thousands separator and
/// the first `,` as the decimal separator. Negative values and values above
/// [`MAX_AMOUNT`] are rejected.
pub fn parse_amount(s: &str) -> Result<Decimal, AmountParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let normalized = trimmed.replace('.', "").replacen(',', ".", 1);
    checked_amount(s, normalized.parse::<Decimal>())
}

/// Parses a canonical string such as `"1500.00"`, as supplied by the server
/// when a saved document is opened. Blank input is zero.
pub fn parse_canonical(s: &str) -> Result<Decimal, AmountParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    checked_amount(s, trimmed.parse::<Decimal>())
}

/// Text placed in a field when it gains focus.
///
/// Zero clears to an empty string so the user does not have to delete the
/// placeholder; anything else drops grouping and trailing zeros.
pub fn edit_text(value: Decimal) -> String {
    if value.is_zero() {
        return String::new();
    }
    value.normalize().to_string().replace('.', ",")
}

/// Machine-readable form used by the hidden submission fields.
pub fn canonical(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    if rounded.is_zero() {
        // avoid "-0.00"
        return "0.00".to_string();
    }
    rounded.to_string()
}
