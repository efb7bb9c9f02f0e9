//! Parsing of user-entered money amounts.
//!
//! # Responsibility
//! - Turn raw text-field input (price, tax/tip) into a typed `f64`.
//! - Keep "blank" distinct from "zero" so callers can apply field rules.
//!
//! # Invariants
//! - Returned values are always finite.
//! - No comparison or arithmetic happens on unparsed text.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to interpret text as an amount.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountError {
    /// Input is not a decimal number (e.g. `"12abc"`, `"ten"`).
    NotANumber(String),
    /// Input parsed to infinity or NaN.
    NotFinite(String),
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber(value) => write!(f, "`{value}` is not a number"),
            Self::NotFinite(value) => write!(f, "`{value}` is not a finite amount"),
        }
    }
}

impl Error for AmountError {}

/// Parses an amount from text input.
///
/// Returns `Ok(None)` when the trimmed input is blank.
pub fn parse_amount(input: &str) -> Result<Option<f64>, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(AmountError::NotFinite(trimmed.to_string()));
    }

    Ok(Some(value))
}

/// Formats an amount with exactly two decimals for display.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::{format_amount, parse_amount, AmountError};

    #[test]
    fn blank_input_is_none() {
        assert_eq!(parse_amount("").unwrap(), None);
        assert_eq!(parse_amount("   ").unwrap(), None);
    }

    #[test]
    fn parses_trimmed_decimal() {
        assert_eq!(parse_amount(" 12.5 ").unwrap(), Some(12.5));
        assert_eq!(parse_amount("-3").unwrap(), Some(-3.0));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let err = parse_amount("12abc").unwrap_err();
        assert_eq!(err, AmountError::NotANumber("12abc".to_string()));
    }

    #[test]
    fn rejects_non_finite() {
        assert!(matches!(
            parse_amount("inf").unwrap_err(),
            AmountError::NotFinite(_)
        ));
        assert!(matches!(
            parse_amount("NaN").unwrap_err(),
            AmountError::NotFinite(_)
        ));
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_amount(60.0), "60.00");
        assert_eq!(format_amount(33.333_333), "33.33");
    }
}
