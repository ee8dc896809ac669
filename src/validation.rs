//! Form validation helpers shared by the user, book and movie forms.
//!
//! Field rules are declared on the form structs with `validator` derives;
//! the rules that need patterns or parsing live here as custom functions.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult, FieldError};

/// Non-negative decimal with at most two fractional digits
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("valid decimal pattern"));

/// Highest accepted book price, in whole currency units
pub const MAX_PRICE: i64 = 99_999_999;

/// Minimum password length for registration and resets
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Runs the derived validation rules and converts failures into a 422 error
/// carrying the submitted data (fields marked `skip_serializing` excluded).
pub fn validate_form<T: Validate + Serialize>(form: &T) -> AppResult<()> {
    form.validate().map_err(|errors| AppError::Validation {
        errors: field_errors(&errors),
        previous_data: serde_json::to_value(form).unwrap_or_default(),
    })
}

/// Flattens `ValidationErrors` into a stable, field-sorted list
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut flattened: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| FieldError {
                field: field.clone(),
                msg: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field)),
            })
        })
        .collect();

    flattened.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.msg.cmp(&b.msg)));
    flattened
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Parses a decimal price string into cents, e.g. `"12.5"` → `1250`
pub fn parse_price_cents(value: &str) -> Option<i64> {
    if !DECIMAL_RE.is_match(value) {
        return None;
    }

    let (whole, frac) = match value.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (value, ""),
    };

    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    whole.checked_mul(100)?.checked_add(frac)
}

/// Formats cents back into a two-decimal price string
pub fn format_price_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

pub fn validate_price(value: &str) -> Result<(), ValidationError> {
    if !DECIMAL_RE.is_match(value) {
        return Err(error(
            "price_format",
            "Price must be a valid number with up to two decimal places and cannot contain letters or symbols.",
        ));
    }

    match parse_price_cents(value) {
        Some(cents) if cents <= MAX_PRICE * 100 => Ok(()),
        _ => Err(error("price_range", "Price must be between 0 and 99,999,999.")),
    }
}

pub fn validate_rating(value: &str) -> Result<(), ValidationError> {
    if !DECIMAL_RE.is_match(value) {
        return Err(error(
            "rating_format",
            "Rating must be a valid number with up to two decimal places.",
        ));
    }

    match value.parse::<f64>() {
        Ok(rating) if (0.0..=10.0).contains(&rating) => Ok(()),
        _ => Err(error("rating_range", "Rating must be between 0 and 10.")),
    }
}

pub fn validate_release_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| error("release_date", "Release date must be a valid date."))
}

pub fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(error(
            "alphanumeric",
            "Book name must only contain letters and numbers.",
        ))
    }
}

/// Password strength check used by the reset flow
pub fn validate_password_strength(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation {
            errors: vec![FieldError::new(
                "newPassword",
                "Password must be at least 8 characters long",
            )],
            previous_data: serde_json::Value::Null,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_cents() {
        assert_eq!(parse_price_cents("12"), Some(1200));
        assert_eq!(parse_price_cents("12.5"), Some(1250));
        assert_eq!(parse_price_cents("12.05"), Some(1205));
        assert_eq!(parse_price_cents("0.99"), Some(99));
        assert_eq!(parse_price_cents("12.345"), None);
        assert_eq!(parse_price_cents("-1"), None);
        assert_eq!(parse_price_cents("abc"), None);
    }

    #[test]
    fn test_format_price_cents() {
        assert_eq!(format_price_cents(1250), "12.50");
        assert_eq!(format_price_cents(5), "0.05");
        assert_eq!(format_price_cents(1999), "19.99");
    }

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price("99999999").is_ok());
        assert!(validate_price("99999999.01").is_err());
        assert!(validate_price("1e5").is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating("0").is_ok());
        assert!(validate_rating("7.25").is_ok());
        assert!(validate_rating("10").is_ok());
        assert!(validate_rating("10.5").is_err());
        assert!(validate_rating("7.255").is_err());
        assert!(validate_rating("seven").is_err());
    }

    #[test]
    fn test_validate_release_date() {
        assert!(validate_release_date("2010-07-16").is_ok());
        assert!(validate_release_date("2010-13-01").is_err());
        assert!(validate_release_date("16/07/2010").is_err());
    }

    #[test]
    fn test_validate_alphanumeric_rejects_spaces() {
        assert!(validate_alphanumeric("Dune2").is_ok());
        assert!(validate_alphanumeric("Dune Messiah").is_err());
        assert!(validate_alphanumeric("").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("12345678").is_ok());
        assert!(matches!(
            validate_password_strength("short"),
            Err(AppError::Validation { .. })
        ));
    }
}
