//! Shared validation utilities
//!
//! Field-level checks that run inside command `validate()` methods, after
//! the request schema has already accepted the shape of the body.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static ISBN_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:\d{9}[\dX]|\d{13})$").ok());

/// Lowest year accepted for birth and publication years
pub const MIN_YEAR: i64 = 0;

/// Highest year accepted for birth and publication years
pub const MAX_YEAR: i64 = 2100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be at most {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("{field} must be a non-negative number")]
    Negative { field: &'static str },

    #[error("isbn must be an ISBN-10 or ISBN-13 (hyphens and spaces allowed)")]
    InvalidIsbn,
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Required { field }
            | FieldError::TooLong { field, .. }
            | FieldError::OutOfRange { field, .. }
            | FieldError::Negative { field } => field,
            FieldError::InvalidIsbn => "isbn",
        }
    }
}

/// Non-blank, at most `max_length` characters
pub fn validate_name(field: &'static str, value: &str, max_length: usize) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required { field });
    }

    if value.chars().count() > max_length {
        return Err(FieldError::TooLong { field, max_length });
    }

    Ok(())
}

pub fn validate_optional_text(
    field: &'static str,
    value: Option<&str>,
    max_length: usize,
) -> Result<(), FieldError> {
    match value {
        Some(value) if value.chars().count() > max_length => {
            Err(FieldError::TooLong { field, max_length })
        },
        _ => Ok(()),
    }
}

pub fn validate_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), FieldError> {
    if value < min || value > max {
        return Err(FieldError::OutOfRange { field, min, max });
    }
    Ok(())
}

pub fn validate_year(field: &'static str, year: Option<i32>) -> Result<(), FieldError> {
    match year {
        Some(year) => validate_range(field, i64::from(year), MIN_YEAR, MAX_YEAR),
        None => Ok(()),
    }
}

pub fn validate_price(price: f64) -> Result<(), FieldError> {
    if !price.is_finite() || price < 0.0 {
        return Err(FieldError::Negative { field: "price" });
    }
    Ok(())
}

/// Strip hyphens and spaces and upper-case the check digit
pub fn compact_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| *c != '-' && *c != ' ')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Compact the ISBN, then check ISBN-10 / ISBN-13 digit layout
///
/// Returns the compact form that is stored.
pub fn normalize_isbn(isbn: &str) -> Result<String, FieldError> {
    let compact = compact_isbn(isbn);

    match ISBN_PATTERN.as_ref() {
        Some(pattern) if pattern.is_match(&compact) => Ok(compact),
        _ => Err(FieldError::InvalidIsbn),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Ursula K. Le Guin", 256).is_ok());
        assert_eq!(
            validate_name("name", "   ", 256),
            Err(FieldError::Required { field: "name" })
        );
        assert_eq!(
            validate_name("title", &"a".repeat(257), 256),
            Err(FieldError::TooLong {
                field: "title",
                max_length: 256
            })
        );
    }

    #[test]
    fn test_validate_name_counts_characters_not_bytes() {
        assert!(validate_name("name", "Émile Zola", 10).is_ok());
    }

    #[test]
    fn test_validate_optional_text() {
        assert!(validate_optional_text("description", None, 5).is_ok());
        assert!(validate_optional_text("description", Some("short"), 5).is_ok());
        assert!(validate_optional_text("description", Some("longer"), 5).is_err());
    }

    #[test]
    fn test_validate_range_and_year() {
        assert!(validate_range("rating", 1, 1, 5).is_ok());
        assert!(validate_range("rating", 5, 1, 5).is_ok());
        assert_eq!(
            validate_range("rating", 6, 1, 5),
            Err(FieldError::OutOfRange {
                field: "rating",
                min: 1,
                max: 5
            })
        );
        assert!(validate_year("published_year", None).is_ok());
        assert!(validate_year("published_year", Some(1965)).is_ok());
        assert!(validate_year("published_year", Some(3000)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(12.99).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("0-441-01359-7").unwrap(), "0441013597");
        assert_eq!(normalize_isbn("978 0441013593").unwrap(), "9780441013593");
        assert_eq!(normalize_isbn("080442957x").unwrap(), "080442957X");
        assert_eq!(normalize_isbn("12345"), Err(FieldError::InvalidIsbn));
        assert_eq!(normalize_isbn("97804410135X3"), Err(FieldError::InvalidIsbn));
    }

    #[test]
    fn test_compact_isbn_keeps_invalid_input() {
        assert_eq!(compact_isbn("978-0-441-01359-3"), "9780441013593");
        assert_eq!(compact_isbn("not an isbn"), "NOTANISBN");
    }

    #[test]
    fn test_field_accessor() {
        assert_eq!(FieldError::InvalidIsbn.field(), "isbn");
        assert_eq!(FieldError::Negative { field: "price" }.field(), "price");
    }
}
