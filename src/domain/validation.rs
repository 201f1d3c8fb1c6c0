//! Shared validation patterns and custom validators for request payloads.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::errors::{AppError, AppResult};

/// Phone numbers: optional leading +, digits with common separators.
pub static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ().-]{6,18}[0-9]$").expect("valid phone regex"));

/// US social security number, with or without dashes.
pub static SSN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-?\d{2}-?\d{4}$").expect("valid ssn regex"));

/// Postal codes: letters, digits, spaces and dashes.
pub static POSTAL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 -]{2,9}$").expect("valid postal code regex"));

/// Rejects strings that are empty after trimming.
pub fn not_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{} cannot be blank", field)));
    }
    Ok(())
}

/// Serde helper: strips surrounding whitespace before length rules run.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

/// Ensures a date range is ordered.
pub fn ordered_dates(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start >= end {
        return Err(AppError::validation("End date must be after start date"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_pattern() {
        assert!(PHONE_RE.is_match("+1 (555) 010-2030"));
        assert!(PHONE_RE.is_match("5550102030"));
        assert!(!PHONE_RE.is_match("call me"));
    }

    #[test]
    fn test_ssn_pattern() {
        assert!(SSN_RE.is_match("123-45-6789"));
        assert!(SSN_RE.is_match("123456789"));
        assert!(!SSN_RE.is_match("12-345-6789"));
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Message", "hello").is_ok());
        assert!(not_blank("Message", "   ").is_err());
    }

    #[test]
    fn test_ordered_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert!(ordered_dates(start, end).is_ok());
        assert!(ordered_dates(end, start).is_err());
        assert!(ordered_dates(start, start).is_err());
    }
}
