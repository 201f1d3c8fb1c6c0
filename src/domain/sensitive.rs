//! Sensitive value handling: one-way hashing and masking for identifiers
//! such as SSNs and account numbers.
//!
//! Raw values never leave this module; callers keep only the hash (for
//! later matching) and the masked form (for display).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Hash a secret with Argon2 and a random salt.
pub(crate) fn hash_secret(plain_text: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain_text.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("Hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a secret against a stored Argon2 hash.
pub(crate) fn verify_secret(plain_text: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(plain_text.as_bytes(), &parsed)
        .is_ok())
}

/// A sensitive identifier reduced to its hash and last four digits.
#[derive(Clone, PartialEq, Eq)]
pub struct SensitiveValue {
    hash: String,
    last_four: String,
}

impl std::fmt::Debug for SensitiveValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensitiveValue")
            .field("hash", &"[REDACTED]")
            .field("last_four", &self.last_four)
            .finish()
    }
}

impl SensitiveValue {
    /// Digits of `raw` are hashed; separators are ignored.
    pub fn protect(raw: &str) -> AppResult<Self> {
        let digits = Self::digits(raw);
        if digits.len() < 4 {
            return Err(AppError::validation("Value must contain at least 4 digits"));
        }
        let last_four = digits[digits.len() - 4..].to_string();
        Ok(Self {
            hash: hash_secret(&digits)?,
            last_four,
        })
    }

    /// Check a raw value against a stored hash.
    pub fn matches(raw: &str, hash: &str) -> bool {
        verify_secret(&Self::digits(raw), hash).unwrap_or(false)
    }

    /// Mask everything but the last four digits, e.g. `***-**-6789`.
    pub fn mask(raw: &str) -> String {
        let digits = Self::digits(raw);
        let visible = digits.len().min(4);
        let tail = &digits[digits.len() - visible..];
        format!("***-**-{}", tail)
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn last_four(&self) -> &str {
        &self.last_four
    }

    pub fn into_parts(self) -> (String, String) {
        (self.hash, self.last_four)
    }

    fn digits(raw: &str) -> String {
        raw.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protect_keeps_last_four_and_hash_only() {
        let value = SensitiveValue::protect("123-45-6789").unwrap();
        assert_eq!(value.last_four(), "6789");
        assert!(!value.hash().contains("123456789"));
        assert!(SensitiveValue::matches("123456789", value.hash()));
        assert!(!SensitiveValue::matches("987-65-4321", value.hash()));
    }

    #[test]
    fn test_mask() {
        assert_eq!(SensitiveValue::mask("123-45-6789"), "***-**-6789");
        assert_eq!(SensitiveValue::mask("12"), "***-**-12");
    }

    #[test]
    fn test_debug_redacts_hash() {
        let value = SensitiveValue::protect("123456789").unwrap();
        let rendered = format!("{:?}", value);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(value.hash()));
    }

    #[test]
    fn test_too_few_digits_rejected() {
        assert!(SensitiveValue::protect("12-3").is_err());
    }
}
