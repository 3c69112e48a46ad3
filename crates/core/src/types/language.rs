//! Validated ISO 639-1 language codes.
//!
//! Promotion names and descriptions are translated per language; the request
//! context carries a `LanguageCode` used to pick the right translation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a language code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageCodeError {
    /// The code is not two ASCII letters.
    #[error("invalid language code: {0:?}")]
    Invalid(String),
}

/// A two-letter ISO 639-1 language code, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// English, the fallback language.
    #[must_use]
    pub fn en() -> Self {
        Self("en".to_string())
    }

    /// Parse and normalize a language code.
    ///
    /// # Errors
    ///
    /// Returns `LanguageCodeError::Invalid` unless the input is exactly two
    /// ASCII letters.
    pub fn parse(code: &str) -> Result<Self, LanguageCodeError> {
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_lowercase()))
        } else {
            Err(LanguageCodeError::Invalid(code.to_string()))
        }
    }

    /// The lowercase code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::en()
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LanguageCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}
