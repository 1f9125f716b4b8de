//! Display Name Value Object
//!
//! Free-form display name shown in the UI and embedded in access-token
//! claims. Unlike a login handle there is no character whitelist: any
//! printable text is allowed, including non-ASCII.
//!
//! ## Invariants
//! - NFKC normalized, then trimmed
//! - Length 3..=100 characters (counted in chars, not bytes)
//! - No control characters

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for a display name (in characters)
pub const DISPLAY_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for a display name (in characters)
pub const DISPLAY_NAME_MAX_LENGTH: usize = 100;

/// Error returned when display name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNameError {
    /// Display name is empty after normalization
    Empty,

    /// Display name is too short
    TooShort { length: usize, min: usize },

    /// Display name is too long
    TooLong { length: usize, max: usize },

    /// Display name contains a control character
    InvalidCharacter,
}

impl fmt::Display for DisplayNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Name cannot be empty"),
            Self::TooShort { length, min } => {
                write!(f, "Name is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "Name is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter => write!(f, "Name contains invalid control characters"),
        }
    }
}

impl std::error::Error for DisplayNameError {}

/// Validated, normalized display name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName from raw input
    ///
    /// Applies normalization (NFKC, trim) and validates length.
    pub fn new(input: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let normalized = input.as_ref().nfkc().collect::<String>().trim().to_string();

        if normalized.is_empty() {
            return Err(DisplayNameError::Empty);
        }

        let length = normalized.chars().count();
        if length < DISPLAY_NAME_MIN_LENGTH {
            return Err(DisplayNameError::TooShort {
                length,
                min: DISPLAY_NAME_MIN_LENGTH,
            });
        }
        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(DisplayNameError::TooLong {
                length,
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }

        if normalized.chars().any(|c| c.is_control()) {
            return Err(DisplayNameError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Create from database value (assumes already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the display name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisplayName").field(&self.0).finish()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DisplayNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DisplayName {
    type Error = DisplayNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_whitespace() {
            let name = DisplayName::new("  Alice  ").unwrap();
            assert_eq!(name.as_str(), "Alice");
        }

        #[test]
        fn test_case_preserved() {
            let name = DisplayName::new("ALICE").unwrap();
            assert_eq!(name.as_str(), "ALICE");
        }

        #[test]
        fn test_nfkc_normalization() {
            // Full-width 'Ａ' (U+FF21) normalizes to ASCII 'A'
            let name = DisplayName::new("Ａlice").unwrap();
            assert_eq!(name.as_str(), "Alice");
        }
    }

    mod length_validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert!(matches!(
                DisplayName::new(""),
                Err(DisplayNameError::Empty)
            ));
        }

        #[test]
        fn test_whitespace_only_fails() {
            assert!(matches!(
                DisplayName::new("   "),
                Err(DisplayNameError::Empty)
            ));
        }

        #[test]
        fn test_too_short() {
            assert!(matches!(
                DisplayName::new("ab"),
                Err(DisplayNameError::TooShort { length: 2, min: 3 })
            ));
        }

        #[test]
        fn test_minimum_length() {
            assert!(DisplayName::new("abc").is_ok());
        }

        #[test]
        fn test_maximum_length() {
            let input = "a".repeat(DISPLAY_NAME_MAX_LENGTH);
            assert!(DisplayName::new(&input).is_ok());
        }

        #[test]
        fn test_too_long() {
            let input = "a".repeat(DISPLAY_NAME_MAX_LENGTH + 1);
            assert!(matches!(
                DisplayName::new(&input),
                Err(DisplayNameError::TooLong { .. })
            ));
        }
    }

    mod character_validation {
        use super::*;

        #[test]
        fn test_unicode_allowed() {
            assert!(DisplayName::new("山田 太郎").is_ok());
            assert!(DisplayName::new("Zoë Müller").is_ok());
        }

        #[test]
        fn test_internal_spaces_allowed() {
            let name = DisplayName::new("Alice B. Carol").unwrap();
            assert_eq!(name.as_str(), "Alice B. Carol");
        }

        #[test]
        fn test_control_characters_rejected() {
            assert!(matches!(
                DisplayName::new("Ali\u{0007}ce"),
                Err(DisplayNameError::InvalidCharacter)
            ));
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_serialize() {
            let name = DisplayName::new("Alice").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"Alice\"");
        }

        #[test]
        fn test_deserialize_invalid() {
            let json = "\"ab\""; // too short
            let result: Result<DisplayName, _> = serde_json::from_str(json);
            assert!(result.is_err());
        }
    }

    mod conversions {
        use super::*;

        #[test]
        fn test_try_from_string() {
            let name: Result<DisplayName, _> = "Alice".to_string().try_into();
            assert!(name.is_ok());
        }

        #[test]
        fn test_into_string() {
            let name = DisplayName::new("Alice").unwrap();
            let s: String = name.into();
            assert_eq!(s, "Alice");
        }
    }
}
