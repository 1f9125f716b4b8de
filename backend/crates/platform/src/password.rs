//! Password Hashing and Verification
//!
//! Argon2id password handling with:
//! - Memory-hard hashing (recommended by OWASP)
//! - Zeroization of sensitive data
//! - Constant-time comparison
//! - Optional application-wide pepper
//!
//! ## Security Features
//! - Memory-hard hashing prevents GPU/ASIC attacks
//! - Zeroization prevents memory inspection attacks
//! - `Debug` output is redacted so secrets never reach logs

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length (registration contract)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length (registration contract)
pub const MAX_PASSWORD_LENGTH: usize = 100;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// This type ensures that password data is securely erased from memory
/// when the value is dropped, preventing memory inspection attacks.
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("my_secure_password".to_string())?;
/// // Password is automatically zeroized when dropped
/// # Ok::<(), platform::password::PasswordPolicyError>(())
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Validation rules:
    /// - Minimum 6 characters, maximum 100 characters
    /// - No control characters
    /// - Not empty/whitespace only
    ///
    /// Unicode is normalized using NFKC before validation, so the same
    /// password always hashes to the same byte sequence regardless of the
    /// client's composition form.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        // Check for empty or whitespace-only
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count Unicode code points (not bytes)
        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        // Check for control characters (except space, tab, newline)
        for ch in normalized.chars() {
            if ch.is_control() && ch != ' ' && ch != '\t' && ch != '\n' {
                return Err(PasswordPolicyError::InvalidCharacter);
            }
        }

        Ok(Self(normalized))
    }

    /// Create without validation (for testing or trusted input)
    ///
    /// ## Safety
    /// Only use this for testing or when password has already been validated
    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    /// Get the password as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret for additional security
    ///
    /// ## Returns
    /// PHC-formatted hash string wrapped in `HashedPassword`
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        // Combine password with pepper if provided
        let password_bytes = match pepper {
            Some(p) => {
                let mut combined = self.as_bytes().to_vec();
                combined.extend_from_slice(p);
                combined
            }
            None => self.as_bytes().to_vec(),
        };

        // Generate random salt (128 bits = 16 bytes)
        let salt = SaltString::generate(OsRng);

        // OWASP recommended Argon2id parameters:
        // m=19456 (19 MiB), t=2, p=1
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// This type stores the Argon2id hash in PHC format, which includes:
/// - Algorithm identifier
/// - Version
/// - Parameters (memory, iterations, parallelism)
/// - Salt
/// - Hash
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, HashedPassword};
///
/// let password = ClearTextPassword::new("my_secure_password".to_string())?;
/// let hashed = password.hash(None)?;
///
/// // Later, verify
/// assert!(hashed.verify(&password, None));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        // Validate it's a valid PHC string
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// Never errors outward: a malformed stored hash verifies as `false`.
    ///
    /// ## Arguments
    /// * `password` - The clear text password to verify
    /// * `pepper` - Optional pepper (must match the one used during hashing)
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let password_bytes = match pepper {
            Some(p) => {
                let mut combined = password.as_bytes().to_vec();
                combined.extend_from_slice(p);
                combined
            }
            None => password.as_bytes().to_vec(),
        };

        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let argon2 = Argon2::default();

        // Argon2 uses constant-time comparison internally
        argon2
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok()
    }

    /// Check if the hash needs to be rehashed (e.g., parameters changed)
    ///
    /// Returns true if the hash uses outdated parameters
    pub fn needs_rehash(&self) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return true,
        };

        // Check if algorithm is Argon2id
        if parsed_hash.algorithm != argon2::Algorithm::Argon2id.ident() {
            return true;
        }

        // Could add parameter version checking here
        false
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("abc12".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_minimum_length_accepted() {
        // Six characters is the contract minimum
        let result = ClearTextPassword::new("abc123".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_empty() {
        let result = ClearTextPassword::new("".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_control_characters() {
        let result = ClearTextPassword::new("abc\u{0007}def".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_unicode_password() {
        // Unicode passwords should work
        let result = ClearTextPassword::new("パスワード安全です!".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_nfkc_normalization() {
        // Full-width and half-width forms normalize to the same password
        let full_width = ClearTextPassword::new("ｐａｓｓｗｏｒｄ１".to_string()).unwrap();
        let half_width = ClearTextPassword::new("password1".to_string()).unwrap();
        assert_eq!(full_width.as_bytes(), half_width.as_bytes());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new_unchecked("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        // Correct password should verify
        assert!(hashed.verify(&password, None));

        // Wrong password should not verify
        let wrong_password = ClearTextPassword::new_unchecked("WrongPassword123!".to_string());
        assert!(!hashed.verify(&wrong_password, None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = ClearTextPassword::new_unchecked("TestPassword123!".to_string());
        let pepper = b"my_secret_pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        // Correct password with correct pepper
        assert!(hashed.verify(&password, Some(pepper)));

        // Correct password without pepper should fail
        assert!(!hashed.verify(&password, None));

        // Correct password with wrong pepper should fail
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::new_unchecked("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        let phc_string = hashed.as_phc_string().to_string();
        let restored = HashedPassword::from_phc_string(phc_string).unwrap();

        assert!(restored.verify(&password, None));
    }

    #[test]
    fn test_invalid_phc_string() {
        let result = HashedPassword::from_phc_string("not_a_valid_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        // A hash that parses but cannot match must return false, not error
        let password = ClearTextPassword::new_unchecked("whatever1".to_string());
        let broken = HashedPassword {
            hash: "garbage".to_string(),
        };
        assert!(!broken.verify(&password, None));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new_unchecked("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = password.hash(None).unwrap();
        let debug_output = format!("{:?}", hashed);
        assert!(!debug_output.contains(hashed.as_phc_string()));
    }
}
