//! Password handling - hashing, verification, and strength policy.
//!
//! `Password` encapsulates the stored digest; the plaintext never leaves
//! the functions that consume it. `PasswordPolicy` is the configurable
//! strength check applied before a plaintext is ever hashed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// Strength rules are the caller's concern (see [`PasswordPolicy`]);
    /// this only derives the digest.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    /// Hash a password using Argon2.
    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify password against hash.
    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    /// Get Argon2 instance with default config.
    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

/// Configurable password strength policy.
///
/// Defaults require only a minimum length; character-class requirements
/// are opt-in via configuration.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum number of characters
    pub min_length: usize,
    /// Require at least one uppercase and one lowercase letter
    pub require_mixed_case: bool,
    /// Require at least one ASCII digit
    pub require_numbers: bool,
    /// Require at least one non-alphanumeric character
    pub require_symbols: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_mixed_case: false,
            require_numbers: false,
            require_symbols: false,
        }
    }
}

impl PasswordPolicy {
    /// Check a plaintext against the policy.
    pub fn check(&self, plain_text: &str) -> bool {
        if plain_text.chars().count() < self.min_length {
            return false;
        }
        if self.require_mixed_case
            && !(plain_text.chars().any(|c| c.is_uppercase())
                && plain_text.chars().any(|c| c.is_lowercase()))
        {
            return false;
        }
        if self.require_numbers && !plain_text.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        if self.require_symbols && !plain_text.chars().any(|c| !c.is_alphanumeric()) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        // Different salts produce different hashes
        assert_ne!(pass1.as_str(), pass2.as_str());
        // But both verify correctly
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_policy_default_min_length() {
        let policy = PasswordPolicy::default();
        assert!(!policy.check("short"));
        assert!(policy.check("12345678"));
    }

    #[test]
    fn test_policy_character_classes() {
        let policy = PasswordPolicy {
            min_length: 8,
            require_mixed_case: true,
            require_numbers: true,
            require_symbols: true,
        };

        assert!(!policy.check("alllowercase1!"));
        assert!(!policy.check("NoDigitsHere!"));
        assert!(!policy.check("NoSymbols123"));
        assert!(policy.check("P@ssword123!"));
    }

    #[test]
    fn test_policy_counts_characters_not_bytes() {
        let policy = PasswordPolicy::default();
        // 8 multibyte characters satisfy an 8-character minimum
        assert!(policy.check("pässwörd"));
    }
}
