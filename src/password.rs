//! Newtypes for handling passwords before and after hashing.

use std::fmt::Display;

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The error returned when a raw password fails validation or hashing.
#[derive(Debug, Error, PartialEq)]
#[error("{0} is not a valid password")]
pub struct PasswordError(pub String);

/// The minimum number of characters in a password.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// A password that has been validated, but not yet hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPassword(String);

impl RawPassword {
    /// Create a new password from a string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password is shorter than
    /// [MIN_PASSWORD_LENGTH] characters.
    pub fn new(raw_password_string: String) -> Result<Self, PasswordError> {
        if raw_password_string.chars().count() < MIN_PASSWORD_LENGTH {
            Err(PasswordError(raw_password_string))
        } else {
            Ok(Self(raw_password_string))
        }
    }

    /// Create a new `RawPassword` without any validation.
    ///
    /// This should only be used for strings that do not need the length check,
    /// e.g. passwords entered at log-in, which are only compared against a
    /// stored hash.
    pub fn new_unchecked(raw_password_string: String) -> Self {
        Self(raw_password_string)
    }
}

impl AsRef<str> for RawPassword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<[u8]> for RawPassword {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A bcrypt hash of a user's password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Create a hashed password from a validated password.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(raw_password: &RawPassword) -> Result<Self, BcryptError> {
        hash(raw_password, DEFAULT_COST).map(Self)
    }

    /// Create a new `PasswordHash` without hashing.
    ///
    /// This should only be called on strings coming out of a trusted source
    /// such as the application's database.
    pub fn new_unchecked(raw_password_hash: String) -> Self {
        Self(raw_password_hash)
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &RawPassword) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod password_hash_tests {
    use super::{PasswordHash, RawPassword};

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let password = RawPassword::new("password123456".to_owned()).unwrap();
        let wrong_password = RawPassword::new("the_wrong_password".to_owned()).unwrap();
        let hash = PasswordHash::new(&password).unwrap();

        assert!(hash.verify(&password).unwrap());
        assert!(!hash.verify(&wrong_password).unwrap());
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let password = RawPassword::new("password123456".to_owned()).unwrap();
        let hash = PasswordHash::new(&password).unwrap();
        let dupe_hash = PasswordHash::new(&password).unwrap();

        assert_ne!(hash, dupe_hash);
    }

    #[test]
    fn hash_does_not_contain_plaintext() {
        let password = RawPassword::new("hunter2hunter2".to_owned()).unwrap();

        let hash = PasswordHash::new(&password).unwrap();

        assert!(!hash.to_string().contains("hunter2"));
    }
}
