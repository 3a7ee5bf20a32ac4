//! Password strength checks and hashing.
//!
//! Users pick their password the first time they log in, so a raw password
//! goes through [ValidatedPassword] before it is hashed into a [PasswordHash]
//! and stored next to the user's email.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that is hard enough to guess, but not yet hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password` and wrap it.
    ///
    /// `user_inputs` are strings the password should not be built from,
    /// such as the user's email address.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with a hint on how to make the password
    /// stronger if it scores below three.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, user_inputs);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used by the server.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    ///
    /// The caller should ensure that `raw_password_hash` is a bcrypt hash.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check that `raw_password` matches the stored hash.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}


#[cfg(test)]
mod password_hash_tests {
    use crate::{Error, PasswordHash, ValidatedPassword};

    #[test]
    fn verify_succeeds_for_matching_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert!(hash.verify("okon").unwrap());
        assert!(!hash.verify("thewrongpassword").unwrap());
    }

    #[test]
    fn verify_fails_on_malformed_hash() {
        let hash = PasswordHash::new_unchecked("notahash");

        assert!(matches!(hash.verify("okon"), Err(Error::HashingError(_))));
    }

    #[test]
    fn same_password_hashes_differently() {
        let password = ValidatedPassword::new("turkeysgogobblegobble", &[]).unwrap();
        let hash = PasswordHash::new(password.clone(), 4).unwrap();
        let dupe_hash = PasswordHash::new(password, 4).unwrap();

        assert_ne!(hash, dupe_hash);
        assert!(hash.verify("turkeysgogobblegobble").unwrap());
    }
}
