//! Password hashing for Nestly.
//!
//! Uses Argon2id with a per-call random salt embedded in the PHC output.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Length of the throwaway password generated for OAuth-created accounts.
const THROWAWAY_PASSWORD_LENGTH: usize = 16;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),
}

/// Create the Argon2 hasher with recommended parameters.
///
/// Memory cost 64 MB, 3 iterations, parallelism 4.
fn create_argon2() -> Argon2<'static> {
    let params = Params::new(65536, 3, 4, None).expect("valid Argon2 params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Validate password length requirements.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted hash string that includes the salt and
/// parameters.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = create_argon2();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns false on mismatch and on malformed hash input; never fails.
/// Parameters are taken from the parsed hash, not from `create_argon2`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random throwaway password for an OAuth-created account.
///
/// The account holder never learns this password; it exists only so the
/// account satisfies the credential schema.
pub fn generate_throwaway_password() -> String {
    use rand::{distr::Alphanumeric, Rng};

    rand::rng()
        .sample_iter(Alphanumeric)
        .take(THROWAWAY_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
