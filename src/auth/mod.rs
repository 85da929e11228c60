//! Authentication for Nestly.
//!
//! Password hashing, session token issuance, and the signup/login/OAuth
//! flows.

mod password;
mod service;
mod token;

pub use password::{
    generate_throwaway_password, hash_password, validate_password, verify_password,
    PasswordError, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use service::{login, oauth_login, signup, AuthError, OAuthProfile, SignupData};
pub use token::{SessionClaims, TokenError, TokenIssuer, DEFAULT_TOKEN_TTL_SECS};
