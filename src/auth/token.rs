//! Stateless session tokens for Nestly.
//!
//! A session token is a signed claim binding an account ID to an issuance
//! time. Nothing is persisted server-side: any replica holding the secret
//! can validate a session, and logout is purely client-local.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default session token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 604_800;

/// Session token errors.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Bad signature or malformed token.
    #[error("invalid session token")]
    Invalid,

    /// Token past its expiry.
    #[error("session token expired")]
    Expired,

    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account ID).
    pub sub: i64,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// Unique token identifier.
    pub jti: String,
}

/// Issues and verifies session tokens with a process-wide secret.
///
/// Constructed once at startup from configuration and passed explicitly to
/// whoever needs it; tests construct their own with a fake secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenIssuer {
    /// Create a new issuer from a secret and token lifetime.
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Issue a fresh token for an account.
    pub fn issue(&self, account_id: i64) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: account_id,
            iat: now,
            exp: now + self.ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the account ID it was issued for.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        Ok(data.claims.sub)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
