//! Authentication flows for Nestly.
//!
//! The signup, login and OAuth-login use cases, coordinating the user
//! repository, the password hasher and the token issuer. Each call is a
//! one-shot transition; no state is kept between requests.

use thiserror::Error;
use tracing::info;

use crate::auth::password::{
    generate_throwaway_password, hash_password, verify_password, PasswordError,
};
use crate::auth::token::{TokenError, TokenIssuer};
use crate::db::{NewAccount, UserAccount, UserRepository};
use crate::NestlyError;

/// Username fallback when an OAuth display name has no usable characters.
const FALLBACK_USERNAME: &str = "user";

/// Authentication flow errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// No account exists for the given email.
    #[error("user not found")]
    UserNotFound,

    /// Password mismatch.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username or email already taken.
    #[error("username or email already exists")]
    Conflict,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Token issuance failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl From<NestlyError> for AuthError {
    fn from(e: NestlyError) -> Self {
        match e {
            NestlyError::Duplicate(_) => AuthError::Conflict,
            other => AuthError::Database(other.to_string()),
        }
    }
}

/// Signup request data.
#[derive(Debug, Clone)]
pub struct SignupData {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Identity asserted by an upstream OAuth provider.
///
/// Trust boundary: the caller must have verified the provider's proof
/// before constructing this. `oauth_login` does no password check.
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    /// Display name from the provider.
    pub display_name: String,
    /// Verified email from the provider.
    pub email: String,
    /// Profile photo URL, if any.
    pub photo_url: Option<String>,
}

/// Register a new account.
///
/// Hashes the password and inserts the account. Does not issue a token:
/// signup is followed by a separate login step. Duplicate username or
/// email fails with `AuthError::Conflict` — the store's unique indexes are
/// authoritative, there is no pre-check.
pub async fn signup(
    repo: &UserRepository<'_>,
    data: SignupData,
) -> Result<UserAccount, AuthError> {
    if data.username.trim().is_empty() || data.email.trim().is_empty() {
        return Err(AuthError::Validation(
            "username and email are required".to_string(),
        ));
    }

    let password_hash = hash_password(&data.password)?;
    let account = repo
        .create(&NewAccount::new(&data.username, &data.email, password_hash))
        .await?;

    info!(
        username = %account.username,
        account_id = account.id,
        "New account registered"
    );

    Ok(account)
}

/// Log in with email and password.
///
/// Returns the account together with a freshly minted session token.
pub async fn login(
    repo: &UserRepository<'_>,
    issuer: &TokenIssuer,
    email: &str,
    password: &str,
) -> Result<(UserAccount, String), AuthError> {
    let account = repo
        .find_by_email(email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if !verify_password(password, &account.password) {
        return Err(AuthError::InvalidCredentials);
    }

    let token = issuer.issue(account.id)?;

    info!(account_id = account.id, "Login successful");

    Ok((account, token))
}

/// Log in with an OAuth identity, creating the account on first sight.
///
/// Idempotent per email: a second call with the same email resolves to the
/// same account and never re-derives a username. First-time accounts get a
/// username derived from the display name (first free integer suffix) and
/// a hashed throwaway password.
pub async fn oauth_login(
    repo: &UserRepository<'_>,
    issuer: &TokenIssuer,
    profile: OAuthProfile,
) -> Result<(UserAccount, String), AuthError> {
    if profile.email.trim().is_empty() {
        return Err(AuthError::Validation("email is required".to_string()));
    }

    if let Some(account) = repo.find_by_email(&profile.email).await? {
        let token = issuer.issue(account.id)?;
        info!(account_id = account.id, "OAuth login for existing account");
        return Ok((account, token));
    }

    let base = derive_base_username(&profile.display_name);
    let username = next_free_username(repo, &base).await?;
    let password_hash = hash_password(&generate_throwaway_password())?;

    let mut new_account = NewAccount::new(&username, &profile.email, password_hash);
    if let Some(photo) = profile.photo_url {
        new_account = new_account.with_avatar(photo);
    }

    let account = repo.create(&new_account).await?;
    let token = issuer.issue(account.id)?;

    info!(
        username = %account.username,
        account_id = account.id,
        "New account created via OAuth"
    );

    Ok((account, token))
}

/// Derive the base username from an OAuth display name: lowercased with
/// all whitespace removed.
fn derive_base_username(display_name: &str) -> String {
    let base: String = display_name
        .split_whitespace()
        .collect::<String>()
        .to_lowercase();

    if base.is_empty() {
        FALLBACK_USERNAME.to_string()
    } else {
        base
    }
}

/// Find the first free username among `base`, `base_1`, `base_2`, …
///
/// Sequential and unbounded; at the scale this runs at, collision chains
/// are short.
async fn next_free_username(
    repo: &UserRepository<'_>,
    base: &str,
) -> Result<String, AuthError> {
    if repo.find_by_username(base).await?.is_none() {
        return Ok(base.to_string());
    }

    let mut counter = 1u32;
    loop {
        let candidate = format!("{base}_{counter}");
        if repo.find_by_username(&candidate).await?.is_none() {
            return Ok(candidate);
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", 3600)
    }

    fn signup_data(username: &str, email: &str, password: &str) -> SignupData {
        SignupData {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let issuer = test_issuer();

        let account = signup(&repo, signup_data("jane", "jane@example.com", "password123"))
            .await
            .unwrap();
        assert_eq!(account.username, "jane");
        // Stored hash, not the plaintext
        assert_ne!(account.password, "password123");
        assert!(account.password.starts_with("$argon2id$"));

        let (logged_in, token) = login(&repo, &issuer, "jane@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(logged_in.id, account.id);
        assert_eq!(issuer.verify(&token).unwrap(), account.id);
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        signup(&repo, signup_data("jane", "jane@example.com", "password123"))
            .await
            .unwrap();

        let result = signup(
            &repo,
            signup_data("janedoe", "jane@example.com", "password456"),
        )
        .await;
        assert!(matches!(result, Err(AuthError::Conflict)));

        // Exactly one account remains for the email
        let found = repo.find_by_email("jane@example.com").await.unwrap().unwrap();
        assert_eq!(found.username, "jane");
    }

    #[tokio::test]
    async fn test_signup_empty_fields() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let result = signup(&repo, signup_data("  ", "jane@example.com", "password123")).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));

        let result = signup(&repo, signup_data("jane", "", "password123")).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let result = login(&repo, &test_issuer(), "nobody@example.com", "whatever").await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        signup(&repo, signup_data("jane", "jane@example.com", "password123"))
            .await
            .unwrap();

        let result = login(&repo, &test_issuer(), "jane@example.com", "wrong-password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_oauth_login_creates_account() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let issuer = test_issuer();

        let profile = OAuthProfile {
            display_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            photo_url: Some("https://example.com/jane.png".to_string()),
        };

        let (account, token) = oauth_login(&repo, &issuer, profile).await.unwrap();
        assert_eq!(account.username, "janedoe");
        assert_eq!(account.avatar, "https://example.com/jane.png");
        assert_eq!(issuer.verify(&token).unwrap(), account.id);
    }

    #[tokio::test]
    async fn test_oauth_login_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let issuer = test_issuer();

        let profile = OAuthProfile {
            display_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            photo_url: None,
        };

        let (first, _) = oauth_login(&repo, &issuer, profile.clone()).await.unwrap();
        let (second, _) = oauth_login(&repo, &issuer, profile).await.unwrap();

        assert_eq!(first.id, second.id);
        // No username re-derivation on the second call
        assert_eq!(second.username, "janedoe");
    }

    #[tokio::test]
    async fn test_oauth_username_suffix_probing() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let issuer = test_issuer();

        // Occupy the base and the first suffix
        signup(&repo, signup_data("janedoe", "taken@example.com", "password123"))
            .await
            .unwrap();
        signup(
            &repo,
            signup_data("janedoe_1", "taken2@example.com", "password123"),
        )
        .await
        .unwrap();

        let profile = OAuthProfile {
            display_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            photo_url: None,
        };
        let (account, _) = oauth_login(&repo, &issuer, profile).await.unwrap();
        assert_eq!(account.username, "janedoe_2");
    }

    #[tokio::test]
    async fn test_oauth_existing_email_skips_password_check() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let issuer = test_issuer();

        let created = signup(&repo, signup_data("jane", "jane@example.com", "password123"))
            .await
            .unwrap();

        // The provider assertion is trusted; no password is involved
        let profile = OAuthProfile {
            display_name: "Completely Different".to_string(),
            email: "jane@example.com".to_string(),
            photo_url: None,
        };
        let (account, _) = oauth_login(&repo, &issuer, profile).await.unwrap();
        assert_eq!(account.id, created.id);
        assert_eq!(account.username, "jane");
    }

    #[test]
    fn test_derive_base_username() {
        assert_eq!(derive_base_username("Jane Doe"), "janedoe");
        assert_eq!(derive_base_username("  Jane   van  Doe "), "janevandoe");
        assert_eq!(derive_base_username("JANE"), "jane");
        assert_eq!(derive_base_username(""), "user");
        assert_eq!(derive_base_username("   "), "user");
    }
}
