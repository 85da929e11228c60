//! User account model for Nestly.

use super::schema::DEFAULT_AVATAR_URL;

/// A registered user account.
///
/// `password` holds the Argon2 hash and must never be serialized into a
/// client-facing response; see `AccountResponse` in the web DTOs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAccount {
    /// Unique account ID, assigned at creation.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Unique email address, primary login key.
    pub email: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Avatar URL.
    pub avatar: String,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last modification timestamp, refreshed by the store on every update.
    pub updated_at: String,
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password hash (pre-hashed with Argon2).
    pub password: String,
    /// Avatar URL.
    pub avatar: String,
}

impl NewAccount {
    /// Create a new account with the default avatar.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
        }
    }

    /// Set the avatar URL.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }
}

/// Data for a partial account update.
///
/// Only fields that are set are touched; `updated_at` is refreshed
/// regardless.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    /// New username.
    pub username: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New password hash (if changing password).
    pub password: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
}

impl AccountUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set new email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set new password hash.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set new avatar URL.
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.avatar.is_none()
    }
}
