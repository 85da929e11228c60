//! Response DTOs for the Nestly API.

use serde::Serialize;

use crate::db::UserAccount;

/// Generic API response wrapper.
///
/// Every success response uses this envelope, including both login
/// variants (password and OAuth).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Create a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sanitized account payload: the password hash is structurally absent.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub avatar: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl From<UserAccount> for AccountResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            avatar: account.avatar,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Login response: sanitized account plus the session token.
///
/// The same token also travels in the `access_token` cookie; both channels
/// carry it so clients can pick either.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The authenticated account.
    pub user: AccountResponse,
    /// Session token.
    pub token: String,
}
