//! Request DTOs for the Nestly API.

use serde::Deserialize;
use validator::Validate;

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired username.
    #[validate(length(min = 1, max = 30, message = "username must be 1-30 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Google OAuth login request.
///
/// The identity-provider proof has already been verified by the client SDK
/// before this reaches us; the body carries the asserted profile only.
#[derive(Debug, Deserialize, Validate)]
pub struct GoogleLoginRequest {
    /// Display name from the provider.
    #[serde(default)]
    pub name: String,
    /// Verified email from the provider.
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Profile photo URL.
    #[serde(default)]
    pub photo: Option<String>,
}

/// Partial profile update request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New username.
    #[validate(length(min = 1, max = 30, message = "username must be 1-30 characters"))]
    pub username: Option<String>,
    /// New email address.
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    /// New password (will be rehashed).
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
}
