//! Profile handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use validator::Validate;

use crate::auth::hash_password;
use crate::db::{AccountUpdate, UserRepository};
use crate::web::dto::{AccountResponse, ApiResponse, MessageResponse, UpdateProfileRequest};
use crate::web::error::ApiError;
use crate::web::handlers::auth::clear_session_cookie;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/user/update/:id - Partially update a profile.
///
/// Only the account owner may update it. A provided password is rehashed;
/// all other provided fields are stored as-is and `updated_at` refreshes.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(requester_id): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    if requester_id != id {
        return Err(ApiError::forbidden(
            "You are not authorized to update this account",
        ));
    }

    req.validate().map_err(ApiError::from_validation_errors)?;

    let mut update = AccountUpdate::new();
    if let Some(username) = req.username {
        update = update.username(username);
    }
    if let Some(email) = req.email {
        update = update.email(email);
    }
    if let Some(password) = req.password {
        let hash = hash_password(&password).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            ApiError::internal("Failed to update password")
        })?;
        update = update.password(hash);
    }
    if let Some(avatar) = req.avatar {
        update = update.avatar(avatar);
    }

    let repo = UserRepository::new(state.db.pool());
    let account = repo.update_fields(id, &update).await.map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(account.into())))
}

/// DELETE /api/user/delete/:id - Delete an account.
///
/// Only the account owner may delete it. Clears the session cookie since
/// the identity it points at no longer exists.
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(requester_id): AuthUser,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), ApiError> {
    if requester_id != id {
        return Err(ApiError::forbidden(
            "You are not authorized to delete this account",
        ));
    }

    let repo = UserRepository::new(state.db.pool());
    repo.delete(id).await.map_err(ApiError::from)?;

    tracing::info!(account_id = id, "Account deleted");

    let jar = jar.remove(clear_session_cookie());
    Ok((
        jar,
        Json(ApiResponse::new(MessageResponse::new("Account deleted"))),
    ))
}
