//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use validator::Validate;

use crate::auth::{self, OAuthProfile, SignupData, TokenIssuer};
use crate::db::{Database, UserRepository};
use crate::web::dto::{
    ApiResponse, AuthResponse, GoogleLoginRequest, LoginRequest, MessageResponse, SignupRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::SESSION_COOKIE;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Session token issuer.
    pub issuer: TokenIssuer,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, issuer: TokenIssuer) -> Self {
        Self { db, issuer }
    }
}

/// Build the HTTP-only session cookie carrying the token.
///
/// Session-scoped: no Max-Age. The token's own expiry bounds replay.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Build the removal cookie used to clear the session.
pub(crate) fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .build()
}

/// POST /api/auth/signup - Create an account.
///
/// Does not log the new account in; the client follows up with a login.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let repo = UserRepository::new(state.db.pool());
    auth::signup(
        &repo,
        SignupData {
            username: req.username,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(MessageResponse::new("User created"))),
    ))
}

/// POST /api/auth/login - Log in with email and password.
///
/// The token is returned in the body and duplicated into the session
/// cookie; clients can use either channel.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponse>>), ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let repo = UserRepository::new(state.db.pool());
    let (account, token) = auth::login(&repo, &state.issuer, &req.email, &req.password).await?;

    let jar = jar.add(session_cookie(token.clone()));
    Ok((
        jar,
        Json(ApiResponse::new(AuthResponse {
            user: account.into(),
            token,
        })),
    ))
}

/// POST /api/auth/google - Log in with a Google identity.
///
/// The provider assertion has been verified upstream; this resolves (or
/// creates) the account and mints a session. Uses the same envelope as
/// password login.
pub async fn google(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponse>>), ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let repo = UserRepository::new(state.db.pool());
    let (account, token) = auth::oauth_login(
        &repo,
        &state.issuer,
        OAuthProfile {
            display_name: req.name,
            email: req.email,
            photo_url: req.photo,
        },
    )
    .await?;

    let jar = jar.add(session_cookie(token.clone()));
    Ok((
        jar,
        Json(ApiResponse::new(AuthResponse {
            user: account.into(),
            token,
        })),
    ))
}

/// GET /api/auth/logout - Log out.
///
/// Stateless: tokens are not tracked server-side, so logout only clears
/// the session cookie. The client discards its copy of the token.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    let jar = jar.remove(clear_session_cookie());
    (
        jar,
        Json(ApiResponse::new(MessageResponse::new("Logged out"))),
    )
}
