//! Session token middleware.
//!
//! Protected routes accept the token from the `access_token` cookie (set
//! at login) or from an `Authorization: Bearer` header.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::web::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "access_token";

/// Extractor for authenticated requests.
///
/// Carries the account ID the session token was issued for.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Cookie first, then Authorization header
            let cookie_token = CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|c| c.value().to_string());

            let token = match cookie_token {
                Some(t) => t,
                None => parts
                    .headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|header| header.strip_prefix("Bearer "))
                    .map(|t| t.to_string())
                    .ok_or_else(|| ApiError::unauthorized("Missing authorization"))?,
            };

            // Issuer injected by the session middleware
            let issuer = parts
                .extensions
                .get::<Arc<TokenIssuer>>()
                .ok_or_else(|| ApiError::internal("Token issuer not configured"))?;

            let account_id = issuer.verify(&token).map_err(|e| {
                tracing::debug!("Session token rejected: {}", e);
                ApiError::from(e)
            })?;

            Ok(AuthUser(account_id))
        })
    }
}

/// Middleware function to inject the token issuer into request extensions.
pub async fn session_auth(
    issuer: Arc<TokenIssuer>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(issuer);
    next.run(request).await
}
