//! Middleware for the Nestly API.

mod auth;
mod cors;

pub use auth::{session_auth, AuthUser, SESSION_COOKIE};
pub use cors::create_cors_layer;
