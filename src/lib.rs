//! Nestly - identity and session service for a real-estate listing
//! platform.
//!
//! Accounts, password and OAuth login with stateless session tokens, and a
//! pure client-side session state reducer.

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    hash_password, login, oauth_login, signup, validate_password, verify_password, AuthError,
    OAuthProfile, PasswordError, SessionClaims, SignupData, TokenError, TokenIssuer,
};
pub use client::{
    reduce, OpGroup, ProfilePatch, SessionAction, SessionState, SessionStore, SessionUser,
};
pub use config::Config;
pub use db::{AccountUpdate, Database, NewAccount, UserAccount, UserRepository};
pub use error::{NestlyError, Result};
