//! HTTP handlers for the Nestly API.

mod auth;
mod user;

pub use auth::{google, login, logout, signup, AppState};
pub use user::{delete_profile, update_profile};
