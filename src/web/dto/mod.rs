//! Request and response DTOs for the Nestly API.

mod request;
mod response;

pub use request::{GoogleLoginRequest, LoginRequest, SignupRequest, UpdateProfileRequest};
pub use response::{AccountResponse, ApiResponse, AuthResponse, MessageResponse};
