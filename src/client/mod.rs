//! Client-side session state container.

mod session;

pub use session::{
    reduce, OpGroup, ProfilePatch, SessionAction, SessionState, SessionStore, SessionUser,
};
