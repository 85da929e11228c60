//! Client-side session state for Nestly.
//!
//! A reducer-style state container tracking the current identity, whether a
//! request is in flight, and the last error. Pages dispatch a start action,
//! perform the HTTP call, and dispatch success or failure with the result.
//!
//! The reducer is a pure function: every input arrives in the action
//! payload, nothing external is read, nothing blocks. Two concurrent
//! requests of the same operation group are resolved by a monotonic
//! request-id guard — a response older than the group's latest started
//! request is dropped instead of overwriting newer state.

use serde::{Deserialize, Serialize};

/// Identity payload echoed back by the server (password hash is never
/// present).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Account ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub avatar: String,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

/// Partial identity fields from a profile-update response, shallow-merged
/// into the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    /// New username, if changed.
    pub username: Option<String>,
    /// New email, if changed.
    pub email: Option<String>,
    /// New avatar URL, if changed.
    pub avatar: Option<String>,
    /// Server-side modification timestamp.
    pub updated_at: Option<String>,
}

/// Operation groups with independent request lifecycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpGroup {
    /// Login (password or OAuth).
    Login,
    /// Profile update.
    Update,
    /// Account deletion.
    Delete,
    /// Logout.
    Logout,
}

impl OpGroup {
    fn index(self) -> usize {
        match self {
            OpGroup::Login => 0,
            OpGroup::Update => 1,
            OpGroup::Delete => 2,
            OpGroup::Logout => 3,
        }
    }
}

/// Lifecycle actions dispatched around each async call.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// A request of the given group was started.
    Start { group: OpGroup, request_id: u64 },
    /// Login resolved with a full identity payload (full replace).
    LoginSuccess { request_id: u64, user: SessionUser },
    /// Profile update resolved (shallow merge).
    UpdateSuccess { request_id: u64, patch: ProfilePatch },
    /// Account deletion resolved; the identity is gone.
    DeleteSuccess { request_id: u64 },
    /// Logout resolved; the identity is cleared.
    LogoutSuccess { request_id: u64 },
    /// A request failed with a human-readable message.
    Failure {
        group: OpGroup,
        request_id: u64,
        message: String,
    },
}

impl SessionAction {
    fn group(&self) -> OpGroup {
        match self {
            SessionAction::Start { group, .. } | SessionAction::Failure { group, .. } => *group,
            SessionAction::LoginSuccess { .. } => OpGroup::Login,
            SessionAction::UpdateSuccess { .. } => OpGroup::Update,
            SessionAction::DeleteSuccess { .. } => OpGroup::Delete,
            SessionAction::LogoutSuccess { .. } => OpGroup::Logout,
        }
    }

    fn request_id(&self) -> u64 {
        match self {
            SessionAction::Start { request_id, .. }
            | SessionAction::LoginSuccess { request_id, .. }
            | SessionAction::UpdateSuccess { request_id, .. }
            | SessionAction::DeleteSuccess { request_id }
            | SessionAction::LogoutSuccess { request_id }
            | SessionAction::Failure { request_id, .. } => *request_id,
        }
    }
}

/// Client session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Last-known identity, or none.
    pub current_user: Option<SessionUser>,
    /// True between a start action and its resolving success/failure.
    pub loading: bool,
    /// Last failure message; cleared on the next start or success.
    pub error: Option<String>,
    /// Timestamp of the last successful profile sync.
    pub updated_at: Option<String>,
    /// Latest started request id per operation group.
    latest: [u64; 4],
}

impl SessionState {
    /// Fresh state: no user, not loading, no error.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Pure transition function over `(state, action)`.
pub fn reduce(mut state: SessionState, action: SessionAction) -> SessionState {
    let group = action.group();
    let request_id = action.request_id();

    if let SessionAction::Start { .. } = action {
        if request_id > state.latest[group.index()] {
            state.latest[group.index()] = request_id;
        }
        state.loading = true;
        state.error = None;
        return state;
    }

    // Stale resolution: a newer request of this group has started since.
    if request_id < state.latest[group.index()] {
        return state;
    }

    match action {
        SessionAction::LoginSuccess { user, .. } => {
            state.current_user = Some(user);
            state.error = None;
            state.loading = false;
        }
        SessionAction::UpdateSuccess { patch, .. } => {
            if let Some(user) = state.current_user.as_mut() {
                if let Some(username) = patch.username {
                    user.username = username;
                }
                if let Some(email) = patch.email {
                    user.email = email;
                }
                if let Some(avatar) = patch.avatar {
                    user.avatar = avatar;
                }
                if let Some(ref updated_at) = patch.updated_at {
                    user.updated_at = updated_at.clone();
                }
            }
            state.updated_at = patch.updated_at;
            state.error = None;
            state.loading = false;
        }
        SessionAction::DeleteSuccess { .. } | SessionAction::LogoutSuccess { .. } => {
            state.current_user = None;
            state.error = None;
            state.loading = false;
        }
        SessionAction::Failure { message, .. } => {
            state.error = Some(message);
            state.loading = false;
        }
        SessionAction::Start { .. } => unreachable!("handled above"),
    }

    state
}

/// Owns the session state and allocates monotonic request ids.
///
/// `begin` dispatches the start action for a group and hands back the id
/// the call site must attach to its resolving action.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: SessionState,
    next_id: u64,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start a request of the given group; returns its request id.
    pub fn begin(&mut self, group: OpGroup) -> u64 {
        self.next_id += 1;
        let request_id = self.next_id;
        self.dispatch(SessionAction::Start { group, request_id });
        request_id
    }

    /// Apply an action to the state.
    pub fn dispatch(&mut self, action: SessionAction) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> SessionUser {
        SessionUser {
            id: 1,
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            avatar: "https://example.com/jane.png".to_string(),
            created_at: "2026-01-01 00:00:00".to_string(),
            updated_at: "2026-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_start_sets_loading() {
        let state = reduce(
            SessionState::new(),
            SessionAction::Start {
                group: OpGroup::Login,
                request_id: 1,
            },
        );
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.current_user.is_none());
    }

    #[test]
    fn test_login_start_then_failure() {
        let state = reduce(
            SessionState::new(),
            SessionAction::Start {
                group: OpGroup::Login,
                request_id: 1,
            },
        );
        let state = reduce(
            state,
            SessionAction::Failure {
                group: OpGroup::Login,
                request_id: 1,
                message: "x".to_string(),
            },
        );

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("x"));
        assert!(state.current_user.is_none());
    }

    #[test]
    fn test_failure_leaves_user_untouched() {
        let mut state = SessionState::new();
        state.current_user = Some(jane());

        let state = reduce(
            state,
            SessionAction::Failure {
                group: OpGroup::Update,
                request_id: 1,
                message: "server error".to_string(),
            },
        );

        assert_eq!(state.current_user, Some(jane()));
        assert_eq!(state.error.as_deref(), Some("server error"));
    }

    #[test]
    fn test_login_success_replaces_user_and_clears_error() {
        let mut state = SessionState::new();
        state.error = Some("old error".to_string());
        state.loading = true;

        let state = reduce(
            state,
            SessionAction::LoginSuccess {
                request_id: 1,
                user: jane(),
            },
        );

        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.current_user, Some(jane()));
    }

    #[test]
    fn test_update_success_shallow_merge() {
        let mut state = SessionState::new();
        state.current_user = Some(jane());

        let state = reduce(
            state,
            SessionAction::UpdateSuccess {
                request_id: 1,
                patch: ProfilePatch {
                    avatar: Some("https://example.com/new.png".to_string()),
                    updated_at: Some("2026-02-01 12:00:00".to_string()),
                    ..ProfilePatch::default()
                },
            },
        );

        let user = state.current_user.unwrap();
        assert_eq!(user.avatar, "https://example.com/new.png");
        // Untouched fields survive the merge
        assert_eq!(user.username, "jane");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.updated_at, "2026-02-01 12:00:00");
        assert_eq!(state.updated_at.as_deref(), Some("2026-02-01 12:00:00"));
    }

    #[test]
    fn test_delete_and_logout_clear_user() {
        for action in [
            SessionAction::DeleteSuccess { request_id: 1 },
            SessionAction::LogoutSuccess { request_id: 1 },
        ] {
            let mut state = SessionState::new();
            state.current_user = Some(jane());
            let state = reduce(state, action);
            assert!(state.current_user.is_none());
            assert!(!state.loading);
            assert!(state.error.is_none());
        }
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut store = SessionStore::new();
        let first = store.begin(OpGroup::Login);
        let second = store.begin(OpGroup::Login);
        assert!(second > first);

        // The first request resolves late with a failure: dropped.
        store.dispatch(SessionAction::Failure {
            group: OpGroup::Login,
            request_id: first,
            message: "stale".to_string(),
        });
        assert!(store.state().loading);
        assert!(store.state().error.is_none());

        // The newer request's success applies.
        store.dispatch(SessionAction::LoginSuccess {
            request_id: second,
            user: jane(),
        });
        assert!(!store.state().loading);
        assert_eq!(store.state().current_user, Some(jane()));
    }

    #[test]
    fn test_stale_success_cannot_overwrite_newer_state() {
        let mut store = SessionStore::new();
        let first = store.begin(OpGroup::Update);
        let second = store.begin(OpGroup::Update);

        let login_id = store.begin(OpGroup::Login);
        store.dispatch(SessionAction::LoginSuccess {
            request_id: login_id,
            user: jane(),
        });

        store.dispatch(SessionAction::UpdateSuccess {
            request_id: second,
            patch: ProfilePatch {
                username: Some("jane_new".to_string()),
                ..ProfilePatch::default()
            },
        });

        // The first update's late result must not clobber the second's.
        store.dispatch(SessionAction::UpdateSuccess {
            request_id: first,
            patch: ProfilePatch {
                username: Some("jane_old".to_string()),
                ..ProfilePatch::default()
            },
        });

        assert_eq!(
            store.state().current_user.as_ref().unwrap().username,
            "jane_new"
        );
    }

    #[test]
    fn test_groups_are_independent() {
        let mut store = SessionStore::new();
        let login_id = store.begin(OpGroup::Login);
        store.dispatch(SessionAction::LoginSuccess {
            request_id: login_id,
            user: jane(),
        });

        let update_id = store.begin(OpGroup::Update);
        let _logout_id = store.begin(OpGroup::Logout);

        // An update resolution is not blocked by the in-flight logout.
        store.dispatch(SessionAction::UpdateSuccess {
            request_id: update_id,
            patch: ProfilePatch {
                email: Some("new@example.com".to_string()),
                ..ProfilePatch::default()
            },
        });
        assert_eq!(
            store.state().current_user.as_ref().unwrap().email,
            "new@example.com"
        );
    }

    #[test]
    fn test_start_clears_previous_error() {
        let mut store = SessionStore::new();
        let id = store.begin(OpGroup::Login);
        store.dispatch(SessionAction::Failure {
            group: OpGroup::Login,
            request_id: id,
            message: "bad password".to_string(),
        });
        assert!(store.state().error.is_some());

        store.begin(OpGroup::Login);
        assert!(store.state().error.is_none());
        assert!(store.state().loading);
    }
}
