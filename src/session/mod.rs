//! Session - the bearer token and user obtained at login/signup.
//!
//! A [`SessionHandle`] is shared by the client facade and the coordinator.
//! Every resource operation reads the token from it at issue time; logout
//! clears it.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::model::User;

/// Credentials returned by `/auth/login` and `/auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Shared, clonable holder for the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    /// Create an empty (logged out) handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle that is already logged in.
    pub fn with_session(session: Session) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Replace the current session.
    pub fn set(&self, session: Session) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Drop the current session.
    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Get the bearer token, if logged in with a non-empty token.
    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
            .filter(|token| !token.trim().is_empty())
    }

    /// Get the logged-in user.
    pub fn user(&self) -> Option<User> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            name: Some("Alice".into()),
            email: Some("alice@example.com".into()),
            role: None,
        }
    }

    #[test]
    fn empty_session() {
        let session = SessionHandle::new();
        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn set_and_clear() {
        let session = SessionHandle::new();
        session.set(Session::new("tok-1", user()));
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(session.user().unwrap().id, "u1");

        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn blank_token_is_not_authenticated() {
        let session = SessionHandle::with_session(Session::new("  ", user()));
        assert_eq!(session.token(), None);
        assert!(session.user().is_some());
    }

    #[test]
    fn clones_share_state() {
        let session = SessionHandle::new();
        let clone = session.clone();
        session.set(Session::new("tok", user()));
        assert!(clone.is_authenticated());
    }
}
