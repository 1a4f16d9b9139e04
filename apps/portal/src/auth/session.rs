use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// Closed set of account roles. Unknown role strings are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Hr,
    /// Authenticated account without staff privileges, e.g. an applicant.
    Guest,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Hr => "HR",
            Role::Guest => "GUEST",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "HR" => Ok(Role::Hr),
            "GUEST" => Ok(Role::Guest),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Session state as seen by guarded views.
///
/// While `loading` is true the other fields are provisional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl Session {
    pub fn loading() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            loading: false,
        }
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            loading: false,
        }
    }

    /// The user, only when the session is resolved and authenticated.
    pub fn authenticated_user(&self) -> Option<&SessionUser> {
        if self.loading || !self.is_authenticated {
            return None;
        }
        self.user.as_ref()
    }
}

/// Injectable session container. Every change is broadcast to subscribers so
/// guards can re-evaluate when the session resolves or expires.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
}

impl SessionStore {
    /// A store that starts in the loading state.
    pub fn new() -> Self {
        Self::with_session(Session::loading())
    }

    pub fn with_session(session: Session) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Replaces the session. Subscribers are only woken when it actually changed.
    pub fn publish(&self, session: Session) {
        self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
