//! Access Guard: decides whether a protected view renders.
//!
//! `decide` is the pure decision function. `Guarded` wraps a view together with
//! its policy and a navigator, tracks the last decision, and performs at most
//! one navigation per transition into a redirecting state.
//!
//! State machine per guarded instance:
//!
//! ```text
//! CHECKING -> RENDER         authenticated and role permitted
//!          -> REDIRECTING    not authenticated, or role forbidden with Redirect
//!          -> DENIED_INLINE  role forbidden with Inline
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::auth::navigation::Navigator;
use crate::auth::policy::{GuardPolicy, OnUnauthorized};
use crate::auth::session::{Session, SessionUser};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Render,
    Redirecting { to: String },
    DeniedInline,
}

/// Computes the guard decision for one session. No side effects.
pub fn decide(session: &Session, policy: &GuardPolicy) -> GuardState {
    if session.loading {
        return GuardState::Checking;
    }
    let user = match session.authenticated_user() {
        Some(user) => user,
        None => {
            return GuardState::Redirecting {
                to: policy.sign_in_path.clone(),
            }
        }
    };
    if policy.allowed_roles.permits(user.role) {
        return GuardState::Render;
    }
    match policy.on_unauthorized {
        OnUnauthorized::Redirect => GuardState::Redirecting {
            to: policy.unauthorized_path.clone(),
        },
        OnUnauthorized::Inline => GuardState::DeniedInline,
    }
}

/// Result of the hook-style check, for inline conditional rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCheck {
    pub state: GuardState,
    pub user: Option<SessionUser>,
}

impl AccessCheck {
    pub fn is_allowed(&self) -> bool {
        self.state == GuardState::Render
    }
}

/// Hook-style variant of the guard: reports the decision without navigating.
pub fn check_access(session: &Session, policy: &GuardPolicy) -> AccessCheck {
    let state = decide(session, policy);
    let user = match state {
        GuardState::Render => session.authenticated_user().cloned(),
        _ => None,
    };
    AccessCheck { state, user }
}

/// Something the guard can render once access is granted.
pub trait View {
    type Output;

    fn render(self) -> Self::Output;
}

/// Fixed view shown for inline denials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    pub title: &'static str,
    pub message: &'static str,
    pub back_label: &'static str,
}

impl Default for AccessDenied {
    fn default() -> Self {
        Self {
            title: "Access Denied",
            message: "You do not have permission to view this page.",
            back_label: "Go back",
        }
    }
}

#[derive(Debug)]
pub enum Rendered<T> {
    View(T),
    /// Session still resolving. Carries the caller's fallback when one was supplied.
    Loading(Option<T>),
    Denied(AccessDenied),
    /// A navigation was issued (or failed); nothing is rendered locally.
    Nothing,
}

type Fallback<T> = Box<dyn FnOnce() -> T + Send>;

pub struct Guarded<V: View> {
    view: V,
    policy: GuardPolicy,
    navigator: Arc<dyn Navigator>,
    state: GuardState,
    loading_fallback: Option<Fallback<V::Output>>,
}

/// Wraps `view` so it only renders when `policy` admits the session.
pub fn protect<V: View>(view: V, policy: GuardPolicy, navigator: Arc<dyn Navigator>) -> Guarded<V> {
    Guarded {
        view,
        policy,
        navigator,
        state: GuardState::Checking,
        loading_fallback: None,
    }
}

impl<V: View> Guarded<V> {
    pub fn with_loading_fallback(
        mut self,
        fallback: impl FnOnce() -> V::Output + Send + 'static,
    ) -> Self {
        self.loading_fallback = Some(Box::new(fallback));
        self
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Re-evaluates against `session`. Navigation happens only when the
    /// decision changes into a redirect, so repeated observations of the same
    /// session never navigate twice.
    pub fn observe(&mut self, session: &Session) -> GuardState {
        let next = decide(session, &self.policy);
        if next != self.state {
            debug!("Guard transition {:?} -> {:?}", self.state, next);
            if let GuardState::Redirecting { to } = &next {
                if let Err(e) = self.navigator.navigate_to(to) {
                    warn!("Guard navigation to {to} failed, suppressing view: {e}");
                }
            }
            self.state = next;
        }
        self.state.clone()
    }

    /// Follows the session until the guard leaves `Checking`.
    ///
    /// If the session provider goes away while still loading, the session is
    /// treated as unauthenticated.
    pub async fn settle(&mut self, sessions: &mut watch::Receiver<Session>) -> GuardState {
        loop {
            let session = sessions.borrow_and_update().clone();
            let state = self.observe(&session);
            if state != GuardState::Checking {
                return state;
            }
            if sessions.changed().await.is_err() {
                return self.observe(&Session::anonymous());
            }
        }
    }

    /// Renders according to the last observed decision.
    pub fn render(self) -> Rendered<V::Output> {
        match self.state {
            GuardState::Render => Rendered::View(self.view.render()),
            GuardState::Checking => Rendered::Loading(self.loading_fallback.map(|f| f())),
            GuardState::DeniedInline => Rendered::Denied(AccessDenied::default()),
            GuardState::Redirecting { .. } => Rendered::Nothing,
        }
    }
}
