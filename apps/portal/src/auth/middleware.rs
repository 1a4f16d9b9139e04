//! Axum middleware applying the Access Guard to a group of routes.
//!
//! Each request starts from a loading session. The session is resolved in a
//! separate task and published into a per-request `SessionStore`; the guard
//! follows the store until it decides or the resolution timeout expires.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::guard::{check_access, protect, Rendered, View};
use crate::auth::navigation::ResponseNavigator;
use crate::auth::pages;
use crate::auth::policy::GuardPolicy;
use crate::auth::resolver::{Credentials, SessionResolver};
use crate::auth::session::SessionStore;

/// Guard configuration for one route group.
#[derive(Clone)]
pub struct AccessControl {
    pub policy: GuardPolicy,
    pub resolver: Arc<dyn SessionResolver>,
    pub resolve_timeout: Duration,
}

/// Cancels the session resolution once the response no longer needs it.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// The downstream handler chain, rendered only when access is granted.
/// The request is forwarded untouched.
struct NextView {
    request: Request,
    next: Next,
}

impl View for NextView {
    type Output = ResponseFuture;

    fn render(self) -> Self::Output {
        Box::pin(self.next.run(self.request))
    }
}

pub async fn require_access(
    State(access): State<AccessControl>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let credentials = Credentials::from_headers(request.headers());

    let store = SessionStore::new();
    let mut sessions = store.subscribe();
    let publisher = store.clone();
    let resolver = access.resolver.clone();
    let _resolution = AbortOnDrop(tokio::spawn(async move {
        let session = resolver.resolve(credentials).await;
        publisher.publish(session);
    }));

    let navigator = Arc::new(ResponseNavigator::new());
    let retry_after = access.resolve_timeout;
    let mut guarded = protect(
        NextView { request, next },
        access.policy.clone(),
        navigator.clone(),
    )
    .with_loading_fallback(move || -> ResponseFuture {
        Box::pin(async move { loading_response(retry_after) })
    });

    let settled =
        tokio::time::timeout(access.resolve_timeout, guarded.settle(&mut sessions)).await;
    let state = match settled {
        Ok(state) => state,
        Err(_) => {
            warn!("Session resolution for {path} exceeded {:?}", access.resolve_timeout);
            guarded.state().clone()
        }
    };

    let check = check_access(&store.current(), &access.policy);
    match check.user.as_ref().filter(|_| check.is_allowed()) {
        Some(user) => debug!("Access to {path} granted to {} ({})", user.id, user.role),
        None => info!("Access to {path} not granted: {state:?}"),
    }

    match guarded.render() {
        Rendered::View(response) | Rendered::Loading(Some(response)) => response.await,
        Rendered::Loading(None) => loading_response(retry_after),
        Rendered::Denied(denied) => {
            (StatusCode::FORBIDDEN, Html(pages::access_denied(&denied))).into_response()
        }
        Rendered::Nothing => match navigator.take_target() {
            Some(target) => Redirect::to(&target).into_response(),
            // Navigation failed; the protected view still stays hidden.
            None => StatusCode::UNAUTHORIZED.into_response(),
        },
    }
}

fn loading_response(retry_after: Duration) -> Response {
    let mut response = (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(pages::loading(retry_after)),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
