use async_trait::async_trait;
use axum::http::{header, HeaderMap};

use crate::auth::session::Session;

/// Name of the cookie carrying the portal session token.
pub const SESSION_COOKIE: &str = "portal_session";

/// Opaque credentials forwarded to the session provider. The portal never
/// inspects or verifies the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("token", &"<redacted>").finish()
    }
}

impl Credentials {
    /// Reads a bearer token, falling back to the session cookie.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        bearer_token(headers)
            .or_else(|| session_cookie(headers))
            .map(|token| Credentials { token })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolves credentials into a session. Implementations fail closed: any
/// problem resolving the session yields `Session::anonymous()`.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, credentials: Option<Credentials>) -> Session;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_preferred() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        headers.insert(header::COOKIE, HeaderValue::from_static("portal_session=zzz"));
        assert_eq!(
            Credentials::from_headers(&headers).map(|c| c.token),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; portal_session=tok-9; lang=id"),
        );
        assert_eq!(
            Credentials::from_headers(&headers).map(|c| c.token),
            Some("tok-9".to_string())
        );
    }

    #[test]
    fn test_missing_or_empty_credentials() {
        assert!(Credentials::from_headers(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        headers.insert(header::COOKIE, HeaderValue::from_static("portal_session="));
        assert!(Credentials::from_headers(&headers).is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials {
            token: "secret".to_string(),
        };
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
