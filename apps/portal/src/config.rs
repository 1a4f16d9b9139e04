use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::auth::policy::{DEFAULT_SIGN_IN_PATH, DEFAULT_UNAUTHORIZED_PATH};
use crate::auth::OnUnauthorized;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub backend_token: Option<String>,
    pub backend_timeout: Duration,
    pub sign_in_path: String,
    pub unauthorized_path: String,
    pub unauthorized_mode: OnUnauthorized,
    pub session_resolve_timeout: Duration,
    pub cors_allowed_origin: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            backend_url: lookup("BACKEND_URL").with_context(|| {
                "Required environment variable 'BACKEND_URL' is not set".to_string()
            })?,
            backend_token: lookup("BACKEND_API_TOKEN").filter(|t| !t.is_empty()),
            backend_timeout: Duration::from_secs(
                var("BACKEND_TIMEOUT_SECS", "30")
                    .parse()
                    .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            sign_in_path: var("SIGN_IN_PATH", DEFAULT_SIGN_IN_PATH),
            unauthorized_path: var("UNAUTHORIZED_PATH", DEFAULT_UNAUTHORIZED_PATH),
            unauthorized_mode: parse_mode(&var("UNAUTHORIZED_MODE", "inline"))?,
            session_resolve_timeout: Duration::from_millis(
                var("SESSION_RESOLVE_TIMEOUT_MS", "1500")
                    .parse()
                    .context("SESSION_RESOLVE_TIMEOUT_MS must be a whole number of milliseconds")?,
            ),
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.is_empty()),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}

fn parse_mode(raw: &str) -> Result<OnUnauthorized> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "inline" => Ok(OnUnauthorized::Inline),
        "redirect" => Ok(OnUnauthorized::Redirect),
        other => bail!("UNAUTHORIZED_MODE must be 'inline' or 'redirect', got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("BACKEND_URL", "http://backend:9000")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.sign_in_path, "/login");
        assert_eq!(config.unauthorized_path, "/401");
        assert_eq!(config.unauthorized_mode, OnUnauthorized::Inline);
        assert_eq!(config.session_resolve_timeout, Duration::from_millis(1500));
        assert_eq!(config.backend_timeout, Duration::from_secs(30));
        assert!(config.backend_token.is_none());
    }

    #[test]
    fn test_missing_backend_url_fails() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("BACKEND_URL"));
    }

    #[test]
    fn test_redirect_mode_and_overrides() {
        let config = load(&[
            ("BACKEND_URL", "http://backend:9000"),
            ("UNAUTHORIZED_MODE", "Redirect"),
            ("SIGN_IN_PATH", "https://sso.example.com/login"),
            ("PORT", "3000"),
            ("BACKEND_API_TOKEN", ""),
        ])
        .unwrap();
        assert_eq!(config.unauthorized_mode, OnUnauthorized::Redirect);
        assert_eq!(config.sign_in_path, "https://sso.example.com/login");
        assert_eq!(config.port, 3000);
        assert!(config.backend_token.is_none());
    }

    #[test]
    fn test_bad_mode_rejected() {
        let err = load(&[("BACKEND_URL", "x"), ("UNAUTHORIZED_MODE", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("UNAUTHORIZED_MODE"));
    }
}
