use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Navigation to {path} was rejected: {reason}")]
    Rejected { path: String, reason: String },
}

/// Fire-and-forget navigation used by the guard. The guard never waits on it
/// and never renders the protected view when it fails.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str) -> Result<(), NavigationError>;
}

/// Navigator for the HTTP layer: records the target so the middleware can
/// answer with a redirect once the guard has decided.
#[derive(Debug, Default)]
pub struct ResponseNavigator {
    target: Mutex<Option<String>>,
}

impl ResponseNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_target(&self) -> Option<String> {
        self.target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl Navigator for ResponseNavigator {
    fn navigate_to(&self, path: &str) -> Result<(), NavigationError> {
        if !path.starts_with('/') && !path.starts_with("http://") && !path.starts_with("https://")
        {
            return Err(NavigationError::Rejected {
                path: path.to_string(),
                reason: "redirect target must be absolute".to_string(),
            });
        }
        *self
            .target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(path.to_string());
        Ok(())
    }
}
