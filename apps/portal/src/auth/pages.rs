//! Minimal HTML pages emitted by the guard itself.

use std::time::Duration;

use crate::auth::guard::AccessDenied;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Inline denial with a "go back" affordance that also works without history.
pub fn access_denied(denied: &AccessDenied) -> String {
    layout(
        denied.title,
        &format!(
            "<main class=\"access-denied\">\n<h1>{}</h1>\n<p>{}</p>\n\
             <a href=\"/\" onclick=\"history.back(); return false;\">{}</a>\n</main>",
            denied.title, denied.message, denied.back_label
        ),
    )
}

/// Placeholder shown while the session is still resolving.
pub fn loading(retry_after: Duration) -> String {
    let seconds = retry_after.as_secs().max(1);
    layout(
        "Loading",
        &format!(
            "<meta http-equiv=\"refresh\" content=\"{seconds}\">\n\
             <main class=\"loading\" aria-busy=\"true\">\n<p>Checking your session...</p>\n</main>"
        ),
    )
}

/// Target of policy redirects for forbidden roles.
pub fn unauthorized() -> String {
    layout(
        "401 Unauthorized",
        "<main class=\"unauthorized\">\n<h1>401</h1>\n\
         <p>Your account is not allowed to open that page.</p>\n\
         <a href=\"/\">Back to home</a>\n</main>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_has_back_link() {
        let html = access_denied(&AccessDenied::default());
        assert!(html.contains("<h1>Access Denied</h1>"));
        assert!(html.contains("history.back()"));
        assert!(html.contains("Go back"));
    }

    #[test]
    fn test_loading_refresh_is_at_least_one_second() {
        let html = loading(Duration::from_millis(200));
        assert!(html.contains("content=\"1\""));
    }
}
