use axum::{response::Html, Json};
use serde_json::{json, Value};

use crate::auth::pages;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "hr-portal"
    }))
}

/// GET /401
/// Landing page for policy redirects of signed-in users without the required role.
pub async fn unauthorized_handler() -> Html<String> {
    Html(pages::unauthorized())
}
