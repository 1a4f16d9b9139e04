pub mod health;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use crate::auth::require_access;
use crate::recruitment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Recruitment API: staff only. Static segments are matched before `:id`.
    let staff = Router::new()
        .route("/api/v1/recruitments", get(handlers::handle_list))
        .route(
            "/api/v1/recruitments/summary",
            get(handlers::handle_summary),
        )
        .route(
            "/api/v1/recruitments/export",
            get(handlers::handle_export),
        )
        .route(
            "/api/v1/recruitments/:id",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        .route(
            "/api/v1/recruitments/:id/status",
            patch(handlers::handle_change_status),
        )
        .route(
            "/api/v1/recruitments/:id/migrate",
            post(handlers::handle_migrate),
        )
        .route_layer(from_fn_with_state(
            state.staff_access.clone(),
            require_access,
        ));

    let mut public = Router::new().route("/health", get(health::health_handler));
    // Off-site unauthorized targets are served elsewhere.
    let unauthorized_path = &state.staff_access.policy.unauthorized_path;
    if unauthorized_path.starts_with('/') && unauthorized_path != "/health" {
        public = public.route(unauthorized_path, get(health::unauthorized_handler));
    }

    public.merge(staff).with_state(state)
}
