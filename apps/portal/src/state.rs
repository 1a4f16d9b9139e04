use std::sync::Arc;

use crate::auth::AccessControl;
use crate::recruitment::{EmployeeDirectory, InFlightGate, RecruitmentService};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Recruitment data service. Default: `BackendClient`.
    pub recruitment: Arc<dyn RecruitmentService>,
    pub employees: Arc<dyn EmployeeDirectory>,
    /// Process-wide registry of in-flight migrations, shared by every board.
    pub migrations: InFlightGate,
    /// Guard applied to the staff routes.
    pub staff_access: AccessControl,
}
