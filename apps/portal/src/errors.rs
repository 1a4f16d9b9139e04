use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::recruitment::models::EmployeeId;
use crate::recruitment::service::ServiceError;
use crate::recruitment::workflow::{linked_record_warning, Action};
use crate::recruitment::WorkflowError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Action failed: {action}: {message}")]
    ActionFailed { action: Action, message: String },

    #[error("Action unavailable: {0}")]
    ActionUnavailable(String),

    #[error("Action in flight: {0}")]
    InFlight(String),

    #[error("Confirmation required before deleting record linked to employee {0}")]
    ConfirmationRequired(EmployeeId),

    #[error("Backend error: {0}")]
    Backend(#[from] ServiceError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl From<WorkflowError> for AppError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::NotFound(id) => {
                AppError::NotFound(format!("Recruitment record {id} not found"))
            }
            WorkflowError::ActionUnavailable { .. } => AppError::ActionUnavailable(e.to_string()),
            WorkflowError::InFlight { .. } => AppError::InFlight(e.to_string()),
            WorkflowError::ConfirmationRequired { employee } => {
                AppError::ConfirmationRequired(employee)
            }
            WorkflowError::Backend(source) => AppError::Backend(source),
            WorkflowError::ActionFailed { action, source } => AppError::ActionFailed {
                action,
                message: source.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ActionFailed { action, message } => {
                tracing::warn!("Action '{action}' failed: {message}");
                return (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "error": {
                            "code": "ACTION_FAILED",
                            "action": action,
                            "message": format!("Could not {action}. The record was not changed."),
                        }
                    })),
                )
                    .into_response();
            }
            AppError::ActionUnavailable(msg) => {
                (StatusCode::CONFLICT, "ACTION_UNAVAILABLE", msg.clone())
            }
            AppError::InFlight(msg) => (StatusCode::CONFLICT, "ACTION_IN_FLIGHT", msg.clone()),
            AppError::ConfirmationRequired(employee) => {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "error": {
                            "code": "CONFIRMATION_REQUIRED",
                            "employee_id": employee,
                            "message": linked_record_warning(*employee),
                        }
                    })),
                )
                    .into_response();
            }
            AppError::Backend(e) => {
                tracing::error!("Backend error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "BACKEND_ERROR",
                    "The recruitment backend is unavailable".to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "The export could not be generated".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recruitment::testing::employee_id;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_action_failed_names_action() {
        let err: AppError = WorkflowError::ActionFailed {
            action: Action::AdvanceStatus,
            source: ServiceError::Timeout,
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "ACTION_FAILED");
        assert_eq!(body["error"]["action"], "ADVANCE_STATUS");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("update status"));
    }

    #[tokio::test]
    async fn test_confirmation_required_carries_employee() {
        let employee = employee_id(5);
        let err: AppError = WorkflowError::ConfirmationRequired { employee }.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "CONFIRMATION_REQUIRED");
        assert_eq!(body["error"]["employee_id"], employee.to_string());
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let err: AppError = WorkflowError::NotFound(Uuid::nil()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }
}
