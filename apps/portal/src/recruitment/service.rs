//! Boundary traits for the external recruitment backend.
//!
//! `AppState` carries `Arc<dyn RecruitmentService>` and `Arc<dyn EmployeeDirectory>`;
//! the production implementation is `backend::BackendClient`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::recruitment::models::{
    EmployeeFields, EmployeeId, EmployeeRecord, RecruitmentRecord,
};
use crate::recruitment::status::RecruitmentStatus;

/// Single failure channel for backend calls. Timeouts, rejections and
/// transport errors all arrive here and are handled identically by callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Backend rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Backend call timed out")]
    Timeout,

    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait RecruitmentService: Send + Sync {
    async fn list(&self) -> Result<Vec<RecruitmentRecord>, ServiceError>;

    async fn get(&self, id: Uuid) -> Result<RecruitmentRecord, ServiceError>;

    async fn update_status(&self, id: Uuid, status: RecruitmentStatus)
        -> Result<(), ServiceError>;

    async fn migrate_to_employee(
        &self,
        id: Uuid,
        fields: &EmployeeFields,
    ) -> Result<EmployeeId, ServiceError>;

    /// Removes the recruitment record only. A linked employee is never touched.
    async fn delete_recruitment_record(&self, id: Uuid) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn get_employee(&self, id: EmployeeId) -> Result<EmployeeRecord, ServiceError>;
}
