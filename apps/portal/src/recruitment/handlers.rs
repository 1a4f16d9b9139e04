//! Axum route handlers for the Recruitment API.
//!
//! Every handler loads a fresh board from the backend, so action availability
//! and exports always reflect the status at request time.

use std::collections::BTreeSet;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{export_snapshot, ExportFormat, ExportOptions};
use crate::recruitment::board::{DeleteOutcome, RecruitmentBoard};
use crate::recruitment::models::{EmployeeFields, EmployeeId, EmployeeRecord, RecruitmentRecord};
use crate::recruitment::status::RecruitmentStatus;
use crate::recruitment::summary::{summarize, PipelineSummary};
use crate::recruitment::workflow::{available_actions, linked_record_warning, Action};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RecordView {
    #[serde(flatten)]
    pub record: RecruitmentRecord,
    pub status_label: &'static str,
    pub available_actions: BTreeSet<Action>,
    /// True while a migration for this record is in flight; clients keep the
    /// migrate control disabled.
    pub migrating: bool,
}

#[derive(Debug, Serialize)]
pub struct RecordDetailResponse {
    #[serde(flatten)]
    pub view: RecordView,
    pub employee: Option<EmployeeRecord>,
    /// Present when deleting would leave a migrated employee behind.
    pub delete_warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MigrateResponse {
    pub recruitment_id: Uuid,
    pub employee_id: EmployeeId,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: Uuid,
    pub retained_employee: Option<EmployeeId>,
}

impl From<DeleteOutcome> for DeleteResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            id: outcome.id,
            retained_employee: outcome.retained_employee,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
    /// Comma-separated status codes.
    pub status: Option<String>,
    pub title: Option<String>,
}

fn view_of(board: &RecruitmentBoard, record: &RecruitmentRecord) -> RecordView {
    RecordView {
        record: record.clone(),
        status_label: record.status.label(),
        available_actions: available_actions(record),
        migrating: board.is_migrating(record.id),
    }
}

fn parse_status(raw: &str) -> Result<RecruitmentStatus, AppError> {
    raw.parse::<RecruitmentStatus>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn parse_status_list(raw: Option<&str>) -> Result<Vec<RecruitmentStatus>, AppError> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_status)
            .collect()
    })
    .unwrap_or_else(|| Ok(Vec::new()))
}

async fn load_board(state: &AppState) -> Result<RecruitmentBoard, AppError> {
    Ok(RecruitmentBoard::load(state.recruitment.clone(), state.migrations.clone()).await?)
}

async fn load_record_board(state: &AppState, id: Uuid) -> Result<RecruitmentBoard, AppError> {
    Ok(RecruitmentBoard::load_one(state.recruitment.clone(), state.migrations.clone(), id).await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/recruitments
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RecordView>>, AppError> {
    let statuses = parse_status_list(query.status.as_deref())?;
    let board = load_board(&state).await?;
    let views = board
        .records()
        .iter()
        .filter(|r| statuses.is_empty() || statuses.contains(&r.status))
        .map(|r| view_of(&board, r))
        .collect();
    Ok(Json(views))
}

/// GET /api/v1/recruitments/summary
pub async fn handle_summary(
    State(state): State<AppState>,
) -> Result<Json<PipelineSummary>, AppError> {
    let board = load_board(&state).await?;
    Ok(Json(summarize(&board.snapshot())))
}

/// GET /api/v1/recruitments/:id
///
/// Includes the linked employee when one exists. A directory failure only
/// drops the employee from the response.
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecordDetailResponse>, AppError> {
    let board = load_record_board(&state, id).await?;
    let record = board.record(id)?;

    let employee = match record.hired_employee_ref {
        Some(employee_id) => match state.employees.get_employee(employee_id).await {
            Ok(employee) => Some(employee),
            Err(e) => {
                warn!("Could not load employee {employee_id} for recruitment {id}: {e}");
                None
            }
        },
        None => None,
    };

    Ok(Json(RecordDetailResponse {
        view: view_of(&board, record),
        employee,
        delete_warning: record.hired_employee_ref.map(linked_record_warning),
    }))
}

/// PATCH /api/v1/recruitments/:id/status
pub async fn handle_change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<RecordView>, AppError> {
    let status = parse_status(&request.status)?;
    let mut board = load_record_board(&state, id).await?;
    board.change_status(id, status).await?;
    let record = board.record(id)?;
    Ok(Json(view_of(&board, record)))
}

/// POST /api/v1/recruitments/:id/migrate
pub async fn handle_migrate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<EmployeeFields>,
) -> Result<(StatusCode, Json<MigrateResponse>), AppError> {
    if fields.employee_number.trim().is_empty() {
        return Err(AppError::Validation(
            "employee_number cannot be empty".to_string(),
        ));
    }
    if fields.department.trim().is_empty() {
        return Err(AppError::Validation("department cannot be empty".to_string()));
    }

    let mut board = load_record_board(&state, id).await?;
    let employee_id = board.migrate(id, &fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(MigrateResponse {
            recruitment_id: id,
            employee_id,
        }),
    ))
}

/// DELETE /api/v1/recruitments/:id?confirm=true
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let mut board = load_record_board(&state, id).await?;
    let outcome = board.delete(id, query.confirm).await?;
    Ok(Json(outcome.into()))
}

/// GET /api/v1/recruitments/export?format=csv|markdown&status=A,B&title=...
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ExportFormat>().map_err(AppError::Validation)?,
        None => ExportFormat::Csv,
    };
    let mut options = ExportOptions::new(format);
    options.statuses = parse_status_list(query.status.as_deref())?;
    if let Some(title) = query.title.filter(|t| !t.trim().is_empty()) {
        options.title = title;
    }

    let board = load_board(&state).await?;
    let snapshot = board.snapshot();
    let document = export_snapshot(&snapshot, &options)?;
    info!(
        "Exported {} recruitment record(s) as {format} ({} bytes)",
        snapshot.filtered(&options.statuses).records.len(),
        document.body.len()
    );

    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    let mut response = (StatusCode::OK, document.body).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(document.content_type),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Validation(format!("Invalid export file name: {e}")))?,
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}
