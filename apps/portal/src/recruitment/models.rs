use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recruitment::status::RecruitmentStatus;

/// Identifier of an employee record owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub Uuid);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A candidate's application as it moves through the pipeline.
///
/// `hired_employee_ref` is set once by migration and never cleared here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruitmentRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub applied_at: DateTime<Utc>,
    pub status: RecruitmentStatus,
    pub hired_employee_ref: Option<EmployeeId>,
}

impl RecruitmentRecord {
    pub fn is_migrated(&self) -> bool {
        self.hired_employee_ref.is_some()
    }
}

/// Fields supplied by the operator when a hired candidate becomes an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeFields {
    pub employee_number: String,
    pub department: String,
    pub position: String,
    pub join_date: NaiveDate,
}

/// Employee record as returned by the employee directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub full_name: String,
    pub employee_number: String,
    pub department: String,
    pub position: String,
    pub join_date: NaiveDate,
}

/// Immutable point-in-time copy of a board's records, used for exports and summaries.
#[derive(Debug, Clone, Serialize)]
pub struct RecruitmentSnapshot {
    pub taken_at: DateTime<Utc>,
    pub records: Vec<RecruitmentRecord>,
}

impl RecruitmentSnapshot {
    pub fn new(records: Vec<RecruitmentRecord>) -> Self {
        Self {
            taken_at: Utc::now(),
            records,
        }
    }

    /// Keeps only records whose status is in `statuses`. An empty filter keeps everything.
    pub fn filtered(&self, statuses: &[RecruitmentStatus]) -> Self {
        if statuses.is_empty() {
            return self.clone();
        }
        Self {
            taken_at: self.taken_at,
            records: self
                .records
                .iter()
                .filter(|r| statuses.contains(&r.status))
                .cloned()
                .collect(),
        }
    }
}
