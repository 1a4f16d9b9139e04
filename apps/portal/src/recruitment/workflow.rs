//! Action-enablement rules for a recruitment record.
//!
//! Everything here is a pure function of the record passed in. Callers recompute
//! on every render or export; nothing is cached between calls.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::recruitment::models::{EmployeeId, RecruitmentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AdvanceStatus,
    MigrateToEmployee,
    Delete,
}

impl Action {
    /// Operator-facing name, used in failure notices.
    pub fn describe(self) -> &'static str {
        match self {
            Action::AdvanceStatus => "update status",
            Action::MigrateToEmployee => "migrate to employee",
            Action::Delete => "delete recruitment record",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Returns the actions currently enabled for `record`.
pub fn available_actions(record: &RecruitmentRecord) -> BTreeSet<Action> {
    let mut actions = BTreeSet::new();
    if !record.status.is_terminal() {
        actions.insert(Action::AdvanceStatus);
    }
    if record.status.is_hired_eligible() && record.hired_employee_ref.is_none() {
        actions.insert(Action::MigrateToEmployee);
    }
    actions.insert(Action::Delete);
    actions
}

pub fn is_available(record: &RecruitmentRecord, action: Action) -> bool {
    available_actions(record).contains(&action)
}

/// How a delete of this record must proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePlan {
    /// No employee is linked; the recruitment record alone is removed.
    Plain,
    /// An employee was migrated from this record. The employee survives the
    /// delete and the operator must confirm before anything is removed.
    RequiresConfirmation(EmployeeId),
}

pub fn plan_delete(record: &RecruitmentRecord) -> DeletePlan {
    match record.hired_employee_ref {
        None => DeletePlan::Plain,
        Some(employee) => DeletePlan::RequiresConfirmation(employee),
    }
}

/// Warning shown before deleting a record that has a migrated employee.
pub fn linked_record_warning(employee: EmployeeId) -> String {
    format!(
        "This candidate was migrated to employee {employee}. Deleting the recruitment \
         record will NOT remove the employee record. Confirm to continue."
    )
}
