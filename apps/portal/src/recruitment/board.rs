//! RecruitmentBoard: the single owning state container for a page of records.
//!
//! Mutations go to the backend first and are applied locally only after the
//! call succeeds. A failed call leaves the board exactly as it was and comes
//! back as `WorkflowError::ActionFailed` naming the attempted action.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::recruitment::gate::InFlightGate;
use crate::recruitment::models::{
    EmployeeFields, EmployeeId, RecruitmentRecord, RecruitmentSnapshot,
};
use crate::recruitment::service::{RecruitmentService, ServiceError};
use crate::recruitment::status::RecruitmentStatus;
use crate::recruitment::workflow::{is_available, plan_delete, Action, DeletePlan};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Recruitment record {0} not found")]
    NotFound(Uuid),

    #[error("Cannot {action} while the record is {status}")]
    ActionUnavailable {
        action: Action,
        status: RecruitmentStatus,
    },

    #[error("A {action} call for this record is already in progress")]
    InFlight { action: Action },

    #[error("Record is linked to employee {employee}; deletion requires confirmation")]
    ConfirmationRequired { employee: EmployeeId },

    #[error("Recruitment backend unavailable: {0}")]
    Backend(ServiceError),

    #[error("Failed to {action}: {source}")]
    ActionFailed {
        action: Action,
        #[source]
        source: ServiceError,
    },
}

/// What a delete actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub id: Uuid,
    /// Employee left in place because the delete never cascades.
    pub retained_employee: Option<EmployeeId>,
}

pub struct RecruitmentBoard {
    service: Arc<dyn RecruitmentService>,
    gate: InFlightGate,
    records: Vec<RecruitmentRecord>,
}

impl RecruitmentBoard {
    /// Loads every record from the backend.
    pub async fn load(
        service: Arc<dyn RecruitmentService>,
        gate: InFlightGate,
    ) -> Result<Self, ServiceError> {
        let records = service.list().await?;
        Ok(Self {
            service,
            gate,
            records,
        })
    }

    /// Loads a board holding a single record, for detail views and per-record actions.
    pub async fn load_one(
        service: Arc<dyn RecruitmentService>,
        gate: InFlightGate,
        id: Uuid,
    ) -> Result<Self, WorkflowError> {
        let record = service.get(id).await.map_err(|e| match e {
            ServiceError::NotFound(_) => WorkflowError::NotFound(id),
            other => WorkflowError::Backend(other),
        })?;
        Ok(Self {
            service,
            gate,
            records: vec![record],
        })
    }

    pub fn records(&self) -> &[RecruitmentRecord] {
        &self.records
    }

    pub fn record(&self, id: Uuid) -> Result<&RecruitmentRecord, WorkflowError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(WorkflowError::NotFound(id))
    }

    /// Copies the current records so later mutations cannot leak into the copy.
    pub fn snapshot(&self) -> RecruitmentSnapshot {
        RecruitmentSnapshot::new(self.records.clone())
    }

    /// Whether a migration for `id` is currently in flight anywhere in the process.
    pub fn is_migrating(&self, id: Uuid) -> bool {
        self.gate.is_in_flight(id)
    }

    /// Moves a record to `status`. Any stage may be selected directly; only
    /// terminal records are frozen.
    pub async fn change_status(
        &mut self,
        id: Uuid,
        status: RecruitmentStatus,
    ) -> Result<&RecruitmentRecord, WorkflowError> {
        let index = self.index_of(id)?;
        let current = self.records[index].status;
        if !is_available(&self.records[index], Action::AdvanceStatus) {
            return Err(WorkflowError::ActionUnavailable {
                action: Action::AdvanceStatus,
                status: current,
            });
        }
        if current == status {
            return Ok(&self.records[index]);
        }

        if let Err(source) = self.service.update_status(id, status).await {
            warn!("Status change {current} -> {status} failed for recruitment {id}: {source}");
            return Err(WorkflowError::ActionFailed {
                action: Action::AdvanceStatus,
                source,
            });
        }

        info!("Recruitment {id} moved {current} -> {status}");
        self.records[index].status = status;
        Ok(&self.records[index])
    }

    /// Converts a hired candidate into an employee. Exactly once per record:
    /// refused while another call is in flight and unavailable after success.
    pub async fn migrate(
        &mut self,
        id: Uuid,
        fields: &EmployeeFields,
    ) -> Result<EmployeeId, WorkflowError> {
        let index = self.index_of(id)?;
        if !is_available(&self.records[index], Action::MigrateToEmployee) {
            return Err(WorkflowError::ActionUnavailable {
                action: Action::MigrateToEmployee,
                status: self.records[index].status,
            });
        }

        let _permit = self
            .gate
            .try_acquire(id)
            .ok_or(WorkflowError::InFlight {
                action: Action::MigrateToEmployee,
            })?;

        // Another board may have migrated the record or moved it out of the
        // hired stage between our load and taking the permit.
        match self.service.get(id).await {
            Ok(fresh) if !is_available(&fresh, Action::MigrateToEmployee) => {
                let status = fresh.status;
                self.records[index] = fresh;
                return Err(WorkflowError::ActionUnavailable {
                    action: Action::MigrateToEmployee,
                    status,
                });
            }
            Ok(_) => {}
            Err(source) => {
                return Err(WorkflowError::ActionFailed {
                    action: Action::MigrateToEmployee,
                    source,
                })
            }
        }

        match self.service.migrate_to_employee(id, fields).await {
            Ok(employee) => {
                info!("Recruitment {id} migrated to employee {employee}");
                self.records[index].hired_employee_ref = Some(employee);
                Ok(employee)
            }
            Err(source) => {
                warn!("Migration failed for recruitment {id}: {source}");
                Err(WorkflowError::ActionFailed {
                    action: Action::MigrateToEmployee,
                    source,
                })
            }
        }
    }

    /// Deletes a recruitment record. A record linked to an employee is only
    /// deleted when `confirmed` is true, and the employee is never removed.
    pub async fn delete(
        &mut self,
        id: Uuid,
        confirmed: bool,
    ) -> Result<DeleteOutcome, WorkflowError> {
        let index = self.index_of(id)?;
        let retained_employee = match plan_delete(&self.records[index]) {
            DeletePlan::Plain => None,
            DeletePlan::RequiresConfirmation(employee) if !confirmed => {
                return Err(WorkflowError::ConfirmationRequired { employee });
            }
            DeletePlan::RequiresConfirmation(employee) => Some(employee),
        };

        if let Err(source) = self.service.delete_recruitment_record(id).await {
            warn!("Delete failed for recruitment {id}: {source}");
            return Err(WorkflowError::ActionFailed {
                action: Action::Delete,
                source,
            });
        }

        self.records.remove(index);
        match retained_employee {
            Some(employee) => {
                info!("Deleted recruitment {id}; employee {employee} retained")
            }
            None => info!("Deleted recruitment {id}"),
        }
        Ok(DeleteOutcome {
            id,
            retained_employee,
        })
    }

    fn index_of(&self, id: Uuid) -> Result<usize, WorkflowError> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or(WorkflowError::NotFound(id))
    }
}
