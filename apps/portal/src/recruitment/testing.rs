//! In-memory backend and fixtures shared by the recruitment, export and route tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::recruitment::models::{
    EmployeeFields, EmployeeId, EmployeeRecord, RecruitmentRecord,
};
use crate::recruitment::service::{EmployeeDirectory, RecruitmentService, ServiceError};
use crate::recruitment::status::RecruitmentStatus;

pub fn employee_id(n: u128) -> EmployeeId {
    EmployeeId(Uuid::from_u128(n))
}

pub fn record(status: RecruitmentStatus, hired: Option<EmployeeId>) -> RecruitmentRecord {
    RecruitmentRecord {
        id: Uuid::new_v4(),
        full_name: "Siti Rahma".to_string(),
        email: "siti@example.com".to_string(),
        phone: Some("+62 812 0000 1111".to_string()),
        position: "Warehouse Supervisor".to_string(),
        applied_at: Utc.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).unwrap(),
        status,
        hired_employee_ref: hired,
    }
}

pub fn employee_fields() -> EmployeeFields {
    EmployeeFields {
        employee_number: "EMP-0042".to_string(),
        department: "Logistics".to_string(),
        position: "Warehouse Supervisor".to_string(),
        join_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    }
}

#[derive(Default)]
pub struct FakeBackend {
    records: Mutex<HashMap<Uuid, RecruitmentRecord>>,
    order: Mutex<Vec<Uuid>>,
    employees: Mutex<HashMap<EmployeeId, EmployeeRecord>>,
    fail_update: AtomicBool,
    fail_migration: AtomicBool,
    fail_delete: AtomicBool,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    migration_hold: Mutex<Option<Arc<Notify>>>,
    migration_started: Notify,
}

impl FakeBackend {
    pub fn with_records(records: Vec<RecruitmentRecord>) -> Arc<Self> {
        let backend = Self::default();
        for r in records {
            backend.order.lock().unwrap().push(r.id);
            backend.records.lock().unwrap().insert(r.id, r);
        }
        Arc::new(backend)
    }

    pub fn stored(&self, id: Uuid) -> Option<RecruitmentRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_next_update(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_migration(&self) {
        self.fail_migration.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_delete(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn employees_created(&self) -> usize {
        self.employees.lock().unwrap().len()
    }

    /// Makes the next migrations block until the returned handle is notified.
    pub fn hold_migrations(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.migration_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub async fn wait_for_migration_started(&self) {
        self.migration_started.notified().await;
    }

    fn rejected() -> ServiceError {
        ServiceError::Rejected {
            status: 500,
            message: "backend exploded".to_string(),
        }
    }
}

#[async_trait]
impl RecruitmentService for FakeBackend {
    async fn list(&self) -> Result<Vec<RecruitmentRecord>, ServiceError> {
        let records = self.records.lock().unwrap();
        Ok(self
            .order
            .lock()
            .unwrap()
            .iter()
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<RecruitmentRecord, ServiceError> {
        self.stored(id)
            .ok_or_else(|| ServiceError::NotFound(format!("recruitment {id}")))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: RecruitmentStatus,
    ) -> Result<(), ServiceError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.swap(false, Ordering::SeqCst) {
            return Err(Self::rejected());
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("recruitment {id}")))?;
        record.status = status;
        Ok(())
    }

    async fn migrate_to_employee(
        &self,
        id: Uuid,
        fields: &EmployeeFields,
    ) -> Result<EmployeeId, ServiceError> {
        self.migration_started.notify_one();
        let hold = self.migration_hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        if self.fail_migration.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::Timeout);
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("recruitment {id}")))?;
        let employee = EmployeeId(Uuid::new_v4());
        record.hired_employee_ref = Some(employee);
        self.employees.lock().unwrap().insert(
            employee,
            EmployeeRecord {
                id: employee,
                full_name: record.full_name.clone(),
                employee_number: fields.employee_number.clone(),
                department: fields.department.clone(),
                position: fields.position.clone(),
                join_date: fields.join_date,
            },
        );
        Ok(employee)
    }

    async fn delete_recruitment_record(&self, id: Uuid) -> Result<(), ServiceError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection reset".to_string()));
        }
        self.order.lock().unwrap().retain(|existing| *existing != id);
        self.records
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("recruitment {id}")))
    }
}

#[async_trait]
impl EmployeeDirectory for FakeBackend {
    async fn get_employee(&self, id: EmployeeId) -> Result<EmployeeRecord, ServiceError> {
        self.employees
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("employee {id}")))
    }
}
