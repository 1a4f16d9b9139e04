// Recruitment status workflow: pipeline stages, action rules, the owning
// board, the migration gate and the HTTP handlers exposing them.

pub mod board;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod service;
pub mod status;
pub mod summary;
pub mod workflow;

#[cfg(test)]
pub mod testing;

pub use board::WorkflowError;
pub use gate::InFlightGate;
pub use service::{EmployeeDirectory, RecruitmentService};
