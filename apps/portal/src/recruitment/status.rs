use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One stage of the recruitment pipeline.
///
/// The declaration order is the normal pipeline order. Nothing in the
/// workflow enforces that order when a status is changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecruitmentStatus {
    Pending,
    OnProgress,
    Interview,
    Psikotest,
    UserInterview,
    MedicalCheckup,
    MedicalFollowup,
    Rejected,
    Completed,
}

/// The stage meaning the candidate accepted an offer and may become an employee.
pub const HIRED_ELIGIBLE_STAGE: RecruitmentStatus = RecruitmentStatus::Completed;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown recruitment status: {0}")]
pub struct UnknownStatus(pub String);

impl RecruitmentStatus {
    pub const ALL: [RecruitmentStatus; 9] = [
        RecruitmentStatus::Pending,
        RecruitmentStatus::OnProgress,
        RecruitmentStatus::Interview,
        RecruitmentStatus::Psikotest,
        RecruitmentStatus::UserInterview,
        RecruitmentStatus::MedicalCheckup,
        RecruitmentStatus::MedicalFollowup,
        RecruitmentStatus::Rejected,
        RecruitmentStatus::Completed,
    ];

    /// Wire code, identical to the serde representation.
    pub fn code(self) -> &'static str {
        match self {
            RecruitmentStatus::Pending => "PENDING",
            RecruitmentStatus::OnProgress => "ON_PROGRESS",
            RecruitmentStatus::Interview => "INTERVIEW",
            RecruitmentStatus::Psikotest => "PSIKOTEST",
            RecruitmentStatus::UserInterview => "USER_INTERVIEW",
            RecruitmentStatus::MedicalCheckup => "MEDICAL_CHECKUP",
            RecruitmentStatus::MedicalFollowup => "MEDICAL_FOLLOWUP",
            RecruitmentStatus::Rejected => "REJECTED",
            RecruitmentStatus::Completed => "COMPLETED",
        }
    }

    /// Human-readable label used by exports and pages.
    pub fn label(self) -> &'static str {
        match self {
            RecruitmentStatus::Pending => "Pending",
            RecruitmentStatus::OnProgress => "On Progress",
            RecruitmentStatus::Interview => "Interview",
            RecruitmentStatus::Psikotest => "Psikotest",
            RecruitmentStatus::UserInterview => "User Interview",
            RecruitmentStatus::MedicalCheckup => "Medical Checkup",
            RecruitmentStatus::MedicalFollowup => "Medical Follow-up",
            RecruitmentStatus::Rejected => "Rejected",
            RecruitmentStatus::Completed => "Completed (Hired)",
        }
    }

    /// Terminal stages expect no further advancement in normal flow.
    pub fn is_terminal(self) -> bool {
        matches!(self, RecruitmentStatus::Rejected)
    }

    pub fn is_hired_eligible(self) -> bool {
        self == HIRED_ELIGIBLE_STAGE
    }
}

impl fmt::Display for RecruitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RecruitmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(&['-', ' '][..], "_");
        RecruitmentStatus::ALL
            .into_iter()
            .find(|status| status.code() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
