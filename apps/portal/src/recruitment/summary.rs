use serde::Serialize;

use crate::recruitment::models::RecruitmentSnapshot;
use crate::recruitment::status::RecruitmentStatus;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StageCount {
    pub status: RecruitmentStatus,
    pub label: &'static str,
    pub count: usize,
}

/// Pipeline totals for the dashboard, one entry per stage in pipeline order.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub total: usize,
    pub stages: Vec<StageCount>,
    /// Records at the hired stage still waiting for migration.
    pub awaiting_migration: usize,
    pub migrated: usize,
}

pub fn summarize(snapshot: &RecruitmentSnapshot) -> PipelineSummary {
    let stages = RecruitmentStatus::ALL
        .into_iter()
        .map(|status| StageCount {
            status,
            label: status.label(),
            count: snapshot
                .records
                .iter()
                .filter(|r| r.status == status)
                .count(),
        })
        .collect();

    PipelineSummary {
        total: snapshot.records.len(),
        stages,
        awaiting_migration: snapshot
            .records
            .iter()
            .filter(|r| r.status.is_hired_eligible() && !r.is_migrated())
            .count(),
        migrated: snapshot.records.iter().filter(|r| r.is_migrated()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recruitment::testing::{employee_id, record};

    #[test]
    fn test_empty_snapshot() {
        let summary = summarize(&RecruitmentSnapshot::new(vec![]));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.stages.len(), 9);
        assert!(summary.stages.iter().all(|s| s.count == 0));
    }

    #[test]
    fn test_counts_per_stage_and_migration() {
        let snapshot = RecruitmentSnapshot::new(vec![
            record(RecruitmentStatus::Pending, None),
            record(RecruitmentStatus::Pending, None),
            record(RecruitmentStatus::Completed, None),
            record(RecruitmentStatus::Completed, Some(employee_id(1))),
            record(RecruitmentStatus::Rejected, None),
        ]);
        let summary = summarize(&snapshot);

        assert_eq!(summary.total, 5);
        let count_of = |status| {
            summary
                .stages
                .iter()
                .find(|s| s.status == status)
                .map(|s| s.count)
                .unwrap()
        };
        assert_eq!(count_of(RecruitmentStatus::Pending), 2);
        assert_eq!(count_of(RecruitmentStatus::Completed), 2);
        assert_eq!(count_of(RecruitmentStatus::Rejected), 1);
        assert_eq!(count_of(RecruitmentStatus::Interview), 0);
        assert_eq!(summary.awaiting_migration, 1);
        assert_eq!(summary.migrated, 1);
    }
}
