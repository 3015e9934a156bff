use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{FollowUpReport, REQUIRED_WEEKS};

/// Progress of an approved adoption through its weekly reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpSummary {
    pub total_required: u8,
    pub completed: u8,
    pub next_due_week: u8,
    pub submitted_weeks: Vec<u8>,
}

impl FollowUpSummary {
    /// Summary over a set of submitted week numbers; repeats and out-of-range weeks are ignored.
    pub fn from_weeks<I>(weeks: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let submitted: BTreeSet<u8> = weeks
            .into_iter()
            .filter(|week| (1..=REQUIRED_WEEKS).contains(week))
            .collect();
        let next_due_week = (1..=REQUIRED_WEEKS)
            .find(|week| !submitted.contains(week))
            .unwrap_or(REQUIRED_WEEKS);

        Self {
            total_required: REQUIRED_WEEKS,
            completed: submitted.len() as u8,
            next_due_week,
            submitted_weeks: submitted.into_iter().collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total_required
    }

    pub fn has_week(&self, week: u8) -> bool {
        self.submitted_weeks.contains(&week)
    }
}

pub fn compute_summary(reports: &[FollowUpReport]) -> FollowUpSummary {
    FollowUpSummary::from_weeks(reports.iter().map(|report| report.week))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_distinct_weeks_in_any_order() {
        let summary = FollowUpSummary::from_weeks([3, 1]);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.next_due_week, 2);
        assert_eq!(summary.submitted_weeks, vec![1, 3]);
        assert_eq!(summary, FollowUpSummary::from_weeks([1, 3, 3, 1]));
    }

    #[test]
    fn empty_history_is_due_for_week_one() {
        let summary = FollowUpSummary::from_weeks([]);
        assert_eq!(summary.total_required, 4);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.next_due_week, 1);
        assert!(!summary.is_complete());
    }

    #[test]
    fn next_due_week_caps_at_four_once_complete() {
        let summary = FollowUpSummary::from_weeks([4, 2, 3, 1]);
        assert!(summary.is_complete());
        assert_eq!(summary.next_due_week, 4);
        assert!(summary.has_week(2));
    }

    #[test]
    fn out_of_range_weeks_do_not_count() {
        let summary = FollowUpSummary::from_weeks([0, 5, 2]);
        assert_eq!(summary.submitted_weeks, vec![2]);
        assert_eq!(summary.next_due_week, 1);
    }
}
