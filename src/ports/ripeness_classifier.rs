//! Ripeness classifier port (§4.3): maps a case and today's date to a
//! ripeness verdict with reason.

use chrono::NaiveDate;

use crate::domain::case::{Case, RipenessState};

/// Thresholds the classifier consults. Settable at configuration time but
/// never mutated by the classifier itself (§4.3).
#[derive(Debug, Clone, Copy)]
pub struct RipenessThresholds {
    pub min_service_hearings: u32,
    pub stuck_hearing_count: u32,
    pub stuck_avg_gap_days: f64,
    /// When `true`, a fallthrough case classifies as `Unknown` (and is
    /// filtered like non-ripe) instead of defaulting to `Ripe` (§4.3 step 5,
    /// §9 Open Question on strict mode).
    pub strict_mode: bool,
}

impl Default for RipenessThresholds {
    fn default() -> Self {
        RipenessThresholds {
            min_service_hearings: 1,
            stuck_hearing_count: 6,
            stuck_avg_gap_days: 90.0,
            strict_mode: false,
        }
    }
}

/// Classifies cases as ripe or not, and if not, why (§4.3).
pub trait RipenessClassifier: Send + Sync {
    /// Classifies a single case as of `today`.
    fn classify(&self, case: &Case, today: NaiveDate) -> RipenessState;

    /// Convenience combining classification with the min-gap eligibility
    /// check the engine otherwise has to do itself.
    fn schedulable(&self, case: &Case, today: NaiveDate, default_min_gap: u32) -> bool {
        if case.forced_ripe_today {
            return case.is_ready_for_scheduling(today, default_min_gap);
        }
        self.classify(case, today).verdict.is_ripe() && case.is_ready_for_scheduling(today, default_min_gap)
    }

    /// Expected number of days until the case would classify as ripe, for
    /// reporting only — never consulted by the scheduling pipeline itself.
    fn ripening_eta(&self, case: &Case, today: NaiveDate) -> Option<i64>;

    fn set_thresholds(&mut self, thresholds: RipenessThresholds);

    fn thresholds(&self) -> RipenessThresholds;
}
