//! Priority policy port (§4.4): pluggable ordering over an eligible case
//! set. Implementations sort `candidates` in place rather than returning a
//! new ordering, which avoids re-deriving an id list the caller already has.

use chrono::NaiveDate;

use crate::domain::case::{Case, CaseType};

/// Read-only context a policy may need beyond the candidate list itself.
/// `total_capacity` feeds the external-scorer feature vector's
/// `capacity_ratio` (§9): ordering happens before allocation, so "remaining"
/// capacity at ordering time is the day's total effective capacity.
#[derive(Debug, Clone)]
pub struct PolicyContext {
    pub total_capacity: u32,
    pub min_gap_days: u32,
    pub preferred_case_type: Option<CaseType>,
}

/// The fixed feature vector exposed to an external scorer (§9).
#[derive(Debug, Clone, Copy)]
pub struct CaseFeatures {
    pub stage_index: u8,
    pub age_days: i64,
    pub days_since_last_hearing: i64,
    pub urgency: bool,
    pub ripe: bool,
    pub hearing_count: u32,
    pub capacity_ratio: f64,
    pub min_gap_days: u32,
    pub preference_score: f64,
}

impl CaseFeatures {
    pub fn extract(case: &Case, today: NaiveDate, context: &PolicyContext) -> Self {
        let days_since_last_hearing = case
            .last_hearing_date
            .map(|d| (today - d).num_days())
            .unwrap_or(-1);
        let ripe = case
            .ripeness
            .as_ref()
            .map(|r| r.verdict.is_ripe())
            .unwrap_or(true)
            || case.forced_ripe_today;
        let preference_score = match &context.preferred_case_type {
            Some(preferred) if *preferred == case.case_type => 1.0,
            _ => 0.0,
        };
        CaseFeatures {
            stage_index: case.current_stage.index(),
            age_days: case.age_days(today),
            days_since_last_hearing,
            urgency: case.is_urgent,
            ripe,
            hearing_count: case.hearing_count,
            capacity_ratio: if context.total_capacity == 0 {
                0.0
            } else {
                1.0
            },
            min_gap_days: case.effective_min_gap(context.min_gap_days),
            preference_score,
        }
    }
}

/// Pluggable ordering over an eligible case set (§4.4). Implementations
/// must be deterministic given the same candidates and `today`.
pub trait PriorityPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Sorts `candidates` in place into scheduling order (highest priority
    /// first).
    fn prioritize(&self, candidates: &mut Vec<Case>, today: NaiveDate, context: &PolicyContext);
}
