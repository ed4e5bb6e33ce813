//! Composite readiness priority policy (§4.4): order by the case's
//! composite priority score descending.
//!
//! Relies on `readiness_score` already having been computed by
//! [`crate::algorithm::schedule_day`]'s step 2 before the policy runs; this
//! policy only derives `priority_score` from it.

use chrono::NaiveDate;

use crate::domain::case::{Case, PriorityWeights};
use crate::ports::priority_policy::{PolicyContext, PriorityPolicy};

#[derive(Debug, Clone)]
pub struct CompositePolicy {
    weights: PriorityWeights,
}

impl CompositePolicy {
    pub fn new(weights: PriorityWeights) -> Self {
        CompositePolicy { weights }
    }
}

impl Default for CompositePolicy {
    fn default() -> Self {
        CompositePolicy::new(PriorityWeights::default())
    }
}

impl PriorityPolicy for CompositePolicy {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn prioritize(&self, candidates: &mut Vec<Case>, today: NaiveDate, _context: &PolicyContext) {
        for case in candidates.iter_mut() {
            case.compute_priority(&self.weights, today);
        }
        candidates.sort_by(|a, b| {
            b.priority_score
                .partial_cmp(&a.priority_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.filed_date.cmp(&b.filed_date))
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::case::{CaseId, CaseType, Stage};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn case(id: &str, filed: NaiveDate, urgent: bool) -> Case {
        let mut c = Case::new(CaseId::from(id), CaseType::Contract, filed, Stage::Admission);
        c.is_urgent = urgent;
        c.compute_readiness(30.0);
        c
    }

    #[test]
    fn urgent_case_ranks_above_equally_aged_non_urgent() {
        let mut cases = vec![
            case("calm", date(2024, 1, 1), false),
            case("urgent", date(2024, 1, 1), true),
        ];
        let policy = CompositePolicy::default();
        let context = PolicyContext {
            total_capacity: 1,
            min_gap_days: 0,
            preferred_case_type: None,
        };
        policy.prioritize(&mut cases, date(2024, 6, 1), &context);
        assert_eq!(cases[0].id, CaseId::from("urgent"));
    }
}
