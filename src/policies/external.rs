//! External-scorer priority policy (§4.4): orders by an opaque scoring
//! function over the fixed feature vector from §9. This is the seam the
//! reinforcement-learning training harness plugs into; the core only ever
//! sees `ScorerFn`, never the harness itself (§1 Non-goals).

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::case::Case;
use crate::ports::priority_policy::{CaseFeatures, PolicyContext, PriorityPolicy};

/// An opaque scoring function: higher scores schedule first.
pub type ScorerFn = Arc<dyn Fn(&CaseFeatures) -> f64 + Send + Sync>;

#[derive(Clone)]
pub struct ExternalScorerPolicy {
    scorer: ScorerFn,
}

impl ExternalScorerPolicy {
    pub fn new(scorer: ScorerFn) -> Self {
        ExternalScorerPolicy { scorer }
    }
}

impl std::fmt::Debug for ExternalScorerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalScorerPolicy").finish_non_exhaustive()
    }
}

impl PriorityPolicy for ExternalScorerPolicy {
    fn name(&self) -> &'static str {
        "external"
    }

    fn prioritize(&self, candidates: &mut Vec<Case>, today: NaiveDate, context: &PolicyContext) {
        let mut scored: Vec<(f64, usize)> = candidates
            .iter()
            .enumerate()
            .map(|(i, case)| {
                let features = CaseFeatures::extract(case, today, context);
                ((self.scorer)(&features), i)
            })
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });

        let mut reordered = Vec::with_capacity(candidates.len());
        let mut remaining: Vec<Option<Case>> = candidates.drain(..).map(Some).collect();
        for (_, index) in scored {
            if let Some(case) = remaining[index].take() {
                reordered.push(case);
            }
        }
        *candidates = reordered;
    }
}
