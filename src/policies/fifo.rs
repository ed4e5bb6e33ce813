//! First-in-first-out priority policy (§4.4): order by filed date, then
//! case id.

use chrono::NaiveDate;

use crate::domain::case::Case;
use crate::ports::priority_policy::{PolicyContext, PriorityPolicy};

#[derive(Debug, Default)]
pub struct FifoPolicy;

impl PriorityPolicy for FifoPolicy {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn prioritize(&self, candidates: &mut Vec<Case>, _today: NaiveDate, _context: &PolicyContext) {
        candidates.sort_by(|a, b| a.filed_date.cmp(&b.filed_date).then_with(|| a.id.cmp(&b.id)));
    }
}
