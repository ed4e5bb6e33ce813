//! Outcome sampler port (§4.8): samples a hearing outcome for a scheduled
//! case from a seeded RNG sub-stream keyed by `(seed, case_id, date)`.

use chrono::NaiveDate;

use crate::domain::case::{Case, HearingRecord};
use crate::domain::courtroom::CourtroomId;
use crate::domain::params::ParameterTables;

/// Samples hearing outcomes deterministically: the same `(case, date)`
/// under the same master seed always produces the same [`HearingRecord`],
/// independent of call order or thread scheduling (§4.8, §5).
pub trait OutcomeSampler: Send + Sync {
    fn sample_outcome(
        &self,
        case: &Case,
        today: NaiveDate,
        courtroom_id: &CourtroomId,
        tables: &ParameterTables,
    ) -> HearingRecord;
}
