//! Seeded stochastic outcome sampler (§4.8), keyed by
//! `hash(master_seed, case_id, date)` so that re-running with the same seed
//! reproduces identical outcomes regardless of thread scheduling.
//!
//! The hashing idiom is lifted directly from the host project's
//! `ElectronicSignature::new`, which also builds a `Sha256` digest from a
//! handful of fields and formats it as a verification artifact — here the
//! digest becomes an RNG seed instead of a printable code.

use chrono::{Datelike, NaiveDate};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use sha2::{Digest, Sha256};

use crate::domain::case::{Case, HearingOutcome, HearingRecord};
use crate::domain::courtroom::CourtroomId;
use crate::domain::params::ParameterTables;
use crate::ports::outcome_sampler::OutcomeSampler;

/// Derives a 32-byte RNG seed from `(master_seed, case_id, date)`. Two calls
/// with the same inputs always produce the same seed; this is the whole of
/// the determinism guarantee in §5 and §9 ("RNG sub-streams").
pub fn substream_seed(master_seed: u64, case_id: &str, date: NaiveDate) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(master_seed.to_be_bytes());
    hasher.update(date.num_days_from_ce().to_be_bytes());
    hasher.update(case_id.as_bytes());
    let digest = hasher.finalize();
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    seed
}

/// Samples hearing outcomes from the seeded sub-stream for `(case, date)`.
#[derive(Debug, Clone, Copy)]
pub struct SeededOutcomeSampler {
    master_seed: u64,
}

impl SeededOutcomeSampler {
    pub fn new(master_seed: u64) -> Self {
        SeededOutcomeSampler { master_seed }
    }
}

impl OutcomeSampler for SeededOutcomeSampler {
    fn sample_outcome(
        &self,
        case: &Case,
        today: NaiveDate,
        courtroom_id: &CourtroomId,
        tables: &ParameterTables,
    ) -> HearingRecord {
        let seed = substream_seed(self.master_seed, &case.id.0, today);
        let mut rng = StdRng::from_seed(seed);

        let stage_before = case.current_stage;
        let adjournment_p = tables.adjournment(stage_before, &case.case_type);
        let adjourn_draw: f64 = rng.gen();

        if adjourn_draw < adjournment_p {
            return HearingRecord {
                date: today,
                outcome: HearingOutcome::Adjourned,
                stage_before,
                stage_after: stage_before,
                courtroom_id: courtroom_id.clone(),
            };
        }

        let transition_draw: f64 = rng.gen();
        let distribution = tables.transition(stage_before, &case.case_type);
        let next_stage = distribution.sample(transition_draw);

        let outcome = if next_stage.is_terminal() {
            HearingOutcome::Disposed
        } else {
            HearingOutcome::Heard
        };

        HearingRecord {
            date: today,
            outcome,
            stage_before,
            stage_after: next_stage,
            courtroom_id: courtroom_id.clone(),
        }
    }
}
