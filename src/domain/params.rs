//! Parameter tables: the immutable, externally fitted probability and
//! duration tables the rest of the core reads from (§4.1).
//!
//! Lookups fail closed — a missing `(stage, case_type)` entry never panics
//! or aborts a run, it falls back to a documented default and records the
//! miss on [`ParameterTables::missing_lookups`] so a caller can audit table
//! coverage after a run.

use std::cell::Cell;
use std::collections::HashMap;

use crate::domain::case::{CaseType, Stage};

/// Duration percentile a caller may request from [`ParameterTables::duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPercentile {
    Median,
    P90,
}

/// A discrete distribution over next stages, as a list of `(stage, weight)`
/// pairs. Constructing one validates that weights sum to 1 within 1e-6
/// (§7 "probability sums deviating from 1 beyond tolerance").
#[derive(Debug)]
pub struct StageDistribution(Vec<(Stage, f64)>);

const PROBABILITY_TOLERANCE: f64 = 1e-6;

impl StageDistribution {
    pub fn new(weights: Vec<(Stage, f64)>) -> Result<Self, String> {
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(format!(
                "stage distribution weights must sum to 1.0, got {total}"
            ));
        }
        Ok(StageDistribution(weights))
    }

    /// Samples the next stage given a uniform draw `u ∈ [0, 1)` (§4.8 step 3).
    /// Clamps to the last entry if floating point error pushes `u` past the
    /// cumulative total (§4.11 "sampling draws outside known distributions").
    pub fn sample(&self, u: f64) -> Stage {
        let mut cumulative = 0.0;
        for (stage, weight) in &self.0 {
            cumulative += weight;
            if u < cumulative {
                return *stage;
            }
        }
        self.0
            .last()
            .map(|(stage, _)| *stage)
            .expect("stage distribution must be non-empty")
    }

    pub fn entries(&self) -> &[(Stage, f64)] {
        &self.0
    }
}

/// Per-case-type summary stats (§4.1 "case-type summary").
#[derive(Debug, Clone, Copy)]
pub struct TypeStats {
    pub median_hearings_to_disposal: f64,
    pub median_inter_hearing_gap_days: f64,
}

impl Default for TypeStats {
    fn default() -> Self {
        TypeStats {
            median_hearings_to_disposal: 4.0,
            median_inter_hearing_gap_days: 30.0,
        }
    }
}

/// Immutable parameter tables backing the ripeness classifier, the priority
/// policies, and the outcome sampler.
#[derive(Debug)]
pub struct ParameterTables {
    transitions: HashMap<(Stage, CaseType), StageDistribution>,
    durations: HashMap<(Stage, CaseType), (f64, f64)>,
    adjournment: HashMap<(Stage, CaseType), f64>,
    type_stats: HashMap<CaseType, TypeStats>,
    nominal_daily_capacity: HashMap<String, (u32, u32)>,
    missing_lookups: Cell<u64>,
}

impl Default for ParameterTables {
    fn default() -> Self {
        ParameterTables {
            transitions: HashMap::new(),
            durations: HashMap::new(),
            adjournment: HashMap::new(),
            type_stats: HashMap::new(),
            nominal_daily_capacity: HashMap::new(),
            missing_lookups: Cell::new(0),
        }
    }
}

/// Self-loop-with-uniform-tail default used whenever a `(stage, type)`
/// transition is missing (§4.1): stays in the same stage with probability
/// 0.9, spreads the remaining 0.1 uniformly across the other known stages.
fn default_transition(stage: Stage) -> StageDistribution {
    let others: Vec<Stage> = [
        Stage::Admission,
        Stage::Notice,
        Stage::Motions,
        Stage::Arguments,
        Stage::Evidence,
        Stage::OrdersJudgment,
        Stage::FinalDisposal,
    ]
    .into_iter()
    .filter(|s| *s != stage)
    .collect();
    let tail_weight = 0.1 / others.len() as f64;
    let mut weights: Vec<(Stage, f64)> = others.into_iter().map(|s| (s, tail_weight)).collect();
    weights.push((stage, 0.9));
    // Floating point: renormalize the last entry so the sum lands within
    // tolerance regardless of `others.len()`.
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if let Some(last) = weights.last_mut() {
        last.1 += 1.0 - total;
    }
    StageDistribution(weights)
}

impl ParameterTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_transition(
        &mut self,
        stage: Stage,
        case_type: CaseType,
        distribution: StageDistribution,
    ) {
        self.transitions.insert((stage, case_type), distribution);
    }

    pub fn insert_duration(&mut self, stage: Stage, case_type: CaseType, median: f64, p90: f64) {
        self.durations.insert((stage, case_type), (median, p90));
    }

    pub fn insert_adjournment(&mut self, stage: Stage, case_type: CaseType, probability: f64) {
        self.adjournment.insert((stage, case_type), probability);
    }

    pub fn insert_type_stats(&mut self, case_type: CaseType, stats: TypeStats) {
        self.type_stats.insert(case_type, stats);
    }

    pub fn insert_capacity(&mut self, courtroom_id: &str, nominal: u32, p90: u32) {
        self.nominal_daily_capacity
            .insert(courtroom_id.to_string(), (nominal, p90));
    }

    /// Number of lookups that fell through to a documented default since
    /// construction (or since the last [`ParameterTables::reset_miss_counter`]).
    pub fn missing_lookups(&self) -> u64 {
        self.missing_lookups.get()
    }

    pub fn reset_miss_counter(&self) {
        self.missing_lookups.set(0);
    }

    fn record_miss(&self) {
        self.missing_lookups.set(self.missing_lookups.get() + 1);
    }

    pub fn transition(&self, stage: Stage, case_type: &CaseType) -> StageDistribution {
        match self.transitions.get(&(stage, case_type.clone())) {
            Some(dist) => dist.clone(),
            None => {
                self.record_miss();
                default_transition(stage)
            }
        }
    }

    pub fn duration(
        &self,
        stage: Stage,
        case_type: &CaseType,
        percentile: DurationPercentile,
    ) -> f64 {
        match self.durations.get(&(stage, case_type.clone())) {
            Some((median, p90)) => match percentile {
                DurationPercentile::Median => *median,
                DurationPercentile::P90 => *p90,
            },
            None => {
                self.record_miss();
                match percentile {
                    DurationPercentile::Median => 14.0,
                    DurationPercentile::P90 => 45.0,
                }
            }
        }
    }

    pub fn adjournment(&self, stage: Stage, case_type: &CaseType) -> f64 {
        match self.adjournment.get(&(stage, case_type.clone())) {
            Some(p) => *p,
            None => {
                self.record_miss();
                0.2
            }
        }
    }

    pub fn type_stats(&self, case_type: &CaseType) -> TypeStats {
        self.type_stats.get(case_type).copied().unwrap_or_else(|| {
            self.record_miss();
            TypeStats::default()
        })
    }

    pub fn capacity(&self, courtroom_id: &str) -> (u32, u32) {
        self.nominal_daily_capacity
            .get(courtroom_id)
            .copied()
            .unwrap_or_else(|| {
                self.record_miss();
                (10, 12)
            })
    }
}

impl Clone for StageDistribution {
    fn clone(&self) -> Self {
        StageDistribution(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_distribution_accepted() {
        let dist = StageDistribution::new(vec![
            (Stage::Admission, 0.6),
            (Stage::Notice, 0.4),
        ]);
        assert!(dist.is_ok());
    }

    #[test]
    fn invalid_distribution_rejected() {
        let dist = StageDistribution::new(vec![
            (Stage::Admission, 0.6),
            (Stage::Notice, 0.1),
        ]);
        assert!(dist.is_err());
    }

    #[test]
    fn missing_transition_falls_back_to_default_and_counts_miss() {
        let tables = ParameterTables::new();
        assert_eq!(tables.missing_lookups(), 0);
        let dist = tables.transition(Stage::Admission, &CaseType::Contract);
        assert_eq!(tables.missing_lookups(), 1);
        let self_loop = dist
            .entries()
            .iter()
            .find(|(s, _)| *s == Stage::Admission)
            .unwrap();
        assert!((self_loop.1 - 0.9).abs() < 1e-9);
    }

    #[test]
    fn present_adjournment_does_not_count_as_miss() {
        let mut tables = ParameterTables::new();
        tables.insert_adjournment(Stage::Admission, CaseType::Contract, 0.38);
        let p = tables.adjournment(Stage::Admission, &CaseType::Contract);
        assert_eq!(p, 0.38);
        assert_eq!(tables.missing_lookups(), 0);
    }

    #[test]
    fn sample_picks_first_bucket_whose_cumulative_exceeds_u() {
        let dist = StageDistribution::new(vec![
            (Stage::Admission, 0.3),
            (Stage::Notice, 0.3),
            (Stage::Motions, 0.4),
        ])
        .unwrap();
        assert_eq!(dist.sample(0.1), Stage::Admission);
        assert_eq!(dist.sample(0.35), Stage::Notice);
        assert_eq!(dist.sample(0.9), Stage::Motions);
    }
}
