//! Metrics accumulation and the append-only event log (§4.10).

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::case::{CaseId, Stage};
use crate::domain::courtroom::CourtroomId;
use crate::domain::scheduling_result::SchedulingResult;

/// Per-day counters, one emitted per simulated working day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayMetrics {
    pub date: NaiveDate,
    pub scheduled: u32,
    pub heard: u32,
    pub adjourned: u32,
    pub disposed: u32,
    pub unripe_filtered: u32,
    pub gap_blocked: u32,
    pub capacity_limited: u32,
    pub per_courtroom_counts: HashMap<CourtroomId, u32>,
}

/// Aggregate statistics over a full (or partial, if cancelled) run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub days_simulated: u32,
    pub initial_population: u32,
    pub disposal_rate: f64,
    pub adjournment_rate: f64,
    pub utilization: f64,
    pub courtroom_load_gini: f64,
    pub case_coverage: f64,
    pub missing_param_lookups: u64,
    pub overrides_applied: u64,
    pub overrides_rejected: u64,
}

/// A single entry in the append-only event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    DayCompleted {
        date: NaiveDate,
        scheduled: u32,
        heard: u32,
        adjourned: u32,
        disposed: u32,
    },
    CaseHeard {
        date: NaiveDate,
        case_id: CaseId,
        courtroom_id: CourtroomId,
        stage_before: Stage,
        stage_after: Stage,
    },
    CaseAdjourned {
        date: NaiveDate,
        case_id: CaseId,
        courtroom_id: CourtroomId,
    },
    CaseDisposed {
        date: NaiveDate,
        case_id: CaseId,
    },
    RunCancelled {
        after_day: u32,
    },
}

/// Append-only event log with a streaming export, so a long horizon doesn't
/// force a caller to buffer every day's events before writing them out
/// (§4.10 "streaming export").
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterator over events from `index` onward, without cloning the whole
    /// log. Repeated calls with an advancing `index` implement a streaming
    /// drain pattern for callers writing to a sink incrementally.
    pub fn drain_from(&self, index: usize) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().skip(index)
    }

    pub fn all(&self) -> &[SimEvent] {
        &self.events
    }
}

/// Standard Gini coefficient over nonnegative counts; 0.0 for an empty or
/// all-zero input (perfect balance by convention), per §4.10.
pub fn gini_coefficient(counts: &[u32]) -> f64 {
    let n = counts.len();
    if n == 0 {
        return 0.0;
    }
    let total: f64 = counts.iter().map(|&c| c as f64).sum();
    if total == 0.0 {
        return 0.0;
    }
    let mut sorted: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut weighted_sum = 0.0;
    for (i, value) in sorted.iter().enumerate() {
        weighted_sum += (i as f64 + 1.0) * value;
    }
    (2.0 * weighted_sum) / (n as f64 * total) - (n as f64 + 1.0) / n as f64
}

/// Accumulates per-day and per-case statistics across a run and produces a
/// [`RunSummary`] on [`MetricsAccumulator::finalize`].
#[derive(Debug)]
pub struct MetricsAccumulator {
    initial_population: u32,
    courtroom_ids: Vec<CourtroomId>,
    courtroom_nominal_capacity: HashMap<CourtroomId, u32>,
    days: Vec<DayMetrics>,
    cumulative_courtroom_counts: HashMap<CourtroomId, u32>,
    total_heard: u64,
    total_adjourned: u64,
    total_disposed: u64,
    scheduled_at_least_once: HashSet<CaseId>,
    overrides_applied: u64,
    overrides_rejected: u64,
}

impl MetricsAccumulator {
    pub fn new(
        initial_population: u32,
        courtrooms: &[(CourtroomId, u32)],
    ) -> Self {
        let courtroom_ids = courtrooms.iter().map(|(id, _)| id.clone()).collect();
        let courtroom_nominal_capacity = courtrooms.iter().cloned().collect();
        MetricsAccumulator {
            initial_population,
            courtroom_ids,
            courtroom_nominal_capacity,
            days: Vec::new(),
            cumulative_courtroom_counts: HashMap::new(),
            total_heard: 0,
            total_adjourned: 0,
            total_disposed: 0,
            scheduled_at_least_once: HashSet::new(),
            overrides_applied: 0,
            overrides_rejected: 0,
        }
    }

    /// Folds a day's scheduling result plus the hearing outcomes the engine
    /// sampled for it into the running accumulator.
    pub fn observe_day(
        &mut self,
        result: &SchedulingResult,
        heard: u32,
        adjourned: u32,
        disposed: u32,
    ) {
        let mut per_courtroom_counts = HashMap::new();
        for (room_id, entries) in &result.by_courtroom {
            let count = entries.len() as u32;
            per_courtroom_counts.insert(room_id.clone(), count);
            *self.cumulative_courtroom_counts.entry(room_id.clone()).or_insert(0) += count;
            for entry in entries {
                self.scheduled_at_least_once.insert(entry.case_id.clone());
            }
        }

        self.total_heard += heard as u64;
        self.total_adjourned += adjourned as u64;
        self.total_disposed += disposed as u64;
        self.overrides_applied += result.overrides_applied.len() as u64;
        self.overrides_rejected += result.overrides_rejected.len() as u64;

        self.days.push(DayMetrics {
            date: result.date,
            scheduled: result.total_scheduled() as u32,
            heard,
            adjourned,
            disposed,
            unripe_filtered: result.counters.unripe_filtered,
            gap_blocked: result.counters.gap_blocked,
            capacity_limited: result.counters.capacity_limited,
            per_courtroom_counts,
        });
    }

    pub fn days(&self) -> &[DayMetrics] {
        &self.days
    }

    pub fn finalize(&self, missing_param_lookups: u64) -> RunSummary {
        let days_simulated = self.days.len() as u32;
        let disposal_rate = if self.initial_population == 0 {
            0.0
        } else {
            self.total_disposed as f64 / self.initial_population as f64
        };
        let heard_plus_adjourned = self.total_heard + self.total_adjourned;
        let adjournment_rate = if heard_plus_adjourned == 0 {
            0.0
        } else {
            self.total_adjourned as f64 / heard_plus_adjourned as f64
        };

        let utilization = if self.days.is_empty() || self.courtroom_ids.is_empty() {
            0.0
        } else {
            let mut ratios = Vec::with_capacity(self.days.len());
            for day in &self.days {
                let total_capacity: u32 = self
                    .courtroom_ids
                    .iter()
                    .map(|id| *self.courtroom_nominal_capacity.get(id).unwrap_or(&0))
                    .sum();
                if total_capacity > 0 {
                    ratios.push(day.scheduled as f64 / total_capacity as f64);
                }
            }
            if ratios.is_empty() {
                0.0
            } else {
                ratios.iter().sum::<f64>() / ratios.len() as f64
            }
        };

        let counts: Vec<u32> = self
            .courtroom_ids
            .iter()
            .map(|id| *self.cumulative_courtroom_counts.get(id).unwrap_or(&0))
            .collect();
        let courtroom_load_gini = gini_coefficient(&counts);

        let case_coverage = if self.initial_population == 0 {
            0.0
        } else {
            self.scheduled_at_least_once.len() as f64 / self.initial_population as f64
        };

        RunSummary {
            days_simulated,
            initial_population: self.initial_population,
            disposal_rate,
            adjournment_rate,
            utilization,
            courtroom_load_gini,
            case_coverage,
            missing_param_lookups,
            overrides_applied: self.overrides_applied,
            overrides_rejected: self.overrides_rejected,
        }
    }
}
