//! The simulation engine (§4.9): the day loop that advances the calendar,
//! invokes the scheduling algorithm, applies stochastic hearing outcomes,
//! and accumulates metrics and events.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use sha2::{Digest, Sha256};
use tracing::{info_span, warn};

use crate::algorithm::{schedule_day, SchedulingOptions};
use crate::calendar::WorkingDayCalendar;
use crate::config::SimulationConfig;
use crate::domain::case::{Case, CaseId, CaseType, HearingOutcome, RipenessState, Stage};
use crate::domain::courtroom::{Courtroom, CourtroomId};
use crate::domain::metrics::{EventLog, MetricsAccumulator, RunSummary, SimEvent};
use crate::domain::override_request::Override;
use crate::domain::params::ParameterTables;
use crate::error::RunResult;
use crate::ports::courtroom_allocator::CourtroomAllocator;
use crate::ports::outcome_sampler::OutcomeSampler;
use crate::ports::priority_policy::PriorityPolicy;
use crate::ports::ripeness_classifier::{RipenessClassifier, RipenessThresholds};

/// A day's worth of human overrides, supplied by the caller before that day
/// runs. The engine never invents overrides itself.
pub type DailyOverrides = HashMap<NaiveDate, Vec<Override>>;

/// Outcome of one completed simulation run: final metrics plus whether the
/// run completed its full horizon or was cancelled partway (§5).
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub cancelled: bool,
}

/// The day-by-day simulation driver (§4.9). Single-threaded and
/// deterministic by construction: see §5.
pub struct SimulationEngine {
    cases: HashMap<CaseId, Case>,
    courtrooms: HashMap<CourtroomId, Courtroom>,
    courtroom_order: Vec<CourtroomId>,
    tables: Arc<ParameterTables>,
    config: SimulationConfig,
    classifier: Box<dyn RipenessClassifier>,
    policy: Box<dyn PriorityPolicy>,
    allocator: Box<dyn CourtroomAllocator>,
    sampler: Box<dyn OutcomeSampler>,
    calendar: Box<dyn WorkingDayCalendar>,
    metrics: MetricsAccumulator,
    event_log: EventLog,
    initial_population: u32,
}

impl SimulationEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SimulationConfig,
        cases: Vec<Case>,
        tables: Arc<ParameterTables>,
        mut classifier: Box<dyn RipenessClassifier>,
        policy: Box<dyn PriorityPolicy>,
        allocator: Box<dyn CourtroomAllocator>,
        sampler: Box<dyn OutcomeSampler>,
        calendar: Box<dyn WorkingDayCalendar>,
    ) -> RunResult<Self> {
        config.validate()?;

        let mut thresholds = classifier.thresholds();
        thresholds.strict_mode = config.strict_ripeness;
        classifier.set_thresholds(thresholds);

        let mut courtrooms = HashMap::new();
        let mut courtroom_order = Vec::new();
        for room_cfg in &config.courtrooms {
            let id = CourtroomId::from(room_cfg.id.as_str());
            courtrooms.insert(id.clone(), Courtroom::new(id.clone(), room_cfg.nominal_capacity));
            courtroom_order.push(id);
        }
        courtroom_order.sort();

        let initial_population = cases.len() as u32;
        let mut case_map = HashMap::with_capacity(cases.len());
        for case in cases {
            case_map.insert(case.id.clone(), case);
        }

        let capacity_snapshot: Vec<(CourtroomId, u32)> = config
            .courtrooms
            .iter()
            .map(|c| (CourtroomId::from(c.id.as_str()), c.nominal_capacity))
            .collect();
        let metrics = MetricsAccumulator::new(initial_population, &capacity_snapshot);

        Ok(SimulationEngine {
            cases: case_map,
            courtrooms,
            courtroom_order,
            tables,
            config,
            classifier,
            policy,
            allocator,
            sampler,
            calendar,
            metrics,
            event_log: EventLog::new(),
            initial_population,
        })
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn metrics(&self) -> &MetricsAccumulator {
        &self.metrics
    }

    /// Runs the full horizon, checking `cancelled` at the top of every
    /// simulated day (§5). `overrides` supplies per-date human overrides;
    /// days without an entry run with none.
    pub fn run(
        &mut self,
        overrides: &DailyOverrides,
        mut cancelled: impl FnMut() -> bool,
    ) -> RunOutcome {
        let empty_overrides: Vec<Override> = Vec::new();
        let mut days_completed = 0u32;
        let mut was_cancelled = false;

        for day_index in 0..self.config.horizon_days {
            if cancelled() {
                self.event_log.push(SimEvent::RunCancelled { after_day: days_completed });
                was_cancelled = true;
                break;
            }

            let date = self.config.start_date + chrono::Duration::days(day_index as i64);
            if !self.calendar.is_working_day(date) {
                continue;
            }

            let _span = info_span!("simulated_day", date = %date, day_index).entered();

            for room in self.courtrooms.values_mut() {
                room.reset_for_day();
            }

            if day_index % self.config.ripeness_eval_period_days.max(1) == 0 {
                self.reevaluate_ripeness(date);
            }

            if self.config.inflow.enabled {
                self.sample_inflow(date, day_index);
            }

            let day_overrides = overrides.get(&date).unwrap_or(&empty_overrides);
            let options = SchedulingOptions {
                min_gap_days: self.config.min_gap_days,
                preferred_case_type: None,
            };

            let result = schedule_day(
                &mut self.cases,
                &mut self.courtrooms,
                &self.courtroom_order,
                date,
                day_overrides,
                self.policy.as_ref(),
                self.classifier.as_ref(),
                self.allocator.as_ref(),
                &self.tables,
                &options,
            );

            let (heard, adjourned, disposed) = self.apply_outcomes(&result, date);
            self.metrics.observe_day(&result, heard, adjourned, disposed);
            self.event_log.push(SimEvent::DayCompleted {
                date,
                scheduled: result.total_scheduled() as u32,
                heard,
                adjourned,
                disposed,
            });

            days_completed += 1;
        }

        RunOutcome {
            summary: self.metrics.finalize(self.tables.missing_lookups()),
            cancelled: was_cancelled,
        }
    }

    /// Re-evaluates ripeness for every case still in the pool (§4.9
    /// "ripeness-eval day"), amortising classifier cost across multiple
    /// days rather than re-running it every day.
    fn reevaluate_ripeness(&mut self, date: NaiveDate) {
        for case in self.cases.values_mut() {
            if case.is_disposed() {
                continue;
            }
            let state: RipenessState = self.classifier.classify(case, date);
            case.ripeness = Some(state);
        }
    }

    /// Samples and applies a hearing outcome for every case the day's
    /// scheduling result placed in a courtroom (§4.8).
    fn apply_outcomes(&mut self, result: &crate::domain::scheduling_result::SchedulingResult, date: NaiveDate) -> (u32, u32, u32) {
        let (mut heard, mut adjourned, mut disposed) = (0u32, 0u32, 0u32);

        for (room_id, entries) in &result.by_courtroom {
            for entry in entries {
                let Some(case) = self.cases.get(&entry.case_id) else {
                    warn!(case_id = %entry.case_id, "scheduled case missing from pool at outcome time");
                    continue;
                };
                if let Err(e) = crate::error::check_invariant(
                    !case.is_disposed(),
                    format!("disposed/terminal case {} reached the outcome sampler", entry.case_id),
                ) {
                    warn!(error = %e, case_id = %entry.case_id, "skipping case at outcome time");
                    continue;
                }
                let record = self.sampler.sample_outcome(case, date, room_id, &self.tables);
                match record.outcome {
                    HearingOutcome::Heard => heard += 1,
                    HearingOutcome::Adjourned => adjourned += 1,
                    HearingOutcome::Disposed => disposed += 1,
                }

                let event = match record.outcome {
                    HearingOutcome::Heard => SimEvent::CaseHeard {
                        date,
                        case_id: entry.case_id.clone(),
                        courtroom_id: room_id.clone(),
                        stage_before: record.stage_before,
                        stage_after: record.stage_after,
                    },
                    HearingOutcome::Adjourned => SimEvent::CaseAdjourned {
                        date,
                        case_id: entry.case_id.clone(),
                        courtroom_id: room_id.clone(),
                    },
                    HearingOutcome::Disposed => SimEvent::CaseDisposed { date, case_id: entry.case_id.clone() },
                };
                self.event_log.push(event);

                if let Some(case) = self.cases.get_mut(&entry.case_id) {
                    case.record_hearing(record);
                }
            }
        }

        (heard, adjourned, disposed)
    }

    /// Draws new cases into the pool for `date` (§4.9 "case inflow").
    /// Deterministic given the run's seed: the expected count's integer
    /// part is guaranteed, the fractional remainder is a single Bernoulli
    /// draw from the same hash-keyed sub-stream discipline as the outcome
    /// sampler (§4.8, §9).
    fn sample_inflow(&mut self, date: NaiveDate, day_index: u32) {
        let mean = self.config.inflow.mean_cases_per_day;
        if mean <= 0.0 || self.config.inflow.case_type_weights.is_empty() {
            return;
        }
        let base_count = mean.floor() as u32;
        let fractional = mean - mean.floor();

        let mut hasher = Sha256::new();
        hasher.update(self.config.seed.to_be_bytes());
        hasher.update(b"inflow");
        hasher.update(date.num_days_from_ce().to_be_bytes());
        let digest = hasher.finalize();
        let draw = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as f64
            / u32::MAX as f64;
        let count = if draw < fractional { base_count + 1 } else { base_count };

        for n in 0..count {
            let case_type = self.pick_inflow_case_type(date, n);
            let id = CaseId::from(format!("inflow-{}-{}-{}", date, day_index, n).as_str());
            let case = Case::new(id.clone(), case_type, date, Stage::Admission);
            self.cases.insert(id, case);
        }
    }

    fn pick_inflow_case_type(&self, date: NaiveDate, n: u32) -> CaseType {
        let weights = &self.config.inflow.case_type_weights;
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return CaseType::Other("unspecified".to_string());
        }
        let mut hasher = Sha256::new();
        hasher.update(self.config.seed.to_be_bytes());
        hasher.update(b"inflow-type");
        hasher.update(date.num_days_from_ce().to_be_bytes());
        hasher.update(n.to_be_bytes());
        let digest = hasher.finalize();
        let draw = (u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as f64
            / u32::MAX as f64)
            * total;

        let mut cumulative = 0.0;
        for (case_type, weight) in weights {
            cumulative += weight;
            if draw < cumulative {
                return case_type.clone();
            }
        }
        weights.last().map(|(t, _)| t.clone()).unwrap_or(CaseType::Other("unspecified".to_string()))
    }
}
