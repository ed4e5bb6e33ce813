//! The case entity: per-case mutable state, lifecycle transitions, and the
//! derived readiness/priority scores the rest of the pipeline reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::courtroom::CourtroomId;

/// Opaque case identifier. Newtype over `String` so it can't be confused
/// with a courtroom id or a free-text field at the call site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CaseId {
    fn from(s: &str) -> Self {
        CaseId(s.to_string())
    }
}

/// Civil case type taxonomy. `Other` covers jurisdiction-specific categories
/// this crate doesn't need to enumerate exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    Contract,
    Property,
    Family,
    Labor,
    Consumer,
    Tort,
    Other(String),
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseType::Contract => write!(f, "contract"),
            CaseType::Property => write!(f, "property"),
            CaseType::Family => write!(f, "family"),
            CaseType::Labor => write!(f, "labor"),
            CaseType::Consumer => write!(f, "consumer"),
            CaseType::Tort => write!(f, "tort"),
            CaseType::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Ordered position in the case lifecycle. Only [`Stage::FinalDisposal`] is
/// terminal: reaching it disposes the case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Admission,
    Notice,
    Motions,
    Arguments,
    Evidence,
    OrdersJudgment,
    FinalDisposal,
}

impl Stage {
    /// Stages for which readiness's "advanced stage" bonus applies (§4.2).
    pub fn is_advanced(&self) -> bool {
        matches!(self, Stage::Arguments | Stage::Evidence | Stage::OrdersJudgment)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::FinalDisposal)
    }

    pub fn is_initial_admission(&self) -> bool {
        matches!(self, Stage::Admission)
    }

    /// Index into the fixed ordering, used by the external-scorer feature
    /// vector (§9 "Feature vector for external scorer").
    pub fn index(&self) -> u8 {
        match self {
            Stage::Admission => 0,
            Stage::Notice => 1,
            Stage::Motions => 2,
            Stage::Arguments => 3,
            Stage::Evidence => 4,
            Stage::OrdersJudgment => 5,
            Stage::FinalDisposal => 6,
        }
    }
}

/// Overall lifecycle status of a case, distinct from its stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Pending,
    Active,
    Adjourned,
    Scheduled,
    Disposed,
}

/// Outcome of a single hearing, as recorded in a case's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HearingOutcome {
    Heard,
    Adjourned,
    Disposed,
}

/// A single, append-only entry in a case's hearing history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingRecord {
    pub date: NaiveDate,
    pub outcome: HearingOutcome,
    pub stage_before: Stage,
    pub stage_after: Stage,
    pub courtroom_id: CourtroomId,
}

/// A ripeness classifier verdict. See `ports::ripeness_classifier`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RipenessVerdict {
    Ripe,
    UnripeSummons,
    UnripeDependent,
    UnripeParty,
    UnripeDocument,
    Unknown,
}

impl RipenessVerdict {
    pub fn is_ripe(&self) -> bool {
        matches!(self, RipenessVerdict::Ripe)
    }
}

/// The case's last-computed ripeness, carried so the engine doesn't have to
/// re-run the classifier every day (§4.9 "ripeness-eval day").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RipenessState {
    pub verdict: RipenessVerdict,
    pub reason: String,
    pub last_evaluated: NaiveDate,
}

/// Weights for the derived readiness and priority scores (§4.2). Baked in as
/// named constants per the source's own convention; exposed as a struct so a
/// caller that genuinely needs to vary them in a test can construct one, but
/// [`PriorityWeights::default`] is what the engine uses.
#[derive(Debug, Clone, Copy)]
pub struct PriorityWeights {
    pub age_weight: f64,
    pub readiness_weight: f64,
    pub urgency_weight: f64,
    pub adjournment_weight: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        PriorityWeights {
            age_weight: 0.35,
            readiness_weight: 0.25,
            urgency_weight: 0.25,
            adjournment_weight: 0.15,
        }
    }
}

const READINESS_HEARING_WEIGHT: f64 = 0.4;
const READINESS_GAP_WEIGHT: f64 = 0.3;
const READINESS_STAGE_WEIGHT: f64 = 0.3;
const READINESS_HEARING_CAP: f64 = 50.0;
const READINESS_GAP_NORM: f64 = 100.0;

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// A civil case moving through the scheduling pipeline.
///
/// Mutated only by [`crate::algorithm::schedule_day`] and the outcome
/// sampler in [`crate::engine`]; every other component borrows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub case_type: CaseType,
    pub filed_date: NaiveDate,
    pub current_stage: Stage,
    pub status: LifecycleStatus,
    pub hearing_count: u32,
    pub last_hearing_date: Option<NaiveDate>,
    pub last_hearing_purpose: Option<String>,
    pub is_urgent: bool,
    pub ripeness: Option<RipenessState>,
    pub readiness_score: f64,
    pub priority_score: f64,
    pub last_scheduled_date: Option<NaiveDate>,
    pub min_gap_override: Option<u32>,
    pub history: Vec<HearingRecord>,
    /// Day-scoped forced-ripe overlay set by the override layer; cleared by
    /// the algorithm at the end of every day (§4.5, §9 "Override side-effects").
    #[serde(default)]
    pub forced_ripe_today: bool,
}

impl Case {
    pub fn new(
        id: CaseId,
        case_type: CaseType,
        filed_date: NaiveDate,
        current_stage: Stage,
    ) -> Self {
        Case {
            id,
            case_type,
            filed_date,
            current_stage,
            status: LifecycleStatus::Pending,
            hearing_count: 0,
            last_hearing_date: None,
            last_hearing_purpose: None,
            is_urgent: false,
            ripeness: None,
            readiness_score: 0.0,
            priority_score: 0.0,
            last_scheduled_date: None,
            min_gap_override: None,
            history: Vec::new(),
            forced_ripe_today: false,
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.status == LifecycleStatus::Disposed || self.current_stage.is_terminal()
    }

    /// Age in days as of `today`. Does not mutate; "advance" in the spec's
    /// naming refers to the derived quantity being recomputed each call, not
    /// to stored state.
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.filed_date).num_days().max(0)
    }

    /// Appends a hearing record and updates the derived bookkeeping fields.
    /// Does not itself decide the outcome — the outcome sampler does and
    /// calls this once it has.
    pub fn record_hearing(&mut self, record: HearingRecord) {
        self.last_hearing_date = Some(record.date);
        self.hearing_count += 1;
        match record.outcome {
            HearingOutcome::Heard => {
                self.current_stage = record.stage_after;
                self.status = LifecycleStatus::Active;
            }
            HearingOutcome::Adjourned => {
                self.status = LifecycleStatus::Adjourned;
            }
            HearingOutcome::Disposed => {
                self.current_stage = record.stage_after;
                self.status = LifecycleStatus::Disposed;
            }
        }
        self.history.push(record);
    }

    /// Mean inter-hearing gap in days, used by the "stuck" ripeness rule.
    /// Returns `None` when fewer than two hearings have occurred.
    pub fn mean_hearing_gap_days(&self) -> Option<f64> {
        let dates: Vec<NaiveDate> = self
            .history
            .iter()
            .filter(|r| matches!(r.outcome, HearingOutcome::Heard | HearingOutcome::Adjourned))
            .map(|r| r.date)
            .collect();
        if dates.len() < 2 {
            return None;
        }
        let mut total = 0i64;
        for w in dates.windows(2) {
            total += (w[1] - w[0]).num_days();
        }
        Some(total as f64 / (dates.len() - 1) as f64)
    }

    /// Readiness score in `[0, 1]` (§4.2).
    pub fn compute_readiness(&mut self, median_gap_days: f64) -> f64 {
        let hearing_term = clamp01(self.hearing_count as f64 / READINESS_HEARING_CAP);
        let gap_term = clamp01(READINESS_GAP_NORM / median_gap_days.max(1.0));
        let stage_term = if self.current_stage.is_advanced() { 1.0 } else { 0.0 };
        let score = READINESS_HEARING_WEIGHT * hearing_term
            + READINESS_GAP_WEIGHT * gap_term
            + READINESS_STAGE_WEIGHT * stage_term;
        self.readiness_score = score;
        score
    }

    /// Priority score in `[0, 1]` (§4.2). Requires `compute_readiness` to
    /// have been called first for the readiness term to be current.
    pub fn compute_priority(&mut self, weights: &PriorityWeights, today: NaiveDate) -> f64 {
        let age_term = clamp01(self.age_days(today) as f64 / 365.0);
        let urgency_term = if self.is_urgent { 1.0 } else { 0.5 };
        let adjournment_boost = match self.last_hearing_date {
            Some(last) => {
                let days_since = (today - last).num_days().max(0) as f64;
                (-days_since / 21.0).exp()
            }
            None => 0.0,
        };
        let score = weights.age_weight * age_term
            + weights.readiness_weight * self.readiness_score
            + weights.urgency_weight * urgency_term
            + weights.adjournment_weight * adjournment_boost;
        self.priority_score = score;
        score
    }

    /// Effective minimum gap for this case: the per-case override if set,
    /// else the day's default (§3, §9 "bypassing min_gap").
    pub fn effective_min_gap(&self, default_min_gap: u32) -> u32 {
        self.min_gap_override.unwrap_or(default_min_gap)
    }

    /// Whether the case may be scheduled today, ignoring ripeness (that's a
    /// separate filter stage, §4.7 step 3 vs step 4).
    pub fn is_ready_for_scheduling(&self, today: NaiveDate, default_min_gap: u32) -> bool {
        if self.is_disposed() {
            return false;
        }
        match self.last_hearing_date {
            None => true,
            Some(last) => {
                let gap = (today - last).num_days();
                gap >= self.effective_min_gap(default_min_gap) as i64
            }
        }
    }

    pub fn mark_scheduled(&mut self, today: NaiveDate) {
        self.status = LifecycleStatus::Scheduled;
        self.last_scheduled_date = Some(today);
    }

    pub fn mark_disposed(&mut self, today: NaiveDate) {
        self.status = LifecycleStatus::Disposed;
        self.current_stage = Stage::FinalDisposal;
        self.last_scheduled_date = Some(today);
    }

    /// Clears per-day overlay flags set by the override layer (§4.5, §4.7
    /// step 9). Intrinsic fields (stage, status, history) are untouched.
    pub fn clear_day_overlays(&mut self) {
        self.forced_ripe_today = false;
    }
}
