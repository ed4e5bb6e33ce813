//! The output of a single day's scheduling pass (§3, §4.7).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::case::CaseId;
use crate::domain::courtroom::CourtroomId;
use crate::domain::override_request::{Override, OverrideOutcome};

/// One case's position in a courtroom's cause list for the day, plus the
/// human-readable reason it landed there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEntry {
    pub sequence: usize,
    pub case_id: CaseId,
    pub explanation: String,
}

/// Per-day rejection counters (§4.7, §4.10).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RejectionCounters {
    pub unripe_filtered: u32,
    pub gap_blocked: u32,
    pub capacity_limited: u32,
    pub disposed_skipped: u32,
}

/// The result of [`crate::algorithm::schedule_day`] for one date: the cause
/// list per courtroom plus the audit trail of filters and overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingResult {
    pub date: NaiveDate,
    pub policy_name: String,
    pub by_courtroom: HashMap<CourtroomId, Vec<ScheduledEntry>>,
    pub overrides_applied: Vec<Override>,
    pub overrides_rejected: Vec<(Override, String)>,
    pub counters: RejectionCounters,
}

impl SchedulingResult {
    pub fn new(date: NaiveDate, policy_name: impl Into<String>) -> Self {
        SchedulingResult {
            date,
            policy_name: policy_name.into(),
            by_courtroom: HashMap::new(),
            overrides_applied: Vec::new(),
            overrides_rejected: Vec::new(),
            counters: RejectionCounters::default(),
        }
    }

    pub fn total_scheduled(&self) -> usize {
        self.by_courtroom.values().map(|v| v.len()).sum()
    }

    /// Records the disposition of a single override into the audit trail.
    pub fn record_override(&mut self, ov: Override, outcome: OverrideOutcome) {
        match outcome {
            OverrideOutcome::Applied => self.overrides_applied.push(ov),
            OverrideOutcome::Rejected { reason } => self.overrides_rejected.push((ov, reason)),
        }
    }

    /// All scheduled case ids across every courtroom, in no particular
    /// cross-courtroom order. Used by invariant checks (§8 "no double
    /// scheduling").
    pub fn all_scheduled_case_ids(&self) -> Vec<&CaseId> {
        self.by_courtroom
            .values()
            .flat_map(|v| v.iter().map(|e| &e.case_id))
            .collect()
    }
}
