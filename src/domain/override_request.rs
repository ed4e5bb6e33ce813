//! Human overrides to a day's candidate list (§3, §4.5).
//!
//! Overrides are plain values; the core never mutates them. Validation and
//! application both live in [`crate::algorithm`], which consumes a slice of
//! overrides and produces an [`OverrideOutcome`] per override plus the
//! post-application candidate list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::case::CaseId;
use crate::domain::courtroom::CourtroomId;

/// The six override kinds (§3). Each carries a type-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverrideKind {
    Add,
    Remove,
    Reorder,
    Priority,
    Ripeness,
    Capacity,
}

/// Type-specific override payloads, grounded in the teacher's tagged
/// `RuleAction` enum shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverridePayload {
    Add { case_id: CaseId, position: usize },
    Remove { case_id: CaseId },
    Reorder { case_id: CaseId, position: usize },
    Priority { case_id: CaseId, new_priority: f64 },
    Ripeness { case_id: CaseId },
    Capacity { courtroom_id: CourtroomId, new_capacity: u32 },
}

/// A single override request for a given simulated day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Override {
    pub id: String,
    pub kind: OverrideKind,
    pub actor_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: OverridePayload,
    pub reason: String,
}

/// Result of attempting to apply a single override: either it was applied,
/// or it was rejected with a reason (§4.5 "rejections list").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OverrideOutcome {
    Applied,
    Rejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn payload_tag_matches_kind_by_convention() {
        let ov = Override {
            id: "ov-1".to_string(),
            kind: OverrideKind::Add,
            actor_id: "clerk-1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            payload: OverridePayload::Add {
                case_id: CaseId::from("C1"),
                position: 0,
            },
            reason: "judge directive".to_string(),
        };
        assert!(matches!(ov.kind, OverrideKind::Add));
        assert!(matches!(ov.payload, OverridePayload::Add { .. }));
    }
}
