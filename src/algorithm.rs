//! The per-day scheduling orchestrator (§4.7): composes the ripeness
//! classifier, priority policy, override layer, and courtroom allocator into
//! a single [`SchedulingResult`].

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::domain::case::{Case, CaseId, CaseType};
use crate::domain::courtroom::{Courtroom, CourtroomId};
use crate::domain::override_request::{Override, OverrideKind, OverrideOutcome, OverridePayload};
use crate::domain::params::ParameterTables;
use crate::domain::scheduling_result::{ScheduledEntry, SchedulingResult};
use crate::ports::courtroom_allocator::CourtroomAllocator;
use crate::ports::priority_policy::{PolicyContext, PriorityPolicy};
use crate::ports::ripeness_classifier::RipenessClassifier;

/// Day-scoped knobs the algorithm needs beyond the pipeline's fixed steps.
#[derive(Debug, Clone)]
pub struct SchedulingOptions {
    pub min_gap_days: u32,
    pub preferred_case_type: Option<CaseType>,
}

impl Default for SchedulingOptions {
    fn default() -> Self {
        SchedulingOptions {
            min_gap_days: 14,
            preferred_case_type: None,
        }
    }
}

/// Runs the nine-step pipeline of §4.7 for a single date, mutating `cases`
/// and `courtrooms` in place and returning the day's [`SchedulingResult`].
#[instrument(skip(cases, courtrooms, overrides, policy, classifier, allocator, tables), fields(date = %today, candidates = tracing::field::Empty, scheduled = tracing::field::Empty))]
pub fn schedule_day(
    cases: &mut HashMap<CaseId, Case>,
    courtrooms: &mut HashMap<CourtroomId, Courtroom>,
    courtroom_order: &[CourtroomId],
    today: NaiveDate,
    overrides: &[Override],
    policy: &dyn PriorityPolicy,
    classifier: &dyn RipenessClassifier,
    allocator: &dyn CourtroomAllocator,
    tables: &ParameterTables,
    options: &SchedulingOptions,
) -> SchedulingResult {
    let mut result = SchedulingResult::new(today, policy.name());

    // Step 1: exclude disposed cases — they never leave `cases`.
    let candidate_ids: Vec<CaseId> = cases
        .values()
        .filter(|c| !c.is_disposed())
        .map(|c| c.id.clone())
        .collect();
    result.counters.disposed_skipped = (cases.len() - candidate_ids.len()) as u32;

    let mut working: HashMap<CaseId, Case> = HashMap::new();
    for id in &candidate_ids {
        if let Some(case) = cases.remove(id) {
            working.insert(id.clone(), case);
        }
    }

    // Step 2: age advances implicitly (age_days is derived); compute readiness.
    for case in working.values_mut() {
        let median_gap = tables.type_stats(&case.case_type).median_inter_hearing_gap_days;
        case.compute_readiness(median_gap);
    }

    // Step 3: ripeness filter.
    let mut eligible_ids: Vec<CaseId> = Vec::new();
    for (id, case) in working.iter() {
        let verdict = classifier.classify(case, today).verdict;
        if verdict.is_ripe() {
            eligible_ids.push(id.clone());
        } else {
            result.counters.unripe_filtered += 1;
        }
    }

    // Step 4: eligibility (gap) filter. Drains candidates out of `working`
    // by value so there's no separate by-id lookup afterward to panic on.
    let mut eligible: Vec<Case> = Vec::new();
    for id in eligible_ids {
        if let Some(case) = working.remove(&id) {
            if case.is_ready_for_scheduling(today, options.min_gap_days) {
                eligible.push(case);
            } else {
                result.counters.gap_blocked += 1;
                working.insert(id, case);
            }
        }
    }

    // Step 5: policy ordering.
    let total_capacity: u32 = courtroom_order
        .iter()
        .filter_map(|id| courtrooms.get(id))
        .map(|room| room.effective_capacity(today))
        .sum();
    let context = PolicyContext {
        total_capacity,
        min_gap_days: options.min_gap_days,
        preferred_case_type: options.preferred_case_type.clone(),
    };
    policy.prioritize(&mut eligible, today, &context);

    // Step 6: apply overrides in the fixed order add -> remove -> priority
    // -> ripeness -> capacity -> reorder (§4.5).
    apply_overrides(&mut eligible, &mut working, courtrooms, overrides, today, &mut result);

    // Defense in depth before allocation (§4.11): steps 1-4 already exclude
    // disposed cases and the override layer rejects adding one back in, so
    // this only fires if that guarantee is ever broken elsewhere.
    eligible.retain(|case| {
        crate::error::check_invariant(!case.is_disposed(), format!("disposed case {} reached the allocator", case.id)).is_ok()
    });

    // Step 7: allocate.
    let outcome = allocator.allocate(eligible, courtrooms, courtroom_order, today);
    result.counters.capacity_limited = outcome.capacity_limited.len() as u32;

    // Step 8: mark scheduled and build the cause list per courtroom.
    let mut allocated: Vec<Case> = Vec::new();
    for (room_id, room_cases) in outcome.by_courtroom {
        let mut entries = Vec::with_capacity(room_cases.len());
        for (sequence, mut case) in room_cases.into_iter().enumerate() {
            case.mark_scheduled(today);
            let explanation = explain(&case, &room_id, today);
            entries.push(ScheduledEntry {
                sequence,
                case_id: case.id.clone(),
                explanation,
            });
            allocated.push(case);
        }
        result.by_courtroom.insert(room_id, entries);
    }

    tracing::Span::current().record("candidates", candidate_ids.len());
    tracing::Span::current().record("scheduled", result.total_scheduled());
    debug!(
        unripe_filtered = result.counters.unripe_filtered,
        gap_blocked = result.counters.gap_blocked,
        capacity_limited = result.counters.capacity_limited,
        "day scheduling pipeline complete"
    );

    // Step 9: clear per-day overlays, then return every touched case to the
    // pool (disposed cases were never removed from it).
    for mut case in allocated {
        case.clear_day_overlays();
        cases.insert(case.id.clone(), case);
    }
    for mut case in outcome.capacity_limited {
        case.clear_day_overlays();
        cases.insert(case.id.clone(), case);
    }
    for (id, mut case) in working {
        case.clear_day_overlays();
        cases.insert(id, case);
    }

    result
}

fn explain(case: &Case, room_id: &CourtroomId, today: NaiveDate) -> String {
    format!(
        "{} case at stage {:?}{} scheduled in {} on {} (readiness {:.2})",
        case.case_type,
        case.current_stage,
        if case.is_urgent { ", urgent" } else { "" },
        room_id,
        today,
        case.readiness_score
    )
}

fn apply_overrides(
    eligible: &mut Vec<Case>,
    working: &mut HashMap<CaseId, Case>,
    courtrooms: &mut HashMap<CourtroomId, Courtroom>,
    overrides: &[Override],
    today: NaiveDate,
    result: &mut SchedulingResult,
) {
    let adds: Vec<&Override> = overrides.iter().filter(|o| o.kind == OverrideKind::Add).collect();
    let removes: Vec<&Override> = overrides.iter().filter(|o| o.kind == OverrideKind::Remove).collect();
    let priorities: Vec<&Override> = overrides.iter().filter(|o| o.kind == OverrideKind::Priority).collect();
    let ripeness_ovs: Vec<&Override> = overrides.iter().filter(|o| o.kind == OverrideKind::Ripeness).collect();
    let capacities: Vec<&Override> = overrides.iter().filter(|o| o.kind == OverrideKind::Capacity).collect();
    let reorders: Vec<&Override> = overrides.iter().filter(|o| o.kind == OverrideKind::Reorder).collect();

    for ov in adds {
        let OverridePayload::Add { case_id, position } = &ov.payload else {
            reject(result, ov, "add override missing add payload");
            continue;
        };
        if eligible.iter().any(|c| &c.id == case_id) {
            reject(result, ov, "case already in candidate list");
            continue;
        }
        match working.remove(case_id) {
            Some(case) if !case.is_disposed() => {
                let pos = (*position).min(eligible.len());
                eligible.insert(pos, case);
                apply(result, ov);
            }
            Some(case) => {
                working.insert(case_id.clone(), case);
                reject(result, ov, "case is disposed");
            }
            None => reject(result, ov, "case not found"),
        }
    }

    for ov in removes {
        let OverridePayload::Remove { case_id } = &ov.payload else {
            reject(result, ov, "remove override missing remove payload");
            continue;
        };
        match eligible.iter().position(|c| &c.id == case_id) {
            Some(idx) => {
                let case = eligible.remove(idx);
                working.insert(case_id.clone(), case);
                apply(result, ov);
            }
            None => reject(result, ov, "case not present in candidate list"),
        }
    }

    // Day-scoped only: a priority override reorders today's candidate list
    // without ever writing to `Case::priority_score`, so nothing leaks onto
    // the persistent case for tomorrow's run of this same function (§4.5,
    // §9 "overlays never persist onto the case").
    let mut priority_overrides: HashMap<CaseId, f64> = HashMap::new();
    for ov in priorities {
        let OverridePayload::Priority { case_id, new_priority } = &ov.payload else {
            reject(result, ov, "priority override missing priority payload");
            continue;
        };
        if !(0.0..=1.0).contains(new_priority) {
            reject(result, ov, "new priority out of range [0,1]");
            continue;
        }
        if eligible.iter().any(|c| &c.id == case_id) {
            priority_overrides.insert(case_id.clone(), *new_priority);
            apply(result, ov);
        } else {
            reject(result, ov, "case not present in candidate list");
        }
    }
    // Re-sort by priority after priority overrides, before reorder overrides
    // (§4.5): reorder must act on the post-priority-sort list, not be
    // clobbered by it.
    eligible.sort_by(|a, b| {
        let pa = priority_overrides.get(&a.id).copied().unwrap_or(a.priority_score);
        let pb = priority_overrides.get(&b.id).copied().unwrap_or(b.priority_score);
        pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
    });

    for ov in ripeness_ovs {
        let OverridePayload::Ripeness { case_id } = &ov.payload else {
            reject(result, ov, "ripeness override missing ripeness payload");
            continue;
        };
        if eligible.iter().any(|c| &c.id == case_id) {
            if let Some(case) = eligible.iter_mut().find(|c| &c.id == case_id) {
                case.forced_ripe_today = true;
            }
            apply(result, ov);
            continue;
        }
        match working.remove(case_id) {
            Some(mut case) if !case.is_disposed() => {
                case.forced_ripe_today = true;
                eligible.push(case);
                apply(result, ov);
            }
            Some(case) => {
                working.insert(case_id.clone(), case);
                reject(result, ov, "case is disposed");
            }
            None => reject(result, ov, "case not found"),
        }
    }

    for ov in capacities {
        let OverridePayload::Capacity { courtroom_id, new_capacity } = &ov.payload else {
            reject(result, ov, "capacity override missing capacity payload");
            continue;
        };
        match courtrooms.get_mut(courtroom_id) {
            Some(room) => {
                room.set_capacity_override(today, *new_capacity);
                apply(result, ov);
            }
            None => reject(result, ov, "courtroom not found"),
        }
    }

    for ov in reorders {
        let OverridePayload::Reorder { case_id, position } = &ov.payload else {
            reject(result, ov, "reorder override missing reorder payload");
            continue;
        };
        match eligible.iter().position(|c| &c.id == case_id) {
            Some(idx) => {
                let case = eligible.remove(idx);
                let pos = (*position).min(eligible.len());
                eligible.insert(pos, case);
                apply(result, ov);
            }
            None => {
                warn!(case_id = %case_id, "reorder override target not in candidate list");
                reject(result, ov, "case not present in candidate list");
            }
        }
    }
}

fn apply(result: &mut SchedulingResult, ov: &Override) {
    result.record_override(ov.clone(), OverrideOutcome::Applied);
}

fn reject(result: &mut SchedulingResult, ov: &Override, reason: &str) {
    result.record_override(ov.clone(), OverrideOutcome::Rejected { reason: reason.to_string() });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{DefaultRipenessClassifier, LeastLoadedAllocator};
    use crate::domain::case::Stage;
    use crate::policies::FifoPolicy;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn case(id: &str, filed: NaiveDate) -> Case {
        Case::new(CaseId::from(id), CaseType::Contract, filed, Stage::Arguments)
    }

    fn setup() -> (
        HashMap<CaseId, Case>,
        HashMap<CourtroomId, Courtroom>,
        Vec<CourtroomId>,
        ParameterTables,
    ) {
        let mut cases = HashMap::new();
        cases.insert(CaseId::from("A"), case("A", date(2024, 1, 1)));
        cases.insert(CaseId::from("B"), case("B", date(2024, 1, 2)));
        let mut courtrooms = HashMap::new();
        courtrooms.insert(CourtroomId::from("RM-1"), Courtroom::new(CourtroomId::from("RM-1"), 1));
        let order = vec![CourtroomId::from("RM-1")];
        (cases, courtrooms, order, ParameterTables::new())
    }

    #[test]
    fn fifo_scenario_schedules_a_before_b_and_marks_b_capacity_limited() {
        let (mut cases, mut courtrooms, order, tables) = setup();
        let policy = FifoPolicy;
        let classifier = DefaultRipenessClassifier::default();
        let allocator = LeastLoadedAllocator::new();
        let options = SchedulingOptions { min_gap_days: 0, preferred_case_type: None };

        let result = schedule_day(
            &mut cases,
            &mut courtrooms,
            &order,
            date(2024, 2, 1),
            &[],
            &policy,
            &classifier,
            &allocator,
            &tables,
            &options,
        );

        let room = result.by_courtroom.get(&CourtroomId::from("RM-1")).unwrap();
        assert_eq!(room.len(), 1);
        assert_eq!(room[0].case_id, CaseId::from("A"));
        assert_eq!(result.counters.capacity_limited, 1);
        // both cases must be back in the pool afterward
        assert_eq!(cases.len(), 2);
    }

    #[test]
    fn override_add_then_reorder_produces_documented_order() {
        let mut cases = HashMap::new();
        for id in ["X", "Y", "Z"] {
            cases.insert(CaseId::from(id), case(id, date(2024, 1, 1)));
        }
        // W is present in the pool but gap-blocked (hearing yesterday with a
        // 14-day default gap), so it starts outside the eligible set and the
        // `add` override is what actually pulls it back in.
        let mut w_case = case("W", date(2024, 1, 1));
        w_case.record_hearing(crate::domain::case::HearingRecord {
            date: date(2024, 1, 31),
            outcome: crate::domain::case::HearingOutcome::Heard,
            stage_before: Stage::Arguments,
            stage_after: Stage::Arguments,
            courtroom_id: CourtroomId::from("RM-1"),
        });
        cases.insert(CaseId::from("W"), w_case);

        let mut courtrooms = HashMap::new();
        courtrooms.insert(CourtroomId::from("RM-1"), Courtroom::new(CourtroomId::from("RM-1"), 3));
        let order = vec![CourtroomId::from("RM-1")];
        let tables = ParameterTables::new();
        let policy = FifoPolicy;
        let classifier = DefaultRipenessClassifier::default();
        let allocator = LeastLoadedAllocator::new();
        let options = SchedulingOptions { min_gap_days: 14, preferred_case_type: None };

        let overrides = vec![
            Override {
                id: "ov-add".to_string(),
                kind: OverrideKind::Add,
                actor_id: "clerk".to_string(),
                timestamp: Utc::now(),
                payload: OverridePayload::Add { case_id: CaseId::from("W"), position: 0 },
                reason: "judge directive".to_string(),
            },
            Override {
                id: "ov-reorder".to_string(),
                kind: OverrideKind::Reorder,
                actor_id: "clerk".to_string(),
                timestamp: Utc::now(),
                payload: OverridePayload::Reorder { case_id: CaseId::from("Z"), position: 0 },
                reason: "urgent matter".to_string(),
            },
        ];

        let result = schedule_day(
            &mut cases,
            &mut courtrooms,
            &order,
            date(2024, 2, 1),
            &overrides,
            &policy,
            &classifier,
            &allocator,
            &tables,
            &options,
        );

        let room = result.by_courtroom.get(&CourtroomId::from("RM-1")).unwrap();
        let ids: Vec<&CaseId> = room.iter().map(|e| &e.case_id).collect();
        assert_eq!(ids, vec![&CaseId::from("Z"), &CaseId::from("W"), &CaseId::from("X")]);
        assert_eq!(result.overrides_applied.len(), 2);
    }
}
