//! Black-box integration tests driving the crate's public API end-to-end
//! against the literal scenarios this simulator is expected to reproduce.
//! Replaces the host project's spin-test WASM harness, which assumed an
//! HTTP surface this crate doesn't have.

use std::collections::HashMap;

use causelist_sim::adapters::{DefaultRipenessClassifier, LeastLoadedAllocator, SeededOutcomeSampler};
use causelist_sim::algorithm::{schedule_day, SchedulingOptions};
use causelist_sim::domain::case::{Case, CaseId, CaseType, HearingOutcome, HearingRecord, Stage};
use causelist_sim::domain::courtroom::{Courtroom, CourtroomId};
use causelist_sim::domain::metrics::gini_coefficient;
use causelist_sim::domain::override_request::{Override, OverrideKind, OverridePayload};
use causelist_sim::domain::params::{ParameterTables, StageDistribution};
use causelist_sim::policies::FifoPolicy;
use causelist_sim::ports::ripeness_classifier::{RipenessClassifier, RipenessThresholds};
use chrono::{NaiveDate, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ripe_case(id: &str, filed: NaiveDate) -> Case {
    Case::new(CaseId::from(id), CaseType::Contract, filed, Stage::Arguments)
}

/// Scenario 1: deterministic FIFO ordering. A (filed 2024-01-01) schedules
/// ahead of B (filed 2024-01-02) in a single capacity-1 courtroom.
#[test]
fn scenario_fifo_orders_by_filed_date_and_blocks_on_capacity() {
    let mut cases = HashMap::new();
    cases.insert(CaseId::from("A"), ripe_case("A", date(2024, 1, 1)));
    cases.insert(CaseId::from("B"), ripe_case("B", date(2024, 1, 2)));
    let mut courtrooms = HashMap::new();
    courtrooms.insert(CourtroomId::from("RM-1"), Courtroom::new(CourtroomId::from("RM-1"), 1));
    let order = vec![CourtroomId::from("RM-1")];
    let tables = ParameterTables::new();

    let result = schedule_day(
        &mut cases,
        &mut courtrooms,
        &order,
        date(2024, 2, 1),
        &[],
        &FifoPolicy,
        &DefaultRipenessClassifier::default(),
        &LeastLoadedAllocator::new(),
        &tables,
        &SchedulingOptions { min_gap_days: 0, preferred_case_type: None },
    );

    let room = &result.by_courtroom[&CourtroomId::from("RM-1")];
    assert_eq!(room.len(), 1);
    assert_eq!(room[0].case_id, CaseId::from("A"));
    assert_eq!(result.counters.capacity_limited, 1);
}

/// Scenario 2: gap enforcement. A case heard on 2024-03-01 under a 14-day
/// minimum gap is blocked on 2024-03-10 and eligible again on 2024-03-15.
#[test]
fn scenario_gap_enforcement_blocks_then_releases() {
    let mut c = ripe_case("C", date(2024, 1, 1));
    c.record_hearing(HearingRecord {
        date: date(2024, 3, 1),
        outcome: HearingOutcome::Heard,
        stage_before: Stage::Arguments,
        stage_after: Stage::Arguments,
        courtroom_id: CourtroomId::from("RM-1"),
    });

    let run_on = |today: NaiveDate, case: Case| {
        let mut cases = HashMap::new();
        cases.insert(CaseId::from("C"), case);
        let mut courtrooms = HashMap::new();
        courtrooms.insert(CourtroomId::from("RM-1"), Courtroom::new(CourtroomId::from("RM-1"), 10));
        let order = vec![CourtroomId::from("RM-1")];
        let tables = ParameterTables::new();
        schedule_day(
            &mut cases,
            &mut courtrooms,
            &order,
            today,
            &[],
            &FifoPolicy,
            &DefaultRipenessClassifier::default(),
            &LeastLoadedAllocator::new(),
            &tables,
            &SchedulingOptions { min_gap_days: 14, preferred_case_type: None },
        )
    };

    let blocked = run_on(date(2024, 3, 10), c.clone());
    assert_eq!(blocked.total_scheduled(), 0);
    assert_eq!(blocked.counters.gap_blocked, 1);

    let released = run_on(date(2024, 3, 15), c);
    assert_eq!(released.total_scheduled(), 1);
    assert_eq!(released.counters.gap_blocked, 0);
}

/// Scenario 3: adjournment sampling frequency. Over 10,000 independent
/// seeded draws, the measured adjournment frequency lands within ±0.01 of
/// the configured 0.38 probability.
#[test]
fn scenario_adjournment_frequency_matches_configured_probability() {
    let mut tables = ParameterTables::new();
    tables.insert_adjournment(Stage::Admission, CaseType::Contract, 0.38);
    tables.insert_transition(
        Stage::Admission,
        CaseType::Contract,
        StageDistribution::new(vec![(Stage::Admission, 1.0)]).unwrap(),
    );

    let sampler = SeededOutcomeSampler::new(42);
    let case = Case::new(CaseId::from("C1"), CaseType::Contract, date(2024, 1, 1), Stage::Admission);
    let room = CourtroomId::from("RM-1");

    let trials = 10_000u32;
    let mut adjourned = 0u32;
    for offset in 0..trials {
        let d = date(2024, 1, 1) + chrono::Duration::days(offset as i64);
        let outcome = sampler.sample_outcome(&case, d, &room, &tables);
        if matches!(outcome.outcome, HearingOutcome::Adjourned) {
            adjourned += 1;
        }
    }
    let frequency = adjourned as f64 / trials as f64;
    assert!((frequency - 0.38).abs() <= 0.01, "frequency was {frequency}");
}

/// Scenario 4: load balance. 400 ripe cases against five 100-capacity
/// courtrooms split evenly; the resulting per-courtroom load is perfectly
/// balanced (Gini = 0).
#[test]
fn scenario_load_balances_evenly_across_five_courtrooms() {
    let mut cases = HashMap::new();
    for i in 0..400 {
        cases.insert(CaseId::from(format!("C{i}").as_str()), ripe_case(&format!("C{i}"), date(2024, 1, 1)));
    }
    let mut courtrooms = HashMap::new();
    let mut order = Vec::new();
    for n in 1..=5 {
        let id = CourtroomId::from(format!("RM-{n}").as_str());
        courtrooms.insert(id.clone(), Courtroom::new(id.clone(), 100));
        order.push(id);
    }
    let tables = ParameterTables::new();

    let result = schedule_day(
        &mut cases,
        &mut courtrooms,
        &order,
        date(2024, 2, 1),
        &[],
        &FifoPolicy,
        &DefaultRipenessClassifier::default(),
        &LeastLoadedAllocator::new(),
        &tables,
        &SchedulingOptions { min_gap_days: 0, preferred_case_type: None },
    );

    let counts: Vec<u32> = order.iter().map(|id| result.by_courtroom[id].len() as u32).collect();
    assert_eq!(counts, vec![80, 80, 80, 80, 80]);
    assert!(gini_coefficient(&counts).abs() < 1e-9);
}

/// Scenario 5: override add + reorder. `add(W, position=0)` pulls a
/// gap-blocked case back into the candidate list, then `reorder(Z,
/// position=0)` moves it to the front; truncated to a 3-slot courtroom the
/// final cause list is `[Z, W, X]`.
#[test]
fn scenario_override_add_then_reorder_produces_documented_order() {
    let mut cases = HashMap::new();
    for id in ["X", "Y", "Z"] {
        cases.insert(CaseId::from(id), ripe_case(id, date(2024, 1, 1)));
    }
    let mut w = ripe_case("W", date(2024, 1, 1));
    w.record_hearing(HearingRecord {
        date: date(2024, 1, 31),
        outcome: HearingOutcome::Heard,
        stage_before: Stage::Arguments,
        stage_after: Stage::Arguments,
        courtroom_id: CourtroomId::from("RM-1"),
    });
    cases.insert(CaseId::from("W"), w);

    let mut courtrooms = HashMap::new();
    courtrooms.insert(CourtroomId::from("RM-1"), Courtroom::new(CourtroomId::from("RM-1"), 3));
    let order = vec![CourtroomId::from("RM-1")];
    let tables = ParameterTables::new();

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
        &FifoPolicy,
        &DefaultRipenessClassifier::default(),
        &LeastLoadedAllocator::new(),
        &tables,
        &SchedulingOptions { min_gap_days: 14, preferred_case_type: None },
    );

    let ids: Vec<&CaseId> = result.by_courtroom[&CourtroomId::from("RM-1")]
        .iter()
        .map(|e| &e.case_id)
        .collect();
    assert_eq!(ids, vec![&CaseId::from("Z"), &CaseId::from("W"), &CaseId::from("X")]);
    assert_eq!(result.overrides_applied.len(), 2);
}

/// Scenario 6: strict ripeness. A fresh admission-stage case with no
/// hearing purpose classifies ripe in non-strict mode, unknown (and
/// filtered) in strict mode.
#[test]
fn scenario_strict_ripeness_filters_what_non_strict_admits() {
    let case = Case::new(CaseId::from("D"), CaseType::Contract, date(2024, 1, 1), Stage::Notice);
    let today = date(2024, 6, 1);

    let non_strict = DefaultRipenessClassifier::default();
    assert!(non_strict.classify(&case, today).verdict.is_ripe());

    let mut strict_thresholds = RipenessThresholds::default();
    strict_thresholds.strict_mode = true;
    let strict = DefaultRipenessClassifier::new(strict_thresholds);
    assert!(!strict.classify(&case, today).verdict.is_ripe());

    let mut cases = HashMap::new();
    cases.insert(CaseId::from("D"), case);
    let mut courtrooms = HashMap::new();
    courtrooms.insert(CourtroomId::from("RM-1"), Courtroom::new(CourtroomId::from("RM-1"), 10));
    let order = vec![CourtroomId::from("RM-1")];
    let tables = ParameterTables::new();
    let options = SchedulingOptions { min_gap_days: 0, preferred_case_type: None };

    let result = schedule_day(
        &mut cases,
        &mut courtrooms,
        &order,
        today,
        &[],
        &FifoPolicy,
        &strict,
        &LeastLoadedAllocator::new(),
        &tables,
        &options,
    );
    assert_eq!(result.total_scheduled(), 0);
    assert_eq!(result.counters.unripe_filtered, 1);
}

/// Boundary: zero-capacity courtroom leaves every ripe candidate
/// capacity-limited, nothing scheduled.
#[test]
fn boundary_zero_capacity_capacity_limits_every_candidate() {
    let mut cases = HashMap::new();
    cases.insert(CaseId::from("A"), ripe_case("A", date(2024, 1, 1)));
    cases.insert(CaseId::from("B"), ripe_case("B", date(2024, 1, 1)));
    let mut courtrooms = HashMap::new();
    courtrooms.insert(CourtroomId::from("RM-1"), Courtroom::new(CourtroomId::from("RM-1"), 0));
    let order = vec![CourtroomId::from("RM-1")];
    let tables = ParameterTables::new();

    let result = schedule_day(
        &mut cases,
        &mut courtrooms,
        &order,
        date(2024, 2, 1),
        &[],
        &FifoPolicy,
        &DefaultRipenessClassifier::default(),
        &LeastLoadedAllocator::new(),
        &tables,
        &SchedulingOptions { min_gap_days: 0, preferred_case_type: None },
    );

    assert_eq!(result.total_scheduled(), 0);
    assert_eq!(result.counters.capacity_limited, 2);
}

/// Boundary: a fully disposed pool short-circuits to an empty result with
/// every filter counter at zero — there was nothing left to filter.
#[test]
fn boundary_all_disposed_cases_short_circuit_with_no_filters_triggered() {
    let mut cases = HashMap::new();
    let mut disposed = ripe_case("A", date(2024, 1, 1));
    disposed.mark_disposed(date(2024, 1, 15));
    cases.insert(CaseId::from("A"), disposed);
    let mut courtrooms = HashMap::new();
    courtrooms.insert(CourtroomId::from("RM-1"), Courtroom::new(CourtroomId::from("RM-1"), 10));
    let order = vec![CourtroomId::from("RM-1")];
    let tables = ParameterTables::new();

    let result = schedule_day(
        &mut cases,
        &mut courtrooms,
        &order,
        date(2024, 2, 1),
        &[],
        &FifoPolicy,
        &DefaultRipenessClassifier::default(),
        &LeastLoadedAllocator::new(),
        &tables,
        &SchedulingOptions { min_gap_days: 0, preferred_case_type: None },
    );

    assert_eq!(result.total_scheduled(), 0);
    assert_eq!(result.counters.unripe_filtered, 0);
    assert_eq!(result.counters.gap_blocked, 0);
    assert_eq!(result.counters.capacity_limited, 0);
    assert_eq!(result.counters.disposed_skipped, 1);
}
