//! Domain layer: the entities and value types the scheduling pipeline
//! operates on. Nothing in this module talks to an RNG, a clock source, or
//! an external format — those live in `ports`/`adapters`.

pub mod case;
pub mod courtroom;
pub mod metrics;
pub mod override_request;
pub mod params;
pub mod scheduling_result;

pub use case::{
    Case, CaseId, CaseType, HearingOutcome, HearingRecord, LifecycleStatus, PriorityWeights,
    RipenessState, RipenessVerdict, Stage,
};
pub use courtroom::{Courtroom, CourtroomId};
pub use metrics::{gini_coefficient, DayMetrics, EventLog, MetricsAccumulator, RunSummary, SimEvent};
pub use override_request::{Override, OverrideKind, OverrideOutcome, OverridePayload};
pub use params::{DurationPercentile, ParameterTables, StageDistribution, TypeStats};
pub use scheduling_result::{RejectionCounters, ScheduledEntry, SchedulingResult};
