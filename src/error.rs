//! Crate-wide error type.
//!
//! Most recoverable conditions described in the scheduling pipeline (a missing
//! parameter, a rejected override, a courtroom at capacity) are **not**
//! errors: they are folded into the counters on [`crate::domain::metrics`] and
//! [`crate::domain::scheduling_result::SchedulingResult`]. `RunError` exists
//! for the handful of conditions that must abort a run or a day outright:
//! bad configuration, a violated invariant, and TOML decode failures.

use thiserror::Error;
use tracing::error;

/// Errors that can surface from constructing or driving a simulation run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Simulation configuration was rejected at construction time: an empty
    /// courtroom set, an unknown policy name, a negative capacity, weights
    /// that don't describe a distribution, and so on.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A parameter table lookup failed and no documented default exists for
    /// the shape of the request. Distinct from the `(stage, type)` miss path
    /// in [`crate::domain::params`], which recovers silently and only bumps a
    /// counter.
    #[error("missing required parameter: {0}")]
    ParameterMiss(String),

    /// An invariant the scheduling algorithm depends on was violated, e.g. a
    /// disposed case reached the allocator. Fatal in strict/test mode.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An override failed validation. Surfaced only when a caller asks the
    /// override layer to apply a single override outside of a full day;
    /// `schedule_day` itself never returns this, it records rejections in
    /// the `SchedulingResult` instead.
    #[error("override rejected: {0}")]
    OverrideRejected(String),

    /// No courtroom had remaining capacity for a case that otherwise needed
    /// one, surfaced outside the allocator's own per-day bookkeeping.
    #[error("capacity limited: {0}")]
    CapacityLimited(String),

    /// The run was cancelled before completing its horizon.
    #[error("run cancelled after day {days_completed}")]
    Cancelled { days_completed: u32 },

    /// A TOML parameter or configuration document failed to parse.
    #[error("failed to parse TOML: {0}")]
    TomlDecode(#[from] toml::de::Error),
}

/// Result type alias for simulation operations.
pub type RunResult<T> = Result<T, RunError>;

/// Checks one of the pipeline's hard invariants (§4.11, §7): a disposed case
/// reaching the allocator or sampler, a terminal-stage case used as a
/// transition source, a probability table deviating from 1.0 beyond
/// tolerance. In debug/test builds this is fatal (an assertion hook, so a
/// violated invariant fails the test that exercised it); in release builds
/// it's logged and the caller gets a [`RunError::InvariantViolation`] back
/// to skip the offending case rather than abort the whole run.
pub fn check_invariant(condition: bool, message: impl Into<String>) -> RunResult<()> {
    if condition {
        return Ok(());
    }
    let message = message.into();
    if cfg!(debug_assertions) {
        panic!("invariant violated: {message}");
    }
    error!(%message, "invariant violated");
    Err(RunError::InvariantViolation(message))
}
