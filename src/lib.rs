//! causelist-sim - a deterministic court case scheduling simulator.
//!
//! Given a starting population of civil cases, a courtroom set, and a
//! pluggable priority policy, [`engine::SimulationEngine`] advances a
//! day-by-day simulation: filtering cases by ripeness and minimum gap,
//! ordering and allocating the eligible set into courtrooms, sampling
//! hearing outcomes from seeded sub-streams, and accumulating the metrics a
//! court administrator would use to judge throughput and fairness.
//!
//! ## Layout
//! - [`domain`] — case, courtroom, parameter table, and metrics entities.
//! - [`ports`] — the pluggable seams: priority policy, ripeness classifier,
//!   courtroom allocator, outcome sampler.
//! - [`adapters`] — the default implementations of those ports.
//! - [`policies`] — the bundled [`ports::priority_policy::PriorityPolicy`]
//!   implementations (fifo, age, composite, external-scorer).
//! - [`algorithm`] — the single-day scheduling pipeline.
//! - [`engine`] — the day-loop driver tying all of the above together.
//! - [`config`] — layered TOML configuration.
//! - [`calendar`] — the working-day predicate.
//! - [`error`] — the crate's error type.

pub mod adapters;
pub mod algorithm;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod policies;
pub mod ports;

pub use domain::case::{Case, CaseId, CaseType, Stage};
pub use domain::courtroom::{Courtroom, CourtroomId};
pub use domain::metrics::RunSummary;
pub use engine::{RunOutcome, SimulationEngine};
pub use error::{RunError, RunResult};
