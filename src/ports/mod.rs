//! Port traits: the pluggable interfaces the scheduling pipeline is built
//! against. Concrete implementations live in `adapters` and `policies`.
//!
//! Modeled on the host project's `DeadlineEngine`/`RulesEngine` trait shape:
//! a small `trait` capturing one responsibility, implemented by one or more
//! adapter structs and selected at configuration time.

pub mod courtroom_allocator;
pub mod outcome_sampler;
pub mod priority_policy;
pub mod ripeness_classifier;

pub use courtroom_allocator::CourtroomAllocator;
pub use outcome_sampler::OutcomeSampler;
pub use priority_policy::{CaseFeatures, PolicyContext, PriorityPolicy};
pub use ripeness_classifier::{RipenessClassifier, RipenessThresholds};
