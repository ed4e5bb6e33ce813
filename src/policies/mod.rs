//! Concrete [`crate::ports::PriorityPolicy`] implementations (§4.4).

pub mod age;
pub mod composite;
pub mod external;
pub mod fifo;

pub use age::AgePolicy;
pub use composite::CompositePolicy;
pub use external::{ExternalScorerPolicy, ScorerFn};
pub use fifo::FifoPolicy;
