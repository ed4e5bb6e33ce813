//! Concrete adapters implementing the port traits in `ports`.

pub mod default_allocator;
pub mod ripeness;
pub mod seeded_sampler;
pub mod toml_params;

pub use default_allocator::LeastLoadedAllocator;
pub use ripeness::DefaultRipenessClassifier;
pub use seeded_sampler::SeededOutcomeSampler;
