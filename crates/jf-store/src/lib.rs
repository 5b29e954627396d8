//! # jf-store — persistence contracts and the in-memory engine
//!
//! The services in `jf-engine` are written against the repository traits
//! in [`repo`]; [`memory::MemoryStore`] implements them with the same
//! row-level primitives a relational store would provide: uniqueness-
//! constrained inserts, optimistic version CAS, and a pessimistic row
//! lock that blocks competing writers.

pub mod error;
pub mod memory;
pub mod repo;
pub mod seed;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repo::{ContributionRepository, JackpotRepository, LockedJackpot, RewardRepository};
