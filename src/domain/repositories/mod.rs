//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the durable store. PostgreSQL implementations live
//! in `crate::infrastructure::persistence`; mock implementations are
//! generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage and lookups
//! - [`SequenceRepository`] - Atomic counters for code allocation
//! - [`SettingsRepository`] - The policy row

pub mod link_repository;
pub mod sequence_repository;
pub mod settings_repository;

pub use link_repository::LinkRepository;
pub use sequence_repository::SequenceRepository;
pub use settings_repository::SettingsRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use sequence_repository::MockSequenceRepository;
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
