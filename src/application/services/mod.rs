//! Business logic services for the application layer.

pub mod link_service;
pub mod sequence_allocator;
pub mod settings_provider;

pub use link_service::{LinkService, ShortenedLink};
pub use sequence_allocator::SequenceAllocator;
pub use settings_provider::SettingsProvider;
