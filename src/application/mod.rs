//! Application layer services implementing the shortening core.
//!
//! Services consume repository and cache traits and are handed their
//! dependencies explicitly; HTTP handlers and the admin CLI call into them.
//!
//! # Available Services
//!
//! - [`services::LinkService`] - Shorten and resolve with cache-aside
//! - [`services::SequenceAllocator`] - Unique integers for generated codes
//! - [`services::SettingsProvider`] - The current TTL policy

pub mod services;
