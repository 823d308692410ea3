//! Core business entities.
//!
//! - [`Link`] / [`NewLink`] - a stored short link and its creation input
//! - [`Policy`] - expiry and cache lifetime settings, with its storage schema

pub mod link;
pub mod policy;

pub use link::{Link, NewLink};
pub use policy::{DEFAULT_CACHE_TTL, POLICY_FIELDS, Policy, PolicyDecodeError, PolicyField};
