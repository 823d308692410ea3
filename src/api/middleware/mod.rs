//! HTTP middleware for request processing.
//!
//! Provides policy loading and observability middleware.

pub mod settings;
pub mod tracing;
