//! Repository trait for durable monotonic counters.

use crate::error::AppError;
use async_trait::async_trait;

/// Atomic named counters.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSequenceRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Atomically increments the counter `name` by one and returns the new value.
    ///
    /// A missing counter is created, so the first call returns `1`. Concurrent
    /// callers, in this process or others, never observe the same value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::System`] on database errors or timeout.
    async fn increment(&self, name: &str) -> Result<u64, AppError>;
}
