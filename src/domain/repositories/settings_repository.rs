//! Repository trait for the durable policy row.

use crate::domain::entities::Policy;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage of the single policy row.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSettingsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Loads the policy. Returns the zero policy if no row exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::System`] on database errors or timeout.
    async fn load_policy(&self) -> Result<Policy, AppError>;

    /// Creates or replaces the policy row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::System`] on database errors or timeout.
    async fn save_policy(&self, policy: Policy) -> Result<(), AppError>;
}
