//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the durable link store.
///
/// Implementations must enforce uniqueness of `code`, and of `custom_alias`
/// when present, at the storage layer: the link service has no other guard
/// against duplicate codes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code or custom alias is taken.
    /// Returns [`AppError::System`] on database errors or timeout.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code, including disabled and expired ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::System`] on database errors or timeout.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds the newest live (enabled, unexpired) link for a normalized target.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::System`] on database errors or timeout.
    async fn find_live_by_target(&self, target: &str) -> Result<Option<Link>, AppError>;

    /// Sets the `disabled` flag. Returns `Ok(false)` if no link has this code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::System`] on database errors or timeout.
    async fn set_disabled(&self, code: &str, disabled: bool) -> Result<bool, AppError>;

    /// Physically deletes links whose expiry is at or before `now`.
    ///
    /// Returns the number of deleted rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::System`] on database errors or timeout.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Checks that the store answers queries.
    async fn health_check(&self) -> Result<(), AppError>;
}
