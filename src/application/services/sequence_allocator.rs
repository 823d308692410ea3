//! Unique integer allocation for generated codes.

use std::sync::Arc;

use crate::domain::repositories::SequenceRepository;
use crate::error::AppError;

/// Name of the durable counter backing generated codes.
pub const URL_SEQUENCE: &str = "url";

/// Hands out unique, strictly increasing integers.
///
/// All serialization is delegated to the store's atomic increment, so any
/// number of allocators, in one process or many, share one sequence.
pub struct SequenceAllocator<S: SequenceRepository + ?Sized> {
    repository: Arc<S>,
}

impl<S: SequenceRepository + ?Sized> SequenceAllocator<S> {
    pub fn new(repository: Arc<S>) -> Self {
        Self { repository }
    }

    /// Returns the next value of the `url` counter. The first value is 1.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Sequence`] if the store fails or times out.
    /// The call is not retried.
    pub async fn next(&self) -> Result<u64, AppError> {
        self.repository
            .increment(URL_SEQUENCE)
            .await
            .map_err(|e| match e {
                AppError::Sequence(reason) | AppError::System(reason) => {
                    AppError::Sequence(reason)
                }
                other => AppError::Sequence(other.to_string()),
            })
    }
}
