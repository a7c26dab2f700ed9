use thiserror::Error;

use crate::data::store::StoreError;

/// Errors the core surfaces to callers. Lookups that find nothing are not
/// errors; they are represented as `Option::None` at the call site.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
