use thiserror::Error;

use crate::supabase::ApiStatusError;

/// Failure modes shared by every persistence backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A conditional write found the record changed since it was read.
    #[error("Record was modified concurrently")]
    VersionConflict,

    #[error("Record not found")]
    NotFound,

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<ApiStatusError>() {
            Some(api) if api.status == 409 => StoreError::VersionConflict,
            Some(api) if api.status == 404 => StoreError::NotFound,
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(format!("Malformed row: {}", err))
    }
}
