//! Core error types.

use crate::metadata::MetadataKind;
use thiserror::Error;

/// Metadata store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The store refused to create an object.
    #[error("cannot create {kind}: {reason}")]
    CreateFailed {
        /// Kind of object requested.
        kind: MetadataKind,
        /// Why creation failed.
        reason: String,
    },

    /// Assembly not found.
    #[error("assembly not found: {0}")]
    NotFound(String),

    /// Invalid data format.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
