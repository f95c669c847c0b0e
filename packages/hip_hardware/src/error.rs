use std::result;

use thiserror::Error;

use crate::{RuntimeOperation, RuntimeStatus};

/// Errors that can occur when building a hardware descriptor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A call into the HIP runtime failed.
    ///
    /// This is not recoverable locally. Typical causes are an invalid device index, no active
    /// device context or a runtime that does not support the query.
    #[error("HIP runtime call {operation} failed: {status}")]
    RuntimeQuery {
        /// The runtime call that failed.
        operation: RuntimeOperation,

        /// The status code the runtime returned.
        status: RuntimeStatus,
    },

    /// A name did not fit into the fixed-capacity buffer used by the device property block.
    #[error("'{value}' does not fit into a {capacity}-byte device property name buffer")]
    NameTooLong {
        /// The rejected value.
        value: String,

        /// Capacity of the buffer in bytes, including the terminating NUL.
        capacity: usize,
    },
}

impl Error {
    pub(crate) const fn runtime(operation: RuntimeOperation, status: RuntimeStatus) -> Self {
        Self::RuntimeQuery { operation, status }
    }

    /// The runtime status code carried by this error, if it originates from a runtime call.
    #[must_use]
    pub fn runtime_status(&self) -> Option<RuntimeStatus> {
        match self {
            Self::RuntimeQuery { status, .. } => Some(*status),
            Self::NameTooLong { .. } => None,
        }
    }
}

/// A specialized `Result` type for hardware queries, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = result::Result<T, Error>;
