//! Error types for storage operations.

use recurve_codec::CodecError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The facade was constructed without any configuration.
    #[error("expected options to be defined")]
    MissingConfig,

    /// An operation needs a layer but neither cache nor native backend is active.
    #[error("{operation}: either cache or storage provider should exist")]
    NoActiveLayer {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// A native backend or cache operation failed.
    #[error("backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },

    /// Encoding a value failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl StorageError {
    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by how the facade was configured.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::MissingConfig | Self::NoActiveLayer { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_classified() {
        assert!(StorageError::MissingConfig.is_config_error());
        assert!(StorageError::NoActiveLayer { operation: "exists" }.is_config_error());
        assert!(!StorageError::backend("quota exceeded").is_config_error());
    }

    #[test]
    fn no_active_layer_names_operation() {
        let err = StorageError::NoActiveLayer { operation: "for_each" };
        assert_eq!(
            err.to_string(),
            "for_each: either cache or storage provider should exist"
        );
    }
}
