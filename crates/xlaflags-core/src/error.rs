//! Error types for option resolution.
//!
//! Every failure is a validation failure on caller-supplied input, so none
//! of these are retryable and none carry a partially built mapping.

use thiserror::Error;

use crate::tpu::TPU_VERSIONS;

/// The instance type does not describe a TPU.
///
/// Kept as its own type so callers can tell "not a TPU at all" apart from
/// the other resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid TPU instance: {instance_type}")]
pub struct NotTpuError {
    /// The offending input, verbatim.
    pub instance_type: String,
}

impl NotTpuError {
    pub fn new(instance_type: impl Into<String>) -> Self {
        Self {
            instance_type: instance_type.into(),
        }
    }
}

/// Errors that can occur while resolving XLA options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// Options are only known for the `tpu` backend.
    #[error("Unsupported backend '{0}': only 'tpu' is supported")]
    UnsupportedBackend(String),

    /// The instance type is not a TPU descriptor.
    #[error(transparent)]
    NotTpu(#[from] NotTpuError),

    /// The descriptor is well formed but names an unknown version.
    #[error("Unknown TPU version {version}. Expected one of {expected:?}")]
    UnknownTpuVersion {
        version: String,
        expected: &'static [&'static str],
    },

    /// A `key=value` override could not be parsed.
    #[error("Invalid option override '{0}': expected key=value")]
    InvalidOverride(String),
}

impl OptionsError {
    /// Create an `UnknownTpuVersion` error listing every supported version.
    pub fn unknown_version(version: impl Into<String>) -> Self {
        Self::UnknownTpuVersion {
            version: version.into(),
            expected: &TPU_VERSIONS,
        }
    }
}

/// Result type alias for option resolution.
pub type OptionsResult<T> = Result<T, OptionsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_tpu_message_carries_input() {
        let err = NotTpuError::new("garbage");
        assert_eq!(err.to_string(), "Invalid TPU instance: garbage");
    }

    #[test]
    fn test_not_tpu_converts_transparently() {
        let err: OptionsError = NotTpuError::new("v4").into();
        assert!(matches!(err, OptionsError::NotTpu(_)));
        assert_eq!(err.to_string(), "Invalid TPU instance: v4");
    }

    #[test]
    fn test_unknown_version_lists_all_supported() {
        let msg = OptionsError::unknown_version("v7").to_string();
        assert!(msg.contains("Unknown TPU version v7"));
        for version in TPU_VERSIONS {
            assert!(msg.contains(version), "missing {version} in {msg}");
        }
    }
}
