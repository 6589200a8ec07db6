//! CLI-specific error types and exit-code mapping.

use thiserror::Error;
use xlaflags_core::OptionsError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The inputs do not describe a supported TPU.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The requested backend has no options.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing output failed.
    #[error("IO error: {0}")]
    Io(String),

    /// Rendering output failed.
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Map error to an exit code, following sysexits.h where it fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Io(_) => 74,       // EX_IOERR
            Self::Output(_) => 70,   // EX_SOFTWARE
        }
    }
}

impl From<OptionsError> for CliError {
    fn from(err: OptionsError) -> Self {
        match err {
            OptionsError::UnsupportedBackend(_) => Self::Config(err.to_string()),
            OptionsError::NotTpu(_)
            | OptionsError::UnknownTpuVersion { .. }
            | OptionsError::InvalidOverride(_) => Self::Arguments(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlaflags_core::NotTpuError;

    #[test]
    fn test_backend_maps_to_config() {
        let err = CliError::from(OptionsError::UnsupportedBackend("gpu".to_string()));
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("gpu"));
    }

    #[test]
    fn test_parse_failures_map_to_usage() {
        let not_tpu = CliError::from(OptionsError::from(NotTpuError::new("garbage")));
        assert_eq!(not_tpu.exit_code(), 2);
        assert_eq!(
            not_tpu.to_string(),
            "Invalid arguments: Invalid TPU instance: garbage"
        );

        let unknown = CliError::from(OptionsError::unknown_version("v7"));
        assert_eq!(unknown.exit_code(), 2);
    }
}
