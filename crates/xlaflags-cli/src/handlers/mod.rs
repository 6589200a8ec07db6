//! Command handlers.
//!
//! Each handler resolves options through `xlaflags-core` and writes its
//! result to the given writer, so output can be captured in tests.

pub mod env;
pub mod flags;
pub mod options;
pub mod versions;

use tracing::debug;
use xlaflags_core::{XlaOptions, default_xla_options};

use crate::commands::ResolveArgs;
use crate::error::CliError;

/// Resolve default options for the arguments and apply any overrides.
pub fn resolve(args: &ResolveArgs) -> Result<XlaOptions, CliError> {
    let mut options = default_xla_options(&args.instance_type, args.num_slices, &args.backend)?;
    debug!(
        instance_type = %args.instance_type,
        num_slices = args.num_slices,
        count = options.len(),
        "Resolved default XLA options"
    );
    options.apply_overrides(&args.overrides)?;
    Ok(options)
}

#[cfg(test)]
pub(crate) fn resolve_args(
    instance_type: &str,
    num_slices: u32,
    overrides: &[&str],
) -> ResolveArgs {
    ResolveArgs {
        instance_type: instance_type.to_string(),
        num_slices,
        backend: "tpu".to_string(),
        overrides: overrides.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_applies_overrides_last() {
        let args = resolve_args("v4-8", 1, &["xla_enable_async_all_gather=false"]);
        let options = resolve(&args).unwrap();
        assert_eq!(options.len(), 5);
        assert_eq!(
            options.get("xla_enable_async_all_gather").map(ToString::to_string),
            Some("false".to_string())
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_backend() {
        let mut args = resolve_args("v4-8", 1, &[]);
        args.backend = "gpu".to_string();
        assert_eq!(resolve(&args).unwrap_err().exit_code(), 78);
    }
}
