//! Flags command handler.

use std::io::Write;

use xlaflags_core::xla_flags_from_options;

use crate::commands::ResolveArgs;
use crate::error::CliError;

/// Print the resolved options as a single flag string.
pub fn execute(args: &ResolveArgs, out: &mut impl Write) -> Result<(), CliError> {
    let options = super::resolve(args)?;
    writeln!(out, "{}", xla_flags_from_options(&options))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::resolve_args;

    #[test]
    fn test_flag_line() {
        let mut out = Vec::new();
        execute(&resolve_args("tpu-v3-8", 1, &["--xla_extra=7"]), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "--xla_tpu_spmd_rng_bit_generator_unsafe=1 \
             --xla_tpu_enable_latency_hiding_scheduler=true \
             --xla_tpu_perform_spmd_cse_prevention=false \
             --xla_extra=7\n"
        );
    }

    #[test]
    fn test_non_canonical_override_is_passed_verbatim() {
        let mut out = Vec::new();
        execute(&resolve_args("v3-8", 1, &["xla_extra=+5"]), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with(" --xla_extra=+5\n"));
    }

    #[test]
    fn test_invalid_instance_writes_nothing() {
        let mut out = Vec::new();
        let err = execute(&resolve_args("garbage", 1, &[]), &mut out).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(out.is_empty());
    }
}
