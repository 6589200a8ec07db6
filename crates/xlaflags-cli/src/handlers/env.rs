//! Env command handler.
//!
//! Prints `NAME="flags"` for the chosen target, ready for `export` or a
//! `.env` file.

use std::io::Write;

use xlaflags_core::{FlagTarget, xla_flags_from_options};

use crate::commands::ResolveArgs;
use crate::error::CliError;

/// Execute the env command.
pub fn execute(
    args: &ResolveArgs,
    target: FlagTarget,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let options = super::resolve(args)?;
    let flags = xla_flags_from_options(&options);
    writeln!(out, "{}", target.env_assignment(&flags))?;
    Ok(())
}
