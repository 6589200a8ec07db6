//! Versions command handler.

use std::io::Write;

use xlaflags_core::TPU_VERSIONS;

use crate::error::CliError;

/// Print each supported TPU version on its own line.
pub fn execute(out: &mut impl Write) -> Result<(), CliError> {
    for version in TPU_VERSIONS {
        writeln!(out, "{version}")?;
    }
    Ok(())
}
