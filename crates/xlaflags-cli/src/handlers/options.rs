//! Options command handler.

use std::io::Write;

use crate::commands::{OutputFormat, ResolveArgs};
use crate::error::CliError;

/// Print the resolved option mapping in resolution order.
pub fn execute(
    args: &ResolveArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let options = super::resolve(args)?;
    match format {
        OutputFormat::Text => {
            for (key, value) in &options {
                writeln!(out, "{key} = {value}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &options)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
