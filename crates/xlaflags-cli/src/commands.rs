//! Subcommands and their shared arguments.

use clap::{Args, Subcommand, ValueEnum};
use xlaflags_core::{FlagTarget, SUPPORTED_BACKEND};

/// Inputs every resolving subcommand takes.
///
/// Each can also come from the environment (or a `.env` file).
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Accelerator instance type (e.g. "tpu-v5p-2048" or "v4-8")
    #[arg(short = 't', long, env = "XLAFLAGS_INSTANCE_TYPE")]
    pub instance_type: String,

    /// Number of slices of the instance type
    #[arg(
        short = 'n',
        long,
        env = "XLAFLAGS_NUM_SLICES",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub num_slices: u32,

    /// JAX backend
    #[arg(short = 'b', long, env = "XLAFLAGS_BACKEND", default_value = SUPPORTED_BACKEND)]
    pub backend: String,

    /// Override or add an option (repeatable), e.g. --set xla_foo=true
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

/// How resolved options are printed.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `key = value` line per option
    #[default]
    Text,
    /// A JSON object, in resolution order
    Json,
}

/// Environment variable to export flags through.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetArg {
    /// XLA_FLAGS (any platform)
    #[default]
    XlaFlags,
    /// LIBTPU_INIT_ARGS (TPU only)
    LibtpuInitArgs,
}

impl From<TargetArg> for FlagTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::XlaFlags => Self::XlaFlags,
            TargetArg::LibtpuInitArgs => Self::LibtpuInitArgs,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved option mapping
    Options {
        #[command(flatten)]
        resolve: ResolveArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the options as a flag string
    Flags {
        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Print an environment assignment for the flags
    Env {
        #[command(flatten)]
        resolve: ResolveArgs,

        /// Variable to assign the flags to
        #[arg(long, value_enum, default_value_t = TargetArg::XlaFlags)]
        target: TargetArg,
    },

    /// List supported TPU versions
    Versions,
}

#[cfg(test)]
mod tests {
    use crate::parser::Cli;
    use clap::Parser;

    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let cli = Cli::try_parse_from(["xlaflags", "flags", "-t", "v4-8"]).unwrap();
        let Some(Commands::Flags { resolve }) = cli.command else {
            panic!("expected flags command");
        };
        assert_eq!(resolve.instance_type, "v4-8");
        assert_eq!(resolve.num_slices, 1);
        assert_eq!(resolve.backend, "tpu");
        assert!(resolve.overrides.is_empty());
    }

    #[test]
    fn test_repeated_overrides_keep_order() {
        let cli = Cli::try_parse_from([
            "xlaflags", "options", "-t", "v6e-8", "--set", "a=1", "--set", "b=2", "-f", "json",
        ])
        .unwrap();
        let Some(Commands::Options { resolve, format }) = cli.command else {
            panic!("expected options command");
        };
        assert_eq!(resolve.overrides, ["a=1", "b=2"]);
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_zero_slices_rejected() {
        assert!(Cli::try_parse_from(["xlaflags", "flags", "-t", "v4-8", "-n", "0"]).is_err());
    }

    #[test]
    fn test_env_target() {
        let cli = Cli::try_parse_from([
            "xlaflags",
            "env",
            "-t",
            "v5p-128",
            "--target",
            "libtpu-init-args",
        ])
        .unwrap();
        let Some(Commands::Env { target, .. }) = cli.command else {
            panic!("expected env command");
        };
        assert_eq!(FlagTarget::from(target), FlagTarget::LibtpuInitArgs);
    }

    #[test]
    fn test_env_is_print_only() {
        let result = Cli::try_parse_from(["xlaflags", "env", "-t", "v4-8", "--write", ".env"]);
        assert!(result.is_err());
    }
}
