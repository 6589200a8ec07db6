//! Conversion of XLA options into flag strings.

use std::fmt;

use crate::options::{XlaOptionValue, XlaOptions};

/// Convert XLA options into flags suitable for the `XLA_FLAGS` environment
/// variable.
///
/// Each option becomes `--key=value`, in the options' order. Booleans are
/// written as `1`/`0`; no escaping is performed.
pub fn xla_flags_from_options(options: &XlaOptions) -> String {
    options
        .iter()
        .map(|(key, value)| match value {
            XlaOptionValue::Bool(enabled) => format!("--{key}={}", u8::from(*enabled)),
            other => format!("--{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Environment variable the flag string is exported through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagTarget {
    /// `XLA_FLAGS`, honored on every platform.
    #[default]
    XlaFlags,
    /// `LIBTPU_INIT_ARGS`, honored by libtpu only.
    LibtpuInitArgs,
}

impl FlagTarget {
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::XlaFlags => "XLA_FLAGS",
            Self::LibtpuInitArgs => "LIBTPU_INIT_ARGS",
        }
    }

    /// Render a shell-style `NAME="flags"` assignment.
    pub fn env_assignment(self, flags: &str) -> String {
        format!("{}=\"{flags}\"", self.env_var())
    }
}

impl fmt::Display for FlagTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}
