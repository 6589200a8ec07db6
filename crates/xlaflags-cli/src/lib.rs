//! Command-line adapter for `xlaflags-core`.
//!
//! Parsing lives in [`parser`] and [`commands`]; each subcommand has a
//! handler in [`handlers`] that calls into the core library and writes to
//! stdout.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs binary
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use commands::{Commands, OutputFormat, ResolveArgs};
pub use error::CliError;
pub use parser::Cli;
