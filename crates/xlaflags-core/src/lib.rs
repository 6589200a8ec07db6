//! Default XLA compiler options for TPU instance types.
//!
//! Resolution flows one way: an instance type such as `tpu-v5p-2048` is
//! parsed into a TPU version, the version and slice count select a set of
//! option overlays, and the merged options can be serialized into a flag
//! string for `XLA_FLAGS` or `LIBTPU_INIT_ARGS`.
//!
//! ```rust
//! use xlaflags_core::{default_xla_options, xla_flags_from_options};
//!
//! let options = default_xla_options("v4-8", 1, "tpu").unwrap();
//! let flags = xla_flags_from_options(&options);
//! assert!(flags.starts_with("--xla_tpu_spmd_rng_bit_generator_unsafe=1"));
//! ```
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod flags;
pub mod options;
pub mod tpu;

pub use error::{NotTpuError, OptionsError, OptionsResult};
pub use flags::{FlagTarget, xla_flags_from_options};
pub use options::{SUPPORTED_BACKEND, XlaOptionValue, XlaOptions, default_xla_options};
pub use tpu::{TPU_VERSIONS, TpuVersion, infer_tpu_type, infer_tpu_version};

// Only used by integration tests
#[cfg(test)]
use serde_json as _;
