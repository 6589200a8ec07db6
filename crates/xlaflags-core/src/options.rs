//! Default XLA options for TPU instance types.
//!
//! Options are built from an ordered list of overlays. The base overlay
//! always applies; the others apply depending on the TPU version and the
//! number of slices. Overlays are merged in list order and a later overlay
//! replaces the value of any key an earlier one already set.
//!
//! The resulting options can be passed as compiler options to a jitted
//! function, or converted with [`crate::xla_flags_from_options`] and
//! exported through `LIBTPU_INIT_ARGS` or `XLA_FLAGS`.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{OptionsError, OptionsResult};
use crate::tpu::{TpuVersion, infer_tpu_type, infer_tpu_version};

/// The only backend options can be resolved for.
pub const SUPPORTED_BACKEND: &str = "tpu";

/// A single option value.
///
/// String values are passed through literally: `"true"` and `"ENABLED"` are
/// not booleans here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XlaOptionValue {
    Bool(bool),
    Int(i64),
    Str(Cow<'static, str>),
}

impl XlaOptionValue {
    /// Create a string value from a static literal.
    pub const fn text(value: &'static str) -> Self {
        Self::Str(Cow::Borrowed(value))
    }

    /// Parse a value given on the command line or in an override.
    ///
    /// Integers written in canonical form become [`XlaOptionValue::Int`].
    /// Everything else stays a literal string, including `true`/`false` and
    /// numbers such as `+5` or `007` whose spelling would not survive a
    /// round trip through `i64`.
    pub fn parse_literal(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => Self::Int(n),
            _ => Self::Str(Cow::Owned(raw.to_string())),
        }
    }
}

impl fmt::Display for XlaOptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<bool> for XlaOptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for XlaOptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&'static str> for XlaOptionValue {
    fn from(value: &'static str) -> Self {
        Self::text(value)
    }
}

impl From<String> for XlaOptionValue {
    fn from(value: String) -> Self {
        Self::Str(Cow::Owned(value))
    }
}

/// An ordered mapping from XLA flag name to value.
///
/// Keys are unique. Replacing the value of an existing key keeps the key at
/// its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct XlaOptions {
    entries: IndexMap<String, XlaOptionValue>,
}

impl XlaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an option, returning the value it replaced (if any).
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<XlaOptionValue>,
    ) -> Option<XlaOptionValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&XlaOptionValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &XlaOptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Merge `other` into `self`; values from `other` win on collision.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Apply `key=value` overrides in order; later overrides win.
    ///
    /// Nothing is applied unless every override parses.
    pub fn apply_overrides<I, S>(&mut self, overrides: I) -> OptionsResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = overrides
            .into_iter()
            .map(|raw| parse_override(raw.as_ref()))
            .collect::<OptionsResult<Vec<_>>>()?;

        for (key, value) in parsed {
            if let Some(previous) = self.get(&key) {
                info!(%key, %previous, new = %value, "Overriding XLA option");
            }
            self.insert(key, value);
        }
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, XlaOptionValue)> for XlaOptions {
    fn from_iter<T: IntoIterator<Item = (K, XlaOptionValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a XlaOptions {
    type Item = (&'a String, &'a XlaOptionValue);
    type IntoIter = indexmap::map::Iter<'a, String, XlaOptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn parse_override(raw: &str) -> OptionsResult<(String, XlaOptionValue)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| OptionsError::InvalidOverride(raw.to_string()))?;
    let key = key.trim().trim_start_matches("--");
    if key.is_empty() {
        return Err(OptionsError::InvalidOverride(raw.to_string()));
    }
    Ok((key.to_string(), XlaOptionValue::parse_literal(value.trim())))
}

/// What the overlay predicates are evaluated against.
#[derive(Debug, Clone, Copy)]
struct Topology {
    version: TpuVersion,
    num_slices: u32,
}

/// A set of options merged in when `applies` holds.
struct Overlay {
    name: &'static str,
    applies: fn(&Topology) -> bool,
    options: &'static [(&'static str, XlaOptionValue)],
}

impl Overlay {
    fn to_options(&self) -> XlaOptions {
        self.options
            .iter()
            .map(|(key, value)| (*key, value.clone()))
            .collect()
    }
}

const BASE_OPTIONS: &[(&str, XlaOptionValue)] = &[
    // SPMD partition-aware RngBitGenerator.
    ("xla_tpu_spmd_rng_bit_generator_unsafe", XlaOptionValue::Bool(true)),
    ("xla_tpu_enable_latency_hiding_scheduler", XlaOptionValue::text("true")),
    // Prevents OOM on small repeated transformer models.
    ("xla_tpu_perform_spmd_cse_prevention", XlaOptionValue::text("false")),
];

// Not supported by v3; enabled by default from v5 on.
const V4_OPTIONS: &[(&str, XlaOptionValue)] = &[
    ("xla_enable_async_all_gather", XlaOptionValue::text("true")),
    ("xla_enable_async_collective_permute", XlaOptionValue::text("true")),
];

const V6E_OPTIONS: &[(&str, XlaOptionValue)] = &[
    ("xla_tpu_scoped_vmem_limit_kib", XlaOptionValue::text("98304")),
    ("xla_tpu_enable_async_collective_fusion", XlaOptionValue::text("true")),
    ("xla_tpu_enable_async_collective_fusion_fuse_all_gather", XlaOptionValue::text("true")),
    ("xla_tpu_enable_async_collective_fusion_multiple_steps", XlaOptionValue::text("true")),
    ("xla_tpu_overlap_compute_collective_tc", XlaOptionValue::text("true")),
    ("xla_enable_async_all_gather", XlaOptionValue::text("true")),
    ("xla_tpu_enable_all_experimental_scheduler_features", XlaOptionValue::text("true")),
    // Redundant once the experimental scheduler features are on; AUTO only
    // enables it in some situations.
    ("xla_tpu_enable_scheduler_memory_pressure_tracking", XlaOptionValue::text("ENABLED")),
    // Max overlapping host offloads.
    ("xla_tpu_host_transfer_overlap_limit", XlaOptionValue::Int(24)),
    ("xla_tpu_aggressive_opt_barrier_removal", XlaOptionValue::text("ENABLED")),
    // Pushes async starts to the beginning of loop bodies.
    ("xla_lhs_prioritize_async_depth_over_stall", XlaOptionValue::text("ENABLED")),
    // Pipelining of cross-DCN all-gathers.
    ("xla_tpu_enable_ag_backward_pipelining", XlaOptionValue::text("true")),
    ("xla_should_allow_loop_variant_parameter_in_chain", XlaOptionValue::text("ENABLED")),
    ("xla_should_add_loop_invariant_op_in_chain", XlaOptionValue::text("ENABLED")),
    // Max overlapping cross-DCN send/recv.
    ("xla_max_concurrent_host_send_recv", XlaOptionValue::Int(100)),
    // Each rerun lowers the scheduler memory limit to 90% of the previous one.
    ("xla_latency_hiding_scheduler_rerun", XlaOptionValue::Int(0)),
];

const MULTI_SLICE_OPTIONS: &[(&str, XlaOptionValue)] = &[
    // Collectives across slices.
    ("xla_tpu_enable_megascale_barrier", XlaOptionValue::text("true")),
    // Overlap gradient all-reduce with the next layer's gradient computation.
    ("xla_tpu_enable_data_parallel_all_reduce_opt", XlaOptionValue::text("true")),
    ("xla_tpu_data_parallel_opt_different_sized_ops", XlaOptionValue::text("true")),
];

/// Overlays in merge order. Later entries win on key collision.
const OVERLAYS: &[Overlay] = &[
    Overlay {
        name: "base",
        applies: |_| true,
        options: BASE_OPTIONS,
    },
    Overlay {
        name: "v4",
        applies: |t| t.version == TpuVersion::V4,
        options: V4_OPTIONS,
    },
    Overlay {
        name: "v6e",
        applies: |t| t.version == TpuVersion::V6e,
        options: V6E_OPTIONS,
    },
    Overlay {
        name: "multi-slice",
        applies: |t| t.num_slices > 1,
        options: MULTI_SLICE_OPTIONS,
    },
];

/// Return the default XLA options for the given instance type and backend.
///
/// # Arguments
/// * `instance_type` - The accelerator, e.g. `tpu-v5p-2048`
/// * `num_slices` - Number of slices of that instance type
/// * `backend` - The JAX backend; only `tpu` is supported
///
/// # Errors
/// `UnsupportedBackend` for any backend other than `tpu`, otherwise any
/// instance-type parsing error.
pub fn default_xla_options(
    instance_type: &str,
    num_slices: u32,
    backend: &str,
) -> OptionsResult<XlaOptions> {
    if backend != SUPPORTED_BACKEND {
        return Err(OptionsError::UnsupportedBackend(backend.to_string()));
    }
    let version = infer_tpu_version(&infer_tpu_type(instance_type)?)?;
    let topology = Topology {
        version,
        num_slices,
    };

    let mut options = XlaOptions::new();
    for overlay in OVERLAYS.iter().filter(|o| (o.applies)(&topology)) {
        debug!(
            overlay = overlay.name,
            count = overlay.options.len(),
            "Applying XLA option overlay"
        );
        options.merge(overlay.to_options());
    }
    Ok(options)
}
