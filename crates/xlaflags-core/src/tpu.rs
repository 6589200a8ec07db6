//! TPU instance-type parsing.
//!
//! An instance type looks like `tpu-v5p-2048` or `v4-8`: an optional `tpu-`
//! prefix, a version token, a hyphen, and a trailing core count. The type
//! token is the instance type without the prefix; the version is everything
//! before the last hyphen of the type token.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{NotTpuError, OptionsError, OptionsResult};

/// Every TPU version options can be resolved for.
///
/// Must stay in sync with [`TpuVersion`]; adding hardware support means
/// appending here and adding a variant plus any overlay in
/// [`crate::options`].
pub const TPU_VERSIONS: [&str; 5] = ["v3", "v4", "v5litepod", "v5p", "v6e"];

static TPU_INSTANCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(tpu-)?v.+-\d+$").expect("TPU instance pattern is valid"));

const TPU_PREFIX: &str = "tpu-";

/// A supported TPU hardware version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TpuVersion {
    V3,
    V4,
    V5Litepod,
    V5p,
    V6e,
}

impl TpuVersion {
    /// All versions, in the same order as [`TPU_VERSIONS`].
    pub const ALL: [Self; 5] = [Self::V3, Self::V4, Self::V5Litepod, Self::V5p, Self::V6e];

    /// The version token as it appears in instance types.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V3 => "v3",
            Self::V4 => "v4",
            Self::V5Litepod => "v5litepod",
            Self::V5p => "v5p",
            Self::V6e => "v6e",
        }
    }
}

impl fmt::Display for TpuVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TpuVersion {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|version| version.as_str() == s)
            .ok_or_else(|| OptionsError::unknown_version(s))
    }
}

/// Infer the TPU type (e.g. `v4-8`) from an instance type (e.g. `tpu-v4-8`
/// or `v4-8`).
pub fn infer_tpu_type(instance_type: &str) -> Result<String, NotTpuError> {
    if instance_type.is_empty() || !TPU_INSTANCE_RE.is_match(instance_type) {
        return Err(NotTpuError::new(instance_type));
    }
    let tpu_type = instance_type
        .strip_prefix(TPU_PREFIX)
        .unwrap_or(instance_type);
    Ok(tpu_type.to_string())
}

/// Infer the TPU version from a TPU type of the form `{version}-{cores}`.
///
/// Instance types with the `tpu-` prefix are accepted too.
pub fn infer_tpu_version(tpu_type: &str) -> OptionsResult<TpuVersion> {
    let tpu_type = infer_tpu_type(tpu_type)?;
    let (version, _) = split_tpu_type(&tpu_type);
    let version = version.parse()?;
    debug!(%tpu_type, %version, "Inferred TPU version");
    Ok(version)
}

/// Split a validated type token on its last hyphen.
fn split_tpu_type(tpu_type: &str) -> (&str, &str) {
    tpu_type.rsplit_once('-').unwrap_or((tpu_type, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tpu_prefix() {
        assert_eq!(infer_tpu_type("tpu-v5p-2048").unwrap(), "v5p-2048");
        assert_eq!(infer_tpu_type("v4-8").unwrap(), "v4-8");
    }

    #[test]
    fn test_prefixed_and_bare_types_agree() {
        for (version, cores) in [("v3", 8), ("v5litepod", 16), ("v6e", 256)] {
            let bare = format!("{version}-{cores}");
            let prefixed = format!("tpu-{bare}");
            assert_eq!(
                infer_tpu_type(&bare).unwrap(),
                infer_tpu_type(&prefixed).unwrap()
            );
        }
    }

    #[test]
    fn test_rejects_non_tpu_instances() {
        for input in ["", "garbage", "v4", "tpu-v4", "v4-", "gpu-a100-8", "v4-8x"] {
            let err = infer_tpu_type(input).unwrap_err();
            assert_eq!(err.instance_type, input);
        }
    }

    #[test]
    fn test_infers_versions() {
        assert_eq!(infer_tpu_version("v5p-2048").unwrap(), TpuVersion::V5p);
        assert_eq!(infer_tpu_version("tpu-v4-8").unwrap(), TpuVersion::V4);
        assert_eq!(
            infer_tpu_version("v5litepod-256").unwrap(),
            TpuVersion::V5Litepod
        );
    }

    #[test]
    fn test_version_uses_last_hyphen() {
        // "v5-lite" is not a version token, but the split must still keep it whole.
        let err = infer_tpu_version("v5-lite-8").unwrap_err();
        assert_eq!(err, OptionsError::unknown_version("v5-lite"));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let err = infer_tpu_version("v7-8").unwrap_err();
        match err {
            OptionsError::UnknownTpuVersion { version, expected } => {
                assert_eq!(version, "v7");
                assert_eq!(expected.len(), 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_version_inference_propagates_not_tpu() {
        assert!(matches!(
            infer_tpu_version("garbage"),
            Err(OptionsError::NotTpu(_))
        ));
    }

    #[test]
    fn test_version_list_matches_enum() {
        let tokens: Vec<_> = TpuVersion::ALL.iter().map(|v| v.as_str()).collect();
        assert_eq!(tokens, TPU_VERSIONS);
    }
}
