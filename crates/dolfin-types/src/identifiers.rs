//! Version types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::bail;
use crate::errors::{DolfinError, Result};

/// A `MAJOR.MINOR.PATCH[-PRE][+BUILD]` version.
///
/// # Example
///
/// ```
/// use dolfin_types::SemVer;
///
/// let v = SemVer::parse("1.2.3-beta.1+abcdef123456").unwrap();
/// assert_eq!(v.major, 1);
/// assert_eq!(v.minor, 2);
/// assert_eq!(v.patch, 3);
/// assert_eq!(v.pre_release.as_deref(), Some("beta.1"));
/// assert_eq!(v.build.as_deref(), Some("abcdef123456"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemVer {
    /// Major version number (incompatible API changes)
    pub major: u32,
    /// Minor version number (backwards-compatible features)
    pub minor: u32,
    /// Patch version number (backwards-compatible bug fixes)
    pub patch: u32,
    /// Pre-release version identifier
    pub pre_release: Option<String>,
    /// Build metadata (the source control revision, when known)
    pub build: Option<String>,
}

impl SemVer {
    /// Create a version from its three numeric components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
            build: None,
        }
    }

    /// Build a version from a component sequence of any length.
    ///
    /// Missing components are padded with `0`; components past the third
    /// are dropped.
    pub fn from_parts(parts: &[u32]) -> Self {
        let at = |i: usize| parts.get(i).copied().unwrap_or(0);
        Self::new(at(0), at(1), at(2))
    }

    /// Attach build metadata, replacing any existing value.
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// Parse a semantic version string.
    ///
    /// # Errors
    ///
    /// Returns an error if the version string is not valid semver.
    pub fn parse(version: &str) -> Result<Self> {
        let (rest, build) = match version.split_once('+') {
            Some((rest, build)) => (rest, Some(build.to_string())),
            None => (version, None),
        };
        let (core, pre_release) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre.to_string())),
            None => (rest, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            bail!(
                InvalidArgument,
                "Invalid semantic version '{}': expected format X.Y.Z",
                version
            );
        }

        let component = |name: &str, raw: &str| -> Result<u32> {
            raw.parse().map_err(|_| {
                DolfinError::InvalidArgument(format!("Invalid {} version: {}", name, raw))
            })
        };

        Ok(Self {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
            pre_release,
            build,
        })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for SemVer {
    type Err = DolfinError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for SemVer {
    fn from(parts: &[u32]) -> Self {
        Self::from_parts(parts)
    }
}

impl<const N: usize> From<[u32; N]> for SemVer {
    fn from(parts: [u32; N]) -> Self {
        Self::from_parts(&parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_semver_parsing() {
        let v = SemVer::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert!(v.build.is_none());

        let v = SemVer::parse("0.2.0-rc.1").unwrap();
        assert_eq!(v.pre_release.as_deref(), Some("rc.1"));
        assert_eq!(v.with_build("abcdef123456").to_string(), "0.2.0-rc.1+abcdef123456");

        assert!(SemVer::parse("1.2").is_err());
        assert!(SemVer::parse("1.x.3").is_err());
    }

    #[test]
    fn test_from_parts_pads_and_truncates() {
        assert_eq!(SemVer::from_parts(&[]).to_string(), "0.0.0");
        assert_eq!(SemVer::from([0, 1]).to_string(), "0.1.0");
        assert_eq!(SemVer::from([1, 2, 3, 4, 5]).to_string(), "1.2.3");
    }

    #[test]
    fn test_build_metadata_display() {
        let v = SemVer::from([0, 1]).with_build("abcdef123456");
        assert_eq!(v.to_string(), "0.1.0+abcdef123456");
        assert_eq!(SemVer::parse("0.1.0+abcdef123456").unwrap(), v);
    }

    proptest! {
        #[test]
        fn from_parts_keeps_leading_components(parts in prop::collection::vec(0u32..1000, 0..6)) {
            let v = SemVer::from_parts(&parts);
            let rendered = v.to_string();
            prop_assert_eq!(rendered.split('.').count(), 3);
            for (i, expected) in parts.iter().take(3).enumerate() {
                let actual = [v.major, v.minor, v.patch][i];
                prop_assert_eq!(actual, *expected);
            }
        }
    }
}
