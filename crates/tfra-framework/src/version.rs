//! Framework version parsing and the 4-digit version integer.
//!
//! The native ops discriminate TensorFlow releases at preprocessor time
//! through a single integer, `major * 1000 + minor * 10 + patch`
//! (1.15.2 → 1152, 2.4.1 → 2041, 2.5.1 → 2051). The encoding assumes a
//! 1-digit major, at most 2-digit minor and 1-digit patch, so versions
//! outside that shape are rejected up front.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{FrameworkError, Result};

/// Releases below this integer ship without usable compiled headers.
pub const FIRST_HEADERS_RELEASE: u32 = 2000;

/// A parsed TensorFlow version.
///
/// Ordering compares the numeric `(major, minor, patch)` triple; the
/// original spelling is kept for paths keyed by the literal version.
#[derive(Debug, Clone, Serialize)]
pub struct TfVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    raw: String,
}

impl TfVersion {
    /// Parse a version string such as "2.5.1" or "1.15.2".
    pub fn parse(version: &str) -> Result<Self> {
        let malformed = |reason: &str| FrameworkError::MalformedVersion {
            version: version.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = version.split('.').collect();
        let [major, minor, patch] = parts[..] else {
            return Err(malformed("expected exactly three dot-separated components"));
        };

        if major.len() != 1 {
            return Err(malformed("major version must be 1 digit"));
        }
        if minor.is_empty() || minor.len() > 2 {
            return Err(malformed("minor version must be 1 or 2 digits"));
        }
        if patch.len() != 1 {
            return Err(malformed("patch version must be 1 digit"));
        }

        let number = |part: &str| -> Result<u32> {
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed("components must be decimal numbers"));
            }
            part.parse()
                .map_err(|_| malformed("components must be decimal numbers"))
        };

        Ok(Self {
            major: number(major)?,
            minor: number(minor)?,
            patch: number(patch)?,
            raw: version.to_string(),
        })
    }

    /// Construct a version from its numeric components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            raw: format!("{major}.{minor}.{patch}"),
        }
    }

    /// The version exactly as the framework reported it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The `(major, minor, patch)` triple.
    pub fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }

    /// Encode the version as its 4-digit integer.
    pub fn version_integer(&self) -> Result<u32> {
        let value = self.major * 1000 + self.minor * 10 + self.patch;
        if value.to_string().len() != 4 {
            return Err(FrameworkError::VersionIntegerLength {
                version: self.raw.clone(),
                value,
            });
        }
        Ok(value)
    }
}

impl PartialEq for TfVersion {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for TfVersion {}

impl PartialOrd for TfVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TfVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for TfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_release_integers() {
        assert_eq!(TfVersion::parse("1.15.2").unwrap().version_integer().unwrap(), 1152);
        assert_eq!(TfVersion::parse("2.4.1").unwrap().version_integer().unwrap(), 2041);
        assert_eq!(TfVersion::parse("2.5.1").unwrap().version_integer().unwrap(), 2051);
        assert_eq!(TfVersion::parse("2.99.1").unwrap().version_integer().unwrap(), 2991);
    }

    #[test]
    fn every_valid_shape_encodes_to_four_digits() {
        for major in 1..=9 {
            for minor in 0..=99 {
                for patch in 0..=9 {
                    let v = TfVersion::parse(&format!("{major}.{minor}.{patch}")).unwrap();
                    let value = v.version_integer().unwrap();
                    assert_eq!(value, major * 1000 + minor * 10 + patch);
                    assert_eq!(value.to_string().len(), 4);
                }
            }
        }
    }

    #[test]
    fn missing_patch_is_malformed() {
        let err = TfVersion::parse("2.0").unwrap_err();
        assert!(matches!(err, FrameworkError::MalformedVersion { .. }));
        assert!(err.to_string().contains("2.0"));
    }

    #[test]
    fn two_digit_major_is_malformed() {
        let err = TfVersion::parse("10.0.0").unwrap_err();
        assert!(matches!(err, FrameworkError::MalformedVersion { .. }));
    }

    #[test]
    fn other_malformed_shapes() {
        for bad in ["2.100.0", "2.5.10", "2..1", "2.5.1.0", "2.5.0rc1", "2.x.1", ""] {
            assert!(
                matches!(TfVersion::parse(bad), Err(FrameworkError::MalformedVersion { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn zero_major_fails_length_check() {
        let v = TfVersion::parse("0.12.1").unwrap();
        let err = v.version_integer().unwrap_err();
        assert!(matches!(
            err,
            FrameworkError::VersionIntegerLength { value: 121, .. }
        ));
    }

    #[test]
    fn ordering_is_numeric() {
        let a = TfVersion::parse("2.10.0").unwrap();
        let b = TfVersion::parse("2.9.0").unwrap();
        assert!(a > b);
        assert!(TfVersion::parse("1.15.2").unwrap() < TfVersion::new(2, 0, 0));
        assert_eq!(TfVersion::parse("2.05.1").unwrap(), TfVersion::new(2, 5, 1));
    }

    #[test]
    fn literal_spelling_is_kept() {
        let v = TfVersion::parse("2.05.1").unwrap();
        assert_eq!(v.as_str(), "2.05.1");
        assert_eq!(v.to_string(), "2.05.1");
    }
}
