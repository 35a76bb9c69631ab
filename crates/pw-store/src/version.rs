//! Snapshot version identifiers.

use std::fmt;

use serde::Serialize;

use crate::error::StoreError;

/// Identifier of one snapshot: seconds since the epoch, as a string.
///
/// Ids issued by one store are strictly increasing; when the clock has
/// not moved past the newest existing snapshot the id is bumped forward
/// instead, so two publishes in the same second stay distinct.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    /// Parse a caller-supplied version string.
    ///
    /// Only ASCII digits are accepted. This doubles as the guard that
    /// keeps path separators out of history directory lookups.
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StoreError::InvalidVersion(value.to_owned()));
        }
        Ok(Self(value.to_owned()))
    }

    pub(crate) fn from_secs(secs: u64) -> Self {
        Self(secs.to_string())
    }

    /// Numeric value, for ordering. Ids always fit in `u64`.
    pub(crate) fn as_secs(&self) -> u64 {
        self.0.parse().unwrap_or(u64::MAX)
    }

    /// The version as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_accepts_digits() {
        let version = VersionId::parse("1756500000").unwrap();
        assert_eq!(version.as_str(), "1756500000");
        assert_eq!(version.as_secs(), 1_756_500_000);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(VersionId::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_traversal() {
        assert!(VersionId::parse("../1756500000").is_err());
        assert!(VersionId::parse("does-not-exist").is_err());
        assert!(VersionId::parse("17565 00000").is_err());
    }

    #[test]
    fn test_serializes_transparently() {
        let version = VersionId::from_secs(42);
        assert_eq!(serde_json::to_string(&version).unwrap(), "\"42\"");
    }
}
