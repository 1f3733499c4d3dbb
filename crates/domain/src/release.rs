//! Release records as reported by the release host.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of a hosted release.
///
/// The host reports numeric ids; string ids are accepted so the value is never
/// interpreted beyond equality and display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReleaseId(String);

impl ReleaseId {
    /// Creates a release identifier from its textual form.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as used in request paths.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<u64> for ReleaseId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ReleaseId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Display for ReleaseId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ReleaseId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawReleaseId {
            Number(u64),
            Text(String),
        }

        Ok(match RawReleaseId::deserialize(deserializer)? {
            RawReleaseId::Number(value) => Self::from(value),
            RawReleaseId::Text(value) => Self(value),
        })
    }
}

/// One release record from the host listing.
///
/// Unknown fields in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    id: ReleaseId,
    short_version: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    uploaded_at: Option<String>,
}

impl Release {
    /// Creates a release record.
    #[must_use]
    pub fn new(id: impl Into<ReleaseId>, short_version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short_version: short_version.into(),
            version: None,
            uploaded_at: None,
        }
    }

    /// Attaches the upload timestamp reported by the host (RFC 3339).
    #[must_use]
    pub fn with_uploaded_at(mut self, uploaded_at: impl Into<String>) -> Self {
        self.uploaded_at = Some(uploaded_at.into());
        self
    }

    /// Returns the release identifier.
    #[must_use]
    pub fn id(&self) -> &ReleaseId {
        &self.id
    }

    /// Returns the user facing version label.
    #[must_use]
    pub fn short_version(&self) -> &str {
        self.short_version.as_str()
    }

    /// Returns the build version, if reported.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the parsed upload timestamp, if present and well formed.
    #[must_use]
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.uploaded_at
            .as_deref()
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|value| value.with_timezone(&Utc))
    }

    /// Exact label comparison; no semantic version ordering is applied.
    #[must_use]
    pub fn matches_version(&self, target_version: &str) -> bool {
        self.short_version == target_version
    }
}

/// Filters releases to an exact version label, keeping source order.
#[must_use]
pub fn matching_releases(releases: Vec<Release>, target_version: &str) -> Vec<Release> {
    releases
        .into_iter()
        .filter(|release| release.matches_version(target_version))
        .collect()
}

/// Returns the first position whose upload time is newer than its predecessor.
///
/// Only evaluated when every release carries a parseable timestamp; otherwise
/// the order cannot be checked and `None` is returned.
#[must_use]
pub fn first_ordering_violation(releases: &[Release]) -> Option<usize> {
    let timestamps = releases
        .iter()
        .map(Release::uploaded_at)
        .collect::<Option<Vec<_>>>()?;

    timestamps
        .windows(2)
        .position(|pair| pair[1] > pair[0])
        .map(|index| index + 1)
}

/// Formats ids as `[a, b, c]` for log output.
#[must_use]
pub fn format_release_ids(release_ids: &[ReleaseId]) -> String {
    let joined = release_ids
        .iter()
        .map(ReleaseId::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
