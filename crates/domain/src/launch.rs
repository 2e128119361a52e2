//! Launch catalog types.
//!
//! These mirror the shapes returned by the launch catalog service. The
//! session layer treats them as mostly opaque: it only reads ids,
//! cursors and the `has_more` flag, and never mutates `is_booked`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// Server-assigned launch identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchId(String);

impl LaunchId {
    /// Creates a launch id, rejecting blank values.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidIdentifier` if the id is empty or whitespace.
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "launch id must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LaunchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque pagination marker. `None` in an `Option<PageCursor>` means
/// "start from the beginning".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wraps a raw cursor value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the cursor as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mission flown by a launch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    /// Mission name.
    #[serde(default)]
    pub name: Option<String>,
    /// URL of the mission patch image.
    #[serde(default)]
    pub mission_patch: Option<String>,
}

/// Rocket used by a launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rocket {
    /// Rocket name.
    #[serde(default)]
    pub name: Option<String>,
    /// Rocket type, e.g. "FT".
    #[serde(default, rename = "type")]
    pub rocket_type: Option<String>,
}

/// A launch as it appears in the paginated catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Launch {
    /// Launch identity.
    pub id: LaunchId,
    /// Launch site.
    #[serde(default)]
    pub site: Option<String>,
    /// Mission details.
    #[serde(default)]
    pub mission: Option<Mission>,
    /// Whether the current user has booked this launch.
    #[serde(default)]
    pub is_booked: bool,
}

impl Launch {
    /// Returns the mission name, if known.
    #[must_use]
    pub fn mission_name(&self) -> Option<&str> {
        self.mission.as_ref().and_then(|m| m.name.as_deref())
    }
}

/// A launch with the full detail set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchDetails {
    /// Launch identity.
    pub id: LaunchId,
    /// Launch site.
    #[serde(default)]
    pub site: Option<String>,
    /// Mission details.
    #[serde(default)]
    pub mission: Option<Mission>,
    /// Rocket details.
    #[serde(default)]
    pub rocket: Option<Rocket>,
    /// Whether the current user has booked this launch.
    #[serde(default)]
    pub is_booked: bool,
}

/// One page of the launch catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConnection {
    /// Launches on this page, in server order. Null entries are dropped.
    #[serde(rename = "launches", deserialize_with = "skip_null_entries")]
    pub items: Vec<Launch>,
    /// Resume position for the next page.
    #[serde(default)]
    pub cursor: Option<PageCursor>,
    /// Whether the server has more pages after this one.
    pub has_more: bool,
}

fn skip_null_entries<'de, D>(deserializer: D) -> Result<Vec<Launch>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Option<Launch>>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default().into_iter().flatten().collect())
}

/// Result of a booking or cancellation mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripUpdateResponse {
    /// Whether the server accepted the change.
    pub success: bool,
    /// Server-provided explanation.
    #[serde(default)]
    pub message: Option<String>,
}
