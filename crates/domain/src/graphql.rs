//! GraphQL envelope types and cache policy.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Strategy governing whether a read may reuse previously fetched data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CachePolicy {
    /// Answer from the cache when possible, otherwise fetch and cache the result.
    #[default]
    ReturnCacheDataElseFetch,
    /// Always go to the server; neither read nor write the cache.
    FetchIgnoringCacheCompletely,
}

impl CachePolicy {
    /// Picks the policy for a detail load: forced reloads bypass the cache.
    #[must_use]
    pub const fn for_reload(force_reload: bool) -> Self {
        if force_reload {
            Self::FetchIgnoringCacheCompletely
        } else {
            Self::ReturnCacheDataElseFetch
        }
    }

    /// Returns true if the cache may answer this request.
    #[must_use]
    pub const fn reads_cache(self) -> bool {
        matches!(self, Self::ReturnCacheDataElseFetch)
    }
}

/// An error entry from a GraphQL response's `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    /// Human-readable description.
    pub message: String,
    /// Path to the field that failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    /// Server-specific extension data (error codes and the like).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQLError {
    /// Creates an error carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Untyped response envelope as it comes off the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphQLResponse {
    /// The `data` member; absent or `null` when execution failed entirely.
    #[serde(default)]
    pub data: Option<Value>,
    /// The `errors` member; empty when absent or `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    /// Creates a response carrying data and no errors.
    #[must_use]
    pub const fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Returns true when data is present and no errors were reported.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.data.as_ref().is_some_and(|d| !d.is_null())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<GraphQLError>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<GraphQLError>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Typed result of an operation: data and errors may both be present.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLResult<D> {
    /// Decoded data, if the server produced any.
    pub data: Option<D>,
    /// Errors reported alongside (or instead of) the data.
    pub errors: Vec<GraphQLError>,
}

impl<D> GraphQLResult<D> {
    /// Returns the error messages in server order.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

/// Standard GraphQL-over-HTTP POST body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequestBody<'a> {
    /// Operation document.
    pub query: &'a str,
    /// Operation name to execute within the document.
    pub operation_name: &'a str,
    /// Variables for the operation.
    pub variables: &'a Value,
}
