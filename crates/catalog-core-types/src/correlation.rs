//! Correlation types for tagging units of work
//!
//! Every store session carries a [`RequestContext`] so that the log lines
//! emitted while it is open can be grouped by request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single request or unit of work
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new time-ordered RequestId (UUIDv7)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reuse an id handed over by a caller (e.g. an upstream request header)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context carried by a store session for correlation
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    /// Free-form name of the caller that opened the unit of work ("cli", "http", ...)
    pub origin: Option<String>,
}

impl RequestContext {
    /// Create a new context with a fresh RequestId
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Origin for log fields; `"unknown"` when the caller did not say
    pub fn origin_or_unknown(&self) -> &str {
        self.origin.as_deref().unwrap_or("unknown")
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
