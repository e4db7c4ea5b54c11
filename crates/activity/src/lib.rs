// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! The HTTP activity console.
//!
//! Every orchestration step of a dashboard session is recorded as an
//! [`ActivityEntry`]. The log is append-only and is cleared only when a new
//! top-level search starts.

mod correlation;

pub use correlation::{
    CORRELATION_HEADER, CORRELATION_PREFIX, correlation_id_at, generate_correlation_id,
    resolve_correlation_id,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Kind of console entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityMethod {
    /// A request issued to a proxied resource, or its response.
    Get,
    /// An informational orchestration step.
    Info,
    /// A step that could not be carried out.
    Error,
}

/// One line of the activity console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// When the entry was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Entry kind.
    pub method: ActivityMethod,
    /// Request URL, or a description for `INFO`/`ERROR` entries.
    pub url: String,
    /// Response status, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response body, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Transport error detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Correlation token of the request this entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl ActivityEntry {
    fn new(method: ActivityMethod, url: String) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            method,
            url,
            status: None,
            response: None,
            error: None,
            correlation_id: None,
        }
    }

    /// A request about to be issued.
    #[must_use]
    pub fn request(url: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::new(ActivityMethod::Get, url.into()).with_correlation_id(correlation_id)
    }

    /// A response received for an earlier request.
    #[must_use]
    pub fn response(
        url: impl Into<String>,
        status: u16,
        body: Value,
        correlation_id: impl Into<String>,
    ) -> Self {
        let mut entry: Self =
            Self::new(ActivityMethod::Get, url.into()).with_correlation_id(correlation_id);
        entry.status = Some(status);
        entry.response = Some(body);
        entry
    }

    /// A request that failed before any status was known.
    #[must_use]
    pub fn transport_failure(
        url: impl Into<String>,
        error: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        let mut entry: Self =
            Self::new(ActivityMethod::Get, url.into()).with_correlation_id(correlation_id);
        entry.error = Some(error.into());
        entry
    }

    /// An informational step.
    #[must_use]
    pub fn info(description: impl Into<String>) -> Self {
        Self::new(ActivityMethod::Info, description.into())
    }

    /// A step that could not be carried out.
    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self::new(ActivityMethod::Error, description.into())
    }

    /// Attaches a correlation token.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Attaches error detail.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Append-only console of one search session, in chronological order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn append(&mut self, entry: ActivityEntry) {
        self.entries.push(entry);
    }

    /// Removes every entry. Only a new top-level search does this.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// Entries appended at or after `index`.
    #[must_use]
    pub fn since(&self, index: usize) -> &[ActivityEntry] {
        self.entries.get(index..).unwrap_or_default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
