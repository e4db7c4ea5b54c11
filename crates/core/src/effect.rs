// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use adc_desk_domain::{HistoryItem, ResourceQuery};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifies one fetch. Unique within a session, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw id.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fetch the driver must perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Id the outcome must be reported under.
    pub request_id: RequestId,
    /// What to fetch.
    pub query: ResourceQuery,
    /// Correlation token sent along with the request.
    pub correlation_id: String,
}

/// What came back from a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A response with a status. Non-2xx bodies carry `{error, details}`.
    Response {
        /// HTTP status.
        status: u16,
        /// Parsed body.
        body: Value,
    },
    /// No response was obtained.
    Transport {
        /// Failure detail.
        message: String,
    },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Perform a fetch and report back with `Trigger::FetchCompleted`.
    Fetch(FetchRequest),
    /// Remember a successful lookup in the search history.
    RecordHistory(HistoryItem),
}
