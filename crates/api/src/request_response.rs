// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use adc_desk::Session;
use adc_desk_domain::HistoryItem;
use serde::{Deserialize, Serialize};

/// Message returned after the access key is accepted.
pub const AUTHENTICATION_SUCCESS: &str = "Autenticación exitosa";

/// API request carrying an access key candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordRequest {
    /// The candidate. A missing field reads as empty.
    #[serde(default)]
    pub password: String,
}

/// API request to start a search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchRequest {
    /// `dni` or `ic`.
    pub mode: String,
    /// Raw operator input.
    pub value: String,
}

/// API request to select a contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectContractRequest {
    /// Positional contract id (`contract-<index>`).
    pub contract_id: String,
}

/// API request to switch the detail tab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SwitchTabRequest {
    /// `consums` or `invoices`.
    pub tab: String,
}

/// Plain message response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The message.
    pub message: String,
}

/// API response for a newly created dashboard session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    /// Token addressing the session in later requests.
    pub token: String,
    /// The session right after the network check.
    pub snapshot: Session,
}

/// API response listing the search history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Items in display order.
    pub items: Vec<HistoryItem>,
}

/// API response of the liveness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloResponse {
    /// Greeting.
    pub message: String,
    /// Current time, RFC 3339.
    pub timestamp: String,
    /// Always `online`.
    pub status: String,
}

/// API response carrying the deployment counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    /// Deployment counter.
    pub version: u64,
}
