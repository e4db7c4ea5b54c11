// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::effect::{Effect, FetchRequest, RequestId};
use crate::error::CoreError;
use adc_desk_activity::ActivityLog;
use adc_desk_domain::{
    ActiveTab, Contract, CustomerSummary, InspectionDates, ResourceQuery, SearchQuery,
    non_empty_field,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Outcome of the network origin check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NetworkAccess {
    /// The check has not resolved yet.
    #[default]
    Pending,
    /// The origin is inside the corporate network, or unknown (preview).
    Authorized {
        /// The checked origin.
        origin: String,
        /// Whether access was granted because no origin was available.
        preview: bool,
    },
    /// The origin is outside the corporate network, or the check failed.
    Denied {
        /// The checked origin, when the check got that far.
        origin: Option<String>,
    },
}

/// Who may search in this session.
///
/// Access is granted when the network check authorized the origin or the
/// shared access key was accepted. The password latch never resets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccessState {
    /// Network origin check result.
    pub network: NetworkAccess,
    /// Whether the access key was accepted in this session.
    pub password_authenticated: bool,
}

impl AccessState {
    /// Whether searches are currently allowed.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.password_authenticated || matches!(self.network, NetworkAccess::Authorized { .. })
    }

    /// Checks the search gate.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::AccessPending` while the network check is
    /// unresolved, or `CoreError::AccessDenied` once it denied access,
    /// unless the access key was accepted.
    pub const fn can_search(&self) -> Result<(), CoreError> {
        if self.password_authenticated {
            return Ok(());
        }
        match self.network {
            NetworkAccess::Authorized { .. } => Ok(()),
            NetworkAccess::Pending => Err(CoreError::AccessPending),
            NetworkAccess::Denied { .. } => Err(CoreError::AccessDenied),
        }
    }
}

/// Error shown in one section. Never crosses into other sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionError {
    /// Response status, absent for transport failures.
    pub status: Option<u16>,
    /// Short description.
    pub message: String,
    /// Additional detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SectionError {
    /// Builds the error from a non-2xx response body of the form
    /// `{error, details}`.
    #[must_use]
    pub fn from_response(status: u16, body: &Value) -> Self {
        Self {
            status: Some(status),
            message: non_empty_field(body, "error").unwrap_or_else(|| String::from("Desconocido")),
            details: non_empty_field(body, "details"),
        }
    }

    /// Builds the error for a fetch that got no response.
    #[must_use]
    pub fn transport(message: &str, detail: String) -> Self {
        Self {
            status: None,
            message: message.to_string(),
            details: Some(detail),
        }
    }
}

impl std::fmt::Display for SectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "Error: {} - {details}", self.message),
            None => write!(f, "Error: {}", self.message),
        }
    }
}

/// Lifecycle of one dashboard section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Section<T> {
    /// Nothing requested.
    #[default]
    Idle,
    /// Waiting for `request`.
    Loading {
        /// The only fetch whose outcome this section accepts.
        request: RequestId,
    },
    /// A 2xx response arrived.
    Loaded {
        /// Response status.
        status: u16,
        /// Section data.
        data: T,
    },
    /// The fetch failed.
    Failed {
        /// What went wrong.
        error: SectionError,
    },
}

impl<T> Section<T> {
    /// Whether the section accepts the outcome of `request`.
    #[must_use]
    pub fn awaits(&self, request: RequestId) -> bool {
        matches!(self, Self::Loading { request: expected } if *expected == request)
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The loaded data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded { data, .. } => Some(data),
            _ => None,
        }
    }

    /// The response status, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Loaded { status, .. } => Some(*status),
            Self::Failed { error } => error.status,
            _ => None,
        }
    }

    /// The error, if the fetch failed.
    #[must_use]
    pub const fn error(&self) -> Option<&SectionError> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Inspection dates of one supply point.
pub type InspectionState = Section<InspectionDates>;

/// The complete state of one dashboard session.
///
/// The session is replaced as a whole by each transition.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Session {
    /// Search gate.
    pub access: AccessState,
    /// The search in progress or last completed.
    pub search: Option<SearchQuery>,
    /// Customer lookup, with the full upstream body.
    pub customer: Section<Value>,
    /// The part of the customer body the orchestrator relies on.
    pub customer_summary: Option<CustomerSummary>,
    /// Contracts of the customer.
    pub contracts: Section<Vec<Contract>>,
    /// Id of the selected contract.
    pub selected_contract: Option<String>,
    /// Detail tab shown for the selected contract.
    pub active_tab: ActiveTab,
    /// Consumption of the selected contract.
    pub consumption: Section<Value>,
    /// Invoices of the selected contract.
    pub invoices: Section<Value>,
    /// Inspection dates keyed by supply point.
    pub inspections: BTreeMap<String, InspectionState>,
    /// Activity console of the current search.
    pub activity: ActivityLog,
    #[serde(skip)]
    in_flight: HashMap<RequestId, FetchRequest>,
    #[serde(skip)]
    next_request_id: u64,
}

impl Session {
    /// Creates a session with the network check pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected contract, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Contract> {
        let id: &str = self.selected_contract.as_deref()?;
        self.contracts.data()?.iter().find(|contract| contract.id == id)
    }

    /// The internal identifier of the customer found by the current search.
    #[must_use]
    pub fn customer_ic(&self) -> Option<&str> {
        self.customer_summary.as_ref()?.ic.as_deref()
    }

    /// Fetches issued and not yet completed.
    #[must_use]
    pub fn in_flight(&self) -> Vec<&FetchRequest> {
        let mut requests: Vec<&FetchRequest> = self.in_flight.values().collect();
        requests.sort_by_key(|request| request.request_id);
        requests
    }

    /// Allocates the next request id and registers the fetch.
    pub(crate) fn issue(
        &mut self,
        query: ResourceQuery,
        correlation_id: String,
        effects: &mut Vec<Effect>,
    ) -> RequestId {
        self.next_request_id += 1;
        let request_id: RequestId = RequestId::new(self.next_request_id);
        let request: FetchRequest = FetchRequest {
            request_id,
            query,
            correlation_id,
        };
        self.in_flight.insert(request_id, request.clone());
        effects.push(Effect::Fetch(request));
        request_id
    }

    /// Removes a completed fetch from the in-flight set.
    pub(crate) fn complete(&mut self, request: RequestId) -> Option<FetchRequest> {
        self.in_flight.remove(&request)
    }

    /// Forgets every in-flight fetch. Their outcomes become stale.
    pub(crate) fn abandon_in_flight(&mut self) {
        self.in_flight.clear();
    }
}

/// The result of a successful transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The session after the transition.
    pub new_session: Session,
    /// Effects the driver must carry out, in order.
    pub effects: Vec<Effect>,
}
