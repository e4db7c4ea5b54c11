// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::{
    ApiError, DashboardSession, NetworkGate, PasswordVerifier, ResourceClient, SharedHistory,
    UpstreamReply,
};
use adc_desk_domain::{ResourceKind, ResourceQuery};
use adc_desk_persistence::{Persistence, SearchHistoryStore};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A `ResourceClient` answering from a fixed script, one answer per kind.
#[derive(Default)]
pub struct ScriptedClient {
    answers: Mutex<HashMap<ResourceKind, Result<UpstreamReply, ApiError>>>,
    calls: Mutex<Vec<(ResourceQuery, String)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, kind: ResourceKind, result: Result<Value, ApiError>) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(kind, result.map(UpstreamReply::ok));
        self
    }

    pub fn answer_with_status(self, kind: ResourceKind, status: u16, body: Value) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(kind, Ok(UpstreamReply { status, body }));
        self
    }

    pub fn calls(&self) -> Vec<(ResourceQuery, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, kind: ResourceKind) -> Vec<ResourceQuery> {
        self.calls()
            .into_iter()
            .map(|(query, _)| query)
            .filter(|query| query.kind() == kind)
            .collect()
    }
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn fetch(
        &self,
        query: &ResourceQuery,
        correlation_id: &str,
    ) -> Result<UpstreamReply, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.clone(), correlation_id.to_string()));
        self.answers
            .lock()
            .unwrap()
            .get(&query.kind())
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::Transport {
                    message: format!("no scripted answer for {}", query.kind()),
                })
            })
    }
}

pub fn customer_body(ic: &str) -> Value {
    json!({
        "value": {
            "ic": ic,
            "nif": "12345678Z",
            "businessName": "Ana",
            "lastName1": "García"
        }
    })
}

pub fn contracts_body() -> Value {
    json!({
        "value": {
            "contracts": [
                {
                    "contractType": "04",
                    "contractNumber": "C-100",
                    "cups": "ES0001",
                    "contractId": "ID-1"
                },
                {
                    "contractType": "02",
                    "contractNumber": "C-200",
                    "cups": "ES0002",
                    "contractId": "ID-2"
                }
            ]
        }
    })
}

pub fn inspections_body() -> Value {
    json!({
        "value": {
            "inspectionReports": [
                {"reviewDate": "20210610"},
                {"reviewDate": "20240315"},
                {"reviewDate": ""}
            ]
        }
    })
}

/// A client whose whole cascade succeeds for customer `IC-1`.
pub fn happy_client() -> ScriptedClient {
    ScriptedClient::new()
        .answer(ResourceKind::Customer, Ok(customer_body("IC-1")))
        .answer(ResourceKind::Contracts, Ok(contracts_body()))
        .answer(ResourceKind::InspectionReports, Ok(inspections_body()))
        .answer(ResourceKind::Consumption, Ok(json!({"value": {"consums": []}})))
        .answer(ResourceKind::Invoices, Ok(json!({"value": {"invoices": []}})))
}

pub fn shared_history() -> SharedHistory {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    Arc::new(tokio::sync::Mutex::new(SearchHistoryStore::open(
        persistence,
    )))
}

/// A verifier using the cheapest bcrypt cost.
pub fn test_verifier(secret: Option<&str>) -> PasswordVerifier {
    PasswordVerifier::with_cost(secret, 4).unwrap()
}

pub fn start_session(client: Arc<ScriptedClient>, history: SharedHistory) -> Arc<DashboardSession> {
    DashboardSession::start(String::from("session_test"), client, history)
}

/// Resolves the network check of a session from `origin`.
pub async fn resolve_from(session: &DashboardSession, origin: &str) {
    let check = NetworkGate::default().check(origin);
    session.resolve_network(&check).await.unwrap();
}
