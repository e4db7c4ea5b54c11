// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AppState, build_router};
use adc_desk_api::{
    ApiError, DEFAULT_SESSION_TTL, NetworkGate, PasswordVerifier, ResourceClient, SessionRegistry,
    SharedHistory, UpstreamReply,
};
use adc_desk_domain::{ResourceKind, ResourceQuery};
use adc_desk_persistence::{Persistence, SearchHistoryStore};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const ACCESS_KEY: &str = "NortegasAccess2024";
pub const TEST_VERSION: u64 = 5;

/// A provider stand-in answering with one fixed result per resource.
#[derive(Default)]
pub struct StaticClient {
    answers: HashMap<ResourceKind, Result<UpstreamReply, ApiError>>,
}

impl StaticClient {
    pub fn answer(mut self, kind: ResourceKind, result: Result<Value, ApiError>) -> Self {
        self.answers.insert(kind, result.map(UpstreamReply::ok));
        self
    }

    pub fn answer_with_status(mut self, kind: ResourceKind, status: u16, body: Value) -> Self {
        self.answers.insert(kind, Ok(UpstreamReply { status, body }));
        self
    }
}

#[async_trait]
impl ResourceClient for StaticClient {
    async fn fetch(
        &self,
        query: &ResourceQuery,
        _correlation_id: &str,
    ) -> Result<UpstreamReply, ApiError> {
        self.answers.get(&query.kind()).cloned().unwrap_or_else(|| {
            Err(ApiError::Transport {
                message: String::from("connection refused"),
            })
        })
    }
}

pub fn happy_client() -> StaticClient {
    StaticClient::default()
        .answer(
            ResourceKind::Customer,
            Ok(json!({
                "value": {
                    "ic": "IC-1",
                    "nif": "12345678Z",
                    "businessName": "Ana",
                    "lastName1": "García"
                }
            })),
        )
        .answer(
            ResourceKind::Contracts,
            Ok(json!({
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
            })),
        )
        .answer(
            ResourceKind::InspectionReports,
            Ok(json!({"value": {"inspectionReports": [{"reviewDate": "20240315"}]}})),
        )
        .answer(ResourceKind::Consumption, Ok(json!({"value": {"consums": []}})))
        .answer(ResourceKind::Invoices, Ok(json!({"value": {"invoices": []}})))
}

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state(client: StaticClient, access_key: Option<&str>) -> AppState {
    create_test_app_state_with_ttl(client, access_key, DEFAULT_SESSION_TTL)
}

pub fn create_test_app_state_with_ttl(
    client: StaticClient,
    access_key: Option<&str>,
    session_ttl: Duration,
) -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let history: SharedHistory = Arc::new(Mutex::new(SearchHistoryStore::open(persistence)));
    let client: Arc<dyn ResourceClient> = Arc::new(client);
    AppState {
        sessions: Arc::new(SessionRegistry::new(client, history).with_ttl(session_ttl)),
        gate: Arc::new(NetworkGate::default()),
        verifier: Arc::new(PasswordVerifier::with_cost(access_key, 4).unwrap()),
        trust_forwarded: false,
        version: TEST_VERSION,
    }
}

pub fn create_test_app(client: StaticClient) -> (AppState, Router) {
    let app_state: AppState = create_test_app_state(client, Some(ACCESS_KEY));
    let app: Router = build_router(app_state.clone());
    (app_state, app)
}

/// Sends a request and returns the status and the JSON body (`Null` when
/// empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Creates a session from `origin` and returns its token.
pub async fn create_session(app: &Router, origin: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/sessions",
        &[("x-forwarded-for", origin)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Waits until the session has no fetch in flight.
pub async fn settle(app_state: &AppState, token: &str) {
    let session = app_state.sessions.get(token).await.unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), session.wait_idle())
        .await
        .expect("session did not settle");
}
