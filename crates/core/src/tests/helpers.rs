// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Effect, FetchOutcome, FetchRequest, Session, TransitionResult, Trigger, apply};
use adc_desk_domain::{ResourceKind, SearchMode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 5, 9, 30, 0).unwrap()
}

pub fn step(session: &Session, trigger: Trigger) -> TransitionResult {
    apply(session, trigger, test_now()).unwrap()
}

pub fn authorized_session() -> Session {
    step(
        &Session::new(),
        Trigger::NetworkOriginResolved {
            origin: String::from("212.142.10.20"),
            authorized: true,
            preview: false,
        },
    )
    .new_session
}

pub fn fetches(effects: &[Effect]) -> Vec<FetchRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Fetch(request) => Some(request.clone()),
            Effect::RecordHistory(_) => None,
        })
        .collect()
}

pub fn single_fetch(effects: &[Effect], kind: ResourceKind) -> FetchRequest {
    let matching: Vec<FetchRequest> = fetches(effects)
        .into_iter()
        .filter(|request| request.query.kind() == kind)
        .collect();
    assert_eq!(matching.len(), 1, "expected exactly one {kind} fetch");
    matching[0].clone()
}

pub fn response(status: u16, body: Value) -> FetchOutcome {
    FetchOutcome::Response { status, body }
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

pub fn complete(session: &Session, request: &FetchRequest, outcome: FetchOutcome) -> TransitionResult {
    step(
        session,
        Trigger::FetchCompleted {
            request: request.request_id,
            outcome,
        },
    )
}

/// Runs a DNI search through the customer lookup.
pub fn searched(session: &Session, value: &str) -> (Session, FetchRequest) {
    let result: TransitionResult = step(
        session,
        Trigger::Search {
            mode: SearchMode::Dni,
            value: value.to_string(),
        },
    );
    let request: FetchRequest = single_fetch(&result.effects, ResourceKind::Customer);
    (result.new_session, request)
}

/// Runs a search whose customer and contracts lookups both succeed.
///
/// Returns the session and the effects of the contracts completion.
pub fn session_with_contracts() -> (Session, Vec<Effect>) {
    let (session, customer) = searched(&authorized_session(), "12345678z");
    let after_customer: TransitionResult =
        complete(&session, &customer, response(200, customer_body("IC-1")));
    let contracts: FetchRequest =
        single_fetch(&after_customer.effects, ResourceKind::Contracts);
    let after_contracts: TransitionResult = complete(
        &after_customer.new_session,
        &contracts,
        response(200, contracts_body()),
    );
    (after_contracts.new_session, after_contracts.effects)
}
