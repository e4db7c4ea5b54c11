// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    authorized_session, complete, customer_body, response, searched, session_with_contracts,
    single_fetch, step,
};
use crate::{FetchOutcome, FetchRequest, RequestId, Session, TransitionResult, Trigger};
use adc_desk_domain::{ActiveTab, ResourceKind};
use serde_json::json;

#[test]
fn test_superseded_customer_response_is_ignored() {
    let (first_search, first) = searched(&authorized_session(), "11111111H");
    let (second_search, second) = searched(&first_search, "22222222J");

    let result: TransitionResult =
        complete(&second_search, &first, response(200, customer_body("IC-OLD")));

    assert!(result.effects.is_empty());
    assert_eq!(result.new_session, second_search);
    assert!(result.new_session.customer.awaits(second.request_id));
}

#[test]
fn test_late_consumption_from_previous_search_is_ignored() {
    let (loaded, effects) = session_with_contracts();
    let (fresh, _) = searched(&loaded, "33333333P");
    let stale: FetchRequest = single_fetch(&effects, ResourceKind::Consumption);

    let result: TransitionResult = complete(&fresh, &stale, response(200, json!({"value": 1})));

    assert_eq!(result.new_session, fresh);
}

#[test]
fn test_consumption_for_previous_contract_is_ignored() {
    let (session, effects) = session_with_contracts();
    let old: FetchRequest = single_fetch(&effects, ResourceKind::Consumption);
    let reselected: Session = step(
        &session,
        Trigger::SelectContract {
            contract_id: String::from("contract-1"),
        },
    )
    .new_session;

    let result: TransitionResult =
        complete(&reselected, &old, response(200, json!({"value": "old"})));

    assert!(result.new_session.consumption.is_loading());
    assert_eq!(result.new_session.consumption.data(), None);
}

#[test]
fn test_invoices_dropped_when_switching_contract_on_consumption_tab() {
    let (session, _) = session_with_contracts();
    let on_invoices: TransitionResult = step(&session, Trigger::SwitchTab(ActiveTab::Invoices));
    let invoices: FetchRequest = single_fetch(&on_invoices.effects, ResourceKind::Invoices);
    let back: Session = step(
        &on_invoices.new_session,
        Trigger::SwitchTab(ActiveTab::Consumption),
    )
    .new_session;
    let reselected: Session = step(
        &back,
        Trigger::SelectContract {
            contract_id: String::from("contract-1"),
        },
    )
    .new_session;

    let result: TransitionResult =
        complete(&reselected, &invoices, response(200, json!({"value": []})));

    assert_eq!(result.new_session.invoices.data(), None);
}

#[test]
fn test_unknown_request_id_is_ignored() {
    let (session, _) = session_with_contracts();

    let result: TransitionResult = step(
        &session,
        Trigger::FetchCompleted {
            request: RequestId::new(9_999),
            outcome: FetchOutcome::Transport {
                message: String::from("late"),
            },
        },
    );

    assert_eq!(result.new_session, session);
}

#[test]
fn test_request_ids_are_never_reused_across_searches() {
    let (first_search, first) = searched(&authorized_session(), "11111111H");
    let (_, second) = searched(&first_search, "11111111H");

    assert!(second.request_id > first.request_id);
}

#[test]
fn test_duplicate_completion_is_applied_once() {
    let (session, effects) = session_with_contracts();
    let request: FetchRequest = single_fetch(&effects, ResourceKind::Consumption);
    let once: Session = complete(&session, &request, response(200, json!({"n": 1}))).new_session;

    let twice: TransitionResult = complete(&once, &request, response(200, json!({"n": 2})));

    assert_eq!(twice.new_session, once);
}
