// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    authorized_session, complete, customer_body, fetches, response, searched,
    session_with_contracts, single_fetch, step,
};
use crate::{CoreError, FetchRequest, Section, Session, TransitionResult, Trigger, apply};
use adc_desk_activity::ActivityMethod;
use adc_desk_domain::{ActiveTab, ResourceKind, ResourceQuery};
use chrono::{TimeZone, Utc};
use serde_json::json;

#[test]
fn test_select_contract_fetches_its_consumption() {
    let (session, _) = session_with_contracts();

    let result: TransitionResult = step(
        &session,
        Trigger::SelectContract {
            contract_id: String::from("contract-1"),
        },
    );

    let request: FetchRequest = single_fetch(&result.effects, ResourceKind::Consumption);
    assert_eq!(
        request.query,
        ResourceQuery::Consumption {
            cups: String::from("ES0002"),
            contract_id: String::from("ID-2"),
            ic: String::from("IC-1"),
        }
    );
    assert!(result.new_session.consumption.awaits(request.request_id));
    assert_eq!(
        result.new_session.selected_contract.as_deref(),
        Some("contract-1")
    );
}

#[test]
fn test_select_unknown_contract_is_rejected() {
    let (session, _) = session_with_contracts();

    let result = apply(
        &session,
        Trigger::SelectContract {
            contract_id: String::from("contract-9"),
        },
        crate::tests::helpers::test_now(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::UnknownContract(String::from("contract-9"))
    );
}

#[test]
fn test_select_contract_before_contracts_load_is_rejected() {
    let session: Session = authorized_session();

    let result = apply(
        &session,
        Trigger::SelectContract {
            contract_id: String::from("contract-0"),
        },
        crate::tests::helpers::test_now(),
    );

    assert!(matches!(result, Err(CoreError::UnknownContract(_))));
}

#[test]
fn test_consumption_loads_and_failure_stays_local() {
    let (session, effects) = session_with_contracts();
    let request: FetchRequest = single_fetch(&effects, ResourceKind::Consumption);

    let loaded: TransitionResult = complete(
        &session,
        &request,
        response(200, json!({"value": {"consums": []}})),
    );
    assert_eq!(loaded.new_session.consumption.status(), Some(200));

    let failed: TransitionResult = complete(
        &session,
        &request,
        response(502, json!({"error": "Error 502: Bad Gateway", "details": "down"})),
    );
    assert_eq!(failed.new_session.consumption.status(), Some(502));
    assert_eq!(failed.new_session.contracts, session.contracts);
    assert_eq!(failed.new_session.customer, session.customer);
    assert_eq!(failed.new_session.inspections, session.inspections);
    assert!(failed.effects.is_empty());
}

#[test]
fn test_switch_to_invoices_fetches_fixed_window() {
    let (session, _) = session_with_contracts();

    let result: TransitionResult = step(&session, Trigger::SwitchTab(ActiveTab::Invoices));

    let request: FetchRequest = single_fetch(&result.effects, ResourceKind::Invoices);
    assert_eq!(
        request.query,
        ResourceQuery::Invoices {
            ic: String::from("IC-1"),
            contract: String::from("C-100"),
            date_from: String::from("20200101"),
            date_to: String::from("20260305"),
            status: String::from("TODOS"),
        }
    );
    assert_eq!(result.new_session.active_tab, ActiveTab::Invoices);
    assert!(result.new_session.invoices.is_loading());
}

#[test]
fn test_invoice_window_ends_on_operator_calendar_day() {
    let (session, _) = session_with_contracts();
    // 23:30 UTC is already the next day in Madrid.
    let late = Utc.with_ymd_and_hms(2026, 3, 5, 23, 30, 0).unwrap();

    let result: TransitionResult =
        apply(&session, Trigger::SwitchTab(ActiveTab::Invoices), late).unwrap();

    let request: FetchRequest = single_fetch(&result.effects, ResourceKind::Invoices);
    match request.query {
        ResourceQuery::Invoices { date_to, .. } => assert_eq!(date_to, "20260306"),
        other => panic!("unexpected query: {other:?}"),
    }
}

#[test]
fn test_contract_change_on_invoices_tab_refetches_invoices() {
    let (session, _) = session_with_contracts();
    let on_invoices: Session = step(&session, Trigger::SwitchTab(ActiveTab::Invoices)).new_session;

    let result: TransitionResult = step(
        &on_invoices,
        Trigger::SelectContract {
            contract_id: String::from("contract-1"),
        },
    );

    let request: FetchRequest = single_fetch(&result.effects, ResourceKind::Invoices);
    assert!(request.query.local_url().contains("contract=C-200"));
    assert_eq!(fetches(&result.effects).len(), 1);
    assert_eq!(result.new_session.consumption, Section::Idle);
}

#[test]
fn test_switch_back_to_consumption_clears_and_refetches() {
    let (session, effects) = session_with_contracts();
    let first: FetchRequest = single_fetch(&effects, ResourceKind::Consumption);
    let loaded: Session = complete(&session, &first, response(200, json!({"value": 1}))).new_session;

    let result: TransitionResult = step(&loaded, Trigger::SwitchTab(ActiveTab::Consumption));

    let second: FetchRequest = single_fetch(&result.effects, ResourceKind::Consumption);
    assert_ne!(first.request_id, second.request_id);
    assert!(result.new_session.consumption.awaits(second.request_id));
}

#[test]
fn test_switch_tab_without_selection_fetches_nothing() {
    let session: Session = authorized_session();

    let result: TransitionResult = step(&session, Trigger::SwitchTab(ActiveTab::Invoices));

    assert!(result.effects.is_empty());
    assert_eq!(result.new_session.active_tab, ActiveTab::Invoices);
    assert_eq!(result.new_session.invoices, Section::Idle);
}

#[test]
fn test_contract_without_contract_id_cancels_consumption() {
    let (session, customer) = searched(&authorized_session(), "12345678Z");
    let after_customer: TransitionResult =
        complete(&session, &customer, response(200, customer_body("IC-1")));
    let contracts: FetchRequest = single_fetch(&after_customer.effects, ResourceKind::Contracts);

    let result: TransitionResult = complete(
        &after_customer.new_session,
        &contracts,
        response(
            200,
            json!({"value": {"contracts": [{"contractNumber": "C-1", "cups": "ES9"}]}}),
        ),
    );

    assert!(
        fetches(&result.effects)
            .iter()
            .all(|request| request.query.kind() != ResourceKind::Consumption)
    );
    assert_eq!(result.new_session.consumption, Section::Idle);
    let last = result.new_session.activity.entries().last().unwrap();
    assert_eq!(last.method, ActivityMethod::Error);
    assert_eq!(
        last.url,
        "Llamada a API de consumos cancelada - Faltan parámetros requeridos"
    );
}
