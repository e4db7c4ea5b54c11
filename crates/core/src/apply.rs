// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::effect::{Effect, FetchOutcome, FetchRequest, RequestId};
use crate::error::CoreError;
use crate::state::{NetworkAccess, Section, SectionError, Session, TransitionResult};
use crate::trigger::Trigger;
use adc_desk_activity::{ActivityEntry, correlation_id_at};
use adc_desk_domain::{
    ActiveTab, Contract, CustomerSummary, HistoryItem, InspectionDates, InvoiceWindow,
    ResourceKind, ResourceQuery, SearchQuery, contracts_cascade, project_contracts,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use time::OffsetDateTime;
use tracing::debug;

const CUSTOMER_TRANSPORT_MESSAGE: &str = "Error inesperado al procesar la solicitud";
const CONTRACTS_TRANSPORT_MESSAGE: &str = "Error inesperado al obtener datos de contratos";
const CONSUMPTION_TRANSPORT_MESSAGE: &str = "Error inesperado al obtener datos de consumos";
const INVOICES_TRANSPORT_MESSAGE: &str = "Error inesperado al obtener datos de facturas";
const INSPECTIONS_TRANSPORT_MESSAGE: &str = "Error inesperado al obtener datos de inspecciones";

/// Applies a trigger to a session, producing the next session and the
/// effects the driver must carry out.
///
/// # Arguments
///
/// * `session` - The current session (immutable)
/// * `trigger` - What happened
/// * `now` - The current instant, used for correlation tokens, the invoice
///   window and history timestamps
///
/// # Errors
///
/// Returns an error, and leaves the session untouched, if:
/// - A search is attempted before access is granted
/// - A search value is empty after normalization
/// - A contract id does not name a loaded contract
pub fn apply(
    session: &Session,
    trigger: Trigger,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    let mut next: Session = session.clone();
    let mut effects: Vec<Effect> = Vec::new();

    match trigger {
        Trigger::NetworkOriginResolved {
            origin,
            authorized,
            preview,
        } => {
            next.access.network = if authorized {
                NetworkAccess::Authorized { origin, preview }
            } else {
                NetworkAccess::Denied {
                    origin: Some(origin),
                }
            };
        }
        Trigger::NetworkOriginFailed { reason } => {
            next.access.network = NetworkAccess::Denied { origin: None };
            next.activity.append(ActivityEntry::error(format!(
                "Error al verificar la IP: {reason}"
            )));
        }
        Trigger::PasswordAccepted => {
            next.access.password_authenticated = true;
        }
        Trigger::Search { mode, value } => {
            session.access.can_search()?;
            let query: SearchQuery = SearchQuery::new(mode, &value)?;
            start_search(&mut next, query, now, &mut effects);
        }
        Trigger::SelectContract { contract_id } => {
            let known: bool = session
                .contracts
                .data()
                .is_some_and(|contracts| contracts.iter().any(|c| c.id == contract_id));
            if !known {
                return Err(CoreError::UnknownContract(contract_id));
            }
            next.selected_contract = Some(contract_id);
            on_selection_changed(&mut next, now, &mut effects);
        }
        Trigger::SwitchTab(tab) => {
            next.active_tab = tab;
            match tab {
                ActiveTab::Consumption => refresh_consumption(&mut next, now, &mut effects),
                ActiveTab::Invoices => refresh_invoices(&mut next, now, &mut effects),
            }
        }
        Trigger::FetchCompleted { request, outcome } => {
            apply_outcome(&mut next, request, outcome, now, &mut effects);
        }
    }

    Ok(TransitionResult {
        new_session: next,
        effects,
    })
}

/// Resets every downstream section and issues the customer lookup.
fn start_search(
    session: &mut Session,
    query: SearchQuery,
    now: DateTime<Utc>,
    effects: &mut Vec<Effect>,
) {
    session.abandon_in_flight();
    session.customer_summary = None;
    session.contracts = Section::Idle;
    session.selected_contract = None;
    session.consumption = Section::Idle;
    session.invoices = Section::Idle;
    session.inspections.clear();
    session.activity.clear();

    let resource: ResourceQuery = ResourceQuery::Customer {
        mode: query.mode(),
        value: query.value().to_string(),
    };
    let note: String = format!("Búsqueda por {}", query.mode().as_str().to_uppercase());
    session.search = Some(query);
    let request: RequestId = issue_fetch(session, resource, &note, now, effects);
    session.customer = Section::Loading { request };
}

fn issue_fetch(
    session: &mut Session,
    query: ResourceQuery,
    note: &str,
    now: DateTime<Utc>,
    effects: &mut Vec<Effect>,
) -> RequestId {
    let correlation_id: String = correlation_id_at(
        OffsetDateTime::from_unix_timestamp(now.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH),
    );
    session.activity.append(ActivityEntry::request(
        format!("{} ({note})", query.local_url()),
        correlation_id.clone(),
    ));
    session.issue(query, correlation_id, effects)
}

fn record_outcome(session: &mut Session, request: &FetchRequest, outcome: &FetchOutcome) {
    let url: String = request.query.local_url();
    let entry: ActivityEntry = match outcome {
        FetchOutcome::Response { status, body } => {
            ActivityEntry::response(url, *status, body.clone(), request.correlation_id.clone())
        }
        FetchOutcome::Transport { message } => {
            ActivityEntry::transport_failure(url, message.clone(), request.correlation_id.clone())
        }
    };
    session.activity.append(entry);
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Routes a fetch outcome to the section waiting for it.
///
/// Outcomes no section is waiting for belong to a superseded search or
/// selection and are dropped.
fn apply_outcome(
    session: &mut Session,
    request_id: RequestId,
    outcome: FetchOutcome,
    now: DateTime<Utc>,
    effects: &mut Vec<Effect>,
) {
    let Some(request) = session.complete(request_id) else {
        debug!(request = %request_id, "Discarding outcome of abandoned fetch");
        return;
    };

    let awaited: bool = match request.query.kind() {
        ResourceKind::Customer => session.customer.awaits(request_id),
        ResourceKind::Contracts => session.contracts.awaits(request_id),
        ResourceKind::Consumption => session.consumption.awaits(request_id),
        ResourceKind::Invoices => session.invoices.awaits(request_id),
        ResourceKind::InspectionReports => session
            .inspections
            .values()
            .any(|inspection| inspection.awaits(request_id)),
    };
    if !awaited {
        debug!(
            request = %request_id,
            resource = %request.query.kind(),
            "Discarding stale fetch outcome"
        );
        return;
    }

    record_outcome(session, &request, &outcome);

    match request.query {
        ResourceQuery::Customer { .. } => customer_completed(session, outcome, now, effects),
        ResourceQuery::Contracts { .. } => contracts_completed(session, outcome, now, effects),
        ResourceQuery::Consumption { .. } => {
            session.consumption = body_section(outcome, CONSUMPTION_TRANSPORT_MESSAGE);
        }
        ResourceQuery::Invoices { .. } => {
            session.invoices = body_section(outcome, INVOICES_TRANSPORT_MESSAGE);
        }
        ResourceQuery::InspectionReports { cups, .. } => {
            let state: Section<InspectionDates> = match outcome {
                FetchOutcome::Response { status, body } if is_success(status) => Section::Loaded {
                    status,
                    data: InspectionDates::from_body(&body),
                },
                other => failed_section(other, INSPECTIONS_TRANSPORT_MESSAGE),
            };
            session.inspections.insert(cups, state);
        }
    }
}

fn failed_section<T>(outcome: FetchOutcome, transport_message: &str) -> Section<T> {
    let error: SectionError = match outcome {
        FetchOutcome::Response { status, body } => SectionError::from_response(status, &body),
        FetchOutcome::Transport { message } => {
            SectionError::transport(transport_message, message)
        }
    };
    Section::Failed { error }
}

fn body_section(outcome: FetchOutcome, transport_message: &str) -> Section<Value> {
    match outcome {
        FetchOutcome::Response { status, body } if is_success(status) => {
            Section::Loaded { status, data: body }
        }
        other => failed_section(other, transport_message),
    }
}

fn customer_completed(
    session: &mut Session,
    outcome: FetchOutcome,
    now: DateTime<Utc>,
    effects: &mut Vec<Effect>,
) {
    let (status, body) = match outcome {
        FetchOutcome::Response { status, body } => (status, body),
        transport @ FetchOutcome::Transport { .. } => {
            session.customer = failed_section(transport, CUSTOMER_TRANSPORT_MESSAGE);
            return;
        }
    };

    if is_success(status) {
        let summary: Option<CustomerSummary> = CustomerSummary::from_body(&body);
        if let (Some(summary), Some(query)) = (&summary, &session.search)
            && let Some(item) = HistoryItem::from_lookup(summary, query, now.timestamp_millis())
        {
            effects.push(Effect::RecordHistory(item));
        }
        session.customer_summary = summary;
    }

    match contracts_cascade(status, &body) {
        Ok(ic) => {
            let note: String = format!("Llamada automática después de recibir IC: {ic}");
            let request: RequestId =
                issue_fetch(session, ResourceQuery::Contracts { ic }, &note, now, effects);
            session.contracts = Section::Loading { request };
        }
        Err(block) => {
            session
                .activity
                .append(ActivityEntry::info(block.description()));
        }
    }

    session.customer = if is_success(status) {
        Section::Loaded { status, data: body }
    } else {
        Section::Failed {
            error: SectionError::from_response(status, &body),
        }
    };
}

fn contracts_completed(
    session: &mut Session,
    outcome: FetchOutcome,
    now: DateTime<Utc>,
    effects: &mut Vec<Effect>,
) {
    let (status, body) = match outcome {
        FetchOutcome::Response { status, body } if is_success(status) => (status, body),
        other => {
            session.contracts = failed_section(other, CONTRACTS_TRANSPORT_MESSAGE);
            return;
        }
    };

    let projected: Option<Vec<Contract>> = if status == 200 {
        project_contracts(&body)
    } else {
        None
    };
    let contracts: Vec<Contract> = match projected {
        Some(contracts) => {
            session.activity.append(ActivityEntry::info(format!(
                "Se encontraron {} contratos en value.contracts",
                contracts.len()
            )));
            contracts
        }
        None => {
            session.activity.append(ActivityEntry::info(
                "No se encontraron contratos en la estructura value.contracts",
            ));
            Vec::new()
        }
    };
    session.activity.append(ActivityEntry::info(format!(
        "Se han procesado {} contratos para el desplegable desde value.contracts",
        contracts.len()
    )));

    session.selected_contract = contracts.first().map(|contract| contract.id.clone());
    let supply_points: Vec<String> = distinct_supply_points(&contracts);
    session.contracts = Section::Loaded {
        status,
        data: contracts,
    };

    if let Some(ic) = session.customer_ic().map(str::to_string) {
        for cups in supply_points {
            let note: &str = "Llamada para obtener inspecciones del contrato";
            let query: ResourceQuery = ResourceQuery::InspectionReports {
                ic: ic.clone(),
                cups: cups.clone(),
            };
            let request: RequestId = issue_fetch(session, query, note, now, effects);
            session.inspections.insert(cups, Section::Loading { request });
        }
    }

    on_selection_changed(session, now, effects);
}

/// Supply points of the contracts, first occurrence order, blanks skipped.
fn distinct_supply_points(contracts: &[Contract]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    contracts
        .iter()
        .filter_map(|contract| contract.cups.as_deref())
        .filter(|cups| seen.insert(*cups))
        .map(str::to_string)
        .collect()
}

/// A different contract (or none) is selected: both detail sections belong
/// to the previous contract and are dropped, then the active tab reloads.
fn on_selection_changed(session: &mut Session, now: DateTime<Utc>, effects: &mut Vec<Effect>) {
    session.consumption = Section::Idle;
    session.invoices = Section::Idle;
    match session.active_tab {
        ActiveTab::Consumption => refresh_consumption(session, now, effects),
        ActiveTab::Invoices => refresh_invoices(session, now, effects),
    }
}

fn refresh_consumption(session: &mut Session, now: DateTime<Utc>, effects: &mut Vec<Effect>) {
    session.consumption = Section::Idle;
    let Some(contract) = session.selected().cloned() else {
        return;
    };
    let Some(ic) = session.customer_ic().map(str::to_string) else {
        return;
    };
    let (Some(cups), Some(contract_id)) = (contract.cups, contract.contract_id) else {
        session.activity.append(ActivityEntry::error(
            "Llamada a API de consumos cancelada - Faltan parámetros requeridos",
        ));
        return;
    };

    let query: ResourceQuery = ResourceQuery::Consumption {
        cups,
        contract_id,
        ic,
    };
    let note: &str = "Llamada automática al seleccionar contrato y pestaña de consumos";
    let request: RequestId = issue_fetch(session, query, note, now, effects);
    session.consumption = Section::Loading { request };
}

fn refresh_invoices(session: &mut Session, now: DateTime<Utc>, effects: &mut Vec<Effect>) {
    session.invoices = Section::Idle;
    let Some(contract) = session.selected().cloned() else {
        return;
    };
    let Some(ic) = session.customer_ic().map(str::to_string) else {
        return;
    };
    let Some(contract_number) = contract.contract_number else {
        session.activity.append(ActivityEntry::error(
            "Llamada a API de facturas cancelada - Faltan parámetros requeridos",
        ));
        return;
    };

    let window: InvoiceWindow = InvoiceWindow::up_to(now);
    let query: ResourceQuery = ResourceQuery::Invoices {
        ic,
        contract: contract_number,
        date_from: window.date_from,
        date_to: window.date_to,
        status: window.status,
    };
    let note: &str = "Llamada automática al seleccionar pestaña de facturas";
    let request: RequestId = issue_fetch(session, query, note, now, effects);
    session.invoices = Section::Loading { request };
}
