// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, INTERNAL_SERVER_ERROR, MISSING_PARAMETERS_ERROR, required_parameters_details,
    translate_core_error, translate_domain_error, translate_persistence_error,
};
use adc_desk::CoreError;
use adc_desk_domain::{DomainError, ResourceKind, SearchMode};
use adc_desk_persistence::PersistenceError;

#[test]
fn test_details_join_with_e_before_i() {
    assert_eq!(
        required_parameters_details(ResourceKind::Consumption.required_params()),
        "Se requieren los parámetros cups, contractId e ic"
    );
}

#[test]
fn test_details_join_with_y() {
    assert_eq!(
        required_parameters_details(ResourceKind::Invoices.required_params()),
        "Se requieren los parámetros ic, contract, dateFrom, dateTo y status"
    );
    assert_eq!(
        required_parameters_details(ResourceKind::InspectionReports.required_params()),
        "Se requieren los parámetros ic y cups"
    );
}

#[test]
fn test_details_for_single_parameter() {
    assert_eq!(
        required_parameters_details(ResourceKind::Contracts.required_params()),
        "Se requiere el parámetro ic"
    );
}

#[test]
fn test_missing_parameters_translation() {
    let err: ApiError = translate_domain_error(DomainError::MissingParameters {
        resource: "inspection-reports",
        required: vec!["ic", "cups"],
    });

    assert_eq!(
        err,
        ApiError::MissingParameters {
            details: String::from("Se requieren los parámetros ic y cups"),
        }
    );
    assert_eq!(err.user_message(), MISSING_PARAMETERS_ERROR);
}

#[test]
fn test_empty_search_value_is_invalid_input() {
    let err: ApiError = translate_core_error(CoreError::Validation(
        DomainError::EmptySearchValue {
            mode: SearchMode::Dni,
        },
    ));

    match err {
        ApiError::InvalidInput { field, message } => {
            assert_eq!(field, "value");
            assert_eq!(message, "Por favor, introduce un DNI/NIF válido");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_access_errors_translate_to_distinct_variants() {
    assert!(matches!(
        translate_core_error(CoreError::AccessPending),
        ApiError::AccessPending { .. }
    ));
    assert!(matches!(
        translate_core_error(CoreError::AccessDenied),
        ApiError::Unauthorized { .. }
    ));
    assert!(matches!(
        translate_core_error(CoreError::UnknownContract(String::from("contract-9"))),
        ApiError::ResourceNotFound { .. }
    ));
}

#[test]
fn test_persistence_errors_are_internal() {
    let err: ApiError =
        translate_persistence_error(PersistenceError::Query(String::from("database is locked")));
    assert!(matches!(err, ApiError::Internal { .. }));
    assert_eq!(err.user_message(), INTERNAL_SERVER_ERROR);
}

#[test]
fn test_transport_user_message_hides_detail() {
    let err: ApiError = ApiError::Transport {
        message: String::from("connection refused"),
    };
    assert_eq!(err.user_message(), INTERNAL_SERVER_ERROR);
    assert!(err.to_string().contains("connection refused"));
}
