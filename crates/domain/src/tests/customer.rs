// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CascadeBlock, CustomerSummary, contracts_cascade};
use serde_json::json;

#[test]
fn test_cascade_fires_on_200_with_ic() {
    let body = json!({ "value": { "ic": "IC123" } });
    assert_eq!(contracts_cascade(200, &body), Ok(String::from("IC123")));
}

#[test]
fn test_cascade_truth_table() {
    let with_ic = json!({ "value": { "ic": "IC123" } });
    let without_ic = json!({ "value": { "businessName": "ACME" } });

    let outcomes = [
        contracts_cascade(200, &with_ic),
        contracts_cascade(200, &without_ic),
        contracts_cascade(404, &with_ic),
        contracts_cascade(404, &without_ic),
    ];

    let fired: usize = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(fired, 1);
    assert!(outcomes[0].is_ok());
}

#[test]
fn test_cascade_block_reasons_are_specific() {
    assert_eq!(
        contracts_cascade(500, &json!({ "value": { "ic": "IC123" } })),
        Err(CascadeBlock::NonOkStatus(500))
    );
    assert_eq!(
        contracts_cascade(200, &json!({ "data": {} })),
        Err(CascadeBlock::MissingValue)
    );
    assert_eq!(
        contracts_cascade(200, &json!({ "value": { "ic": "" } })),
        Err(CascadeBlock::MissingIc)
    );
}

#[test]
fn test_cascade_requires_exact_200() {
    assert_eq!(
        contracts_cascade(204, &json!({ "value": { "ic": "IC123" } })),
        Err(CascadeBlock::NonOkStatus(204))
    );
}

#[test]
fn test_customer_summary_prefers_cif_over_nif() {
    let summary = CustomerSummary::from_body(&json!({
        "value": { "ic": "IC1", "cif": "B1", "nif": "N1", "businessName": "ACME" }
    }))
    .unwrap();
    assert_eq!(summary.cif.as_deref(), Some("B1"));

    let summary = CustomerSummary::from_body(&json!({
        "value": { "ic": "IC1", "nif": "N1", "businessName": "Ana" }
    }))
    .unwrap();
    assert_eq!(summary.cif.as_deref(), Some("N1"));
}

#[test]
fn test_customer_summary_display_name() {
    let summary = CustomerSummary::from_body(&json!({
        "value": { "businessName": "Ana", "lastName1": "Etxeberria" }
    }))
    .unwrap();
    assert_eq!(summary.display_name(), "Ana Etxeberria");

    let summary = CustomerSummary::from_body(&json!({ "value": { "businessName": "ACME" } }))
        .unwrap();
    assert_eq!(summary.display_name(), "ACME");
}

#[test]
fn test_customer_summary_history_worthiness() {
    let complete = CustomerSummary::from_body(&json!({
        "value": { "ic": "IC1", "cif": "B1", "businessName": "ACME" }
    }))
    .unwrap();
    assert!(complete.is_history_worthy());

    let missing_name = CustomerSummary::from_body(&json!({
        "value": { "ic": "IC1", "cif": "B1" }
    }))
    .unwrap();
    assert!(!missing_name.is_history_worthy());
}

#[test]
fn test_customer_summary_requires_value_object() {
    assert!(CustomerSummary::from_body(&json!({ "value": "IC1" })).is_none());
    assert!(CustomerSummary::from_body(&json!({})).is_none());
}
