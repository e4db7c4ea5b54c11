// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::non_empty_field;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a customer payload does not allow the contracts lookup to proceed.
///
/// The three causes are mutually exclusive and checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeBlock {
    /// The customer lookup did not return exactly 200.
    NonOkStatus(u16),
    /// The body has no `value` object.
    MissingValue,
    /// `value` exists but carries no `ic`.
    MissingIc,
}

impl CascadeBlock {
    /// Operator-facing description recorded in the activity log.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NonOkStatus(_) => {
                "Segunda API no llamada - La primera API no devolvió código 200"
            }
            Self::MissingValue => {
                "Segunda API no llamada - No se encontró la estructura \"value\" en la respuesta"
            }
            Self::MissingIc => {
                "Segunda API no llamada - No se encontró el campo \"ic\" dentro de \"value\" en la respuesta"
            }
        }
    }
}

/// The part of an upstream customer payload the dashboard relies on.
///
/// Everything else in the payload is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomerSummary {
    /// Internal customer identifier.
    pub ic: Option<String>,
    /// Tax identifier, taken from `cif` or else `nif`.
    pub cif: Option<String>,
    /// Business name, or first name for individuals.
    pub business_name: Option<String>,
    /// First surname, when the customer is an individual.
    pub last_name1: Option<String>,
}

impl CustomerSummary {
    /// Projects the summary out of a full customer response body.
    ///
    /// Returns `None` when the body has no `value` object.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        let value: &Value = body.get("value").filter(|v| v.is_object())?;
        Some(Self {
            ic: non_empty_field(value, "ic"),
            cif: non_empty_field(value, "cif").or_else(|| non_empty_field(value, "nif")),
            business_name: non_empty_field(value, "businessName"),
            last_name1: non_empty_field(value, "lastName1"),
        })
    }

    /// Display name: business name followed by the first surname.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.business_name.as_deref().unwrap_or_default(),
            self.last_name1.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    /// Whether the summary carries enough to be remembered in the history.
    #[must_use]
    pub const fn is_history_worthy(&self) -> bool {
        self.ic.is_some() && self.cif.is_some() && self.business_name.is_some()
    }
}

/// Decides whether a customer response lets the contracts lookup run.
///
/// The cascade fires only on status 200 with a `value.ic` present.
///
/// # Errors
///
/// Returns the specific [`CascadeBlock`] that suppresses the cascade.
pub fn contracts_cascade(status: u16, body: &Value) -> Result<String, CascadeBlock> {
    if status != 200 {
        return Err(CascadeBlock::NonOkStatus(status));
    }
    let summary: CustomerSummary =
        CustomerSummary::from_body(body).ok_or(CascadeBlock::MissingValue)?;
    summary.ic.ok_or(CascadeBlock::MissingIc)
}
