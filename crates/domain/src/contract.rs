// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::NOT_AVAILABLE;
use crate::validation::{non_empty_field, or_not_available};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A contract as offered in the contract selector.
///
/// Built from one entry of the upstream `value.contracts` array. The `id` is
/// positional (`contract-<index>`) and therefore only meaningful within the
/// contracts response it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Positional identifier, e.g. `contract-0`.
    pub id: String,
    /// `contractType-contractNumber-cups`, `N/A` for missing parts.
    pub label: String,
    /// Contract type code (`02` LPG, `04` natural gas).
    pub contract_type: Option<String>,
    /// Commercial contract number. Used as the invoices `contract` parameter.
    pub contract_number: Option<String>,
    /// Supply point identifier.
    pub cups: Option<String>,
    /// Upstream contract identifier. Used by the consumption lookup.
    pub contract_id: Option<String>,
    /// Gas type shown on the contract card.
    pub gas_type: GasType,
    /// Supply address joined into a single line.
    pub supply_address: String,
    /// Name of the marketer, when known.
    pub marketer_name: Option<String>,
    /// Whether the contract carries additional maintenance services.
    pub has_services: bool,
    /// The untouched upstream entry.
    pub raw: Value,
}

/// Gas type derived from the contract type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GasType {
    /// Liquefied petroleum gas (`02`).
    #[serde(rename = "GLP")]
    Lpg,
    /// Natural gas (`04`).
    #[serde(rename = "GN")]
    Natural,
    /// Any other code.
    #[serde(rename = "Desconocido")]
    Unknown,
}

impl GasType {
    /// Maps an upstream contract type code.
    #[must_use]
    pub fn from_contract_type(code: Option<&str>) -> Self {
        match code {
            Some("02") => Self::Lpg,
            Some("04") => Self::Natural,
            _ => Self::Unknown,
        }
    }
}

/// Builds the selector label for a contract.
#[must_use]
pub fn contract_label(
    contract_type: Option<&str>,
    contract_number: Option<&str>,
    cups: Option<&str>,
) -> String {
    format!(
        "{}-{}-{}",
        or_not_available(contract_type),
        or_not_available(contract_number),
        or_not_available(cups)
    )
}

/// Formats the `supplyAddress` object of a contract into one line.
///
/// Parts are `street, number`, `Piso: floor, Puerta: door` and
/// `municipality, province`, joined with ` - `. Missing parts are skipped.
#[must_use]
pub fn format_supply_address(contract: &Value) -> String {
    let Some(address) = contract.get("supplyAddress").filter(|a| a.is_object()) else {
        return String::from("Dirección no disponible");
    };

    let mut parts: Vec<String> = Vec::new();

    if let Some(street) = non_empty_field(address, "street") {
        match non_empty_field(address, "number") {
            Some(number) => parts.push(format!("{street}, {number}")),
            None => parts.push(street),
        }
    }

    let floor_door: Vec<String> = [
        non_empty_field(address, "floor").map(|floor| format!("Piso: {floor}")),
        non_empty_field(address, "door").map(|door| format!("Puerta: {door}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !floor_door.is_empty() {
        parts.push(floor_door.join(", "));
    }

    let location: Vec<String> = [
        non_empty_field(address, "municipality"),
        non_empty_field(address, "province"),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !location.is_empty() {
        parts.push(location.join(", "));
    }

    if parts.is_empty() {
        String::from("Dirección no disponible")
    } else {
        parts.join(" - ")
    }
}

impl Contract {
    /// Projects one upstream contract entry.
    #[must_use]
    pub fn from_entry(index: usize, entry: &Value) -> Self {
        let contract_type: Option<String> = non_empty_field(entry, "contractType");
        let contract_number: Option<String> = non_empty_field(entry, "contractNumber");
        let cups: Option<String> = non_empty_field(entry, "cups");
        let contract_id: Option<String> = non_empty_field(entry, "contractId");

        let label: String = contract_label(
            contract_type.as_deref(),
            contract_number.as_deref(),
            cups.as_deref(),
        );

        let marketer_name: Option<String> = entry
            .get("marketer")
            .and_then(|marketer| non_empty_field(marketer, "name"));
        let has_services: bool = entry
            .get("services")
            .and_then(Value::as_array)
            .is_some_and(|services| !services.is_empty());

        Self {
            id: format!("contract-{index}"),
            label,
            gas_type: GasType::from_contract_type(contract_type.as_deref()),
            contract_type,
            contract_number,
            cups,
            contract_id,
            supply_address: format_supply_address(entry),
            marketer_name,
            has_services,
            raw: entry.clone(),
        }
    }

    /// Display value for the supply point, `N/A` when missing.
    #[must_use]
    pub fn cups_or_placeholder(&self) -> &str {
        self.cups.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Extracts the contracts array of a contracts response body.
///
/// Returns `None` when `value.contracts` is absent or not an array, which
/// the caller reports as "no contracts found".
#[must_use]
pub fn project_contracts(body: &Value) -> Option<Vec<Contract>> {
    let entries: &Vec<Value> = body.get("value")?.get("contracts")?.as_array()?;
    Some(
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Contract::from_entry(index, entry))
            .collect(),
    )
}
