// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Proxied upstream resources and their validated query parameters.

use crate::error::DomainError;
use crate::types::SearchMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Customer looked up when the customer route is called without parameters.
pub const DEFAULT_CUSTOMER_NIF: &str = "72430367D";

/// The upstream resources exposed behind same-origin routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Customer master data.
    Customer,
    /// Detailed contracts of a customer.
    Contracts,
    /// Consumption readings of one contract.
    Consumption,
    /// Invoices of one contract within a date window.
    Invoices,
    /// Inspection reports of one supply point.
    InspectionReports,
}

impl ResourceKind {
    /// All kinds, in cascade order.
    pub const ALL: [Self; 5] = [
        Self::Customer,
        Self::Contracts,
        Self::Consumption,
        Self::Invoices,
        Self::InspectionReports,
    ];

    /// The same-origin path segment (`/api/<segment>`).
    #[must_use]
    pub const fn local_segment(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Contracts => "contracts",
            Self::Consumption => "consums",
            Self::Invoices => "invoices",
            Self::InspectionReports => "inspection-reports",
        }
    }

    /// The upstream path relative to the provider API base URL.
    #[must_use]
    pub const fn upstream_path(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Contracts => "contracts/detailed-contracts",
            Self::Consumption => "consums",
            Self::Invoices => "contracts/invoices",
            Self::InspectionReports => "contracts/inspection-reports",
        }
    }

    /// The parameters the resource requires.
    ///
    /// The customer resource accepts either `nif` or `ic` and falls back to
    /// a default, so it requires nothing.
    #[must_use]
    pub const fn required_params(&self) -> &'static [&'static str] {
        match self {
            Self::Customer => &[],
            Self::Contracts => &["ic"],
            Self::Consumption => &["cups", "contractId", "ic"],
            Self::Invoices => &["ic", "contract", "dateFrom", "dateTo", "status"],
            Self::InspectionReports => &["ic", "cups"],
        }
    }
}

impl FromStr for ResourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.local_segment() == s)
            .ok_or_else(|| DomainError::UnknownResource(s.to_string()))
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.local_segment())
    }
}

/// A fully validated request for one upstream resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum ResourceQuery {
    /// Customer by tax identifier or internal identifier.
    Customer {
        /// Which identifier `value` holds.
        mode: SearchMode,
        /// The identifier value.
        value: String,
    },
    /// Contracts of a customer.
    Contracts {
        /// Internal customer identifier.
        ic: String,
    },
    /// Consumption of a contract.
    Consumption {
        /// Supply point.
        cups: String,
        /// Upstream contract identifier.
        contract_id: String,
        /// Internal customer identifier.
        ic: String,
    },
    /// Invoices of a contract.
    Invoices {
        /// Internal customer identifier.
        ic: String,
        /// Contract number.
        contract: String,
        /// Window start, `AAAAMMDD`.
        date_from: String,
        /// Window end, `AAAAMMDD`.
        date_to: String,
        /// Invoice status filter.
        status: String,
    },
    /// Inspection reports of a supply point.
    InspectionReports {
        /// Internal customer identifier.
        ic: String,
        /// Supply point.
        cups: String,
    },
}

impl ResourceQuery {
    /// Validates raw query parameters for a resource.
    ///
    /// Empty values count as missing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingParameters` naming every parameter the
    /// resource requires if any of them is missing.
    pub fn from_params(
        kind: ResourceKind,
        params: &HashMap<String, String>,
    ) -> Result<Self, DomainError> {
        let get = |name: &str| -> Option<String> {
            params
                .get(name)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let missing = || DomainError::MissingParameters {
            resource: kind.local_segment(),
            required: kind.required_params().to_vec(),
        };

        match kind {
            ResourceKind::Customer => Ok(get("ic").map_or_else(
                || Self::Customer {
                    mode: SearchMode::Dni,
                    value: get("nif").unwrap_or_else(|| DEFAULT_CUSTOMER_NIF.to_string()),
                },
                |ic| Self::Customer {
                    mode: SearchMode::Ic,
                    value: ic,
                },
            )),
            ResourceKind::Contracts => Ok(Self::Contracts {
                ic: get("ic").ok_or_else(missing)?,
            }),
            ResourceKind::Consumption => {
                match (get("cups"), get("contractId"), get("ic")) {
                    (Some(cups), Some(contract_id), Some(ic)) => Ok(Self::Consumption {
                        cups,
                        contract_id,
                        ic,
                    }),
                    _ => Err(missing()),
                }
            }
            ResourceKind::Invoices => match (
                get("ic"),
                get("contract"),
                get("dateFrom"),
                get("dateTo"),
                get("status"),
            ) {
                (Some(ic), Some(contract), Some(date_from), Some(date_to), Some(status)) => {
                    Ok(Self::Invoices {
                        ic,
                        contract,
                        date_from,
                        date_to,
                        status,
                    })
                }
                _ => Err(missing()),
            },
            ResourceKind::InspectionReports => match (get("ic"), get("cups")) {
                (Some(ic), Some(cups)) => Ok(Self::InspectionReports { ic, cups }),
                _ => Err(missing()),
            },
        }
    }

    /// The kind of resource this query targets.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Customer { .. } => ResourceKind::Customer,
            Self::Contracts { .. } => ResourceKind::Contracts,
            Self::Consumption { .. } => ResourceKind::Consumption,
            Self::Invoices { .. } => ResourceKind::Invoices,
            Self::InspectionReports { .. } => ResourceKind::InspectionReports,
        }
    }

    /// Query parameters in the order the upstream documents them.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Customer { mode, value } => vec![(mode.query_param(), value.as_str())],
            Self::Contracts { ic } => vec![("ic", ic.as_str())],
            Self::Consumption {
                cups,
                contract_id,
                ic,
            } => vec![
                ("cups", cups.as_str()),
                ("contractId", contract_id.as_str()),
                ("ic", ic.as_str()),
            ],
            Self::Invoices {
                ic,
                contract,
                date_from,
                date_to,
                status,
            } => vec![
                ("ic", ic.as_str()),
                ("contract", contract.as_str()),
                ("dateFrom", date_from.as_str()),
                ("dateTo", date_to.as_str()),
                ("status", status.as_str()),
            ],
            Self::InspectionReports { ic, cups } => {
                vec![("ic", ic.as_str()), ("cups", cups.as_str())]
            }
        }
    }

    /// The same-origin URL of this query, as shown in the activity console.
    #[must_use]
    pub fn local_url(&self) -> String {
        let query: String = self
            .params()
            .into_iter()
            .map(|(name, value)| format!("{name}={}", encode_component(value)))
            .collect::<Vec<String>>()
            .join("&");
        format!("/api/{}?{query}", self.kind().local_segment())
    }
}

/// Percent-encodes a query component, leaving RFC 3986 unreserved characters.
#[must_use]
pub fn encode_component(value: &str) -> String {
    let mut encoded: String = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
