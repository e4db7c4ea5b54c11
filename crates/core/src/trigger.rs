// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::effect::{FetchOutcome, RequestId};
use adc_desk_domain::{ActiveTab, SearchMode};

/// Operator intent or completed I/O, as data only.
///
/// Triggers are the only way to change a dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// The network origin check finished.
    NetworkOriginResolved {
        /// The origin that was checked.
        origin: String,
        /// Whether the origin is inside the corporate network.
        authorized: bool,
        /// Whether access was granted because no origin could be determined.
        preview: bool,
    },
    /// The network origin check could not be carried out.
    NetworkOriginFailed {
        /// Failure detail.
        reason: String,
    },
    /// The shared access key was verified for this session.
    PasswordAccepted,
    /// Start a new top-level search.
    Search {
        /// Which identifier `value` holds.
        mode: SearchMode,
        /// Raw operator input, normalized before use.
        value: String,
    },
    /// Select one of the loaded contracts.
    SelectContract {
        /// Positional contract id (`contract-<index>`).
        contract_id: String,
    },
    /// Switch the detail tab.
    SwitchTab(ActiveTab),
    /// A fetch issued by an earlier effect finished.
    FetchCompleted {
        /// Id of the fetch that finished.
        request: RequestId,
        /// What came back.
        outcome: FetchOutcome,
    },
}

impl Trigger {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NetworkOriginResolved { .. } => "NetworkOriginResolved",
            Self::NetworkOriginFailed { .. } => "NetworkOriginFailed",
            Self::PasswordAccepted => "PasswordAccepted",
            Self::Search { .. } => "Search",
            Self::SelectContract { .. } => "SelectContract",
            Self::SwitchTab(_) => "SwitchTab",
            Self::FetchCompleted { .. } => "FetchCompleted",
        }
    }
}
