// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! API boundary of the support desk: access gating, the upstream resource
//! client and the dashboard session driver.

mod auth;
mod dashboard;
mod error;
mod request_response;
mod upstream;
mod version;

#[cfg(test)]
mod tests;

pub use auth::{
    DEFAULT_CORPORATE_PREFIX, NetworkGate, NetworkOriginCheck, PREVIEW_ORIGIN, PasswordError,
    PasswordVerifier, SessionCredential, generate_session_token, obfuscate, resolve_origin,
};
pub use dashboard::{
    ACTIVITY_CHANNEL_CAPACITY, DEFAULT_SESSION_TTL, DashboardSession, SessionRegistry, SharedHistory,
};
pub use error::{
    ApiError, INTERNAL_SERVER_ERROR, MISSING_PARAMETERS_ERROR, required_parameters_details,
    translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use request_response::{
    AUTHENTICATION_SUCCESS, CreateSessionResponse, HelloResponse, HistoryResponse,
    MessageResponse, PasswordRequest, SearchRequest, SelectContractRequest, SwitchTabRequest,
    VersionResponse,
};
pub use upstream::{
    ResourceClient, UPSTREAM_TIMEOUT, UpstreamClient, UpstreamConfig, UpstreamReply, fetch_outcome,
    proxy, upstream_error,
};
pub use version::{DEFAULT_VERSION, VersionFile, read_version, resolve_build_version};
