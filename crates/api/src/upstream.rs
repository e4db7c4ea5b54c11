// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The provider API behind the same-origin resource routes.

use crate::auth::obfuscate;
use crate::error::{ApiError, translate_domain_error};
use adc_desk::FetchOutcome;
use adc_desk_activity::{CORRELATION_HEADER, resolve_correlation_id};
use adc_desk_domain::{ResourceKind, ResourceQuery, encode_component};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long one upstream request may take.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings of the provider API.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Base URL, for example `https://apides.nortegas.es/api/adc/v1.0`.
    pub base_url: String,
    /// Basic auth user.
    pub username: String,
    /// Basic auth password.
    pub password: String,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &obfuscate(&self.password))
            .finish()
    }
}

impl UpstreamConfig {
    /// The full upstream URL of a query, with encoded parameters.
    #[must_use]
    pub fn url_for(&self, query: &ResourceQuery) -> String {
        let params: String = query
            .params()
            .into_iter()
            .map(|(name, value)| format!("{name}={}", encode_component(value)))
            .collect::<Vec<String>>()
            .join("&");
        format!(
            "{}/{}?{params}",
            self.base_url.trim_end_matches('/'),
            query.kind().upstream_path()
        )
    }
}

/// A 2xx provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    /// The provider's status code.
    pub status: u16,
    /// The JSON body. `Null` when the provider sent none.
    pub body: Value,
}

impl UpstreamReply {
    /// A `200 OK` reply.
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

/// Fetches provider resources.
///
/// A 2xx response yields its status and JSON body. A non-2xx response yields
/// `ApiError::Upstream` and anything that produced no usable response yields
/// `ApiError::Transport`.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetches one resource.
    async fn fetch(
        &self,
        query: &ResourceQuery,
        correlation_id: &str,
    ) -> Result<UpstreamReply, ApiError>;
}

/// `ResourceClient` over HTTP with Basic credentials.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    config: UpstreamConfig,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: UpstreamConfig) -> Result<Self, ApiError> {
        let http: reqwest::Client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, http })
    }

    /// The connection settings.
    #[must_use]
    pub const fn config(&self) -> &UpstreamConfig {
        &self.config
    }
}

#[async_trait]
impl ResourceClient for UpstreamClient {
    async fn fetch(
        &self,
        query: &ResourceQuery,
        correlation_id: &str,
    ) -> Result<UpstreamReply, ApiError> {
        let url: String = self.config.url_for(query);
        info!(
            resource = %query.kind(),
            correlation_id,
            "Requesting upstream resource"
        );

        let response: reqwest::Response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(CORRELATION_HEADER, correlation_id)
            .send()
            .await
            .map_err(|e| {
                warn!(resource = %query.kind(), error = %e, "Upstream request failed");
                ApiError::Transport {
                    message: e.to_string(),
                }
            })?;

        let status: StatusCode = response.status();
        debug!(
            resource = %query.kind(),
            status = status.as_u16(),
            reason = status.canonical_reason().unwrap_or_default(),
            "Upstream responded"
        );

        if !status.is_success() {
            let details: String = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Could not read upstream error body");
                    String::new()
                }
            };
            return Err(upstream_error(status.as_u16(), status.canonical_reason(), details));
        }

        let text: String = response.text().await.map_err(|e| ApiError::Transport {
            message: e.to_string(),
        })?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::Transport {
                message: format!("Invalid JSON from upstream: {e}"),
            })?
        };

        Ok(UpstreamReply {
            status: status.as_u16(),
            body,
        })
    }
}

/// Builds the error for a non-2xx upstream response.
#[must_use]
pub fn upstream_error(status: u16, reason: Option<&str>, details: String) -> ApiError {
    let error: String = match reason {
        Some(reason) => format!("Error {status}: {reason}"),
        None => format!("Error {status}"),
    };
    ApiError::Upstream {
        status,
        error,
        details,
    }
}

/// Serves one same-origin resource request.
///
/// Parameters are validated before any upstream call. The correlation token
/// is the caller's, or a fresh one.
///
/// # Errors
///
/// Returns `ApiError::MissingParameters` for incomplete parameters, and the
/// client's error otherwise.
pub async fn proxy(
    client: &dyn ResourceClient,
    kind: ResourceKind,
    params: &HashMap<String, String>,
    correlation_id: Option<&str>,
) -> Result<UpstreamReply, ApiError> {
    let query: ResourceQuery =
        ResourceQuery::from_params(kind, params).map_err(translate_domain_error)?;
    let correlation_id: String = resolve_correlation_id(correlation_id);
    client.fetch(&query, &correlation_id).await
}

/// Converts a client result into the outcome a dashboard session consumes.
///
/// Every response keeps its status. Non-2xx responses carry
/// `{error, details}`.
#[must_use]
pub fn fetch_outcome(result: Result<UpstreamReply, ApiError>) -> FetchOutcome {
    match result {
        Ok(UpstreamReply { status, body }) => FetchOutcome::Response { status, body },
        Err(ApiError::Upstream {
            status,
            error,
            details,
        }) => FetchOutcome::Response {
            status,
            body: json!({ "error": error, "details": details }),
        },
        Err(ApiError::Transport { message }) => FetchOutcome::Transport { message },
        Err(err) => FetchOutcome::Transport {
            message: err.to_string(),
        },
    }
}
