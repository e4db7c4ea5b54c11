// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request extractors for dashboard sessions and caller origins.

use adc_desk_api::{DashboardSession, resolve_origin};
use axum::{
    extract::{ConnectInfo, FromRequestParts, Path},
    http::{StatusCode, request::Parts},
};
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Header carrying the client address when behind a reverse proxy.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Extractor for the dashboard session named by the `{token}` path segment.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionHandle(session): SessionHandle,
/// ) -> Result<Json<Session>, HttpError> {
///     Ok(Json(session.snapshot().await))
/// }
/// ```
///
/// # Errors
///
/// Rejects with 400 if the route has no token segment and with 404 if no
/// live session has that token.
pub struct SessionHandle(pub Arc<DashboardSession>);

impl FromRequestParts<AppState> for SessionHandle {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params): Path<HashMap<String, String>> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    warn!(error = %e, "Invalid session path");
                    HttpError::new(StatusCode::BAD_REQUEST, e.body_text(), None)
                })?;

        let token: &String = params.get("token").ok_or_else(|| {
            HttpError::new(
                StatusCode::BAD_REQUEST,
                String::from("Missing session token"),
                None,
            )
        })?;

        let session: Arc<DashboardSession> = state.sessions.get(token).await.map_err(|e| {
            debug!(token = %token, "Unknown session token");
            HttpError::from(e)
        })?;

        Ok(Self(session))
    }
}

/// The caller origin used by the network check.
///
/// Taken from the socket peer, else the first `x-forwarded-for` entry, else
/// the preview sentinel. With `trust_forwarded` set the forwarded header wins
/// over the peer, for deployments behind a reverse proxy.
pub struct CallerOrigin(pub String);

impl FromRequestParts<AppState> for CallerOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let forwarded: Option<&str> = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok());
        let peer: Option<IpAddr> = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let peer: Option<IpAddr> = if state.trust_forwarded && forwarded.is_some() {
            None
        } else {
            peer
        };

        Ok(Self(resolve_origin(peer, forwarded)))
    }
}
