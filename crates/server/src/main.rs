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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use adc_desk::{Session, Trigger};
use adc_desk_activity::CORRELATION_HEADER;
use adc_desk_api::{
    AUTHENTICATION_SUCCESS, ApiError, CreateSessionResponse, DEFAULT_CORPORATE_PREFIX,
    HelloResponse, HistoryResponse, INTERNAL_SERVER_ERROR, MISSING_PARAMETERS_ERROR,
    MessageResponse, NetworkGate, NetworkOriginCheck, PasswordRequest, PasswordVerifier,
    ResourceClient, SearchRequest, SelectContractRequest, SessionRegistry, SharedHistory,
    SwitchTabRequest, UpstreamClient, UpstreamConfig, UpstreamReply, VersionResponse, proxy,
    resolve_build_version, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
use adc_desk_domain::{ActiveTab, ResourceKind, SearchMode};
use adc_desk_persistence::{Persistence, SearchHistoryStore};
use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::live::live_activity_handler;
use crate::session::{CallerOrigin, SessionHandle};

/// ADC Desk Server - support dashboard backend for the provider API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ADC_DESK_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "ADC_DESK_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "ADC_DESK_PORT", default_value_t = 3000)]
    port: u16,

    /// Base URL of the provider API
    #[arg(
        long,
        env = "ADC_DESK_UPSTREAM_URL",
        default_value = "https://apides.nortegas.es/api/adc/v1.0"
    )]
    upstream_url: String,

    /// Basic auth user for the provider API
    #[arg(long, env = "ADC_DESK_UPSTREAM_USER", default_value = "RBTMuleApi_ADCDes")]
    upstream_user: String,

    /// Basic auth password for the provider API
    #[arg(long, env = "ADC_DESK_UPSTREAM_PASSWORD", hide_env_values = true)]
    upstream_password: Option<String>,

    /// Access key accepted from outside the corporate network
    #[arg(long, env = "ADC_DESK_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// Address prefix of the corporate network
    #[arg(long, env = "ADC_DESK_CORPORATE_PREFIX", default_value = DEFAULT_CORPORATE_PREFIX)]
    corporate_prefix: String,

    /// Prefer `x-forwarded-for` over the socket peer (behind a reverse proxy)
    #[arg(long, env = "ADC_DESK_TRUST_FORWARDED")]
    trust_forwarded: bool,

    /// Seconds a dashboard session may stay idle before it expires
    #[arg(long, env = "ADC_DESK_SESSION_TTL", default_value_t = 1800)]
    session_ttl: u64,

    /// Path to the deployment counter file
    #[arg(long, env = "ADC_DESK_VERSION_FILE", default_value = "version.json")]
    version_file: PathBuf,

    /// Production mode: increments the deployment counter on start
    #[arg(long, env = "ADC_DESK_PRODUCTION")]
    production: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// Live dashboard sessions, with the shared client and history.
    sessions: Arc<SessionRegistry>,
    /// Corporate network check.
    gate: Arc<NetworkGate>,
    /// Access key verifier.
    verifier: Arc<PasswordVerifier>,
    /// Whether `x-forwarded-for` takes precedence over the socket peer.
    trust_forwarded: bool,
    /// Deployment counter served by `/api/version`.
    version: u64,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    /// Short error label.
    error: String,
    /// Additional detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// HTTP error with status code and message.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error label.
    error: String,
    /// Additional detail.
    details: Option<String>,
}

impl HttpError {
    /// Creates an error response.
    #[must_use]
    pub const fn new(status: StatusCode, error: String, details: Option<String>) -> Self {
        Self {
            status,
            error,
            details,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.error,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

/// The status an API error is reported with.
fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput { .. } | ApiError::MissingParameters { .. } => {
            StatusCode::BAD_REQUEST
        }
        ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
        ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        ApiError::AccessPending { .. } => StatusCode::CONFLICT,
        ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
        ApiError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ApiError::Configuration { .. } | ApiError::Transport { .. } | ApiError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = status_for(&err);
        match err {
            ApiError::MissingParameters { details } => Self::new(
                status,
                String::from(MISSING_PARAMETERS_ERROR),
                Some(details),
            ),
            ApiError::Upstream { error, details, .. } => Self::new(status, error, Some(details)),
            ApiError::Transport { message } | ApiError::Internal { message } => {
                Self::new(status, String::from(INTERNAL_SERVER_ERROR), Some(message))
            }
            _ => Self::new(status, err.user_message(), None),
        }
    }
}

/// Handler for GET `/api/{resource}`.
///
/// Forwards the query to the provider API after checking its parameters.
/// A 2xx reply is returned with the provider's status.
async fn handle_proxy(
    AxumState(app_state): AxumState<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let kind: ResourceKind = resource.parse().map_err(translate_domain_error)?;
    let correlation_id: Option<&str> = headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok());

    info!(resource = %kind, correlation_id, "Handling proxy request");

    let client: &dyn ResourceClient = app_state.sessions.client().as_ref();
    let reply: UpstreamReply = proxy(client, kind, &params, correlation_id)
        .await
        .inspect_err(|e| match e {
            ApiError::Upstream { status, .. } => {
                warn!(resource = %kind, status, "Upstream returned an error");
            }
            ApiError::MissingParameters { .. } => {}
            _ => error!(resource = %kind, error = %e, "Proxy request failed"),
        })?;

    let status: StatusCode = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
    if status == StatusCode::NO_CONTENT {
        return Ok(status.into_response());
    }
    Ok((status, Json(reply.body)).into_response())
}

/// Handler for GET `/api/check-ip`.
async fn handle_check_ip(
    AxumState(app_state): AxumState<AppState>,
    CallerOrigin(origin): CallerOrigin,
) -> Json<NetworkOriginCheck> {
    Json(app_state.gate.check(&origin))
}

/// Handler for POST `/api/verify-auth`.
///
/// Every outcome is reported as `{message}`.
async fn handle_verify_auth(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<PasswordRequest>,
) -> Response {
    match app_state.verifier.verify(&req.password) {
        Ok(()) => {
            info!("Access key verified");
            Json(MessageResponse {
                message: String::from(AUTHENTICATION_SUCCESS),
            })
            .into_response()
        }
        Err(e) => {
            let err: ApiError = ApiError::from(e);
            warn!(error = %err, "Access key verification failed");
            (
                status_for(&err),
                Json(MessageResponse {
                    message: err.user_message(),
                }),
            )
                .into_response()
        }
    }
}

/// Handler for POST `/api/sessions`.
///
/// Creates a dashboard session and resolves its network check from the
/// caller origin.
async fn handle_create_session(
    AxumState(app_state): AxumState<AppState>,
    CallerOrigin(origin): CallerOrigin,
) -> Result<Json<CreateSessionResponse>, HttpError> {
    let session = app_state.sessions.create().await;
    let check: NetworkOriginCheck = app_state.gate.check(&origin);
    let snapshot: Session = session
        .resolve_network(&check)
        .await
        .map_err(translate_core_error)?;

    Ok(Json(CreateSessionResponse {
        token: session.token().to_string(),
        snapshot,
    }))
}

/// Handler for GET `/api/sessions/{token}`.
async fn handle_get_session(SessionHandle(session): SessionHandle) -> Json<Session> {
    Json(session.snapshot().await)
}

/// Handler for DELETE `/api/sessions/{token}`.
async fn handle_delete_session(
    AxumState(app_state): AxumState<AppState>,
    SessionHandle(session): SessionHandle,
) -> StatusCode {
    app_state.sessions.remove(session.token()).await;
    info!(token = %session.token(), "Dashboard session closed");
    StatusCode::NO_CONTENT
}

/// Handler for POST `/api/sessions/{token}/password`.
async fn handle_session_password(
    AxumState(app_state): AxumState<AppState>,
    SessionHandle(session): SessionHandle,
    Json(req): Json<PasswordRequest>,
) -> Result<Json<Session>, HttpError> {
    let snapshot: Session = session
        .authenticate(&req.password, &app_state.verifier)
        .await?;
    Ok(Json(snapshot))
}

/// Handler for POST `/api/sessions/{token}/search`.
async fn handle_search(
    SessionHandle(session): SessionHandle,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Session>, HttpError> {
    let mode: SearchMode = req.mode.parse().map_err(translate_domain_error)?;
    info!(token = %session.token(), mode = %mode, "Handling search request");

    let snapshot: Session = session
        .dispatch(Trigger::Search {
            mode,
            value: req.value,
        })
        .await
        .map_err(translate_core_error)?;
    Ok(Json(snapshot))
}

/// Handler for POST `/api/sessions/{token}/contract`.
async fn handle_select_contract(
    SessionHandle(session): SessionHandle,
    Json(req): Json<SelectContractRequest>,
) -> Result<Json<Session>, HttpError> {
    let snapshot: Session = session
        .dispatch(Trigger::SelectContract {
            contract_id: req.contract_id,
        })
        .await
        .map_err(translate_core_error)?;
    Ok(Json(snapshot))
}

/// Handler for POST `/api/sessions/{token}/tab`.
async fn handle_switch_tab(
    SessionHandle(session): SessionHandle,
    Json(req): Json<SwitchTabRequest>,
) -> Result<Json<Session>, HttpError> {
    let tab: ActiveTab = req.tab.parse().map_err(translate_domain_error)?;
    let snapshot: Session = session
        .dispatch(Trigger::SwitchTab(tab))
        .await
        .map_err(translate_core_error)?;
    Ok(Json(snapshot))
}

/// Handler for POST `/api/sessions/{token}/history/{id}`.
///
/// Re-runs the search of a history item in the session.
async fn handle_rerun_history(
    SessionHandle(session): SessionHandle,
    Path((_token, id)): Path<(String, String)>,
) -> Result<Json<Session>, HttpError> {
    let snapshot: Session = session.rerun_history(&id).await?;
    Ok(Json(snapshot))
}

/// Handler for GET `/api/history`.
async fn handle_get_history(AxumState(app_state): AxumState<AppState>) -> Json<HistoryResponse> {
    let store = app_state.sessions.history().lock().await;
    Json(HistoryResponse {
        items: store.items().to_vec(),
    })
}

/// Handler for DELETE `/api/history`.
async fn handle_clear_history(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<HistoryResponse>, HttpError> {
    let mut store = app_state.sessions.history().lock().await;
    store.clear().map_err(translate_persistence_error)?;
    drop(store);

    info!("Search history cleared");
    Ok(Json(HistoryResponse { items: Vec::new() }))
}

/// Handler for GET `/api/hello`.
async fn handle_hello() -> Json<HelloResponse> {
    let timestamp: String = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));
    Json(HelloResponse {
        message: String::from("Hola desde la API de ADC Desk"),
        timestamp,
        status: String::from("online"),
    })
}

/// Handler for GET `/api/version`.
async fn handle_version(AxumState(app_state): AxumState<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: app_state.version,
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/check-ip", get(handle_check_ip))
        .route("/api/verify-auth", post(handle_verify_auth))
        .route("/api/hello", get(handle_hello))
        .route("/api/version", get(handle_version))
        .route(
            "/api/history",
            get(handle_get_history).delete(handle_clear_history),
        )
        .route("/api/sessions", post(handle_create_session))
        .route(
            "/api/sessions/{token}",
            get(handle_get_session).delete(handle_delete_session),
        )
        .route(
            "/api/sessions/{token}/password",
            post(handle_session_password),
        )
        .route("/api/sessions/{token}/search", post(handle_search))
        .route("/api/sessions/{token}/contract", post(handle_select_contract))
        .route("/api/sessions/{token}/tab", post(handle_switch_tab))
        .route(
            "/api/sessions/{token}/history/{id}",
            post(handle_rerun_history),
        )
        .route("/api/sessions/{token}/live", get(live_activity_handler))
        .route("/api/{resource}", get(handle_proxy))
        .with_state(app_state)
}

/// Drops expired dashboard sessions in the background.
///
/// Sweeps at a tenth of the session TTL, at least once a second.
fn spawn_session_sweeper(sessions: Arc<SessionRegistry>) -> tokio::task::JoinHandle<()> {
    let period: Duration = (sessions.ttl() / 10).max(Duration::from_secs(1));
    info!(ttl_secs = sessions.ttl().as_secs(), "Session expiry enabled");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sessions.evict_idle().await;
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing ADC Desk Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    let history: SharedHistory = Arc::new(Mutex::new(SearchHistoryStore::open(persistence)));

    if args.upstream_password.is_none() {
        warn!("No upstream password configured; provider requests will be rejected");
    }
    let client: UpstreamClient = UpstreamClient::new(UpstreamConfig {
        base_url: args.upstream_url.clone(),
        username: args.upstream_user.clone(),
        password: args.upstream_password.clone().unwrap_or_default(),
    })?;

    let verifier: PasswordVerifier = PasswordVerifier::from_secret(args.access_key.as_deref())?;
    if !verifier.is_configured() {
        warn!("No access key configured; access from outside the corporate network is disabled");
    }

    let version: u64 = resolve_build_version(&args.version_file, args.production);
    info!(version, production = args.production, "Serving deployment version");

    let client: Arc<dyn ResourceClient> = Arc::new(client);
    let app_state: AppState = AppState {
        sessions: Arc::new(
            SessionRegistry::new(client, history).with_ttl(Duration::from_secs(args.session_ttl)),
        ),
        gate: Arc::new(NetworkGate::new(args.corporate_prefix.clone())),
        verifier: Arc::new(verifier),
        trust_forwarded: args.trust_forwarded,
        version,
    };

    spawn_session_sweeper(Arc::clone(&app_state.sessions));

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests;
