// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard sessions: the async driver around the core state machine.
//!
//! Each session owns its state behind a mutex and is the only writer of it.
//! Fetch effects run as independent tasks that report their outcome over a
//! channel to the session's pump task, which feeds them back as
//! `FetchCompleted` triggers.

use crate::auth::{
    NetworkOriginCheck, PasswordVerifier, SessionCredential, generate_session_token,
};
use crate::error::{ApiError, translate_core_error};
use crate::upstream::{ResourceClient, fetch_outcome};
use adc_desk::{
    CoreError, Effect, FetchOutcome, FetchRequest, RequestId, Session, TransitionResult, Trigger,
    apply,
};
use adc_desk_activity::ActivityEntry;
use adc_desk_domain::HistoryItem;
use adc_desk_persistence::SearchHistoryStore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, Notify, RwLock, broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Capacity of the live activity channel of one session.
pub const ACTIVITY_CHANNEL_CAPACITY: usize = 256;

/// Search history shared by every session.
pub type SharedHistory = Arc<Mutex<SearchHistoryStore>>;

type OutcomeSender = mpsc::UnboundedSender<(RequestId, FetchOutcome)>;

/// One operator's dashboard.
pub struct DashboardSession {
    token: String,
    state: Mutex<Session>,
    credential: Mutex<SessionCredential>,
    client: Arc<dyn ResourceClient>,
    history: SharedHistory,
    outcomes: OutcomeSender,
    activity: broadcast::Sender<ActivityEntry>,
    idle: Notify,
}

impl std::fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSession")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl DashboardSession {
    /// Creates a session and starts its pump task.
    ///
    /// Must be called inside a tokio runtime. The pump stops once the
    /// session is dropped.
    #[must_use]
    pub fn start(
        token: String,
        client: Arc<dyn ResourceClient>,
        history: SharedHistory,
    ) -> Arc<Self> {
        let (outcomes, mut receiver) = mpsc::unbounded_channel::<(RequestId, FetchOutcome)>();
        let (activity, _) = broadcast::channel::<ActivityEntry>(ACTIVITY_CHANNEL_CAPACITY);

        let session: Arc<Self> = Arc::new(Self {
            token,
            state: Mutex::new(Session::new()),
            credential: Mutex::new(SessionCredential::new()),
            client,
            history,
            outcomes,
            activity,
            idle: Notify::new(),
        });

        let weak: Weak<Self> = Arc::downgrade(&session);
        tokio::spawn(async move {
            while let Some((request, outcome)) = receiver.recv().await {
                let Some(session) = weak.upgrade() else {
                    break;
                };
                if let Err(e) = session
                    .dispatch(Trigger::FetchCompleted { request, outcome })
                    .await
                {
                    warn!(token = %session.token, error = %e, "Fetch outcome rejected");
                }
            }
            debug!("Session pump stopped");
        });

        session
    }

    /// The token addressing this session.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Applies a trigger and carries out the resulting effects.
    ///
    /// Returns the session as it is right after the transition.
    ///
    /// # Errors
    ///
    /// Returns the core error if the trigger was rejected. The session is
    /// unchanged in that case.
    pub async fn dispatch(&self, trigger: Trigger) -> Result<Session, CoreError> {
        let trigger_name: &'static str = trigger.name();
        let resets_activity: bool = matches!(trigger, Trigger::Search { .. });

        let mut state = self.state.lock().await;
        let logged_before: usize = state.activity.len();
        let result: TransitionResult = apply(&state, trigger, Utc::now()).inspect_err(|e| {
            debug!(token = %self.token, trigger = trigger_name, error = %e, "Trigger rejected");
        })?;
        *state = result.new_session;

        let first_new: usize = if resets_activity { 0 } else { logged_before };
        for entry in state.activity.since(first_new) {
            // Nobody listening is fine.
            let _ = self.activity.send(entry.clone());
        }

        let snapshot: Session = state.clone();
        let idle: bool = state.in_flight().is_empty();
        drop(state);

        debug!(
            token = %self.token,
            trigger = trigger_name,
            effects = result.effects.len(),
            "Trigger applied"
        );

        for effect in result.effects {
            match effect {
                Effect::Fetch(request) => self.spawn_fetch(request),
                Effect::RecordHistory(item) => self.record_history(item).await,
            }
        }

        if idle {
            self.idle.notify_waiters();
        }
        Ok(snapshot)
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let client: Arc<dyn ResourceClient> = Arc::clone(&self.client);
        let outcomes: OutcomeSender = self.outcomes.clone();
        tokio::spawn(async move {
            let result = client.fetch(&request.query, &request.correlation_id).await;
            if outcomes
                .send((request.request_id, fetch_outcome(result)))
                .is_err()
            {
                debug!(request = %request.request_id, "Session closed before fetch completed");
            }
        });
    }

    async fn record_history(&self, item: HistoryItem) {
        let ic: String = item.ic.clone();
        if let Err(e) = self.history.lock().await.upsert(item) {
            warn!(ic = %ic, error = %e, "Failed to record search history");
        }
    }

    /// Feeds the network origin check into the session.
    ///
    /// # Errors
    ///
    /// Returns the core error if the trigger was rejected.
    pub async fn resolve_network(&self, check: &NetworkOriginCheck) -> Result<Session, CoreError> {
        self.dispatch(check.to_trigger()).await
    }

    /// Verifies the access key and latches the session on success.
    ///
    /// The key is verified on every call. Only the first accepted key
    /// feeds the latch into the state machine.
    ///
    /// # Errors
    ///
    /// Returns the verifier's error translated for the API, or the core
    /// error if the latch was rejected.
    pub async fn authenticate(
        &self,
        password: &str,
        verifier: &PasswordVerifier,
    ) -> Result<Session, ApiError> {
        verifier.verify(password)?;

        let mut credential = self.credential.lock().await;
        if !credential.accept(password) {
            drop(credential);
            debug!(token = %self.token, "Session already holds an accepted key");
            return Ok(self.snapshot().await);
        }
        info!(
            token = %self.token,
            key = credential.masked_key().unwrap_or_default(),
            "Access key accepted"
        );
        drop(credential);

        self.dispatch(Trigger::PasswordAccepted)
            .await
            .map_err(translate_core_error)
    }

    /// Re-runs the search of a history item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` for an unknown id, or the
    /// translated core error if the search was rejected.
    pub async fn rerun_history(&self, id: &str) -> Result<Session, ApiError> {
        let item: HistoryItem = self
            .history
            .lock()
            .await
            .find(id)
            .cloned()
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("History item"),
                message: format!("History item '{id}' does not exist"),
            })?;
        self.dispatch(Trigger::Search {
            mode: item.search_mode,
            value: item.search_value,
        })
        .await
        .map_err(translate_core_error)
    }

    /// The current state.
    pub async fn snapshot(&self) -> Session {
        self.state.lock().await.clone()
    }

    /// Whether a live stream is subscribed to this session.
    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.activity.receiver_count() > 0
    }

    /// Subscribes to activity entries appended from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEntry> {
        self.activity.subscribe()
    }

    /// Waits until no fetch is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let mut notified = std::pin::pin!(self.idle.notified());
            notified.as_mut().enable();
            if self.state.lock().await.in_flight().is_empty() {
                return;
            }
            notified.await;
        }
    }
}

/// Default idle time after which a session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

struct RegisteredSession {
    session: Arc<DashboardSession>,
    last_activity: Instant,
}

impl RegisteredSession {
    /// Idle for at least `ttl` and nobody is watching its live stream.
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.last_activity) >= ttl && !self.session.has_subscribers()
    }
}

/// Live dashboard sessions by token.
///
/// A session expires once it has not been looked up for the registry's TTL.
/// Expired sessions are dropped when looked up, on every `create`, and by
/// [`SessionRegistry::evict_idle`].
pub struct SessionRegistry {
    client: Arc<dyn ResourceClient>,
    history: SharedHistory,
    ttl: Duration,
    sessions: RwLock<HashMap<String, RegisteredSession>>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions share `client` and
    /// `history` and expire after [`DEFAULT_SESSION_TTL`].
    #[must_use]
    pub fn new(client: Arc<dyn ResourceClient>, history: SharedHistory) -> Self {
        Self {
            client,
            history,
            ttl: DEFAULT_SESSION_TTL,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the idle time after which a session expires.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The idle time after which a session expires.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The shared search history.
    #[must_use]
    pub const fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// The shared resource client.
    #[must_use]
    pub const fn client(&self) -> &Arc<dyn ResourceClient> {
        &self.client
    }

    /// Creates and registers a new session, dropping expired ones first.
    pub async fn create(&self) -> Arc<DashboardSession> {
        let token: String = generate_session_token();
        let session: Arc<DashboardSession> = DashboardSession::start(
            token.clone(),
            Arc::clone(&self.client),
            Arc::clone(&self.history),
        );

        let mut sessions = self.sessions.write().await;
        let now: Instant = Instant::now();
        Self::retain_live(&mut sessions, self.ttl, now);
        sessions.insert(
            token.clone(),
            RegisteredSession {
                session: Arc::clone(&session),
                last_activity: now,
            },
        );
        let live: usize = sessions.len();
        drop(sessions);

        info!(token = %token, live, "Dashboard session created");
        session
    }

    /// Looks up a session and marks it as active.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` for an unknown or expired token.
    pub async fn get(&self, token: &str) -> Result<Arc<DashboardSession>, ApiError> {
        let mut sessions = self.sessions.write().await;
        let now: Instant = Instant::now();

        let expired: bool = match sessions.get_mut(token) {
            Some(entry) if entry.is_expired(self.ttl, now) => true,
            Some(entry) => {
                entry.last_activity = now;
                return Ok(Arc::clone(&entry.session));
            }
            None => false,
        };
        if expired {
            sessions.remove(token);
            info!(token = %token, "Dashboard session expired");
        }

        Err(ApiError::ResourceNotFound {
            resource_type: String::from("Session"),
            message: String::from("La sesión no existe o ha caducado"),
        })
    }

    /// Drops a session. Returns whether it existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Drops every expired session. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let evicted: usize = Self::retain_live(&mut sessions, self.ttl, Instant::now());
        let live: usize = sessions.len();
        drop(sessions);

        if evicted > 0 {
            info!(evicted, live, "Expired dashboard sessions dropped");
        }
        evicted
    }

    fn retain_live(
        sessions: &mut HashMap<String, RegisteredSession>,
        ttl: Duration,
        now: Instant,
    ) -> usize {
        let before: usize = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(ttl, now));
        before - sessions.len()
    }

    /// Number of registered sessions, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no session is registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
