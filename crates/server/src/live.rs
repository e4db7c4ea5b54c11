// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live activity streaming for the dashboard console.
//!
//! Each WebSocket connection follows one dashboard session and receives the
//! activity entries appended to it. Delivery is best-effort: a client that
//! falls behind is told how many entries it missed and must fetch the
//! session snapshot for the authoritative log. No triggers are accepted over
//! the socket.

use adc_desk_activity::ActivityEntry;
use axum::{
    extract::{
        WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use crate::session::SessionHandle;

/// Messages sent over a live activity connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Session being followed.
        token: String,
        /// Server timestamp (RFC 3339).
        timestamp: String,
    },
    /// An entry was appended to the activity console.
    Activity {
        /// The new entry.
        entry: ActivityEntry,
    },
    /// The client fell behind and entries were dropped.
    Lagged {
        /// How many entries were dropped.
        skipped: u64,
    },
}

impl LiveEvent {
    /// Maps a broadcast receive result to the event to forward, if any.
    ///
    /// Returns `None` once the session is gone.
    fn from_recv(result: Result<ActivityEntry, RecvError>) -> Option<Self> {
        match result {
            Ok(entry) => Some(Self::Activity { entry }),
            Err(RecvError::Lagged(skipped)) => Some(Self::Lagged { skipped }),
            Err(RecvError::Closed) => None,
        }
    }
}

/// Handles WebSocket upgrade requests for `/api/sessions/{token}/live`.
pub async fn live_activity_handler(
    ws: WebSocketUpgrade,
    SessionHandle(session): SessionHandle,
) -> Response {
    let token: String = session.token().to_string();
    let rx: broadcast::Receiver<ActivityEntry> = session.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, token, rx))
}

/// Streams activity entries until the client disconnects or the session is
/// dropped.
async fn handle_socket(
    socket: WebSocket,
    token: String,
    mut rx: broadcast::Receiver<ActivityEntry>,
) {
    info!(token = %token, "Client connected to live activity stream");

    let (mut sender, mut receiver) = socket.split();

    let connected_event: LiveEvent = LiveEvent::Connected {
        token: token.clone(),
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = LiveEvent::from_recv(rx.recv().await) {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize live event");
                }
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!(token = %token, "Client disconnected from live activity stream");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_becomes_activity_event() {
        let entry: ActivityEntry = ActivityEntry::info("Se encontraron 2 contratos");
        assert_eq!(
            LiveEvent::from_recv(Ok(entry.clone())),
            Some(LiveEvent::Activity { entry })
        );
    }

    #[test]
    fn test_lag_is_reported() {
        assert_eq!(
            LiveEvent::from_recv(Err(RecvError::Lagged(3))),
            Some(LiveEvent::Lagged { skipped: 3 })
        );
    }

    #[test]
    fn test_closed_session_ends_stream() {
        assert_eq!(LiveEvent::from_recv(Err(RecvError::Closed)), None);
    }

    #[test]
    fn test_event_serialization() {
        let event: LiveEvent = LiveEvent::Activity {
            entry: ActivityEntry::error("Llamada a API de consumos cancelada"),
        };

        let json: String = serde_json::to_string(&event).expect("Failed to serialize");
        assert!(json.contains(r#""type":"activity""#));
        assert!(json.contains(r#""method":"ERROR""#));

        let deserialized: LiveEvent = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_receiver_sees_entries_in_order() {
        let (tx, mut rx) = broadcast::channel::<ActivityEntry>(4);
        tx.send(ActivityEntry::info("uno")).unwrap();
        tx.send(ActivityEntry::info("dos")).unwrap();

        let first = LiveEvent::from_recv(rx.recv().await);
        let second = LiveEvent::from_recv(rx.recv().await);
        assert!(matches!(first, Some(LiveEvent::Activity { entry }) if entry.url == "uno"));
        assert!(matches!(second, Some(LiveEvent::Activity { entry }) if entry.url == "dos"));
    }
}
