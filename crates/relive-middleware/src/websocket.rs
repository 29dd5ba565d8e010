//! WebSocket handler for live reload.
//!
//! Each connection receives a single `server-info` message carrying the
//! server start time, then stays open until the client goes away. Incoming
//! messages are read only to notice the disconnect.

use axum::extract::State;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::LiveReloadError;
use crate::state::ServerStartTime;

/// Message sent to every client right after the upgrade.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServerInfo {
    /// Message type (always "server-info").
    #[serde(rename = "type")]
    event_type: &'static str,
    /// Server start time in unix seconds.
    start_time: ServerStartTime,
}

impl ServerInfo {
    pub(crate) fn new(start_time: ServerStartTime) -> Self {
        Self {
            event_type: "server-info",
            start_time,
        }
    }
}

/// Handle WebSocket upgrade for live reload.
pub(crate) async fn ws_handler(
    State(start_time): State<ServerStartTime>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match ws {
        Ok(ws) => ws
            .on_failed_upgrade(|err: axum::Error| {
                tracing::error!(error = %err, "WebSocket upgrade failed");
            })
            .on_upgrade(move |socket| handle_socket(socket, start_time)),
        Err(rejection) => {
            tracing::error!(error = %rejection, "WebSocket upgrade failed");
            rejection.into_response()
        }
    }
}

/// Handle an established WebSocket connection.
///
/// The socket is dropped, and so closed, on every return path.
async fn handle_socket(mut socket: WebSocket, start_time: ServerStartTime) {
    tracing::debug!(start_time = start_time.as_unix(), "Live reload client connected");

    if let Err(err) = send_server_info(&mut socket, start_time).await {
        tracing::error!(error = %err, "Failed to send server info");
        return;
    }

    // Client messages are ignored; a read error or close ends the connection.
    while let Some(Ok(_)) = socket.recv().await {}

    tracing::debug!("Live reload client disconnected");
}

async fn send_server_info(
    socket: &mut WebSocket,
    start_time: ServerStartTime,
) -> Result<(), LiveReloadError> {
    let msg = serde_json::to_string(&ServerInfo::new(start_time))?;
    socket
        .send(Message::Text(msg.into()))
        .await
        .map_err(LiveReloadError::Send)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_serialization() {
        let info = ServerInfo::new(ServerStartTime::from_unix(1_700_000_000));

        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "server-info", "startTime": 1_700_000_000})
        );
    }
}
