//! WebSocket push channel.
//!
//! A client receives the backlog burst followed by live notifications, one
//! JSON text frame per notification. Frames sent by the client carry no meaning
//! and are discarded.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use herald_core::Subscription;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let subscription = state.hub.open_connection();
    let connection_id = subscription.id();
    let write_timeout = state.hub.config().write_timeout();
    let (sender, mut receiver) = socket.split();

    info!(%connection_id, backlog = subscription.backlog_len(), "WebSocket client connected");

    let mut send_task = tokio::spawn(forward_notifications(subscription, sender, write_timeout));

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    debug!(%connection_id, len = text.len(), "Ignoring client text frame");
                }
                Ok(Message::Binary(bytes)) => {
                    debug!(%connection_id, len = bytes.len(), "Ignoring client binary frame");
                }
                Ok(Message::Close(_)) => {
                    debug!(%connection_id, "WebSocket client sent close frame");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(%connection_id, error = %e, "WebSocket read failed");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.hub.on_connection_close(connection_id);
    info!(%connection_id, "WebSocket client disconnected");
}

/// Drain a subscription into the socket until either side gives up.
async fn forward_notifications(
    mut subscription: Subscription,
    mut sender: SplitSink<WebSocket, Message>,
    write_timeout: Duration,
) {
    let connection_id = subscription.id();

    while let Some(notification) = subscription.next().await {
        let json = match serde_json::to_string(&notification) {
            Ok(json) => json,
            Err(e) => {
                warn!(%connection_id, notification_id = %notification.id, error = %e, "Failed to encode notification");
                continue;
            }
        };

        match tokio::time::timeout(write_timeout, sender.send(Message::Text(json.into()))).await {
            Ok(Ok(())) => {
                debug!(%connection_id, notification_id = %notification.id, "Pushed notification");
            }
            Ok(Err(e)) => {
                debug!(%connection_id, error = %e, "WebSocket send failed, client disconnected");
                return;
            }
            Err(_) => {
                warn!(%connection_id, timeout_ms = write_timeout.as_millis() as u64, "WebSocket write timed out");
                return;
            }
        }
    }

    // The hub closed this connection (queue overflow or shutdown).
    debug!(%connection_id, state = subscription.state().as_str(), "Subscription ended");
    match tokio::time::timeout(write_timeout, sender.send(Message::Close(None))).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(%connection_id, error = %e, "Failed to send close frame"),
        Err(_) => debug!(%connection_id, "Close frame write timed out"),
    }
}
