use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};

use super::hub::RelayHub;

/// Upgrade to a relay socket.
///
/// Not behind bearer auth: browsers cannot attach headers to the upgrade.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(hub): State<Arc<RelayHub>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: Arc<RelayHub>) {
    let (conn_id, mut rx) = hub.register().await;
    tracing::info!(%conn_id, "Relay connected");

    let (mut sink, mut stream) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(body)) => {
                if serde_json::from_str::<serde_json::Value>(body.as_str()).is_err() {
                    tracing::debug!(%conn_id, "Dropped non-JSON relay frame");
                    continue;
                }
                let delivered = hub.broadcast_except(conn_id, Message::Text(body)).await;
                tracing::trace!(%conn_id, delivered, "Relayed event");
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(%conn_id, "Dropped binary relay frame");
            }
            Ok(Message::Close(_)) => break,
            // Ping/pong are answered by the protocol layer
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "Relay receive error");
                break;
            }
        }
    }

    hub.unregister(conn_id).await;
    send_task.abort();
    tracing::info!(%conn_id, "Relay disconnected");
}
