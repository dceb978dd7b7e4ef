/// WebSocket handler for live status snapshots

use axum::{
    extract::ws::{Message, WebSocket},
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};

use super::AppState;
use crate::core::ServiceRegistry;

pub async fn ws_status_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_status_websocket(socket, state))
}

fn snapshot_message(snapshot: &ServiceRegistry) -> Option<Message> {
    serde_json::to_string(snapshot.records()).ok().map(Message::Text)
}

/// Send the current snapshot, then one message per published change
async fn handle_status_websocket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut snapshots = state.snapshots.clone();

    let initial = snapshots.borrow_and_update().clone();
    if let Some(message) = snapshot_message(&initial) {
        if sender.send(message).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                // Polling stopped
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(message) = snapshot_message(&snapshot) {
                    if sender.send(message).await.is_err() {
                        break;
                    }
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("status websocket closed");
}
