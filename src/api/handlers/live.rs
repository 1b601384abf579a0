use crate::domain::services::notifier::LiveUpdate;
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;
use uuid::Uuid;

#[derive(Deserialize)]
struct ClientFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    event: Value,
}

pub async fn live_updates(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One connection: incoming `updateEvent` frames are rebroadcast as
/// `eventUpdated` to every other subscriber; frames from this connection
/// are skipped on the way back out.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = Uuid::new_v4();
    debug!("Live client connected: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.live_tx.subscribe();

    let mut send_task = tokio::spawn(async move {
        while let Some(update) = next_update(&mut rx).await {
            if update.origin == Some(conn_id) {
                continue;
            }
            let frame = json!({ "type": "eventUpdated", "event": update.payload });
            if sender.send(Message::Text(frame.to_string().into())).await.is_err() {
                break;
            }
        }
    });

    let live_tx = state.live_tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Ok(frame) = serde_json::from_str::<ClientFrame>(text.as_str()) {
                        if frame.kind == "updateEvent" {
                            let _ = live_tx.send(LiveUpdate {
                                origin: Some(conn_id),
                                payload: frame.event,
                            });
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    debug!("Live client disconnected: {}", conn_id);
}

/// A subscriber that falls behind the channel just misses the lapped frames;
/// only a closed channel ends the stream.
async fn next_update(rx: &mut broadcast::Receiver<LiveUpdate>) -> Option<LiveUpdate> {
    loop {
        match rx.recv().await {
            Ok(update) => return Some(update),
            Err(RecvError::Lagged(skipped)) => {
                debug!("Live subscriber lagged, {} updates dropped", skipped);
            }
            Err(RecvError::Closed) => return None,
        }
    }
}
