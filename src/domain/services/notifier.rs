use crate::domain::models::event::Event;
use crate::domain::ports::EmailService;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;
use uuid::Uuid;

/// A transient update pushed to live-update subscribers. `origin` is the
/// websocket connection the frame came from, so it can be skipped on
/// rebroadcast; server-originated updates carry no origin.
#[derive(Debug, Clone, Serialize)]
pub struct LiveUpdate {
    pub origin: Option<Uuid>,
    pub payload: Value,
}

pub struct Notifier {
    email_service: Arc<dyn EmailService>,
    live_tx: broadcast::Sender<LiveUpdate>,
}

impl Notifier {
    pub fn new(email_service: Arc<dyn EmailService>, live_tx: broadcast::Sender<LiveUpdate>) -> Self {
        Self { email_service, live_tx }
    }

    /// Best-effort fan-out of cancellation notices. One task per recipient;
    /// a failed delivery is logged and never affects the others or the caller.
    pub fn notify_cancellation(&self, event_title: &str, recipients: Vec<String>) {
        let body = format!("The event \"{}\" has been canceled.", event_title);

        for recipient in recipients {
            let email_service = self.email_service.clone();
            let body = body.clone();
            tokio::spawn(async move {
                if let Err(e) = email_service.send(&recipient, "Event Canceled", &body).await {
                    warn!("Failed to deliver cancellation notice to {}: {:?}", recipient, e);
                }
            });
        }
    }

    /// Pushes an event snapshot to any connected live subscribers. No
    /// persistence and no delivery guarantee; a no-op with no subscribers.
    pub fn broadcast_event_update(&self, event: &Event) {
        match serde_json::to_value(event) {
            Ok(payload) => {
                let _ = self.live_tx.send(LiveUpdate { origin: None, payload });
            }
            Err(e) => warn!("Failed to serialize event for live broadcast: {:?}", e),
        }
    }
}
