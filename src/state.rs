use crate::config::Config;
use crate::domain::ports::{EmailService, EventRepository, FileStore, UserRepository};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::event_service::EventService;
use crate::domain::services::notifier::{LiveUpdate, Notifier};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub file_store: Arc<dyn FileStore>,
    pub email_service: Arc<dyn EmailService>,
    pub auth_service: Arc<AuthService>,
    pub event_service: Arc<EventService>,
    pub notifier: Arc<Notifier>,
    pub live_tx: broadcast::Sender<LiveUpdate>,
}
