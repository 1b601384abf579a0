#![allow(dead_code)]

use event_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::EmailService,
    domain::services::{auth_service::AuthService, event_service::EventService, notifier::Notifier},
    error::AppError,
    infra::repositories::{sqlite_event_repo::SqliteEventRepo, sqlite_user_repo::SqliteUserRepo},
    infra::uploads::local_file_store::LocalFileStore,
    state::AppState,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

/// Mail port double that records every delivery instead of sending it.
#[derive(Default)]
pub struct RecordingEmailService {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

impl RecordingEmailService {
    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(r, _, _)| r.clone()).collect()
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub upload_dir: String,
    pub state: Arc<AppState>,
    pub mailbox: Arc<RecordingEmailService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let upload_dir = format!("test_uploads_{}", Uuid::new_v4());

        let priv_key_pem = include_str!("keys/test_private.pem");
        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            upload_dir: upload_dir.clone(),
            rate_limit_per_minute: 100_000,
        };

        let mailbox = Arc::new(RecordingEmailService::default());
        let (live_tx, _) = broadcast::channel(64);
        let notifier = Arc::new(Notifier::new(mailbox.clone(), live_tx.clone()));

        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let event_service = Arc::new(EventService::new(event_repo.clone(), notifier.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            event_repo,
            file_store: Arc::new(LocalFileStore::new(upload_dir.clone())),
            email_service: mailbox.clone(),
            auth_service: Arc::new(AuthService::new(config)),
            event_service,
            notifier,
            live_tx,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            upload_dir,
            state,
            mailbox,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Response {
        self.request(
            "POST",
            "/signup",
            None,
            Some(json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert!(response.status().is_success(), "login failed for {}", email);

        let body = parse_body(response).await;
        body["token"].as_str().unwrap().to_string()
    }

    /// Signs up with a fixed test password and returns a bearer token.
    pub async fn signup_and_login(&self, name: &str, email: &str) -> String {
        let response = self.signup(name, email, "password123").await;
        assert_eq!(response.status().as_u16(), 201, "signup failed for {}", email);
        self.login(email, "password123").await
    }

    /// Creates an event a week out and returns its id.
    pub async fn create_event(&self, token: &str, title: &str, capacity: i64) -> String {
        let response = self
            .request(
                "POST",
                "/events",
                Some(token),
                Some(json!({
                    "title": title,
                    "description": "Test event",
                    "date": (Utc::now() + Duration::days(7)).to_rfc3339(),
                    "capacity": capacity,
                    "price": 0.0
                })),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201, "event creation failed");

        let body = parse_body(response).await;
        body["id"].as_str().unwrap().to_string()
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Hand-rolled multipart encoder for profile update tests.
/// Each field is (name, optional filename, payload bytes).
pub fn multipart_body(boundary: &str, fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}
