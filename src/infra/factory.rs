use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, SqlitePool};
use tokio::sync::broadcast;
use tracing::info;

use crate::config::Config;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::event_service::EventService;
use crate::domain::services::notifier::Notifier;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::infra::uploads::local_file_store::LocalFileStore;
use crate::state::AppState;

const LIVE_CHANNEL_CAPACITY: usize = 256;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let file_store = Arc::new(LocalFileStore::new(config.upload_dir.clone()));
    let auth_service = Arc::new(AuthService::new(config.clone()));

    let (live_tx, _) = broadcast::channel(LIVE_CHANNEL_CAPACITY);
    let notifier = Arc::new(Notifier::new(email_service.clone(), live_tx.clone()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let event_repo = Arc::new(PostgresEventRepo::new(pool.clone()));
        let event_service = Arc::new(EventService::new(event_repo.clone(), notifier.clone()));

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            event_repo,
            file_store,
            email_service,
            auth_service,
            event_service,
            notifier,
            live_tx,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let event_service = Arc::new(EventService::new(event_repo.clone(), notifier.clone()));

        AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            event_repo,
            file_store,
            email_service,
            auth_service,
            event_service,
            notifier,
            live_tx,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
