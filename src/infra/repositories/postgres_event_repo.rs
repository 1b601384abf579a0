use crate::domain::{
    models::event::{Event, RegistrationOutcome},
    ports::EventRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, date, capacity, price,
                creator_id, is_canceled, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *"#,
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.capacity)
        .bind(event.price)
        .bind(&event.creator_id)
        .bind(event.is_canceled)
        .bind(event.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Option<Event>, AppError> {
        // The capacity guard is part of the UPDATE, so a registration landing
        // mid-shrink cannot leave more attendees than seats.
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=$1, description=$2, date=$3, capacity=$4, price=$5
               WHERE id=$6
                 AND $4 >= (SELECT COUNT(*) FROM event_attendees WHERE event_id = $6)
               RETURNING *"#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.capacity)
        .bind(event.price)
        .bind(&event.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn mark_canceled(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE events SET is_canceled = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }

    async fn register_attendee(
        &self,
        event_id: &str,
        user_id: &str,
        registered_at: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, AppError> {
        // Row lock on the event serializes concurrent registrations against
        // each other and against cancellation; the checks below see every
        // committed attendee and the committed cancellation state.
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let row: Option<(i64, bool)> =
            sqlx::query_as("SELECT capacity, is_canceled FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;

        let (capacity, is_canceled) = row.ok_or(AppError::NotFound("Event not found".into()))?;

        if is_canceled {
            return Ok(RegistrationOutcome::Canceled);
        }

        let already_registered: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM event_attendees WHERE event_id = $1 AND user_id = $2)",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if already_registered {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_attendees WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;

        if count >= capacity {
            return Ok(RegistrationOutcome::SoldOut);
        }

        sqlx::query(
            "INSERT INTO event_attendees (event_id, user_id, registered_at) VALUES ($1, $2, $3)",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(registered_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(RegistrationOutcome::Registered)
    }

    async fn remove_attendee(&self, event_id: &str, user_id: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM event_attendees WHERE event_id = $1 AND user_id = $2")
                .bind(event_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn attendee_ids(&self, event_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM event_attendees WHERE event_id = $1 ORDER BY registered_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn attendee_emails(&self, event_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            r#"SELECT u.email FROM event_attendees a
               JOIN users u ON u.id = a.user_id
               WHERE a.event_id = $1 ORDER BY a.registered_at"#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
