use crate::domain::{
    models::event::{Event, RegistrationOutcome},
    ports::EventRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, date, capacity, price,
                creator_id, is_canceled, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
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
                title=?, description=?, date=?, capacity=?, price=?
               WHERE id=?
                 AND ? >= (SELECT COUNT(*) FROM event_attendees WHERE event_id = ?)
               RETURNING *"#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.capacity)
        .bind(event.price)
        .bind(&event.id)
        .bind(event.capacity)
        .bind(&event.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn mark_canceled(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE events SET is_canceled = TRUE WHERE id = ?")
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
        // Single conditional insert: the capacity and cancellation guards and
        // the append are one statement, so two concurrent registrations cannot
        // both pass the check and a cancellation racing in cannot be outrun.
        let result = sqlx::query(
            r#"INSERT INTO event_attendees (event_id, user_id, registered_at)
               SELECT ?, ?, ?
               WHERE (SELECT COUNT(*) FROM event_attendees WHERE event_id = ?)
                   < (SELECT capacity FROM events WHERE id = ? AND is_canceled = FALSE)"#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(registered_at)
        .bind(event_id)
        .bind(event_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => {
                let canceled: Option<bool> =
                    sqlx::query_scalar("SELECT is_canceled FROM events WHERE id = ?")
                        .bind(event_id)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(AppError::Database)?;
                if canceled.unwrap_or(false) {
                    Ok(RegistrationOutcome::Canceled)
                } else {
                    Ok(RegistrationOutcome::SoldOut)
                }
            }
            Ok(_) => Ok(RegistrationOutcome::Registered),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(RegistrationOutcome::AlreadyRegistered)
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn remove_attendee(&self, event_id: &str, user_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM event_attendees WHERE event_id = ? AND user_id = ?")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn attendee_ids(&self, event_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM event_attendees WHERE event_id = ? ORDER BY registered_at",
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
               WHERE a.event_id = ? ORDER BY a.registered_at"#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
