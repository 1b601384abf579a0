use crate::domain::models::{
    event::{Event, RegistrationOutcome},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Applies the update only while the new capacity still covers every
    /// registered attendee; `None` means that guard failed. The check rides
    /// in the UPDATE itself, so a registration racing the shrink cannot
    /// strand attendees above the cap.
    async fn update(&self, event: &Event) -> Result<Option<Event>, AppError>;
    async fn mark_canceled(&self, id: &str) -> Result<(), AppError>;

    /// Capacity and cancellation check + append in one atomic store
    /// operation. Two concurrent registrations must never both succeed past
    /// capacity, and a registration racing `mark_canceled` must lose.
    async fn register_attendee(
        &self,
        event_id: &str,
        user_id: &str,
        registered_at: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, AppError>;

    /// Returns false when the user was not registered.
    async fn remove_attendee(&self, event_id: &str, user_id: &str) -> Result<bool, AppError>;

    async fn attendee_ids(&self, event_id: &str) -> Result<Vec<String>, AppError>;
    async fn attendee_emails(&self, event_id: &str) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persists the upload and returns the stored path.
    async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, AppError>;
    async fn remove(&self, path: &str) -> Result<(), AppError>;
}
