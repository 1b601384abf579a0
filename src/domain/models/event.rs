use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub capacity: i64,
    pub price: f64,
    pub creator_id: String,
    pub is_canceled: bool,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        creator_id: String,
        title: String,
        description: String,
        date: DateTime<Utc>,
        capacity: i64,
        price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            date,
            capacity,
            price,
            creator_id,
            is_canceled: false,
            created_at: Utc::now(),
        }
    }
}

/// Partial update with explicit field presence. An omitted field stays
/// untouched; a present field is always applied.
#[derive(Debug, Default, Clone)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub capacity: Option<i64>,
    pub price: Option<f64>,
}

/// Result of an atomic registration attempt at the store level.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    SoldOut,
    AlreadyRegistered,
    Canceled,
}
