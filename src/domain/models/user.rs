use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_ORGANIZER: &str = "ORGANIZER";
pub const ROLE_PARTICIPANT: &str = "PARTICIPANT";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    /// JSON array of stored file paths, append-only, insertion order preserved.
    pub pictures_json: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            role: ROLE_PARTICIPANT.to_string(),
            pictures_json: "[]".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn profile_pictures(&self) -> Vec<String> {
        serde_json::from_str(&self.pictures_json).unwrap_or_default()
    }

    pub fn push_profile_picture(&mut self, path: String) {
        let mut pictures = self.profile_pictures();
        pictures.push(path);
        self.pictures_json = serde_json::to_string(&pictures).unwrap_or_else(|_| "[]".to_string());
    }
}
