use crate::domain::models::event::Event;
use crate::domain::models::user::User;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub capacity: i64,
    pub price: f64,
    pub creator_id: String,
    pub is_canceled: bool,
    pub attendees: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn from_event(event: Event, attendees: Vec<String>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            capacity: event.capacity,
            price: event.price,
            creator_id: event.creator_id,
            is_canceled: event.is_canceled,
            attendees,
            created_at: event.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub profile_pictures: Vec<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            profile_pictures: user.profile_pictures(),
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}
