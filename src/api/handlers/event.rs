use crate::api::dtos::{
    requests::{CreateEventRequest, UpdateEventRequest},
    responses::EventResponse,
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::event::{Event, EventPatch};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if payload.capacity < 0 {
        return Err(AppError::Validation("Capacity must be non-negative".into()));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("Price must be non-negative".into()));
    }

    info!("Creating event: {} for user: {}", payload.title, auth.user_id);

    let event = Event::new(
        auth.user_id,
        payload.title,
        payload.description,
        payload.date,
        payload.capacity,
        payload.price,
    );

    let created = state.event_service.create_event(event).await?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_event(created, vec![])),
    ))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(ref title) = payload.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be empty".into()));
        }
    }
    if let Some(capacity) = payload.capacity {
        if capacity < 0 {
            return Err(AppError::Validation("Capacity must be non-negative".into()));
        }
    }
    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::Validation("Price must be non-negative".into()));
        }
    }

    let patch = EventPatch {
        title: payload.title,
        description: payload.description,
        date: payload.date,
        capacity: payload.capacity,
        price: payload.price,
    };

    let updated = state
        .event_service
        .update_event(&auth.user_id, &event_id, patch)
        .await?;
    let attendees = state.event_service.attendees(&event_id).await?;

    Ok(Json(EventResponse::from_event(updated, attendees)))
}

pub async fn register_for_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_service.register(&auth.user_id, &event_id).await?;
    Ok(Json(json!({ "status": "registered" })))
}

pub async fn cancel_registration(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .event_service
        .cancel_registration(&auth.user_id, &event_id)
        .await?;
    Ok(Json(json!({ "status": "registration_canceled" })))
}

pub async fn cancel_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_service.cancel_event(&auth.user_id, &event_id).await?;
    Ok(Json(json!({ "status": "canceled" })))
}
