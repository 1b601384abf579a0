use crate::api::dtos::responses::ProfileResponse;
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::{Multipart, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut user = state
        .user_repo
        .find_by_id(&auth.user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Malformed multipart body".into()))?
    {
        match field.name() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Invalid name field".into()))?;
                if value.trim().is_empty() {
                    return Err(AppError::Validation("Name cannot be empty".into()));
                }
                user.name = value;
            }
            Some("email") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Invalid email field".into()))?;
                if !value.contains('@') {
                    return Err(AppError::Validation("Invalid email address".into()));
                }
                user.email = value;
            }
            Some("profilePicture") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Invalid profile picture upload".into()))?;
                let stored_path = state.file_store.save(&original_name, &data).await?;
                user.push_profile_picture(stored_path);
            }
            _ => {}
        }
    }

    let updated = state.user_repo.update(&user).await?;

    info!("Profile updated: {}", updated.id);

    Ok(Json(ProfileResponse::from(updated)))
}

pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_id(&auth.user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    state.user_repo.delete(&user.id).await?;

    // Stored pictures are released best-effort once the row is gone.
    for path in user.profile_pictures() {
        if let Err(e) = state.file_store.remove(&path).await {
            warn!("Failed to remove profile picture {}: {:?}", path, e);
        }
    }

    info!("Profile deleted: {}", user.id);

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
