use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use sts_db::{
    models::{Notification, NotificationSettings},
    repositories::notification as notification_repo,
};

use super::model::{MarkAllReadResponse, UpdateNotificationRequest, UpdateSettingsRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    validation::{PathId, ValidatedJson, ensure_non_empty_patch},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", post(mark_all_read))
        .route(
            "/notifications/{id}",
            patch(update_notification).delete(delete_notification),
        )
        .route(
            "/notification-settings",
            get(get_settings).patch(update_settings),
        )
}

/// Newest first
async fn list_notifications(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = notification_repo::list_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(notifications))
}

// Another user's notification is reported as missing, not forbidden

async fn update_notification(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(notification_id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateNotificationRequest>,
) -> Result<Json<Notification>, ApiError> {
    let notification = notification_repo::set_read(
        &state.pool,
        notification_id,
        auth_user.user_id,
        payload.is_read,
    )
    .await?
    .ok_or(ApiError::NotFound("Notification"))?;
    Ok(Json(notification))
}

async fn delete_notification(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(notification_id): PathId,
) -> Result<StatusCode, ApiError> {
    let deleted =
        notification_repo::delete_notification(&state.pool, notification_id, auth_user.user_id)
            .await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Notification"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_all_read(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = notification_repo::mark_all_read(&state.pool, auth_user.user_id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// Users who never saved preferences get the all-enabled defaults
async fn get_settings(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<NotificationSettings>, ApiError> {
    let settings = notification_repo::find_settings(&state.pool, auth_user.user_id)
        .await?
        .unwrap_or_else(|| NotificationSettings::defaults_for(auth_user.user_id));
    Ok(Json(settings))
}

async fn update_settings(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    ValidatedJson(payload): ValidatedJson<UpdateSettingsRequest>,
) -> Result<Json<NotificationSettings>, ApiError> {
    ensure_non_empty_patch(payload.has_changes())?;

    let settings =
        notification_repo::upsert_settings(&state.pool, auth_user.user_id, &payload.into()).await?;

    tracing::debug!(user_id = auth_user.user_id, "Notification settings updated");
    Ok(Json(settings))
}
