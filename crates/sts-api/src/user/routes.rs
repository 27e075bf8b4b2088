use axum::{Json, Router, extract::State, routing::get};
use sts_db::{models::UserProfile, repositories::user as user_repo, violated_constraint};

use super::model::UpdateProfileRequest;
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    validation::{ValidatedJson, ensure_non_empty_patch},
};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/user/profile", get(get_profile).patch(update_profile))
}

async fn get_profile(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = user_repo::find_profile_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(profile))
}

async fn update_profile(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    ensure_non_empty_patch(payload.has_changes())?;

    let profile = user_repo::update_profile(&state.pool, auth_user.user_id, &payload.into())
        .await
        .map_err(|err| match violated_constraint(&err) {
            Some("users_username_key") => {
                ApiError::Conflict("Username is already taken".to_string())
            }
            _ => ApiError::Database(err),
        })?
        .ok_or(ApiError::NotFound("User"))?;

    tracing::info!(user_id = profile.id, "Profile updated");
    Ok(Json(profile))
}
