use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use sts_db::{
    models::{MemberRole, MemberWithUser, StudyGroup},
    repositories::{group as group_repo, member as member_repo},
};

use super::model::{CreateGroupRequest, UpdateGroupRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    policy,
    validation::{PathId, ValidatedJson, ensure_non_empty_patch},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route(
            "/groups/{id}",
            get(get_group).patch(update_group).delete(delete_group),
        )
        .route("/groups/{id}/members", get(list_members))
}

/// Create a group with the caller as lead.
///
/// The group row and the lead's membership row commit together.
async fn create_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    ValidatedJson(payload): ValidatedJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<StudyGroup>), ApiError> {
    let mut tx = state.pool.begin().await?;

    let group = group_repo::create_group(&mut *tx, auth_user.user_id, &payload.into()).await?;
    member_repo::add_member(&mut *tx, group.id, auth_user.user_id, MemberRole::Lead).await?;

    tx.commit().await?;

    tracing::info!(group_id = group.id, user_id = auth_user.user_id, "Study group created");
    Ok((StatusCode::CREATED, Json(group)))
}

async fn list_groups(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<StudyGroup>>, ApiError> {
    let groups = group_repo::find_by_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(groups))
}

/// Group details are visible to any signed-in user so they can decide to join
async fn get_group(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
) -> Result<Json<StudyGroup>, ApiError> {
    let group = policy::load_group(&state.pool, group_id).await?;
    Ok(Json(group))
}

async fn update_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateGroupRequest>,
) -> Result<Json<StudyGroup>, ApiError> {
    ensure_non_empty_patch(payload.has_changes())?;

    let group = policy::load_group(&state.pool, group_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    let updated = group_repo::update_group(&state.pool, group_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Group"))?;

    tracing::info!(group_id, "Study group updated");
    Ok(Json(updated))
}

async fn delete_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
) -> Result<StatusCode, ApiError> {
    let group = policy::load_group(&state.pool, group_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    if group_repo::delete_group(&state.pool, group_id).await? == 0 {
        return Err(ApiError::NotFound("Group"));
    }

    tracing::info!(group_id, "Study group deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_members(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
) -> Result<Json<Vec<MemberWithUser>>, ApiError> {
    let group = policy::load_group(&state.pool, group_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let members = member_repo::list_members(&state.pool, group_id).await?;
    Ok(Json(members))
}
