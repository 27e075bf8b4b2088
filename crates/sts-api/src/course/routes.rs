use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use sts_db::{models::Course, repositories::course as course_repo};

use super::model::{CreateCourseRequest, UpdateCourseRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    policy,
    validation::{PathId, ValidatedJson, ensure_non_empty_patch},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/groups/{id}/courses",
            get(list_courses).post(create_course),
        )
        .route(
            "/courses/{id}",
            get(get_course).patch(update_course).delete(delete_course),
        )
}

async fn create_course(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let group = policy::load_group(&state.pool, group_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    let course = course_repo::create_course(&state.pool, group_id, &payload.into()).await?;

    tracing::info!(course_id = course.id, group_id, "Course created");
    Ok((StatusCode::CREATED, Json(course)))
}

async fn list_courses(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
) -> Result<Json<Vec<Course>>, ApiError> {
    let group = policy::load_group(&state.pool, group_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let courses = course_repo::list_for_group(&state.pool, group_id).await?;
    Ok(Json(courses))
}

async fn get_course(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(course_id): PathId,
) -> Result<Json<Course>, ApiError> {
    let (course, group) = policy::group_for_course(&state.pool, course_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;
    Ok(Json(course))
}

async fn update_course(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(course_id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateCourseRequest>,
) -> Result<Json<Course>, ApiError> {
    ensure_non_empty_patch(payload.name.is_some() || payload.description.is_some())?;

    let (_, group) = policy::group_for_course(&state.pool, course_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    let course = course_repo::update_course(&state.pool, course_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Course"))?;
    Ok(Json(course))
}

/// Lead only. Decks, flashcards, tests and results under the course go with it.
async fn delete_course(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(course_id): PathId,
) -> Result<StatusCode, ApiError> {
    let (_, group) = policy::group_for_course(&state.pool, course_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    if course_repo::delete_course(&state.pool, course_id).await? == 0 {
        return Err(ApiError::NotFound("Course"));
    }

    tracing::info!(course_id, group_id = group.id, "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}
