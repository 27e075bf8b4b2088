use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use sts_db::{
    models::{Test, TestResult},
    repositories::{result as result_repo, test as test_repo},
};

use super::model::{CreateTestRequest, SubmitResultRequest, UpdateTestRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    events, policy,
    validation::{PathId, ValidatedJson, ensure_non_empty_patch},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/courses/{id}/tests", get(list_tests).post(create_test))
        .route("/tests/upcoming", get(upcoming_tests))
        .route(
            "/tests/{id}",
            get(get_test).patch(update_test).delete(delete_test),
        )
        .route("/tests/{id}/results", get(list_results).post(submit_result))
}

/// Schedule a test (lead only), then remind every opted-in member
async fn create_test(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(course_id): PathId,
    ValidatedJson(payload): ValidatedJson<CreateTestRequest>,
) -> Result<(StatusCode, Json<Test>), ApiError> {
    let (_, group) = policy::group_for_course(&state.pool, course_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    let test =
        test_repo::create_test(&state.pool, course_id, auth_user.user_id, &payload.into()).await?;
    tracing::info!(test_id = test.id, course_id, group_id = group.id, "Test scheduled");

    events::test_created(&state.pool, &test, group.id).await;

    Ok((StatusCode::CREATED, Json(test)))
}

async fn list_tests(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(course_id): PathId,
) -> Result<Json<Vec<Test>>, ApiError> {
    let (_, group) = policy::group_for_course(&state.pool, course_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let tests = test_repo::list_for_course(&state.pool, course_id).await?;
    Ok(Json(tests))
}

/// Future tests across every group the caller leads or belongs to, soonest first
async fn upcoming_tests(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<Test>>, ApiError> {
    let tests = test_repo::find_upcoming_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(tests))
}

async fn get_test(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(test_id): PathId,
) -> Result<Json<Test>, ApiError> {
    let (test, group) = policy::group_for_test(&state.pool, test_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;
    Ok(Json(test))
}

async fn update_test(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(test_id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateTestRequest>,
) -> Result<Json<Test>, ApiError> {
    ensure_non_empty_patch(payload.has_changes())?;

    let (_, group) = policy::group_for_test(&state.pool, test_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    let test = test_repo::update_test(&state.pool, test_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Test"))?;
    Ok(Json(test))
}

async fn delete_test(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(test_id): PathId,
) -> Result<StatusCode, ApiError> {
    let (_, group) = policy::group_for_test(&state.pool, test_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    if test_repo::delete_test(&state.pool, test_id).await? == 0 {
        return Err(ApiError::NotFound("Test"));
    }

    tracing::info!(test_id, group_id = group.id, "Test deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Record an attempt and add its score to the caller's group stats.
///
/// Repeat attempts are allowed and each one counts.
async fn submit_result(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(test_id): PathId,
    ValidatedJson(payload): ValidatedJson<SubmitResultRequest>,
) -> Result<(StatusCode, Json<TestResult>), ApiError> {
    let (_, group) = policy::group_for_test(&state.pool, test_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let result = result_repo::create_result(
        &state.pool,
        test_id,
        auth_user.user_id,
        payload.score,
        payload.answers.as_ref(),
    )
    .await?;

    events::test_result_submitted(&state.pool, auth_user.user_id, group.id, result.score).await;

    tracing::info!(
        result_id = result.id,
        test_id,
        user_id = auth_user.user_id,
        score = result.score,
        "Test result submitted"
    );
    Ok((StatusCode::CREATED, Json(result)))
}

async fn list_results(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(test_id): PathId,
) -> Result<Json<Vec<TestResult>>, ApiError> {
    let (_, group) = policy::group_for_test(&state.pool, test_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let results = result_repo::list_for_user(&state.pool, test_id, auth_user.user_id).await?;
    Ok(Json(results))
}
