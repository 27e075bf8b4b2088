use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use sts_db::{
    models::{JoinRequest, JoinRequestStatus, JoinRequestWithUser, MemberRole},
    repositories::{join_request as join_request_repo, member as member_repo},
    violated_constraint,
};

use super::model::{JoinOutcome, ResolveJoinRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    metrics, policy,
    validation::{PathId, ValidatedJson},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/groups/{id}/join", post(join_group))
        .route("/groups/{id}/join-requests", get(list_join_requests))
        .route("/join-requests/{id}", patch(resolve_join_request))
}

fn already_member() -> ApiError {
    ApiError::Conflict("You are already a member of this group".to_string())
}

fn already_pending() -> ApiError {
    ApiError::Conflict("A join request for this group is already pending".to_string())
}

/// Join a public group directly, or file a request against a private one.
///
/// Both paths run in a transaction; the membership and pending-request unique
/// constraints settle any race the pre-checks miss.
async fn join_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
) -> Result<(StatusCode, Json<JoinOutcome>), ApiError> {
    let user_id = auth_user.user_id;
    let group = policy::load_group(&state.pool, group_id).await?;

    let mut tx = state.pool.begin().await?;

    if policy::is_group_lead(&group, user_id)
        || member_repo::find_membership(&mut *tx, group_id, user_id)
            .await?
            .is_some()
    {
        return Err(already_member());
    }

    let outcome = if group.is_public {
        let membership = member_repo::add_member(&mut *tx, group_id, user_id, MemberRole::Member)
            .await?
            .ok_or_else(already_member)?;
        JoinOutcome::Joined { membership }
    } else {
        if join_request_repo::has_pending(&mut *tx, group_id, user_id).await? {
            return Err(already_pending());
        }
        let request = join_request_repo::create_pending(&mut *tx, group_id, user_id)
            .await
            .map_err(|err| match violated_constraint(&err) {
                Some(join_request_repo::PENDING_UNIQUE_INDEX) => already_pending(),
                _ => ApiError::Database(err),
            })?;
        JoinOutcome::Pending { request }
    };

    tx.commit().await?;

    match &outcome {
        JoinOutcome::Joined { .. } => {
            metrics::record_join_event("joined");
            tracing::info!(group_id, user_id, "User joined public group");
        }
        JoinOutcome::Pending { request } => {
            metrics::record_join_event("requested");
            tracing::info!(group_id, user_id, request_id = request.id, "Join request filed");
        }
    }

    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn list_join_requests(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
) -> Result<Json<Vec<JoinRequestWithUser>>, ApiError> {
    let group = policy::load_group(&state.pool, group_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    let requests = join_request_repo::list_pending_for_group(&state.pool, group_id).await?;
    Ok(Json(requests))
}

/// Accept or reject a pending request. Acceptance also adds the membership
/// row, in the same transaction as the status change.
async fn resolve_join_request(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(request_id): PathId,
    ValidatedJson(payload): ValidatedJson<ResolveJoinRequest>,
) -> Result<Json<JoinRequest>, ApiError> {
    if !payload.status.is_terminal() {
        return Err(ApiError::invalid(
            "status",
            "status must be accepted or rejected",
        ));
    }

    let request = join_request_repo::find_by_id(&state.pool, request_id)
        .await?
        .ok_or(ApiError::NotFound("Join request"))?;
    let group = policy::load_group(&state.pool, request.group_id).await?;
    policy::ensure_group_lead(&group, auth_user.user_id)?;

    if request.status.is_terminal() {
        return Err(already_resolved());
    }

    let mut tx = state.pool.begin().await?;

    let resolved = join_request_repo::resolve(&mut *tx, request_id, payload.status)
        .await?
        .ok_or_else(already_resolved)?;

    if resolved.status == JoinRequestStatus::Accepted {
        // Already a member is fine: the request still counts as accepted
        member_repo::add_member(&mut *tx, resolved.group_id, resolved.user_id, MemberRole::Member)
            .await?;
    }

    tx.commit().await?;

    let outcome = match resolved.status {
        JoinRequestStatus::Accepted => "accepted",
        _ => "rejected",
    };
    metrics::record_join_event(outcome);
    tracing::info!(
        request_id,
        group_id = resolved.group_id,
        user_id = resolved.user_id,
        outcome,
        "Join request resolved"
    );

    Ok(Json(resolved))
}

fn already_resolved() -> ApiError {
    ApiError::Conflict("This join request has already been resolved".to_string())
}
